use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use pickem_bankroll::Report;

#[derive(Clone)]
pub struct AppState {
    pub report: Arc<Report>,
}

/// Build the Axum router for the dashboard.
///
/// Anything not matched by a route is served from `static_dir`.
pub fn router(state: AppState, static_dir: impl Into<PathBuf>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/dashboard.html", get(index_handler))
        .route("/api/stats", get(stats_handler))
        .route("/stats_output.json", get(stats_handler))
        .fallback_service(ServeDir::new(static_dir.into()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index_handler() -> impl IntoResponse {
    Html(DASHBOARD_HTML)
}

/// GET /api/stats
async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.report.as_ref().clone())
}

/// Embedded single-file dashboard (HTML + CSS + JS)
const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Pick'em Bankroll Dashboard</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .stats-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(180px, 1fr)); gap: 1rem; }
  .stat-card { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.2rem; }
  .stat-card .label { color: var(--muted); font-size: .8rem; text-transform: uppercase; letter-spacing: .06em; margin-bottom: .4rem; }
  .stat-card .value { font-size: 1.7rem; font-weight: 700; }
  .pos { color: var(--green); }
  .neg { color: var(--red); }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .9rem 1.2rem; border-bottom: 1px solid var(--border); font-weight: 600; }
  table { width: 100%; border-collapse: collapse; }
  th { padding: .7rem 1rem; text-align: left; font-size: .75rem; text-transform: uppercase; color: var(--muted); border-bottom: 1px solid var(--border); }
  td { padding: .65rem 1rem; font-size: .88rem; border-bottom: 1px solid #1e2130; }
  tr:last-child td { border-bottom: none; }
  #chart-container { padding: 1rem; height: 260px; position: relative; }
  #legend { display: flex; flex-wrap: wrap; gap: .8rem; padding: 0 1rem 1rem; font-size: .8rem; }
  #legend span::before { content: ''; display: inline-block; width: 10px; height: 10px; border-radius: 2px; margin-right: .35rem; background: var(--swatch); }
  .two-col { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
  @media (max-width: 768px) { .two-col { grid-template-columns: 1fr; } }
  .empty { color: var(--muted); text-align: center; padding: 2rem; font-size: .9rem; }
</style>
</head>
<body>
<header>
  <h1>🏈 Pick'em Bankroll</h1>
  <span style="margin-left:auto;color:var(--muted);font-size:.8rem;" id="last-updated"></span>
</header>

<main>
  <div class="stats-grid">
    <div class="stat-card"><div class="label">Total Picks</div><div class="value" id="s-picks">–</div></div>
    <div class="stat-card"><div class="label">Record</div><div class="value" id="s-record">–</div></div>
    <div class="stat-card"><div class="label">Win Rate</div><div class="value" id="s-winrate">–</div></div>
    <div class="stat-card"><div class="label">Net Profit</div><div class="value" id="s-net">–</div></div>
    <div class="stat-card"><div class="label">ROI</div><div class="value" id="s-roi">–</div></div>
    <div class="stat-card"><div class="label">Avg Win</div><div class="value" id="s-avgwin">–</div></div>
    <div class="stat-card"><div class="label">Avg Loss</div><div class="value" id="s-avgloss">–</div></div>
    <div class="stat-card"><div class="label">Biggest Win</div><div class="value" id="s-bigwin">–</div></div>
    <div class="stat-card"><div class="label">Current Streak</div><div class="value" id="s-streak">–</div></div>
    <div class="stat-card"><div class="label">Longest Streaks</div><div class="value" id="s-longest">–</div></div>
  </div>

  <div class="panel">
    <div class="panel-header">Bankroll Strategies</div>
    <div id="chart-container"><canvas id="equity-chart"></canvas></div>
    <div id="legend"></div>
    <table>
      <thead><tr><th>Strategy</th><th>Ending</th><th>Profit</th><th>ROI</th><th>Peak</th><th>Lowest</th><th>Max Drawdown</th></tr></thead>
      <tbody id="strategies-tbody"><tr><td colspan="7" class="empty">Loading…</td></tr></tbody>
    </table>
  </div>

  <div class="two-col">
    <div class="panel">
      <div class="panel-header">By Line Range</div>
      <table>
        <thead><tr><th>Range</th><th>Bets</th><th>W-L</th><th>Win Rate</th><th>Profit</th><th>ROI</th></tr></thead>
        <tbody id="ranges-tbody"><tr><td colspan="6" class="empty">Loading…</td></tr></tbody>
      </table>
    </div>

    <div class="panel">
      <div class="panel-header">Weekly</div>
      <table>
        <thead><tr><th>Week</th><th>W-L</th><th>Profit</th></tr></thead>
        <tbody id="weekly-tbody"><tr><td colspan="3" class="empty">Loading…</td></tr></tbody>
      </table>
    </div>
  </div>
</main>

<script>
const fmt = new Intl.NumberFormat('en-US', { style:'currency', currency:'USD', minimumFractionDigits:2 });
const signed = v => (v >= 0 ? '+' : '') + fmt.format(v);
const cls = v => v >= 0 ? 'pos' : 'neg';
const COLORS = ['#6c63ff','#00c896','#ffb400','#4fc3f7','#ff4f6a','#e040fb','#8bc34a','#ff8a65'];

function setValue(id, text, klass) {
  const el = document.getElementById(id);
  el.textContent = text;
  el.className = 'value' + (klass ? ' ' + klass : '');
}

function renderOverall(o, s) {
  setValue('s-picks', o.total_picks);
  setValue('s-record', `${o.wins}-${o.losses}`);
  setValue('s-winrate', o.win_rate.toFixed(1) + '%');
  setValue('s-net', signed(o.net_profit), cls(o.net_profit));
  setValue('s-roi', o.roi.toFixed(1) + '%', cls(o.roi));
  setValue('s-avgwin', fmt.format(o.avg_win));
  setValue('s-avgloss', fmt.format(o.avg_loss));
  setValue('s-bigwin', fmt.format(o.biggest_win));
  const streak = s.current_streak_type === 'none' ? '–' : `${s.current_streak} ${s.current_streak_type}`;
  setValue('s-streak', streak, s.current_streak_type === 'win' ? 'pos' : (s.current_streak_type === 'loss' ? 'neg' : ''));
  setValue('s-longest', `${s.longest_win_streak}W / ${s.longest_lose_streak}L`);
}

function renderRanges(ranges) {
  const tbody = document.getElementById('ranges-tbody');
  tbody.innerHTML = ranges.map(r => `<tr>
    <td>${r.category.replace(/_/g,' ')} <span style="color:var(--muted)">(${r.range})</span></td>
    <td>${r.total_bets}</td>
    <td>${r.wins}-${r.losses}</td>
    <td>${r.win_rate.toFixed(1)}%</td>
    <td class="${cls(r.profit)}">${signed(r.profit)}</td>
    <td class="${cls(r.roi)}">${r.roi.toFixed(1)}%</td>
  </tr>`).join('');
}

function renderWeekly(weeks) {
  const tbody = document.getElementById('weekly-tbody');
  if (!weeks.length) { tbody.innerHTML = '<tr><td colspan="3" class="empty">No completed weeks</td></tr>'; return; }
  tbody.innerHTML = weeks.map(w => `<tr>
    <td>Week ${w.week}</td>
    <td>${w.wins}-${w.losses}</td>
    <td class="${cls(w.profit)}">${signed(w.profit)}</td>
  </tr>`).join('');
}

function renderStrategies(strategies) {
  const tbody = document.getElementById('strategies-tbody');
  if (!strategies.length) { tbody.innerHTML = '<tr><td colspan="7" class="empty">No strategies simulated</td></tr>'; return; }
  const sorted = strategies.slice().sort((a, b) => b.ending_bankroll - a.ending_bankroll);
  tbody.innerHTML = sorted.map(s => `<tr>
    <td>${s.name}</td>
    <td>${fmt.format(s.ending_bankroll)}</td>
    <td class="${cls(s.profit)}">${signed(s.profit)}</td>
    <td class="${cls(s.roi)}">${s.roi.toFixed(1)}%</td>
    <td>${fmt.format(s.peak_bankroll)}</td>
    <td>${fmt.format(s.lowest_point)}</td>
    <td class="neg">${fmt.format(s.max_drawdown)}</td>
  </tr>`).join('');

  document.getElementById('legend').innerHTML = strategies.map((s, i) =>
    `<span style="--swatch:${COLORS[i % COLORS.length]}">${s.name}</span>`).join('');
  drawChart(strategies.map(s => s.history));
}

function drawChart(series) {
  const canvas = document.getElementById('equity-chart');
  const ctx = canvas.getContext('2d');
  const W = canvas.parentElement.clientWidth - 32;
  const H = 220;
  canvas.width = W;
  canvas.height = H;

  const all = series.flat();
  const points = Math.max(...series.map(s => s.length));
  if (points < 2) return;
  const min = Math.min(...all) * 0.98;
  const max = Math.max(...all) * 1.02;
  const range = max - min || 1;
  const step = W / (points - 1);
  const toY = v => H - ((v - min) / range) * H;

  ctx.clearRect(0, 0, W, H);
  ctx.strokeStyle = '#2a2d3a';
  ctx.lineWidth = 1;
  for (let i = 0; i <= 4; i++) {
    const y = H - (i / 4) * H;
    ctx.beginPath(); ctx.moveTo(0, y); ctx.lineTo(W, y); ctx.stroke();
  }

  series.forEach((data, idx) => {
    ctx.strokeStyle = COLORS[idx % COLORS.length];
    ctx.lineWidth = 2;
    ctx.beginPath();
    data.forEach((v, i) => i === 0 ? ctx.moveTo(0, toY(v)) : ctx.lineTo(i * step, toY(v)));
    ctx.stroke();
  });
}

async function loadAll() {
  const r = await fetch('/api/stats');
  if (!r.ok) return;
  const report = await r.json();
  renderOverall(report.overall, report.streaks);
  renderRanges(report.by_line_range);
  renderWeekly(report.weekly);
  renderStrategies(report.bankroll_strategies);
  document.getElementById('last-updated').textContent = 'Loaded ' + new Date().toLocaleTimeString();
}

loadAll();
window.addEventListener('resize', loadAll);
</script>
</body>
</html>"#;
