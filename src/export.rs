use anyhow::{Context, Result};
use std::path::Path;

use pickem_bankroll::analysis::OverallStats;
use pickem_bankroll::Report;

/// Write the report as pretty-printed JSON.
pub fn write_report(path: &Path, report: &Report) -> Result<()> {
    let raw = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    std::fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))
}

/// Console summary of the overall stats.
pub fn render_summary(stats: &OverallStats) -> String {
    let rule = "=".repeat(70);
    [
        rule.clone(),
        "SUMMARY:".to_string(),
        rule.clone(),
        format!("Total Picks: {}", stats.total_picks),
        format!("Wins: {}", stats.wins),
        format!("Losses: {}", stats.losses),
        format!("Win Rate: {:.1}%", stats.win_rate),
        String::new(),
        format!("Total Winnings: ${:.2}", stats.total_winnings),
        format!("Total Losses: ${:.2}", stats.total_losses),
        format!("NET PROFIT: ${:.2}", stats.net_profit),
        String::new(),
        format!("ROI: {:.1}%", stats.roi),
        rule,
    ]
    .join("\n")
}
