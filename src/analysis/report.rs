//! Assembles every aggregate and the strategy simulation into one report.

use serde::Serialize;
use tracing::info;

use super::bankroll::{simulate, StrategyOutcome};
use super::resolver::PickIndex;
use super::stats::{
    line_range_stats, overall_stats, streak_stats, weekly_stats, LineRangeStats, OverallStats,
    StreakStats, WeeklyStats,
};
use crate::error::{AnalysisError, Result};
use crate::models::{Pick, WeekDataset};

/// Stake and bankroll settings for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    /// Fixed stake per pick used for profit, ROI and per-range stats
    pub bet_amount: f64,
    /// Opening bankroll of every simulated strategy
    pub starting_bankroll: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bet_amount: 100.0,
            starting_bankroll: 1000.0,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.bet_amount.is_finite() && self.bet_amount > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "bet_amount must be positive, got {}",
                self.bet_amount
            )));
        }
        if !(self.starting_bankroll.is_finite() && self.starting_bankroll > 0.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "starting_bankroll must be positive, got {}",
                self.starting_bankroll
            )));
        }
        Ok(())
    }
}

/// The exported statistics document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub overall: OverallStats,
    pub by_line_range: Vec<LineRangeStats>,
    pub weekly: Vec<WeeklyStats>,
    pub streaks: StreakStats,
    pub bankroll_strategies: Vec<StrategyOutcome>,
}

/// Round a currency amount to cents.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Round a percentage to one decimal.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Run every aggregation and the bankroll simulation over `picks`.
///
/// `picks` must be in chronological order: streaks and the bankroll replay
/// walk them exactly as given.
pub fn analyze(picks: &[Pick], weeks: &WeekDataset, config: &AnalysisConfig) -> Result<Report> {
    config.validate()?;
    let index = PickIndex::new(weeks);
    let stake = config.bet_amount;

    let overall = overall_stats(picks, &index, stake)?;
    let by_line_range = line_range_stats(picks, &index, stake)?;
    let weekly = weekly_stats(picks, &index, stake)?;
    let streaks = streak_stats(picks, &index, stake)?;
    let bankroll_strategies = simulate(picks, &index, config.starting_bankroll)?;

    info!(
        "Analyzed {} picks ({} resolved) across {} weeks",
        picks.len(),
        overall.total_picks,
        weekly.len()
    );

    Ok(assemble(overall, by_line_range, weekly, streaks, bankroll_strategies))
}

/// Merge the raw aggregates, rounding for display: cents for currency, one
/// decimal for percentages.
pub fn assemble(
    overall: OverallStats,
    by_line_range: Vec<LineRangeStats>,
    weekly: Vec<WeeklyStats>,
    streaks: StreakStats,
    bankroll_strategies: Vec<StrategyOutcome>,
) -> Report {
    let overall = OverallStats {
        win_rate: round1(overall.win_rate),
        total_winnings: round2(overall.total_winnings),
        total_losses: round2(overall.total_losses),
        net_profit: round2(overall.net_profit),
        roi: round1(overall.roi),
        avg_win: round2(overall.avg_win),
        avg_loss: round2(overall.avg_loss),
        biggest_win: round2(overall.biggest_win),
        biggest_loss: round2(overall.biggest_loss),
        ..overall
    };

    let by_line_range = by_line_range
        .into_iter()
        .map(|r| LineRangeStats {
            win_rate: round1(r.win_rate),
            profit: round2(r.profit),
            roi: round1(r.roi),
            ..r
        })
        .collect();

    let weekly = weekly
        .into_iter()
        .map(|w| WeeklyStats {
            profit: round2(w.profit),
            ..w
        })
        .collect();

    let bankroll_strategies = bankroll_strategies
        .into_iter()
        .map(|s| StrategyOutcome {
            starting_bankroll: round2(s.starting_bankroll),
            ending_bankroll: round2(s.ending_bankroll),
            profit: round2(s.profit),
            roi: round1(s.roi),
            peak_bankroll: round2(s.peak_bankroll),
            lowest_point: round2(s.lowest_point),
            max_drawdown: round2(s.max_drawdown),
            history: s.history.into_iter().map(round2).collect(),
            ..s
        })
        .collect();

    Report {
        overall,
        by_line_range,
        weekly,
        streaks,
        bankroll_strategies,
    }
}
