//! Aggregate performance statistics over settled picks.
//!
//! Each pass is independent: it settles the picks itself and can run in any
//! order. Picks that are undecided or unresolvable never reach an aggregate.

use serde::Serialize;
use std::collections::BTreeMap;

use super::odds::LineCategory;
use super::profit::settle_picks;
use super::resolver::PickIndex;
use crate::error::Result;
use crate::models::Pick;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverallStats {
    pub total_picks: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percentage, 0–100
    pub win_rate: f64,
    pub total_winnings: f64,
    /// Sum of lost stakes, as a positive amount
    pub total_losses: f64,
    pub net_profit: f64,
    /// Percentage of total amount staked
    pub roi: f64,
    pub avg_win: f64,
    /// Average lost stake, as a positive amount
    pub avg_loss: f64,
    pub biggest_win: f64,
    /// Most negative single result
    pub biggest_loss: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineRangeStats {
    pub category: LineCategory,
    pub range: &'static str,
    pub total_bets: usize,
    pub wins: usize,
    pub losses: usize,
    pub win_rate: f64,
    pub profit: f64,
    pub roi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyStats {
    pub week: u32,
    pub wins: usize,
    pub losses: usize,
    pub profit: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakType {
    Win,
    Loss,
    #[default]
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StreakStats {
    pub current_streak: u32,
    pub current_streak_type: StreakType,
    pub longest_win_streak: u32,
    pub longest_lose_streak: u32,
}

/// `wins / total` as a percentage, 0 for an empty population.
pub(crate) fn win_rate(wins: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        wins as f64 / total as f64 * 100.0
    }
}

/// Profit as a percentage of `stake * bets`, 0 for an empty population.
pub(crate) fn roi(profit: f64, stake: f64, bets: usize) -> f64 {
    if bets == 0 {
        0.0
    } else {
        profit / (stake * bets as f64) * 100.0
    }
}

pub fn overall_stats(picks: &[Pick], index: &PickIndex<'_>, stake: f64) -> Result<OverallStats> {
    let settled = settle_picks(picks, index, stake)?;

    let mut stats = OverallStats::default();
    let mut biggest_win: Option<f64> = None;
    let mut biggest_loss: Option<f64> = None;

    for s in &settled {
        stats.net_profit += s.profit;
        if s.is_win() {
            stats.wins += 1;
            stats.total_winnings += s.profit;
            biggest_win = Some(biggest_win.map_or(s.profit, |b| b.max(s.profit)));
        } else {
            stats.losses += 1;
            stats.total_losses += s.profit.abs();
            biggest_loss = Some(biggest_loss.map_or(s.profit, |b| b.min(s.profit)));
        }
    }

    let decided = stats.wins + stats.losses;
    stats.total_picks = decided;
    stats.win_rate = win_rate(stats.wins, decided);
    stats.roi = roi(stats.net_profit, stake, decided);
    if stats.wins > 0 {
        stats.avg_win = stats.total_winnings / stats.wins as f64;
    }
    if stats.losses > 0 {
        stats.avg_loss = stats.total_losses / stats.losses as f64;
    }
    stats.biggest_win = biggest_win.unwrap_or(0.0);
    stats.biggest_loss = biggest_loss.unwrap_or(0.0);
    Ok(stats)
}

/// Stats per line bucket, always four entries in `LineCategory::ALL` order.
pub fn line_range_stats(
    picks: &[Pick],
    index: &PickIndex<'_>,
    stake: f64,
) -> Result<Vec<LineRangeStats>> {
    let settled = settle_picks(picks, index, stake)?;

    // (wins, losses, profit) per bucket
    let mut buckets: BTreeMap<LineCategory, (usize, usize, f64)> = LineCategory::ALL
        .iter()
        .map(|&c| (c, (0, 0, 0.0)))
        .collect();

    for s in &settled {
        let bucket = buckets.entry(s.category()).or_default();
        if s.is_win() {
            bucket.0 += 1;
        } else {
            bucket.1 += 1;
        }
        bucket.2 += s.profit;
    }

    Ok(LineCategory::ALL
        .iter()
        .map(|&category| {
            let (wins, losses, profit) = buckets.get(&category).copied().unwrap_or_default();
            let total_bets = wins + losses;
            LineRangeStats {
                category,
                range: category.range_label(),
                total_bets,
                wins,
                losses,
                win_rate: win_rate(wins, total_bets),
                profit,
                roi: roi(profit, stake, total_bets),
            }
        })
        .collect())
}

/// Stats per scoring period, ascending by week. Weeks without any settled
/// pick are omitted.
pub fn weekly_stats(picks: &[Pick], index: &PickIndex<'_>, stake: f64) -> Result<Vec<WeeklyStats>> {
    let settled = settle_picks(picks, index, stake)?;

    let mut weeks: BTreeMap<u32, WeeklyStats> = BTreeMap::new();
    for s in &settled {
        let week = weeks.entry(s.week()).or_insert_with(|| WeeklyStats {
            week: s.week(),
            wins: 0,
            losses: 0,
            profit: 0.0,
        });
        week.profit += s.profit;
        if s.is_win() {
            week.wins += 1;
        } else {
            week.losses += 1;
        }
    }
    Ok(weeks.into_values().collect())
}

/// Win/loss streaks, walking the picks in the order given.
pub fn streak_stats(picks: &[Pick], index: &PickIndex<'_>, stake: f64) -> Result<StreakStats> {
    let settled = settle_picks(picks, index, stake)?;

    let mut stats = StreakStats::default();
    for s in &settled {
        let kind = if s.is_win() {
            StreakType::Win
        } else {
            StreakType::Loss
        };
        if stats.current_streak_type == kind {
            stats.current_streak += 1;
        } else {
            stats.current_streak = 1;
            stats.current_streak_type = kind;
        }
        match kind {
            StreakType::Win => {
                stats.longest_win_streak = stats.longest_win_streak.max(stats.current_streak)
            }
            _ => stats.longest_lose_streak = stats.longest_lose_streak.max(stats.current_streak),
        }
    }
    Ok(stats)
}
