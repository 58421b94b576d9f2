//! Per-pick profit at a fixed stake.

use super::odds::{profit_on_win, LineCategory};
use super::resolver::{PickIndex, ResolvedPick};
use crate::error::Result;
use crate::models::{Pick, PickResult};

/// A decided, resolved pick together with its profit at the analysis stake.
#[derive(Debug, Clone, Copy)]
pub struct SettledPick<'a> {
    pub resolved: ResolvedPick<'a>,
    pub profit: f64,
}

impl SettledPick<'_> {
    /// A pick counts as a win only if it made money; a zero profit is a loss.
    pub fn is_win(&self) -> bool {
        self.profit > 0.0
    }

    pub fn week(&self) -> u32 {
        self.resolved.week
    }

    pub fn category(&self) -> LineCategory {
        self.resolved.line.category()
    }
}

/// Signed profit of one pick at `stake`.
///
/// Returns `Ok(None)` for picks that cannot be resolved against the dataset
/// and for picks that are still `UNDECIDED`; callers leave those out of every
/// aggregate.
pub fn compute_profit(pick: &Pick, index: &PickIndex<'_>, stake: f64) -> Result<Option<f64>> {
    Ok(settle(pick, index, stake)?.map(|s| s.profit))
}

fn settle<'a>(pick: &Pick, index: &PickIndex<'a>, stake: f64) -> Result<Option<SettledPick<'a>>> {
    if !pick.result.is_decided() {
        return Ok(None);
    }
    let Some(resolved) = index.resolve(pick)? else {
        return Ok(None);
    };
    let profit = match pick.result {
        PickResult::Correct => profit_on_win(stake, resolved.line),
        _ => -stake,
    };
    Ok(Some(SettledPick { resolved, profit }))
}

/// Settle every pick, keeping input order and dropping the excluded ones.
pub fn settle_picks<'a>(
    picks: &[Pick],
    index: &PickIndex<'a>,
    stake: f64,
) -> Result<Vec<SettledPick<'a>>> {
    let mut settled = Vec::with_capacity(picks.len());
    for pick in picks {
        if let Some(s) = settle(pick, index, stake)? {
            settled.push(s);
        }
    }
    Ok(settled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::resolver::fixtures::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_correct_pick_profit_is_positive() {
        let weeks = dataset(vec![(1, vec![proposition("p1", -150, 130), proposition("p2", 450, -600)])]);
        let index = PickIndex::new(&weeks);
        let fav = compute_profit(&pick("p1", PickResult::Correct), &index, 100.0)
            .unwrap()
            .unwrap();
        assert_relative_eq!(fav, 66.666_666, epsilon = 1e-4);
        let dog = compute_profit(&pick("p2", PickResult::Correct), &index, 100.0)
            .unwrap()
            .unwrap();
        assert_relative_eq!(dog, 450.0, epsilon = 1e-9);
    }

    #[test]
    fn test_incorrect_pick_loses_exact_stake() {
        let weeks = dataset(vec![(1, vec![proposition("p1", -150, 130)])]);
        let index = PickIndex::new(&weeks);
        let loss = compute_profit(&pick("p1", PickResult::Incorrect), &index, 25.0)
            .unwrap()
            .unwrap();
        assert_eq!(loss, -25.0);
    }

    #[test]
    fn test_undecided_and_unresolved_picks_have_no_profit() {
        let weeks = dataset(vec![(1, vec![proposition("p1", -150, 130)])]);
        let index = PickIndex::new(&weeks);
        assert!(compute_profit(&pick("p1", PickResult::Undecided), &index, 100.0)
            .unwrap()
            .is_none());
        assert!(compute_profit(&pick("p9", PickResult::Correct), &index, 100.0)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_settle_picks_keeps_input_order() {
        let weeks = dataset(vec![
            (1, vec![proposition("p1", -150, 130)]),
            (2, vec![proposition("p2", 120, -140)]),
        ]);
        let index = PickIndex::new(&weeks);
        let picks = vec![
            pick("p2", PickResult::Incorrect),
            pick("missing", PickResult::Correct),
            pick("p1", PickResult::Correct),
            pick("p1", PickResult::Undecided),
        ];
        let settled = settle_picks(&picks, &index, 100.0).unwrap();
        assert_eq!(settled.len(), 2);
        assert_eq!(settled[0].week(), 2);
        assert!(!settled[0].is_win());
        assert_eq!(settled[1].week(), 1);
        assert!(settled[1].is_win());
        assert_eq!(settled[1].category(), LineCategory::Favorite);
    }
}
