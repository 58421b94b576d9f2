//! Pick → outcome → betting line resolution.
//!
//! The week dataset is indexed once by proposition id (and by outcome id
//! inside each proposition) so that every aggregation pass and the bankroll
//! simulator share O(1) lookups instead of rescanning all weeks per pick.

use std::collections::HashMap;
use tracing::debug;

use super::odds::AmericanLine;
use crate::error::Result;
use crate::models::{Outcome, Pick, Proposition, WeekDataset};

/// A pick whose proposition, outcome and betting line were all found.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedPick<'a> {
    /// Scoring period the proposition belongs to
    pub week: u32,
    pub proposition: &'a Proposition,
    pub outcome: &'a Outcome,
    pub line: AmericanLine,
}

struct IndexedProposition<'a> {
    week: u32,
    proposition: &'a Proposition,
    /// outcome id → outcome
    outcomes: HashMap<&'a str, &'a Outcome>,
}

/// Read-only lookup index over a week dataset.
pub struct PickIndex<'a> {
    /// proposition id → proposition and its week
    propositions: HashMap<&'a str, IndexedProposition<'a>>,
}

impl<'a> PickIndex<'a> {
    /// Index every proposition of every week.
    ///
    /// Proposition ids are expected to be unique across weeks; if one repeats,
    /// the occurrence in the earliest week is kept.
    pub fn new(weeks: &'a WeekDataset) -> Self {
        let mut propositions = HashMap::new();
        for (&week, record) in weeks {
            for proposition in &record.propositions {
                propositions
                    .entry(proposition.id.as_str())
                    .or_insert_with(|| {
                        let mut outcomes = HashMap::new();
                        for outcome in &proposition.possible_outcomes {
                            outcomes.entry(outcome.id.as_str()).or_insert(outcome);
                        }
                        IndexedProposition {
                            week,
                            proposition,
                            outcomes,
                        }
                    });
            }
        }
        debug!("PickIndex: {} propositions", propositions.len());
        PickIndex { propositions }
    }

    /// Look up a proposition and the week it belongs to.
    pub fn proposition(&self, id: &str) -> Option<(u32, &'a Proposition)> {
        self.propositions
            .get(id)
            .map(|p| (p.week, p.proposition))
    }

    /// Locate the outcome a pick selected and its betting line.
    ///
    /// Returns `Ok(None)` when the proposition or outcome is not in the
    /// dataset, or when the outcome carries no betting line. Only a malformed
    /// line value is an error.
    pub fn resolve(&self, pick: &Pick) -> Result<Option<ResolvedPick<'a>>> {
        let Some(indexed) = self.propositions.get(pick.proposition_id.as_str()) else {
            debug!("Proposition {} not in dataset", pick.proposition_id);
            return Ok(None);
        };
        let Some(&outcome) = indexed.outcomes.get(pick.outcome_id.as_str()) else {
            debug!(
                "Outcome {} not found in proposition {}",
                pick.outcome_id, pick.proposition_id
            );
            return Ok(None);
        };
        let Some(line) = outcome.betting_line()? else {
            debug!("Outcome {} has no betting line", outcome.id);
            return Ok(None);
        };
        Ok(Some(ResolvedPick {
            week: indexed.week,
            proposition: indexed.proposition,
            outcome,
            line,
        }))
    }

    pub fn len(&self) -> usize {
        self.propositions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.propositions.is_empty()
    }
}
