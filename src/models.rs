use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analysis::odds::AmericanLine;
use crate::error::{AnalysisError, Result};

/// Mapping type that carries the American-odds line of an outcome
pub const BETTING_LINE: &str = "BETTING_LINE";

/// Week number → week record, iterated in ascending week order
pub type WeekDataset = BTreeMap<u32, WeekRecord>;

/// Result tag attached to a picked outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PickResult {
    Correct,
    Incorrect,
    Undecided,
}

impl PickResult {
    pub fn is_decided(self) -> bool {
        self != PickResult::Undecided
    }
}

/// A bettor's selection of one outcome of one proposition
#[derive(Debug, Clone, PartialEq)]
pub struct Pick {
    pub proposition_id: String,
    pub outcome_id: String,
    pub result: PickResult,
}

/// Raw member record as returned by the challenge members endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    #[serde(default)]
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default)]
    pub picks: Vec<RawPick>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<EntryScore>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryScore {
    /// Scoring period (as a string key) → score for that period
    #[serde(default)]
    pub score_by_period: BTreeMap<String, Option<PeriodScore>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodScore {
    #[serde(default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPick {
    pub proposition_id: String,
    #[serde(default)]
    pub outcomes_picked: Vec<OutcomePick>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomePick {
    pub outcome_id: String,
    pub result: PickResult,
}

/// Raw week record as returned by the challenge matchups endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekRecord {
    #[serde(default)]
    pub propositions: Vec<Proposition>,
}

/// A single wagering event with two possible outcomes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposition {
    pub id: String,
    #[serde(default)]
    pub possible_outcomes: Vec<Outcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub id: String,
    #[serde(default)]
    pub mappings: Vec<Mapping>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mapping {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Everything the analysis needs, as loaded from the remote API or the cache
#[derive(Debug, Clone, Default)]
pub struct PicksData {
    pub member: MemberRecord,
    pub weeks: WeekDataset,
}

impl MemberRecord {
    /// Picks of the first entry, in the order the API lists them.
    ///
    /// Only the first picked outcome of each raw pick is considered; raw
    /// picks without any picked outcome are dropped.
    pub fn picks(&self) -> Vec<Pick> {
        let Some(entry) = self.entries.first() else {
            return vec![];
        };
        entry
            .picks
            .iter()
            .filter_map(|raw| {
                let picked = raw.outcomes_picked.first()?;
                Some(Pick {
                    proposition_id: raw.proposition_id.clone(),
                    outcome_id: picked.outcome_id.clone(),
                    result: picked.result,
                })
            })
            .collect()
    }

    /// Scoring periods of the first entry that have a positive score, ascending.
    pub fn completed_weeks(&self) -> Vec<u32> {
        let Some(score) = self.entries.first().and_then(|e| e.score.as_ref()) else {
            return vec![];
        };
        let mut weeks: Vec<u32> = score
            .score_by_period
            .iter()
            .filter(|(_, period)| {
                period
                    .as_ref()
                    .and_then(|p| p.score)
                    .is_some_and(|s| s > 0.0)
            })
            .filter_map(|(week, _)| week.parse().ok())
            .collect();
        weeks.sort_unstable();
        weeks
    }
}

impl Outcome {
    /// The American-odds line of this outcome.
    ///
    /// `Ok(None)` when the outcome has no `BETTING_LINE` mapping or the
    /// mapping is empty. A present but non-integer value is an error.
    pub fn betting_line(&self) -> Result<Option<AmericanLine>> {
        let Some(mapping) = self.mappings.iter().find(|m| m.kind == BETTING_LINE) else {
            return Ok(None);
        };
        let invalid = || AnalysisError::InvalidLine {
            outcome_id: self.id.clone(),
            value: mapping.value.to_string(),
        };
        let raw = match &mapping.value {
            serde_json::Value::Null => return Ok(None),
            serde_json::Value::String(s) if s.trim().is_empty() => return Ok(None),
            serde_json::Value::String(s) => s.trim().parse::<i32>().map_err(|_| invalid())?,
            serde_json::Value::Number(n) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(invalid)?,
            _ => return Err(invalid()),
        };
        AmericanLine::new(raw).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn outcome_with(value: serde_json::Value) -> Outcome {
        Outcome {
            id: "o1".into(),
            mappings: vec![
                Mapping {
                    kind: "COMPETITOR_ID".into(),
                    value: json!("42"),
                },
                Mapping {
                    kind: BETTING_LINE.into(),
                    value,
                },
            ],
        }
    }

    #[test]
    fn test_member_record_deserializes_camel_case() {
        let raw = json!({
            "id": "member-1",
            "entries": [{
                "name": "my entry",
                "picks": [
                    {"propositionId": "p1", "outcomesPicked": [{"outcomeId": "o1", "result": "CORRECT"}]},
                    {"propositionId": "p2", "outcomesPicked": [{"outcomeId": "o3", "result": "UNDECIDED"}]},
                    {"propositionId": "p3", "outcomesPicked": []}
                ],
                "score": {"scoreByPeriod": {"1": {"score": 8.0}, "2": {"score": 0}, "10": {"score": 3}, "3": null}}
            }]
        });
        let member: MemberRecord = serde_json::from_value(raw).unwrap();
        let picks = member.picks();
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].proposition_id, "p1");
        assert_eq!(picks[0].result, PickResult::Correct);
        assert_eq!(picks[1].result, PickResult::Undecided);
        assert_eq!(member.completed_weeks(), vec![1, 10]);
    }

    #[test]
    fn test_member_without_entries_has_no_picks() {
        let member = MemberRecord::default();
        assert!(member.picks().is_empty());
        assert!(member.completed_weeks().is_empty());
    }

    #[test]
    fn test_week_dataset_deserializes_string_keys() {
        let raw = json!({
            "2": {"propositions": [{"id": "p2", "possibleOutcomes": []}]},
            "1": {"propositions": [{"id": "p1", "possibleOutcomes": [
                {"id": "o1", "mappings": [{"type": "BETTING_LINE", "value": "-150"}]}
            ]}]}
        });
        let weeks: WeekDataset = serde_json::from_value(raw).unwrap();
        assert_eq!(weeks.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        let line = weeks[&1].propositions[0].possible_outcomes[0]
            .betting_line()
            .unwrap()
            .unwrap();
        assert_eq!(line.value(), -150);
    }

    #[test]
    fn test_betting_line_parses_signed_strings_and_numbers() {
        assert_eq!(outcome_with(json!("+120")).betting_line().unwrap().unwrap().value(), 120);
        assert_eq!(outcome_with(json!(" -210 ")).betting_line().unwrap().unwrap().value(), -210);
        assert_eq!(outcome_with(json!(135)).betting_line().unwrap().unwrap().value(), 135);
    }

    #[test]
    fn test_betting_line_missing_or_empty_is_none() {
        assert!(outcome_with(json!("")).betting_line().unwrap().is_none());
        assert!(outcome_with(serde_json::Value::Null).betting_line().unwrap().is_none());
        let bare = Outcome {
            id: "o2".into(),
            mappings: vec![],
        };
        assert!(bare.betting_line().unwrap().is_none());
    }

    #[test]
    fn test_betting_line_rejects_garbage_and_zero() {
        match outcome_with(json!("EVEN")).betting_line() {
            Err(AnalysisError::InvalidLine { outcome_id, .. }) => assert_eq!(outcome_id, "o1"),
            other => panic!("Expected InvalidLine, got {:?}", other),
        }
        assert!(matches!(
            outcome_with(json!(-1.5)).betting_line(),
            Err(AnalysisError::InvalidLine { .. })
        ));
        assert_eq!(
            outcome_with(json!("0")).betting_line(),
            Err(AnalysisError::ZeroLine)
        );
    }
}
