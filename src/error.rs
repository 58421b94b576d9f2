//! Error types for the analysis core.

use thiserror::Error;

/// Errors raised while turning pick data into statistics.
///
/// Missing references (unknown proposition, unknown outcome, no betting line)
/// are not errors; those picks are excluded from the aggregates instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A `BETTING_LINE` mapping carried a value that is not an integer
    #[error("Invalid betting line '{value}' for outcome {outcome_id}")]
    InvalidLine { outcome_id: String, value: String },

    /// American lines are never zero; a zero line has undefined odds
    #[error("Betting line of zero has undefined odds")]
    ZeroLine,

    /// Stake or bankroll settings that cannot produce meaningful numbers
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
