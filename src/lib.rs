//! Pick'em betting analytics.
//!
//! Turns a bettor's historical picks (each one side of a two-outcome
//! proposition, priced with an American-odds line) into performance stats and
//! replays them through eight bankroll-management strategies.
//!
//! # Example
//!
//! ```no_run
//! use pickem_bankroll::analysis::{analyze, AnalysisConfig};
//! use pickem_bankroll::models::{MemberRecord, WeekDataset};
//!
//! let member: MemberRecord = serde_json::from_str("{\"entries\": []}").unwrap();
//! let weeks = WeekDataset::new();
//! let report = analyze(&member.picks(), &weeks, &AnalysisConfig::default()).unwrap();
//! println!("Net profit: ${:.2}", report.overall.net_profit);
//! ```

pub mod analysis;
pub mod error;
pub mod models;

pub use analysis::{analyze, AnalysisConfig, Report};
pub use error::AnalysisError;
pub use models::{MemberRecord, Pick, PickResult, PicksData, WeekDataset};
