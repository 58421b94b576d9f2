//! Pick performance analytics: odds math, pick resolution, profit, aggregate
//! stats and the bankroll strategy simulator.

pub mod bankroll;
pub mod odds;
pub mod profit;
pub mod report;
pub mod resolver;
pub mod stats;

pub use bankroll::{default_policies, simulate, simulate_with, BetContext, BetSizingPolicy, StrategyOutcome};
pub use odds::{AmericanLine, LineCategory};
pub use profit::compute_profit;
pub use report::{analyze, AnalysisConfig, Report};
pub use resolver::{PickIndex, ResolvedPick};
pub use stats::{LineRangeStats, OverallStats, StreakStats, StreakType, WeeklyStats};
