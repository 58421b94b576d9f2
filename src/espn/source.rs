use anyhow::Result;
use async_trait::async_trait;

use pickem_bankroll::PicksData;

/// Anything that can hand over a member's picks and the week propositions.
#[async_trait]
pub trait PicksSource: Send + Sync {
    async fn load(&self) -> Result<PicksData>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
