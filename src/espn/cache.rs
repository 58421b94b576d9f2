//! On-disk JSON cache of the raw picks and week propositions.
//!
//! Two files, written pretty-printed so they can be inspected by hand: the
//! member record and the week → propositions map.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

use pickem_bankroll::PicksData;

use super::source::PicksSource;

pub struct JsonCache {
    member_path: PathBuf,
    weeks_path: PathBuf,
}

impl JsonCache {
    pub fn new(member_path: impl Into<PathBuf>, weeks_path: impl Into<PathBuf>) -> Self {
        JsonCache {
            member_path: member_path.into(),
            weeks_path: weeks_path.into(),
        }
    }

    /// Both cache files are present.
    pub fn exists(&self) -> bool {
        self.member_path.is_file() && self.weeks_path.is_file()
    }

    pub async fn save(&self, data: &PicksData) -> Result<()> {
        write_json(&self.member_path, &data.member).await?;
        write_json(&self.weeks_path, &data.weeks).await?;
        info!(
            "Cached {} weeks to {} and {}",
            data.weeks.len(),
            self.member_path.display(),
            self.weeks_path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl PicksSource for JsonCache {
    fn name(&self) -> &str {
        "JSON cache"
    }

    async fn load(&self) -> Result<PicksData> {
        let member = read_json(&self.member_path).await?;
        let weeks = read_json(&self.weeks_path).await?;
        Ok(PicksData { member, weeks })
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

async fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let raw = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, raw)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pickem_bankroll::models::{MemberRecord, WeekDataset};
    use serde_json::json;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pickem-cache-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = scratch_dir("roundtrip");
        let cache = JsonCache::new(dir.join("member.json"), dir.join("weeks.json"));
        assert!(!cache.exists());

        let member: MemberRecord = serde_json::from_value(json!({
            "entries": [{"picks": [
                {"propositionId": "p1", "outcomesPicked": [{"outcomeId": "o1", "result": "INCORRECT"}]}
            ]}]
        }))
        .unwrap();
        let weeks: WeekDataset = serde_json::from_value(json!({
            "7": {"propositions": [{"id": "p1", "possibleOutcomes": [
                {"id": "o1", "mappings": [{"type": "BETTING_LINE", "value": "+140"}]}
            ]}]}
        }))
        .unwrap();

        cache.save(&PicksData { member, weeks }).await.unwrap();
        assert!(cache.exists());

        let loaded = cache.load().await.unwrap();
        assert_eq!(loaded.member.picks().len(), 1);
        assert!(loaded.weeks.contains_key(&7));
        let raw = std::fs::read_to_string(dir.join("weeks.json")).unwrap();
        assert!(raw.contains("\"7\""));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn test_load_reports_missing_file() {
        let dir = scratch_dir("missing");
        let cache = JsonCache::new(dir.join("nope.json"), dir.join("nada.json"));
        let err = cache.load().await.unwrap_err();
        assert!(err.to_string().contains("nope.json"));
        std::fs::remove_dir_all(&dir).ok();
    }
}
