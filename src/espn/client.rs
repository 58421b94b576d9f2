use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

use pickem_bankroll::models::{MemberRecord, WeekDataset, WeekRecord};
use pickem_bankroll::PicksData;

use super::source::PicksSource;
use crate::config::Credentials;

#[derive(Error, Debug)]
pub enum FetchError {
    /// The session cookies were rejected
    #[error("Authentication failed (401): credentials are incorrect or expired")]
    Unauthorized,
}

/// Client for the fantasy pick'em challenge API.
#[derive(Clone)]
pub struct EspnClient {
    http: Client,
    api_url: String,
    challenge_id: u32,
    cookie: String,
}

impl EspnClient {
    pub fn new(api_url: &str, challenge_id: u32, credentials: &Credentials) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(EspnClient {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            challenge_id,
            cookie: cookie_header(credentials),
        })
    }

    fn member_url(&self) -> String {
        format!(
            "{}/challenges/{}/members/?platform=chui&view=chui_default",
            self.api_url, self.challenge_id
        )
    }

    fn week_url(&self, week: u32) -> String {
        format!(
            "{}/challenges/{}/?scoringPeriodId={}&view=chui_challenge_matchups&platform=chui",
            self.api_url, self.challenge_id, week
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .header(COOKIE, &self.cookie)
            .send()
            .await
            .context("Challenge API request failed")?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized.into());
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Challenge API error {}: {}", status, body);
        }

        resp.json::<T>()
            .await
            .context("Failed to parse challenge API response")
    }

    /// Fetch the signed-in member's entries and picks.
    pub async fn fetch_member(&self) -> Result<MemberRecord> {
        self.get_json(&self.member_url()).await
    }

    /// Fetch the propositions of one scoring period.
    pub async fn fetch_week(&self, week: u32) -> Result<WeekRecord> {
        self.get_json(&self.week_url(week))
            .await
            .with_context(|| format!("Failed to fetch week {}", week))
    }

    /// Fetch several scoring periods concurrently.
    pub async fn fetch_weeks(&self, weeks: &[u32]) -> Result<WeekDataset> {
        let fetches = weeks.iter().map(|&week| async move {
            let record = self.fetch_week(week).await?;
            Ok::<_, anyhow::Error>((week, record))
        });
        let records = futures_util::future::try_join_all(fetches).await?;
        Ok(records.into_iter().collect())
    }
}

#[async_trait]
impl PicksSource for EspnClient {
    fn name(&self) -> &str {
        "ESPN challenge API"
    }

    async fn load(&self) -> Result<PicksData> {
        let member = self.fetch_member().await?;
        let completed = member.completed_weeks();
        info!("Found {} completed weeks", completed.len());
        let weeks = self.fetch_weeks(&completed).await?;
        Ok(PicksData { member, weeks })
    }
}

fn cookie_header(credentials: &Credentials) -> String {
    format!(
        "SWID={}; espn_s2={}; ESPN-ONESITE.WEB-PROD.token={}",
        credentials.swid.trim(),
        credentials.espn_s2.trim(),
        credentials.onesite_token.trim()
    )
}
