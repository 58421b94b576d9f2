use clap::Parser;
use std::net::SocketAddr;

use pickem_bankroll::AnalysisConfig;

/// Pick'em betting stats and bankroll strategy simulator
#[derive(Parser, Debug, Clone)]
#[command(name = "pickem-bankroll", version, about)]
pub struct Config {
    /// Ignore cached data and fetch fresh picks (needed for new weeks)
    #[arg(long, env = "REFETCH", default_value = "false")]
    pub refetch: bool,

    /// Cached member picks file
    #[arg(long, env = "MEMBER_FILE", default_value = "member_data.json")]
    pub member_file: String,

    /// Cached per-week propositions file
    #[arg(long, env = "WEEKS_FILE", default_value = "all_weeks_data.json")]
    pub weeks_file: String,

    /// Where to write the exported stats
    #[arg(long, env = "OUTPUT_FILE", default_value = "stats_output.json")]
    pub output: String,

    /// Flat stake per pick (USD) used for profit and ROI
    #[arg(long, env = "BET_AMOUNT", default_value = "100.0")]
    pub bet_amount: f64,

    /// Opening bankroll for the strategy simulation (USD)
    #[arg(long, env = "STARTING_BANKROLL", default_value = "1000.0")]
    pub starting_bankroll: f64,

    /// Fantasy challenge API base URL
    #[arg(
        long,
        env = "ESPN_API_URL",
        default_value = "https://gambit-api.fantasy.espn.com/apis/v1"
    )]
    pub api_url: String,

    /// Challenge ID of the pick'em game
    #[arg(long, env = "ESPN_CHALLENGE_ID", default_value = "265")]
    pub challenge_id: u32,

    /// SWID session cookie, including the curly brackets
    #[arg(long, env = "ESPN_SWID")]
    pub swid: Option<String>,

    /// espn_s2 session cookie
    #[arg(long, env = "ESPN_S2")]
    pub espn_s2: Option<String>,

    /// ESPN-ONESITE.WEB-PROD.token session cookie
    #[arg(long, env = "ESPN_ONESITE_TOKEN")]
    pub onesite_token: Option<String>,

    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "127.0.0.1:8000")]
    pub dashboard_addr: String,

    /// Directory served as static files next to the built-in dashboard
    #[arg(long, env = "STATIC_DIR", default_value = ".")]
    pub static_dir: String,

    /// Exit after exporting instead of serving the dashboard
    #[arg(long, env = "NO_SERVE", default_value = "false")]
    pub no_serve: bool,
}

/// The three session cookies the challenge API authenticates with
#[derive(Debug, Clone)]
pub struct Credentials {
    pub swid: String,
    pub espn_s2: String,
    pub onesite_token: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.analysis().validate()?;
        if !self.no_serve {
            self.dashboard_addr
                .parse::<SocketAddr>()
                .map_err(|e| anyhow::anyhow!("invalid dashboard_addr '{}': {}", self.dashboard_addr, e))?;
        }
        Ok(())
    }

    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig {
            bet_amount: self.bet_amount,
            starting_bankroll: self.starting_bankroll,
        }
    }

    /// Session cookies, required only when fetching from the API.
    pub fn credentials(&self) -> anyhow::Result<Credentials> {
        let missing: Vec<&str> = [
            ("ESPN_SWID", &self.swid),
            ("ESPN_S2", &self.espn_s2),
            ("ESPN_ONESITE_TOKEN", &self.onesite_token),
        ]
        .iter()
        .filter(|(_, v)| v.as_deref().map_or(true, |s| s.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();
        if !missing.is_empty() {
            anyhow::bail!(
                "{} required to fetch picks. {}",
                missing.join(", "),
                CREDENTIALS_HELP
            );
        }
        Ok(Credentials {
            swid: self.swid.clone().unwrap_or_default(),
            espn_s2: self.espn_s2.clone().unwrap_or_default(),
            onesite_token: self.onesite_token.clone().unwrap_or_default(),
        })
    }
}

/// Where to find the session cookies in a signed-in browser
pub const CREDENTIALS_HELP: &str = "Sign in at https://www.espn.com/fantasy/, open Developer Tools → \
Application → Cookies → https://www.espn.com and copy SWID (with the curly brackets), \
espn_s2 and ESPN-ONESITE.WEB-PROD.token.";
