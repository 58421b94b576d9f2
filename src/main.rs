use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

mod config;
mod dashboard;
mod espn;
mod export;

use config::{Config, CREDENTIALS_HELP};
use dashboard::AppState;
use espn::{EspnClient, FetchError, JsonCache, PicksSource};
use pickem_bankroll::{analyze, PicksData};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let data = load_picks(&config).await?;
    let picks = data.member.picks();
    info!(
        "Loaded {} picks across {} weeks",
        picks.len(),
        data.weeks.len()
    );

    let report = analyze(&picks, &data.weeks, &config.analysis())?;

    println!("\n{}", export::render_summary(&report.overall));
    export::write_report(Path::new(&config.output), &report)?;
    info!("Stats exported to {}", config.output);

    if config.no_serve {
        return Ok(());
    }

    let state = AppState {
        report: Arc::new(report),
    };
    let app = dashboard::router(state, &config.static_dir);
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Dashboard listening on http://{}", addr);
    info!("Press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
            info!("Shutting down dashboard");
        })
        .await?;

    Ok(())
}

/// Read the cached picks, or fetch them fresh and refresh the cache.
async fn load_picks(config: &Config) -> Result<PicksData> {
    let cache = JsonCache::new(&config.member_file, &config.weeks_file);
    if cache.exists() && !config.refetch {
        info!("Using cached data from {}", cache.name());
        return cache.load().await;
    }

    let client = EspnClient::new(&config.api_url, config.challenge_id, &config.credentials()?)?;
    info!("Fetching picks from {}", client.name());
    let data = match client.load().await {
        Ok(data) => data,
        Err(e) => {
            if let Some(FetchError::Unauthorized) = e.downcast_ref::<FetchError>() {
                error!("{}", CREDENTIALS_HELP);
            }
            return Err(e);
        }
    };
    cache.save(&data).await?;
    Ok(data)
}
