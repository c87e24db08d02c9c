//! Stockwatch Worker
//!
//! Runs the recurring fetch/analyze/news/notify/monitor cycle until Ctrl-C.

use dotenvy::dotenv;
use std::sync::Arc;
use stockwatch::config::AppConfig;
use stockwatch::core::bootstrap::build_services;
use stockwatch::core::scheduler::JobOrchestrator;
use stockwatch::logging;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    let config = Arc::new(AppConfig::from_env()?);
    logging::init_logging(&config);

    info!("Starting Stockwatch Worker");
    info!(environment = %config.environment, "Environment");
    info!(
        symbols = config.watchlist.len(),
        fetch_time = %config.schedule.fetch_time,
        analysis_time = %config.schedule.analysis_time,
        "Watch-list: {}",
        config
            .watchlist
            .iter()
            .map(|e| e.symbol.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let services = build_services(config).await?;
    let orchestrator = JobOrchestrator::new(services.context);
    orchestrator.start()?;

    info!("Worker started, waiting for shutdown signal...");
    signal::ctrl_c().await?;

    info!("Shutting down worker...");
    orchestrator.stop().await;
    info!("Worker stopped");

    Ok(())
}
