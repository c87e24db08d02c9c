//! Stockwatch command-line interface.
//!
//! `run` starts the orchestrator in the foreground; the other commands run one
//! activity body immediately (calendar gates do not apply) or print recent
//! persisted records.

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::sync::Arc;
use stockwatch::config::AppConfig;
use stockwatch::core::bootstrap::build_services;
use stockwatch::core::scheduler::JobOrchestrator;
use stockwatch::jobs::handlers::run_activity;
use stockwatch::jobs::types::Activity;
use stockwatch::logging;
use tokio::signal;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "stockwatch", version, about = "Watch-list price, news and signal alerts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start all scheduled activities and run until Ctrl-C
    Run,
    /// Fetch daily prices for every watch-list symbol
    Fetch,
    /// Analyse every symbol and queue notifications for BUY/SELL signals
    Analyze,
    /// Refresh and tag news
    News,
    /// Send pending notifications
    Flush,
    /// Check price moves against the alert threshold
    Monitor,
    /// Fetch, refresh news and analyse in one go
    Sync,
    /// Print recent analysis results
    Results {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Print recent notifications
    Notifications {
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let cli = Cli::parse();

    let config = Arc::new(AppConfig::from_env()?);
    logging::init_logging(&config);
    let services = build_services(config).await?;
    let ctx = services.context.clone();

    let activity = match cli.command {
        Command::Run => {
            let orchestrator = JobOrchestrator::new(ctx);
            orchestrator.start()?;
            info!("Running, press Ctrl-C to stop");
            signal::ctrl_c().await?;
            orchestrator.stop().await;
            return Ok(());
        }
        Command::Results { limit } => {
            for result in ctx.analyses.recent_results(limit).await? {
                println!(
                    "{}  {:<8} {:<14} {:>5.1}%  {:<15} {}",
                    result.analysis_date,
                    result.symbol,
                    result.signal,
                    result.confidence,
                    result.strategy,
                    result.rationale
                );
            }
            ctx.close().await;
            return Ok(());
        }
        Command::Notifications { limit } => {
            for n in services.notifications.recent_notifications(limit).await? {
                println!(
                    "{}  {:<8} {:<15} {:<7} {}",
                    n.created_at.format("%Y-%m-%d %H:%M"),
                    n.symbol,
                    n.kind.as_str(),
                    n.status,
                    n.title
                );
            }
            ctx.close().await;
            return Ok(());
        }
        Command::Fetch => Activity::DailyFetch,
        Command::Analyze => Activity::DailyAnalysis,
        Command::News => Activity::NewsRefresh,
        Command::Flush => Activity::NotificationFlush,
        Command::Monitor => Activity::PriceMonitor,
        Command::Sync => Activity::InitialSync,
    };

    let summary = run_activity(activity, &ctx).await;
    println!(
        "{}: processed {}, skipped {}, failed {}, notifications {}",
        activity, summary.processed, summary.skipped, summary.failed, summary.notifications
    );
    ctx.close().await;
    Ok(())
}
