//! Wires configuration into stores, provider and notifier.

use crate::config::{AppConfig, WatchlistEntry};
use crate::db::{AnalysisStore, InMemoryStore, NewsStore, NotificationStore, PostgresStore, PriceStore};
use crate::error::{BootstrapError, StoreError};
use crate::jobs::context::JobContext;
use crate::models::Stock;
use crate::services::alphavantage::AlphaVantageClient;
use crate::services::notifier::NotificationService;
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a binary needs: the activity context plus read access to
/// notification records.
pub struct Services {
    pub context: Arc<JobContext>,
    pub notifications: Arc<dyn NotificationStore>,
}

/// Connect to PostgreSQL when `DATABASE_URL` is set, otherwise keep everything
/// in memory. The configured watch-list is upserted before returning.
pub async fn build_services(config: Arc<AppConfig>) -> Result<Services, BootstrapError> {
    match config.database_url.clone() {
        Some(url) => {
            info!("Bootstrap: connecting to PostgreSQL...");
            let store = Arc::new(PostgresStore::connect(&url).await?);
            assemble(config, store).await
        }
        None => {
            warn!("Bootstrap: DATABASE_URL not set, using in-memory store (data is lost on exit)");
            assemble(config, Arc::new(InMemoryStore::new())).await
        }
    }
}

async fn assemble<S>(config: Arc<AppConfig>, store: Arc<S>) -> Result<Services, BootstrapError>
where
    S: PriceStore + AnalysisStore + NewsStore + NotificationStore + 'static,
{
    let seeded = seed_watchlist(store.as_ref(), &config.watchlist).await?;
    if seeded == 0 {
        warn!("Bootstrap: WATCHLIST is empty; activities will have nothing to do");
    } else {
        info!(symbols = seeded, "Bootstrap: watch-list seeded with {} symbols", seeded);
    }

    let provider = Arc::new(AlphaVantageClient::new(&config.provider)?);
    let notifier = Arc::new(NotificationService::new(store.clone(), &config.notifier)?);
    if config.notifier.webhook_url.is_none() {
        warn!("Bootstrap: WEBHOOK_URL not set, notifications will be marked FAILED on flush");
    }

    let notifications: Arc<dyn NotificationStore> = store.clone();
    let context = Arc::new(JobContext::with_store(config, store, provider, notifier));
    Ok(Services {
        context,
        notifications,
    })
}

/// Upsert the configured stocks; returns how many were written.
pub async fn seed_watchlist(
    store: &dyn PriceStore,
    entries: &[WatchlistEntry],
) -> Result<usize, StoreError> {
    for entry in entries {
        let stock = Stock::new(entry.symbol.clone(), entry.name.clone(), entry.exchange.clone());
        store.upsert_stock(&stock).await?;
    }
    Ok(entries.len())
}
