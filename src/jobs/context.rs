//! Job context for dependency injection

use crate::config::AppConfig;
use crate::db::{AnalysisStore, NewsStore, PriceStore};
use crate::services::market_data::MarketDataProvider;
use crate::services::notifier::NotificationSink;
use crate::services::sentiment::SentimentTagger;
use std::sync::Arc;

/// Collaborator handles shared by every activity. All handles are safe for
/// concurrent use; activities never share other mutable state.
pub struct JobContext {
    pub config: Arc<AppConfig>,
    pub prices: Arc<dyn PriceStore>,
    pub analyses: Arc<dyn AnalysisStore>,
    pub news: Arc<dyn NewsStore>,
    pub provider: Arc<dyn MarketDataProvider>,
    pub notifier: Arc<dyn NotificationSink>,
    pub tagger: SentimentTagger,
}

impl JobContext {
    pub fn new(
        config: Arc<AppConfig>,
        prices: Arc<dyn PriceStore>,
        analyses: Arc<dyn AnalysisStore>,
        news: Arc<dyn NewsStore>,
        provider: Arc<dyn MarketDataProvider>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            config,
            prices,
            analyses,
            news,
            provider,
            notifier,
            tagger: SentimentTagger::new(),
        }
    }

    /// Use one store for prices, analysis results and news.
    pub fn with_store<S>(
        config: Arc<AppConfig>,
        store: Arc<S>,
        provider: Arc<dyn MarketDataProvider>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self
    where
        S: PriceStore + AnalysisStore + NewsStore + 'static,
    {
        Self::new(
            config,
            store.clone(),
            store.clone(),
            store,
            provider,
            notifier,
        )
    }

    /// Release provider, notifier and store handles.
    pub async fn close(&self) {
        self.provider.close().await;
        self.notifier.close().await;
        self.prices.close().await;
    }
}
