//! Market data provider interface.

use crate::error::ProviderError;
use crate::models::{NewsItem, PriceBar};
use async_trait::async_trait;

/// Daily bars and news for one symbol per call. Implementations are subject to
/// the upstream rate limit; callers pace themselves.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Recent daily bars, in any order.
    async fn fetch_daily_bars(&self, symbol: &str) -> Result<Vec<PriceBar>, ProviderError>;

    async fn fetch_news(&self, symbol: &str) -> Result<Vec<NewsItem>, ProviderError>;

    async fn close(&self) {}
}
