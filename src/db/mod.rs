//! Persistence contracts and their adapters.
//!
//! Every method is safe to call concurrently. Price bars and analysis results
//! are upserted on their natural keys, so repeated runs overwrite rather than
//! duplicate.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

use crate::error::StoreError;
use crate::models::{AnalysisResult, NewsItem, Notification, NotificationStatus, PriceBar, Sentiment, Stock};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Watch-list and daily price bars.
#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn list_stocks(&self) -> Result<Vec<Stock>, StoreError>;

    /// Insert or update a stock keyed by symbol.
    async fn upsert_stock(&self, stock: &Stock) -> Result<Stock, StoreError>;

    /// Insert or update a bar keyed by `(symbol, date)`.
    async fn upsert_price_bar(&self, symbol: &str, bar: &PriceBar) -> Result<(), StoreError>;

    /// Most recent `limit` bars, oldest first.
    async fn recent_bars(&self, symbol: &str, limit: usize) -> Result<Vec<PriceBar>, StoreError>;

    async fn latest_close(&self, symbol: &str) -> Result<Option<f64>, StoreError>;

    /// Close of the bar before the latest one.
    async fn previous_close(&self, symbol: &str) -> Result<Option<f64>, StoreError>;

    /// Release the underlying connection.
    async fn close(&self) {}
}

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Insert or replace the result keyed by `(symbol, analysis_date)`.
    async fn upsert_analysis(&self, result: &AnalysisResult) -> Result<AnalysisResult, StoreError>;

    /// Newest first.
    async fn recent_results(&self, limit: usize) -> Result<Vec<AnalysisResult>, StoreError>;
}

#[async_trait]
pub trait NewsStore: Send + Sync {
    /// Store an article unless the same symbol already has one with this URL.
    /// One article may be stored once per symbol it is about. Returns the
    /// stored item when it is new, `None` when it was already known.
    async fn insert_news(&self, item: &NewsItem) -> Result<Option<NewsItem>, StoreError>;

    async fn untagged_news(&self) -> Result<Vec<NewsItem>, StoreError>;

    async fn set_sentiment(&self, id: i64, sentiment: Sentiment) -> Result<(), StoreError>;

    /// Delete articles published before `cutoff`; returns how many.
    async fn purge_news_before(&self, cutoff: NaiveDateTime) -> Result<usize, StoreError>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert_notification(&self, notification: &Notification) -> Result<Notification, StoreError>;

    /// Notifications in any of `statuses`, oldest first.
    async fn notifications_with_status(
        &self,
        statuses: &[NotificationStatus],
    ) -> Result<Vec<Notification>, StoreError>;

    async fn mark_sent(&self, id: i64, sent_at: DateTime<Utc>) -> Result<(), StoreError>;

    async fn mark_failed(&self, id: i64) -> Result<(), StoreError>;

    /// Newest first.
    async fn recent_notifications(&self, limit: usize) -> Result<Vec<Notification>, StoreError>;
}
