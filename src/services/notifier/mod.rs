//! Notification creation and webhook delivery.

pub mod service;
pub mod text;
pub mod webhook;

pub use service::NotificationService;
pub use webhook::WebhookClient;

use crate::error::NotifyError;
use crate::models::{AnalysisResult, NewsItem, Notification, Stock};
use async_trait::async_trait;

/// Outcome of one flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Creates PENDING notification records and delivers them on flush.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn create_analysis_notification(
        &self,
        stock: &Stock,
        result: &AnalysisResult,
    ) -> Result<Notification, NotifyError>;

    async fn create_price_alert_notification(
        &self,
        stock: &Stock,
        price: f64,
        change_pct: f64,
    ) -> Result<Notification, NotifyError>;

    /// `None` when `items` is empty.
    async fn create_news_notification(
        &self,
        stock: &Stock,
        items: &[NewsItem],
    ) -> Result<Option<Notification>, NotifyError>;

    /// Deliver every due record and mark each SENT or FAILED.
    async fn flush_pending(&self) -> Result<FlushSummary, NotifyError>;

    async fn close(&self) {}
}
