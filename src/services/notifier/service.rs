use super::{text, FlushSummary, NotificationSink, WebhookClient};
use crate::config::{NotifierConfig, RetryPolicy};
use crate::core::pacing::Pacer;
use crate::db::NotificationStore;
use crate::error::NotifyError;
use crate::models::{
    AnalysisResult, NewsItem, Notification, NotificationKind, NotificationStatus, Stock,
};
use async_trait::async_trait;
use chrono::{Local, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    webhook: Option<WebhookClient>,
    send_spacing: Duration,
    retry_policy: RetryPolicy,
}

impl NotificationService {
    pub fn new(store: Arc<dyn NotificationStore>, config: &NotifierConfig) -> Result<Self, NotifyError> {
        let webhook = match &config.webhook_url {
            Some(url) => Some(WebhookClient::new(url.clone(), config)?),
            None => None,
        };
        Ok(Self::with_webhook(
            store,
            webhook,
            config.send_spacing,
            config.retry_policy,
        ))
    }

    pub fn with_webhook(
        store: Arc<dyn NotificationStore>,
        webhook: Option<WebhookClient>,
        send_spacing: Duration,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            store,
            webhook,
            send_spacing,
            retry_policy,
        }
    }

    async fn enqueue(
        &self,
        stock: &Stock,
        kind: NotificationKind,
        title: String,
        body: String,
    ) -> Result<Notification, NotifyError> {
        let pending = Notification::pending(stock.symbol.clone(), kind, title, body);
        let stored = self.store.insert_notification(&pending).await?;
        info!(
            symbol = %stock.symbol,
            kind = %stored.kind.as_str(),
            "NotificationService: queued '{}'",
            stored.title
        );
        Ok(stored)
    }

    async fn deliver(&self, notification: &Notification) -> bool {
        let Some(webhook) = &self.webhook else {
            warn!(
                title = %notification.title,
                "NotificationService: no webhook configured, cannot deliver"
            );
            return false;
        };

        match webhook.deliver(&notification.title, &notification.body).await {
            Ok(acknowledged) => acknowledged,
            Err(e) => {
                error!(title = %notification.title, error = %e, "NotificationService: delivery error");
                false
            }
        }
    }
}

#[async_trait]
impl NotificationSink for NotificationService {
    async fn create_analysis_notification(
        &self,
        stock: &Stock,
        result: &AnalysisResult,
    ) -> Result<Notification, NotifyError> {
        self.enqueue(
            stock,
            NotificationKind::AnalysisResult,
            text::analysis_title(stock, result),
            text::analysis_body(stock, result),
        )
        .await
    }

    async fn create_price_alert_notification(
        &self,
        stock: &Stock,
        price: f64,
        change_pct: f64,
    ) -> Result<Notification, NotifyError> {
        self.enqueue(
            stock,
            NotificationKind::PriceAlert,
            text::price_alert_title(stock, change_pct),
            text::price_alert_body(stock, price, change_pct, Local::now()),
        )
        .await
    }

    async fn create_news_notification(
        &self,
        stock: &Stock,
        items: &[NewsItem],
    ) -> Result<Option<Notification>, NotifyError> {
        if items.is_empty() {
            return Ok(None);
        }
        self.enqueue(
            stock,
            NotificationKind::NewsAlert,
            text::news_title(stock, items.len()),
            text::news_body(stock, items),
        )
        .await
        .map(Some)
    }

    async fn flush_pending(&self) -> Result<FlushSummary, NotifyError> {
        let statuses: &[NotificationStatus] = match self.retry_policy {
            RetryPolicy::Never => &[NotificationStatus::Pending],
            RetryPolicy::NextFlush => &[NotificationStatus::Pending, NotificationStatus::Failed],
        };
        let due = self.store.notifications_with_status(statuses).await?;
        info!(count = due.len(), "NotificationService: flushing notifications");

        let mut summary = FlushSummary::default();
        let mut pacer = Pacer::new(self.send_spacing);

        for notification in &due {
            let Some(id) = notification.id else {
                warn!(title = %notification.title, "NotificationService: skipping record without id");
                continue;
            };
            pacer.wait().await;

            let outcome = if self.deliver(notification).await {
                summary.sent += 1;
                info!(id, "NotificationService: sent '{}'", notification.title);
                self.store.mark_sent(id, Utc::now()).await
            } else {
                summary.failed += 1;
                error!(id, "NotificationService: failed to send '{}'", notification.title);
                self.store.mark_failed(id).await
            };

            if let Err(e) = outcome {
                error!(id, error = %e, "NotificationService: could not record delivery outcome");
            }
        }

        Ok(summary)
    }
}
