//! In-process store used when no database is configured, and by tests.

use super::{AnalysisStore, NewsStore, NotificationStore, PriceStore};
use crate::error::StoreError;
use crate::models::{
    AnalysisResult, NewsItem, Notification, NotificationStatus, PriceBar, Sentiment, Stock,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    next_id: i64,
    stocks: Vec<Stock>,
    bars: HashMap<String, BTreeMap<NaiveDate, PriceBar>>,
    analyses: HashMap<(String, NaiveDate), AnalysisResult>,
    news: Vec<NewsItem>,
    notifications: Vec<Notification>,
}

impl Inner {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored notification, oldest first.
    pub async fn all_notifications(&self) -> Vec<Notification> {
        self.inner.read().await.notifications.clone()
    }

    /// Every stored news item, oldest first.
    pub async fn all_news(&self) -> Vec<NewsItem> {
        self.inner.read().await.news.clone()
    }
}

#[async_trait]
impl PriceStore for InMemoryStore {
    async fn list_stocks(&self) -> Result<Vec<Stock>, StoreError> {
        Ok(self.inner.read().await.stocks.clone())
    }

    async fn upsert_stock(&self, stock: &Stock) -> Result<Stock, StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(pos) = inner.stocks.iter().position(|s| s.symbol == stock.symbol) {
            let id = inner.stocks[pos].id;
            inner.stocks[pos] = Stock { id, ..stock.clone() };
            return Ok(inner.stocks[pos].clone());
        }
        let id = inner.allocate_id();
        let stored = Stock {
            id: Some(id),
            ..stock.clone()
        };
        inner.stocks.push(stored.clone());
        Ok(stored)
    }

    async fn upsert_price_bar(&self, symbol: &str, bar: &PriceBar) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .bars
            .entry(symbol.to_string())
            .or_default()
            .insert(bar.date, bar.clone());
        Ok(())
    }

    async fn recent_bars(&self, symbol: &str, limit: usize) -> Result<Vec<PriceBar>, StoreError> {
        let inner = self.inner.read().await;
        let Some(bars) = inner.bars.get(symbol) else {
            return Ok(Vec::new());
        };
        let mut recent: Vec<PriceBar> = bars.values().rev().take(limit).cloned().collect();
        recent.reverse();
        Ok(recent)
    }

    async fn latest_close(&self, symbol: &str) -> Result<Option<f64>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .bars
            .get(symbol)
            .and_then(|bars| bars.values().next_back())
            .map(|b| b.close))
    }

    async fn previous_close(&self, symbol: &str) -> Result<Option<f64>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .bars
            .get(symbol)
            .and_then(|bars| bars.values().rev().nth(1))
            .map(|b| b.close))
    }
}

#[async_trait]
impl AnalysisStore for InMemoryStore {
    async fn upsert_analysis(&self, result: &AnalysisResult) -> Result<AnalysisResult, StoreError> {
        let mut inner = self.inner.write().await;
        let key = (result.symbol.clone(), result.analysis_date);
        let existing = inner.analyses.get(&key).and_then(|r| r.id);
        let id = match existing {
            Some(id) => id,
            None => inner.allocate_id(),
        };
        let stored = AnalysisResult {
            id: Some(id),
            ..result.clone()
        };
        inner.analyses.insert(key, stored.clone());
        Ok(stored)
    }

    async fn recent_results(&self, limit: usize) -> Result<Vec<AnalysisResult>, StoreError> {
        let inner = self.inner.read().await;
        let mut results: Vec<AnalysisResult> = inner.analyses.values().cloned().collect();
        results.sort_by(|a, b| {
            b.analysis_date
                .cmp(&a.analysis_date)
                .then(b.created_at.cmp(&a.created_at))
        });
        results.truncate(limit);
        Ok(results)
    }
}

#[async_trait]
impl NewsStore for InMemoryStore {
    async fn insert_news(&self, item: &NewsItem) -> Result<Option<NewsItem>, StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .news
            .iter()
            .any(|n| n.symbol == item.symbol && n.url == item.url)
        {
            return Ok(None);
        }
        let id = inner.allocate_id();
        let stored = NewsItem {
            id: Some(id),
            ..item.clone()
        };
        inner.news.push(stored.clone());
        Ok(Some(stored))
    }

    async fn untagged_news(&self) -> Result<Vec<NewsItem>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .news
            .iter()
            .filter(|n| n.sentiment.is_none())
            .cloned()
            .collect())
    }

    async fn set_sentiment(&self, id: i64, sentiment: Sentiment) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let item = inner
            .news
            .iter_mut()
            .find(|n| n.id == Some(id))
            .ok_or_else(|| StoreError::NotFound(format!("news {}", id)))?;
        item.sentiment = Some(sentiment);
        Ok(())
    }

    async fn purge_news_before(&self, cutoff: NaiveDateTime) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.news.len();
        inner.news.retain(|n| n.published_at >= cutoff);
        Ok(before - inner.news.len())
    }
}

#[async_trait]
impl NotificationStore for InMemoryStore {
    async fn insert_notification(&self, notification: &Notification) -> Result<Notification, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.allocate_id();
        let stored = Notification {
            id: Some(id),
            ..notification.clone()
        };
        inner.notifications.push(stored.clone());
        Ok(stored)
    }

    async fn notifications_with_status(
        &self,
        statuses: &[NotificationStatus],
    ) -> Result<Vec<Notification>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .notifications
            .iter()
            .filter(|n| statuses.contains(&n.status))
            .cloned()
            .collect())
    }

    async fn mark_sent(&self, id: i64, sent_at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let notification = inner
            .notifications
            .iter_mut()
            .find(|n| n.id == Some(id))
            .ok_or_else(|| StoreError::NotFound(format!("notification {}", id)))?;
        notification.status = NotificationStatus::Sent;
        notification.sent_at = Some(sent_at);
        Ok(())
    }

    async fn mark_failed(&self, id: i64) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let notification = inner
            .notifications
            .iter_mut()
            .find(|n| n.id == Some(id))
            .ok_or_else(|| StoreError::NotFound(format!("notification {}", id)))?;
        notification.status = NotificationStatus::Failed;
        Ok(())
    }

    async fn recent_notifications(&self, limit: usize) -> Result<Vec<Notification>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.notifications.iter().rev().take(limit).cloned().collect())
    }
}
