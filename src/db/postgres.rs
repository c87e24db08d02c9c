//! PostgreSQL store for stocks, prices, analysis results, news and notifications

use super::{AnalysisStore, NewsStore, NotificationStore, PriceStore};
use crate::error::StoreError;
use crate::models::{
    AnalysisResult, NewsItem, Notification, NotificationStatus, PriceBar, Sentiment, Stock,
};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{error, info, warn};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS stocks (
        id BIGSERIAL PRIMARY KEY,
        symbol TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        exchange TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
    )",
    "CREATE TABLE IF NOT EXISTS stock_prices (
        symbol TEXT NOT NULL,
        date DATE NOT NULL,
        open DOUBLE PRECISION NOT NULL,
        high DOUBLE PRECISION NOT NULL,
        low DOUBLE PRECISION NOT NULL,
        close DOUBLE PRECISION NOT NULL,
        volume BIGINT NOT NULL,
        PRIMARY KEY (symbol, date)
    )",
    "CREATE TABLE IF NOT EXISTS analysis_results (
        id BIGSERIAL PRIMARY KEY,
        symbol TEXT NOT NULL,
        analysis_date DATE NOT NULL,
        strategy TEXT NOT NULL,
        signal TEXT NOT NULL,
        confidence DOUBLE PRECISION NOT NULL,
        rationale TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        UNIQUE (symbol, analysis_date)
    )",
    "CREATE TABLE IF NOT EXISTS stock_news (
        id BIGSERIAL PRIMARY KEY,
        symbol TEXT NOT NULL,
        title TEXT NOT NULL,
        source TEXT NOT NULL,
        url TEXT NOT NULL,
        summary TEXT NOT NULL,
        published_at TIMESTAMP NOT NULL,
        sentiment TEXT,
        created_at TIMESTAMPTZ NOT NULL,
        UNIQUE (symbol, url)
    )",
    // Tables created before news was keyed per symbol.
    "ALTER TABLE stock_news DROP CONSTRAINT IF EXISTS stock_news_url_key",
    "CREATE UNIQUE INDEX IF NOT EXISTS stock_news_symbol_url_key ON stock_news (symbol, url)",
    "CREATE TABLE IF NOT EXISTS notifications (
        id BIGSERIAL PRIMARY KEY,
        symbol TEXT NOT NULL,
        title TEXT NOT NULL,
        body TEXT NOT NULL,
        kind TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        sent_at TIMESTAMPTZ
    )",
];

pub struct PostgresStore {
    client: Arc<RwLock<Option<Client>>>,
}

impl PostgresStore {
    /// Connect (retrying with exponential backoff) and create the schema.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let (client, connection) = (|| async { tokio_postgres::connect(database_url, NoTls).await })
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(500))
                    .with_max_times(5),
            )
            .notify(|err: &tokio_postgres::Error, dur: Duration| {
                warn!(error = %err, retry_in_ms = dur.as_millis() as u64, "PostgresStore: connection failed, retrying");
            })
            .await?;

        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!(error = %e, "PostgresStore: connection error");
            }
        });

        let store = Self {
            client: Arc::new(RwLock::new(Some(client))),
        };
        store.init_schema().await?;
        info!("PostgresStore: connected and schema ready");

        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        for statement in SCHEMA {
            client.execute(*statement, &[]).await?;
        }
        Ok(())
    }

    /// Check if the connection is still held
    pub async fn is_available(&self) -> bool {
        self.client.read().await.is_some()
    }
}

fn parse_column<T>(row: &Row, column: &str) -> Result<T, StoreError>
where
    T: FromStr<Err = String>,
{
    let raw: String = row.get(column);
    raw.parse().map_err(StoreError::InvalidValue)
}

fn stock_from_row(row: &Row) -> Stock {
    Stock {
        id: Some(row.get("id")),
        symbol: row.get("symbol"),
        name: row.get("name"),
        exchange: row.get("exchange"),
    }
}

fn bar_from_row(row: &Row) -> PriceBar {
    PriceBar {
        date: row.get("date"),
        open: row.get("open"),
        high: row.get("high"),
        low: row.get("low"),
        close: row.get("close"),
        volume: row.get("volume"),
    }
}

fn analysis_from_row(row: &Row) -> Result<AnalysisResult, StoreError> {
    Ok(AnalysisResult {
        id: Some(row.get("id")),
        symbol: row.get("symbol"),
        analysis_date: row.get("analysis_date"),
        strategy: parse_column(row, "strategy")?,
        signal: parse_column(row, "signal")?,
        confidence: row.get("confidence"),
        rationale: row.get("rationale"),
        created_at: row.get("created_at"),
    })
}

fn news_from_row(row: &Row) -> Result<NewsItem, StoreError> {
    let sentiment: Option<String> = row.get("sentiment");
    Ok(NewsItem {
        id: Some(row.get("id")),
        symbol: row.get("symbol"),
        title: row.get("title"),
        source: row.get("source"),
        url: row.get("url"),
        summary: row.get("summary"),
        published_at: row.get("published_at"),
        sentiment: sentiment
            .map(|s| s.parse::<Sentiment>())
            .transpose()
            .map_err(StoreError::InvalidValue)?,
        created_at: row.get("created_at"),
    })
}

fn notification_from_row(row: &Row) -> Result<Notification, StoreError> {
    Ok(Notification {
        id: Some(row.get("id")),
        symbol: row.get("symbol"),
        title: row.get("title"),
        body: row.get("body"),
        kind: parse_column(row, "kind")?,
        status: parse_column(row, "status")?,
        created_at: row.get("created_at"),
        sent_at: row.get("sent_at"),
    })
}

#[async_trait]
impl PriceStore for PostgresStore {
    async fn list_stocks(&self) -> Result<Vec<Stock>, StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let rows = client
            .query("SELECT id, symbol, name, exchange FROM stocks ORDER BY id", &[])
            .await?;
        Ok(rows.iter().map(stock_from_row).collect())
    }

    async fn upsert_stock(&self, stock: &Stock) -> Result<Stock, StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let row = client
            .query_one(
                "INSERT INTO stocks (symbol, name, exchange) VALUES ($1, $2, $3)
                 ON CONFLICT (symbol) DO UPDATE
                 SET name = EXCLUDED.name, exchange = EXCLUDED.exchange, updated_at = now()
                 RETURNING id, symbol, name, exchange",
                &[&stock.symbol, &stock.name, &stock.exchange],
            )
            .await?;
        Ok(stock_from_row(&row))
    }

    async fn upsert_price_bar(&self, symbol: &str, bar: &PriceBar) -> Result<(), StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        client
            .execute(
                "INSERT INTO stock_prices (symbol, date, open, high, low, close, volume)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 ON CONFLICT (symbol, date) DO UPDATE
                 SET open = EXCLUDED.open, high = EXCLUDED.high, low = EXCLUDED.low,
                     close = EXCLUDED.close, volume = EXCLUDED.volume",
                &[
                    &symbol,
                    &bar.date,
                    &bar.open,
                    &bar.high,
                    &bar.low,
                    &bar.close,
                    &bar.volume,
                ],
            )
            .await?;
        Ok(())
    }

    async fn recent_bars(&self, symbol: &str, limit: usize) -> Result<Vec<PriceBar>, StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let rows = client
            .query(
                "SELECT date, open, high, low, close, volume FROM stock_prices
                 WHERE symbol = $1 ORDER BY date DESC LIMIT $2",
                &[&symbol, &(limit as i64)],
            )
            .await?;

        let mut bars: Vec<PriceBar> = rows.iter().map(bar_from_row).collect();
        // Reverse to get oldest first
        bars.reverse();
        Ok(bars)
    }

    async fn latest_close(&self, symbol: &str) -> Result<Option<f64>, StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let row = client
            .query_opt(
                "SELECT close FROM stock_prices WHERE symbol = $1 ORDER BY date DESC LIMIT 1",
                &[&symbol],
            )
            .await?;
        Ok(row.map(|r| r.get("close")))
    }

    async fn previous_close(&self, symbol: &str) -> Result<Option<f64>, StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let row = client
            .query_opt(
                "SELECT close FROM stock_prices WHERE symbol = $1 ORDER BY date DESC LIMIT 1 OFFSET 1",
                &[&symbol],
            )
            .await?;
        Ok(row.map(|r| r.get("close")))
    }

    async fn close(&self) {
        if self.client.write().await.take().is_some() {
            info!("PostgresStore: connection released");
        }
    }
}

#[async_trait]
impl AnalysisStore for PostgresStore {
    async fn upsert_analysis(&self, result: &AnalysisResult) -> Result<AnalysisResult, StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let row = client
            .query_one(
                "INSERT INTO analysis_results
                    (symbol, analysis_date, strategy, signal, confidence, rationale, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 ON CONFLICT (symbol, analysis_date) DO UPDATE
                 SET strategy = EXCLUDED.strategy, signal = EXCLUDED.signal,
                     confidence = EXCLUDED.confidence, rationale = EXCLUDED.rationale,
                     created_at = EXCLUDED.created_at
                 RETURNING id",
                &[
                    &result.symbol,
                    &result.analysis_date,
                    &result.strategy.as_str(),
                    &result.signal.as_str(),
                    &result.confidence,
                    &result.rationale,
                    &result.created_at,
                ],
            )
            .await?;

        Ok(AnalysisResult {
            id: Some(row.get("id")),
            ..result.clone()
        })
    }

    async fn recent_results(&self, limit: usize) -> Result<Vec<AnalysisResult>, StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let rows = client
            .query(
                "SELECT id, symbol, analysis_date, strategy, signal, confidence, rationale, created_at
                 FROM analysis_results ORDER BY analysis_date DESC, created_at DESC LIMIT $1",
                &[&(limit as i64)],
            )
            .await?;
        rows.iter().map(analysis_from_row).collect()
    }
}

#[async_trait]
impl NewsStore for PostgresStore {
    async fn insert_news(&self, item: &NewsItem) -> Result<Option<NewsItem>, StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let sentiment = item.sentiment.map(|s| s.as_str());
        let row = client
            .query_opt(
                "INSERT INTO stock_news
                    (symbol, title, source, url, summary, published_at, sentiment, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                 ON CONFLICT (symbol, url) DO NOTHING
                 RETURNING id",
                &[
                    &item.symbol,
                    &item.title,
                    &item.source,
                    &item.url,
                    &item.summary,
                    &item.published_at,
                    &sentiment,
                    &item.created_at,
                ],
            )
            .await?;

        Ok(row.map(|r| NewsItem {
            id: Some(r.get("id")),
            ..item.clone()
        }))
    }

    async fn untagged_news(&self) -> Result<Vec<NewsItem>, StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let rows = client
            .query(
                "SELECT id, symbol, title, source, url, summary, published_at, sentiment, created_at
                 FROM stock_news WHERE sentiment IS NULL ORDER BY published_at",
                &[],
            )
            .await?;
        rows.iter().map(news_from_row).collect()
    }

    async fn set_sentiment(&self, id: i64, sentiment: Sentiment) -> Result<(), StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let updated = client
            .execute(
                "UPDATE stock_news SET sentiment = $1 WHERE id = $2",
                &[&sentiment.as_str(), &id],
            )
            .await?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("news {}", id)));
        }
        Ok(())
    }

    async fn purge_news_before(&self, cutoff: NaiveDateTime) -> Result<usize, StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let deleted = client
            .execute("DELETE FROM stock_news WHERE published_at < $1", &[&cutoff])
            .await?;
        Ok(deleted as usize)
    }
}

#[async_trait]
impl NotificationStore for PostgresStore {
    async fn insert_notification(&self, notification: &Notification) -> Result<Notification, StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let row = client
            .query_one(
                "INSERT INTO notifications (symbol, title, body, kind, status, created_at, sent_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7)
                 RETURNING id",
                &[
                    &notification.symbol,
                    &notification.title,
                    &notification.body,
                    &notification.kind.as_str(),
                    &notification.status.as_str(),
                    &notification.created_at,
                    &notification.sent_at,
                ],
            )
            .await?;

        Ok(Notification {
            id: Some(row.get("id")),
            ..notification.clone()
        })
    }

    async fn notifications_with_status(
        &self,
        statuses: &[NotificationStatus],
    ) -> Result<Vec<Notification>, StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let statuses: Vec<&str> = statuses.iter().map(|s| s.as_str()).collect();
        let rows = client
            .query(
                "SELECT id, symbol, title, body, kind, status, created_at, sent_at
                 FROM notifications WHERE status = ANY($1) ORDER BY created_at ASC",
                &[&statuses],
            )
            .await?;
        rows.iter().map(notification_from_row).collect()
    }

    async fn mark_sent(&self, id: i64, sent_at: DateTime<Utc>) -> Result<(), StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        client
            .execute(
                "UPDATE notifications SET status = $1, sent_at = $2 WHERE id = $3",
                &[&NotificationStatus::Sent.as_str(), &sent_at, &id],
            )
            .await?;
        Ok(())
    }

    async fn mark_failed(&self, id: i64) -> Result<(), StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        client
            .execute(
                "UPDATE notifications SET status = $1 WHERE id = $2",
                &[&NotificationStatus::Failed.as_str(), &id],
            )
            .await?;
        Ok(())
    }

    async fn recent_notifications(&self, limit: usize) -> Result<Vec<Notification>, StoreError> {
        let guard = self.client.read().await;
        let client = guard.as_ref().ok_or(StoreError::Closed)?;
        let rows = client
            .query(
                "SELECT id, symbol, title, body, kind, status, created_at, sent_at
                 FROM notifications ORDER BY created_at DESC LIMIT $1",
                &[&(limit as i64)],
            )
            .await?;
        rows.iter().map(notification_from_row).collect()
    }
}
