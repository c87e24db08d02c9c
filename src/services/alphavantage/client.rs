use super::messages::{DailyEntry, DailySeriesResponse, FeedEntry, NewsResponse};
use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::models::{NewsItem, PriceBar, Sentiment};
use crate::services::market_data::MarketDataProvider;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use url::Url;

const NEWS_LIMIT: &str = "10";
/// `time_published` carries no offset; it is stored as UTC.
const PUBLISHED_FORMAT: &str = "%Y%m%dT%H%M%S";

/// HTTP client for the Alpha Vantage query endpoint.
pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.read_timeout)
            .build()?;
        Ok(Self::with_client(config.base_url.clone(), config.api_key.clone(), http))
    }

    pub fn with_client(base_url: Url, api_key: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url,
            api_key: api_key.into(),
        }
    }

    async fn query<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, ProviderError> {
        let body = self
            .http
            .get(self.base_url.clone())
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MarketDataProvider for AlphaVantageClient {
    async fn fetch_daily_bars(&self, symbol: &str) -> Result<Vec<PriceBar>, ProviderError> {
        let response: DailySeriesResponse = self
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "compact"),
            ])
            .await?;
        response.notice.into_result()?;
        let series = response
            .series
            .ok_or(ProviderError::MissingField("Time Series (Daily)"))?;

        let bars = parse_daily_series(symbol, series);
        debug!(symbol = %symbol, bars = bars.len(), "AlphaVantage: fetched daily bars");
        Ok(bars)
    }

    async fn fetch_news(&self, symbol: &str) -> Result<Vec<NewsItem>, ProviderError> {
        let response: NewsResponse = self
            .query(&[
                ("function", "NEWS_SENTIMENT"),
                ("tickers", symbol),
                ("limit", NEWS_LIMIT),
            ])
            .await?;
        response.notice.into_result()?;
        let feed = response.feed.ok_or(ProviderError::MissingField("feed"))?;

        let items = parse_news_feed(symbol, feed);
        debug!(symbol = %symbol, items = items.len(), "AlphaVantage: fetched news");
        Ok(items)
    }
}

/// Convert the date-keyed series into bars, dropping entries that do not parse.
pub fn parse_daily_series(
    symbol: &str,
    series: BTreeMap<String, DailyEntry>,
) -> Vec<PriceBar> {
    series
        .into_iter()
        .filter_map(|(date, entry)| {
            let parsed = bar_from_entry(&date, &entry);
            if parsed.is_none() {
                warn!(symbol = %symbol, date = %date, "AlphaVantage: skipping malformed daily entry");
            }
            parsed
        })
        .collect()
}

fn bar_from_entry(date: &str, entry: &DailyEntry) -> Option<PriceBar> {
    Some(PriceBar::new(
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?,
        entry.open.trim().parse().ok()?,
        entry.high.trim().parse().ok()?,
        entry.low.trim().parse().ok()?,
        entry.close.trim().parse().ok()?,
        entry.volume.trim().parse().ok()?,
    ))
}

pub fn parse_news_feed(symbol: &str, feed: Vec<FeedEntry>) -> Vec<NewsItem> {
    let now = Utc::now();
    feed.into_iter()
        .filter_map(|entry| {
            let published_at =
                match NaiveDateTime::parse_from_str(entry.time_published.trim(), PUBLISHED_FORMAT) {
                    Ok(ts) => ts,
                    Err(e) => {
                        warn!(
                            symbol = %symbol,
                            url = %entry.url,
                            error = %e,
                            "AlphaVantage: skipping news item with bad timestamp"
                        );
                        return None;
                    }
                };
            if entry.url.trim().is_empty() {
                warn!(symbol = %symbol, "AlphaVantage: skipping news item without url");
                return None;
            }
            Some(NewsItem {
                id: None,
                symbol: symbol.to_string(),
                title: entry.title,
                source: entry.source,
                url: entry.url,
                summary: entry.summary,
                published_at,
                sentiment: entry
                    .overall_sentiment_label
                    .as_deref()
                    .and_then(sentiment_from_label),
                created_at: now,
            })
        })
        .collect()
}

/// Map the provider's overall sentiment label onto our three-way tag.
pub fn sentiment_from_label(label: &str) -> Option<Sentiment> {
    match label.trim() {
        "Bullish" | "Somewhat-Bullish" => Some(Sentiment::Positive),
        "Bearish" | "Somewhat-Bearish" => Some(Sentiment::Negative),
        "Neutral" => Some(Sentiment::Neutral),
        _ => None,
    }
}
