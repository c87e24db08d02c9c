//! Alpha Vantage response payloads.

use crate::error::ProviderError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Fields Alpha Vantage returns with HTTP 200 instead of data.
#[derive(Debug, Default, Deserialize)]
pub struct ApiNotice {
    #[serde(rename = "Error Message")]
    pub error_message: Option<String>,
    #[serde(rename = "Note")]
    pub note: Option<String>,
    #[serde(rename = "Information")]
    pub information: Option<String>,
}

impl ApiNotice {
    pub fn into_result(self) -> Result<(), ProviderError> {
        if let Some(message) = self.error_message {
            return Err(ProviderError::Api(message));
        }
        if let Some(message) = self.note.or(self.information) {
            return Err(ProviderError::RateLimited(message));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct DailySeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    pub series: Option<BTreeMap<String, DailyEntry>>,
    #[serde(flatten)]
    pub notice: ApiNotice,
}

/// One day; every value is a decimal string.
#[derive(Debug, Deserialize)]
pub struct DailyEntry {
    #[serde(rename = "1. open")]
    pub open: String,
    #[serde(rename = "2. high")]
    pub high: String,
    #[serde(rename = "3. low")]
    pub low: String,
    #[serde(rename = "4. close")]
    pub close: String,
    #[serde(rename = "5. volume")]
    pub volume: String,
}

#[derive(Debug, Deserialize)]
pub struct NewsResponse {
    pub feed: Option<Vec<FeedEntry>>,
    #[serde(flatten)]
    pub notice: ApiNotice,
}

#[derive(Debug, Deserialize)]
pub struct FeedEntry {
    pub title: String,
    pub url: String,
    pub time_published: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub source: String,
    pub overall_sentiment_label: Option<String>,
}
