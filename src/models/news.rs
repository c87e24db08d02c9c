use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
        }
    }

    /// POSITIVE and NEGATIVE items are worth a news notification.
    pub fn is_notable(&self) -> bool {
        !matches!(self, Sentiment::Neutral)
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POSITIVE" => Ok(Sentiment::Positive),
            "NEGATIVE" => Ok(Sentiment::Negative),
            "NEUTRAL" => Ok(Sentiment::Neutral),
            other => Err(format!("unknown sentiment '{}'", other)),
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A news article about one symbol. `url` identifies the article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: Option<i64>,
    pub symbol: String,
    pub title: String,
    pub source: String,
    pub url: String,
    pub summary: String,
    /// Provider timestamp, read as UTC.
    pub published_at: NaiveDateTime,
    /// `None` until tagged by the provider or the keyword tagger.
    pub sentiment: Option<Sentiment>,
    pub created_at: DateTime<Utc>,
}
