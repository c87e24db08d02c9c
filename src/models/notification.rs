use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    AnalysisResult,
    PriceAlert,
    NewsAlert,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::AnalysisResult => "ANALYSIS_RESULT",
            NotificationKind::PriceAlert => "PRICE_ALERT",
            NotificationKind::NewsAlert => "NEWS_ALERT",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ANALYSIS_RESULT" => Ok(NotificationKind::AnalysisResult),
            "PRICE_ALERT" => Ok(NotificationKind::PriceAlert),
            "NEWS_ALERT" => Ok(NotificationKind::NewsAlert),
            other => Err(format!("unknown notification kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "PENDING",
            NotificationStatus::Sent => "SENT",
            NotificationStatus::Failed => "FAILED",
        }
    }
}

impl FromStr for NotificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(NotificationStatus::Pending),
            "SENT" => Ok(NotificationStatus::Sent),
            "FAILED" => Ok(NotificationStatus::Failed),
            other => Err(format!("unknown notification status '{}'", other)),
        }
    }
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Option<i64>,
    pub symbol: String,
    pub title: String,
    pub body: String,
    pub kind: NotificationKind,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

impl Notification {
    /// A new PENDING notification.
    pub fn pending(
        symbol: impl Into<String>,
        kind: NotificationKind,
        title: String,
        body: String,
    ) -> Self {
        Self {
            id: None,
            symbol: symbol.into(),
            title,
            body,
            kind,
            status: NotificationStatus::Pending,
            created_at: Utc::now(),
            sent_at: None,
        }
    }
}
