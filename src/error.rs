//! Error types shared across the collaborator seams.

use thiserror::Error;

/// Failure talking to the price/news provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to decode provider response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Provider returned an error: {0}")]
    Api(String),
    #[error("Provider rate limit reached: {0}")]
    RateLimited(String),
    #[error("Provider response is missing '{0}'")]
    MissingField(&'static str),
}

/// Failure in the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),
    #[error("Store is closed")]
    Closed,
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Invalid stored value: {0}")]
    InvalidValue(String),
}

/// Failure creating or delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to decode webhook response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Orchestrator lifecycle failure.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Cannot {action} orchestrator in state {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },
    #[error("Invalid schedule configuration: {0}")]
    InvalidConfig(String),
}

/// A price series that cannot be analysed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("Malformed bar on {date}: {reason}")]
    MalformedBar {
        date: chrono::NaiveDate,
        reason: &'static str,
    },
}

/// Failure handling one symbol inside an activity run.
#[derive(Debug, Error)]
pub enum ActivityError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Failure assembling the collaborators at process start.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
