pub mod alphavantage;
pub mod market_data;
pub mod notifier;
pub mod sentiment;

pub use alphavantage::AlphaVantageClient;
pub use market_data::MarketDataProvider;
pub use notifier::{FlushSummary, NotificationService, NotificationSink, WebhookClient};
pub use sentiment::SentimentTagger;
