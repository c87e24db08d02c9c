//! Alpha Vantage price and news provider.

pub mod client;
pub mod messages;

pub use client::{parse_daily_series, parse_news_feed, sentiment_from_label, AlphaVantageClient};
