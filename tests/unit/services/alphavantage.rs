//! Unit tests for Alpha Vantage payload parsing

use chrono::NaiveDate;
use std::collections::BTreeMap;
use stockwatch::models::Sentiment;
use stockwatch::services::alphavantage::messages::{DailyEntry, FeedEntry};
use stockwatch::services::alphavantage::{parse_daily_series, parse_news_feed, sentiment_from_label};

fn entry(close: &str) -> DailyEntry {
    DailyEntry {
        open: "100.0".to_string(),
        high: "101.0".to_string(),
        low: "99.0".to_string(),
        close: close.to_string(),
        volume: "12345".to_string(),
    }
}

fn feed(url: &str, published: &str, label: Option<&str>) -> FeedEntry {
    FeedEntry {
        title: "Title".to_string(),
        url: url.to_string(),
        time_published: published.to_string(),
        summary: "Summary".to_string(),
        source: "Wire".to_string(),
        overall_sentiment_label: label.map(str::to_string),
    }
}

#[test]
fn test_daily_series_skips_malformed_entries() {
    let mut series = BTreeMap::new();
    series.insert("2024-01-08".to_string(), entry("100.5"));
    series.insert("2024-01-09".to_string(), entry("n/a"));
    series.insert("not-a-date".to_string(), entry("101.0"));

    let bars = parse_daily_series("AAPL", series);
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
    assert_eq!(bars[0].close, 100.5);
    assert_eq!(bars[0].volume, 12345);
}

#[test]
fn test_news_feed_parsing() {
    let items = parse_news_feed(
        "AAPL",
        vec![
            feed("https://a.example.com", "20240108T091500", Some("Somewhat-Bullish")),
            feed("https://b.example.com", "yesterday", Some("Bearish")),
            feed("https://c.example.com", "20240108T101500", None),
        ],
    );

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].sentiment, Some(Sentiment::Positive));
    assert_eq!(items[0].symbol, "AAPL");
    assert_eq!(
        items[0].published_at,
        NaiveDate::from_ymd_opt(2024, 1, 8)
            .unwrap()
            .and_hms_opt(9, 15, 0)
            .unwrap()
    );
    assert_eq!(items[1].sentiment, None);
}

#[test]
fn test_sentiment_labels() {
    assert_eq!(sentiment_from_label("Bullish"), Some(Sentiment::Positive));
    assert_eq!(sentiment_from_label("Somewhat-Bearish"), Some(Sentiment::Negative));
    assert_eq!(sentiment_from_label("Neutral"), Some(Sentiment::Neutral));
    assert_eq!(sentiment_from_label("Mixed"), None);
}
