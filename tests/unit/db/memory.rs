//! Unit tests for the in-memory store

use crate::fixtures::{bar, day};
use chrono::{Duration, Utc};
use stockwatch::db::{AnalysisStore, InMemoryStore, NewsStore, NotificationStore, PriceStore};
use stockwatch::models::{
    AnalysisResult, NewsItem, Notification, NotificationKind, NotificationStatus, Sentiment,
    Signal, Stock, StrategyKind,
};

fn analysis(signal: Signal) -> AnalysisResult {
    AnalysisResult {
        id: None,
        symbol: "AAPL".to_string(),
        analysis_date: day(0),
        strategy: StrategyKind::Swing,
        signal,
        confidence: 80.0,
        rationale: String::new(),
        created_at: Utc::now(),
    }
}

fn news(url: &str, days_old: i64) -> NewsItem {
    NewsItem {
        id: None,
        symbol: "AAPL".to_string(),
        title: "Title".to_string(),
        source: "Wire".to_string(),
        url: url.to_string(),
        summary: String::new(),
        published_at: Utc::now().naive_utc() - Duration::days(days_old),
        sentiment: None,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_stock_upsert_keeps_id() {
    let store = InMemoryStore::new();
    let first = store.upsert_stock(&Stock::new("AAPL", "Apple", "NASDAQ")).await.unwrap();
    let second = store.upsert_stock(&Stock::new("AAPL", "Apple Inc", "NASDAQ")).await.unwrap();

    assert_eq!(first.id, second.id);
    let stocks = store.list_stocks().await.unwrap();
    assert_eq!(stocks.len(), 1);
    assert_eq!(stocks[0].name, "Apple Inc");
}

#[tokio::test]
async fn test_price_bar_upsert_by_date() {
    let store = InMemoryStore::new();
    store.upsert_price_bar("AAPL", &bar(0, 10.0)).await.unwrap();
    store.upsert_price_bar("AAPL", &bar(1, 11.0)).await.unwrap();
    store.upsert_price_bar("AAPL", &bar(1, 12.0)).await.unwrap();
    store.upsert_price_bar("AAPL", &bar(2, 13.0)).await.unwrap();

    let recent = store.recent_bars("AAPL", 2).await.unwrap();
    assert_eq!(recent.iter().map(|b| b.close).collect::<Vec<_>>(), vec![12.0, 13.0]);
    assert_eq!(store.latest_close("AAPL").await.unwrap(), Some(13.0));
    assert_eq!(store.previous_close("AAPL").await.unwrap(), Some(12.0));
    assert_eq!(store.latest_close("MSFT").await.unwrap(), None);
}

#[tokio::test]
async fn test_analysis_upsert_by_symbol_and_date() {
    let store = InMemoryStore::new();
    let first = store.upsert_analysis(&analysis(Signal::Hold)).await.unwrap();
    let second = store.upsert_analysis(&analysis(Signal::Buy)).await.unwrap();

    assert_eq!(first.id, second.id);
    let results = store.recent_results(10).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].signal, Signal::Buy);
}

#[tokio::test]
async fn test_same_article_is_kept_per_symbol() {
    let store = InMemoryStore::new();
    let aapl = news("https://shared.example.com", 0);
    let msft = NewsItem {
        symbol: "MSFT".to_string(),
        ..aapl.clone()
    };

    assert!(store.insert_news(&aapl).await.unwrap().is_some());
    assert!(store.insert_news(&msft).await.unwrap().is_some());
    assert!(store.insert_news(&msft).await.unwrap().is_none());
    assert_eq!(store.all_news().await.len(), 2);
}

#[tokio::test]
async fn test_news_is_deduplicated_by_url() {
    let store = InMemoryStore::new();
    let stored = store.insert_news(&news("https://a.example.com", 0)).await.unwrap();
    assert!(stored.is_some());
    assert!(store.insert_news(&news("https://a.example.com", 0)).await.unwrap().is_none());

    let id = stored.unwrap().id.unwrap();
    assert_eq!(store.untagged_news().await.unwrap().len(), 1);
    store.set_sentiment(id, Sentiment::Negative).await.unwrap();
    assert!(store.untagged_news().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_purge_old_news() {
    let store = InMemoryStore::new();
    store.insert_news(&news("https://old.example.com", 40)).await.unwrap();
    store.insert_news(&news("https://new.example.com", 1)).await.unwrap();

    let cutoff = Utc::now().naive_utc() - Duration::days(30);
    assert_eq!(store.purge_news_before(cutoff).await.unwrap(), 1);
    assert_eq!(store.all_news().await.len(), 1);
}

#[tokio::test]
async fn test_notification_status_transitions() {
    let store = InMemoryStore::new();
    let a = store
        .insert_notification(&Notification::pending("AAPL", NotificationKind::PriceAlert, "a".into(), "".into()))
        .await
        .unwrap();
    let b = store
        .insert_notification(&Notification::pending("AAPL", NotificationKind::NewsAlert, "b".into(), "".into()))
        .await
        .unwrap();

    store.mark_sent(a.id.unwrap(), Utc::now()).await.unwrap();
    store.mark_failed(b.id.unwrap()).await.unwrap();

    let pending = store
        .notifications_with_status(&[NotificationStatus::Pending])
        .await
        .unwrap();
    assert!(pending.is_empty());

    let failed = store
        .notifications_with_status(&[NotificationStatus::Failed])
        .await
        .unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].title, "b");

    let recent = store.recent_notifications(1).await.unwrap();
    assert_eq!(recent[0].title, "b");
    assert!(store.mark_sent(999, Utc::now()).await.is_err());
}
