//! Notification service against a mock webhook

use crate::test_utils::{news_item, seeded_store};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use stockwatch::config::RetryPolicy;
use stockwatch::db::{InMemoryStore, NotificationStore};
use stockwatch::models::{NotificationKind, NotificationStatus, Sentiment, Stock};
use stockwatch::services::{NotificationService, NotificationSink, WebhookClient};
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn webhook(server: &MockServer) -> WebhookClient {
    let url = Url::parse(&format!("{}/hook", server.uri())).unwrap();
    WebhookClient::with_client(url, 0, reqwest::Client::new())
}

fn service(store: &Arc<InMemoryStore>, webhook: Option<WebhookClient>, policy: RetryPolicy) -> NotificationService {
    NotificationService::with_webhook(store.clone(), webhook, Duration::ZERO, policy)
}

async fn mount_reply(server: &MockServer, code: i64, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_string_contains("\"title\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": code, "msg": "ok" })))
        .expect(expected)
        .mount(server)
        .await;
}

fn stock() -> Stock {
    Stock::new("AAPL", "Apple Inc.", "NASDAQ")
}

#[tokio::test]
async fn test_flush_marks_acknowledged_records_sent() {
    let server = MockServer::start().await;
    mount_reply(&server, 0, 2).await;
    let store = seeded_store(&[]).await;
    let service = service(&store, Some(webhook(&server)), RetryPolicy::Never);

    service
        .create_price_alert_notification(&stock(), 105.0, 5.0)
        .await
        .unwrap();
    service
        .create_price_alert_notification(&stock(), 94.0, -6.0)
        .await
        .unwrap();

    let summary = service.flush_pending().await.unwrap();

    assert_eq!(summary.sent, 2);
    assert_eq!(summary.failed, 0);
    let stored = store.all_notifications().await;
    assert!(stored
        .iter()
        .all(|n| n.status == NotificationStatus::Sent && n.sent_at.is_some()));
}

#[tokio::test]
async fn test_flush_marks_rejected_records_failed() {
    let server = MockServer::start().await;
    mount_reply(&server, 19001, 1).await;
    let store = seeded_store(&[]).await;
    let service = service(&store, Some(webhook(&server)), RetryPolicy::Never);

    service
        .create_price_alert_notification(&stock(), 105.0, 5.0)
        .await
        .unwrap();
    let summary = service.flush_pending().await.unwrap();

    assert_eq!(summary.failed, 1);
    let stored = store.all_notifications().await;
    assert_eq!(stored[0].status, NotificationStatus::Failed);
    assert!(stored[0].sent_at.is_none());

    // Failed records stay failed under the default policy.
    let again = service.flush_pending().await.unwrap();
    assert_eq!(again.sent + again.failed, 0);
}

#[tokio::test]
async fn test_next_flush_policy_retries_failed_records() {
    let server = MockServer::start().await;
    mount_reply(&server, 0, 1).await;
    let store = seeded_store(&[]).await;

    let offline = service(&store, None, RetryPolicy::NextFlush);
    offline
        .create_price_alert_notification(&stock(), 105.0, 5.0)
        .await
        .unwrap();
    assert_eq!(offline.flush_pending().await.unwrap().failed, 1);

    let online = service(&store, Some(webhook(&server)), RetryPolicy::NextFlush);
    let summary = online.flush_pending().await.unwrap();

    assert_eq!(summary.sent, 1);
    let stored = store.all_notifications().await;
    assert_eq!(stored[0].status, NotificationStatus::Sent);
}

#[tokio::test]
async fn test_flush_without_webhook_fails_records() {
    let store = seeded_store(&[]).await;
    let service = service(&store, None, RetryPolicy::Never);

    service
        .create_price_alert_notification(&stock(), 105.0, 5.0)
        .await
        .unwrap();
    let summary = service.flush_pending().await.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(
        store.notifications_with_status(&[NotificationStatus::Failed]).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_http_error_counts_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let store = seeded_store(&[]).await;
    let service = service(&store, Some(webhook(&server)), RetryPolicy::Never);

    service
        .create_price_alert_notification(&stock(), 105.0, 5.0)
        .await
        .unwrap();
    let summary = service.flush_pending().await.unwrap();

    assert_eq!(summary.failed, 1);
}

#[tokio::test]
async fn test_news_notification_requires_items() {
    let store = seeded_store(&[]).await;
    let service = service(&store, None, RetryPolicy::Never);

    let none = service.create_news_notification(&stock(), &[]).await.unwrap();
    assert!(none.is_none());
    assert!(store.all_notifications().await.is_empty());

    let mut item = news_item("AAPL", "https://n/1", "Record profit", 0);
    item.sentiment = Some(Sentiment::Positive);
    let created = service
        .create_news_notification(&stock(), &[item])
        .await
        .unwrap()
        .unwrap();

    assert_eq!(created.kind, NotificationKind::NewsAlert);
    assert_eq!(created.status, NotificationStatus::Pending);
    assert!(created.id.is_some());
    assert_eq!(created.title, "Apple Inc. - 1 new related articles");
    assert!(created.body.contains("Record profit"));
}
