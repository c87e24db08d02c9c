//! Unit tests for activity gates and price-alert arithmetic

use chrono::NaiveDate;
use stockwatch::jobs::handlers::{change_pct, exceeds_threshold};
use stockwatch::jobs::types::{Activity, RunSummary};

fn at(day: u32, h: u32, m: u32) -> chrono::NaiveDateTime {
    // 2024-01-06 is a Saturday, 2024-01-08 a Monday
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

#[test]
fn test_daily_activities_skip_weekends() {
    assert!(Activity::DailyFetch.is_open(at(8, 16, 0)));
    assert!(!Activity::DailyFetch.is_open(at(6, 16, 0)));
    assert!(!Activity::DailyAnalysis.is_open(at(7, 16, 30)));
}

#[test]
fn test_price_monitor_needs_trading_hours() {
    assert!(Activity::PriceMonitor.is_open(at(8, 10, 0)));
    assert!(!Activity::PriceMonitor.is_open(at(8, 12, 0)));
    assert!(!Activity::PriceMonitor.is_open(at(6, 10, 0)));
}

#[test]
fn test_ungated_activities() {
    assert!(Activity::NewsRefresh.is_open(at(6, 3, 0)));
    assert!(Activity::NotificationFlush.is_open(at(7, 23, 0)));
}

#[test]
fn test_change_pct() {
    assert!((change_pct(105.0, 100.0).unwrap() - 5.0).abs() < 1e-9);
    assert!((change_pct(90.0, 100.0).unwrap() + 10.0).abs() < 1e-9);
    assert!(change_pct(100.0, 0.0).is_none());
}

#[test]
fn test_threshold_is_inclusive() {
    assert!(exceeds_threshold(5.0, 5.0));
    assert!(exceeds_threshold(-5.0, 5.0));
    assert!(!exceeds_threshold(4.99, 5.0));
}

#[test]
fn test_run_summary_merge() {
    let mut total = RunSummary {
        processed: 1,
        ..RunSummary::default()
    };
    total.merge(RunSummary {
        processed: 2,
        failed: 1,
        skipped: 0,
        notifications: 3,
    });
    assert_eq!(total.processed, 3);
    assert_eq!(total.failed, 1);
    assert_eq!(total.notifications, 3);
}
