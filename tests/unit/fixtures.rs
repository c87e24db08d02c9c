//! Shared builders for unit tests

use chrono::NaiveDate;
use stockwatch::models::{PriceBar, PriceSeries};

pub fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(offset as i64)
}

pub fn bar(offset: usize, close: f64) -> PriceBar {
    PriceBar::new(day(offset), close, close + 1.0, close - 1.0, close, 1_000)
}

pub fn bars_from_closes(closes: &[f64]) -> Vec<PriceBar> {
    closes.iter().enumerate().map(|(i, &c)| bar(i, c)).collect()
}

pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    PriceSeries::new("TEST", bars_from_closes(closes)).unwrap()
}

/// `count` closes rising evenly from `from` to `to`.
pub fn linear_closes(count: usize, from: f64, to: f64) -> Vec<f64> {
    let step = (to - from) / (count - 1) as f64;
    (0..count).map(|i| from + step * i as f64).collect()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
