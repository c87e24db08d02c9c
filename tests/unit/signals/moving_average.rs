//! Unit tests for the moving-average crossover strategy

use crate::fixtures::{assert_close, linear_closes, series_from_closes};
use stockwatch::models::{Signal, StrategyKind};
use stockwatch::signals::moving_average;

fn flat_then(last: f64) -> Vec<f64> {
    let mut closes = vec![100.0; 24];
    closes.push(last);
    closes
}

#[test]
fn test_golden_cross_buys() {
    let candidate = moving_average::evaluate(&series_from_closes(&flat_then(130.0))).unwrap();
    assert_eq!(candidate.strategy, StrategyKind::MovingAverage);
    assert_eq!(candidate.signal, Signal::Buy);
    assert_close(candidate.confidence, 85.0);
    assert!(candidate.rationale.contains("130.00"));
    assert!(candidate.rationale.contains("106.00"));
    assert!(candidate.rationale.contains("101.50"));
}

#[test]
fn test_death_cross_sells() {
    let candidate = moving_average::evaluate(&series_from_closes(&flat_then(70.0))).unwrap();
    assert_eq!(candidate.signal, Signal::Sell);
    assert_close(candidate.confidence, 85.0);
}

#[test]
fn test_rising_series_is_bullish() {
    let closes = linear_closes(35, 100.0, 120.0);
    let candidate = moving_average::evaluate(&series_from_closes(&closes)).unwrap();
    assert_eq!(candidate.signal, Signal::HoldBullish);
    assert_close(candidate.confidence, 70.0);
}

#[test]
fn test_falling_series_is_bearish() {
    let closes = linear_closes(35, 120.0, 100.0);
    let candidate = moving_average::evaluate(&series_from_closes(&closes)).unwrap();
    assert_eq!(candidate.signal, Signal::HoldBearish);
    assert_close(candidate.confidence, 70.0);
}

#[test]
fn test_flat_series_holds() {
    let candidate = moving_average::evaluate(&series_from_closes(&[100.0; 30])).unwrap();
    assert_eq!(candidate.signal, Signal::Hold);
    assert_close(candidate.confidence, 60.0);
}

#[test]
fn test_needs_two_long_windows() {
    assert!(moving_average::evaluate(&series_from_closes(&[100.0; 20])).is_none());
    assert!(moving_average::evaluate(&series_from_closes(&[100.0; 21])).is_some());
}
