//! Unit tests for PriceSeries construction

use crate::fixtures::{bar, day};
use stockwatch::error::SeriesError;
use stockwatch::models::PriceSeries;

#[test]
fn test_series_sorted_by_date() {
    let series = PriceSeries::new("AAPL", vec![bar(2, 12.0), bar(0, 10.0), bar(1, 11.0)]).unwrap();
    assert_eq!(series.closes(), vec![10.0, 11.0, 12.0]);
    assert_eq!(series.latest().unwrap().date, day(2));
    assert_eq!(series.symbol(), "AAPL");
}

#[test]
fn test_duplicate_date_keeps_last_input() {
    let series = PriceSeries::new("AAPL", vec![bar(0, 10.0), bar(1, 11.0), bar(1, 15.0)]).unwrap();
    assert_eq!(series.bar_count(), 2);
    assert_eq!(series.latest_close(), Some(15.0));
}

#[test]
fn test_non_positive_close_rejected() {
    let err = PriceSeries::new("AAPL", vec![bar(0, 10.0), bar(1, 0.0)]).unwrap_err();
    assert!(matches!(err, SeriesError::MalformedBar { date, .. } if date == day(1)));
}

#[test]
fn test_non_finite_close_rejected() {
    assert!(PriceSeries::new("AAPL", vec![bar(0, f64::NAN)]).is_err());
    assert!(PriceSeries::new("AAPL", vec![bar(0, f64::INFINITY)]).is_err());
}

#[test]
fn test_last_closes_window() {
    let series = PriceSeries::new("AAPL", vec![bar(0, 1.0), bar(1, 2.0), bar(2, 3.0)]).unwrap();
    assert_eq!(series.last_closes(2), vec![2.0, 3.0]);
    assert_eq!(series.last_closes(10), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_empty_series() {
    let series = PriceSeries::new("AAPL", Vec::new()).unwrap();
    assert!(series.is_empty());
    assert_eq!(series.latest_close(), None);
}
