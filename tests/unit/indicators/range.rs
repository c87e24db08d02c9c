//! Unit tests for the trailing close range

use crate::fixtures::assert_close;
use stockwatch::indicators::close_range;

#[test]
fn test_range_uses_trailing_window() {
    let closes = [50.0, 98.0, 99.0, 97.0, 96.0, 95.0];
    let range = close_range(&closes, 5).unwrap();
    assert_eq!(range.low, 95.0);
    assert_eq!(range.high, 99.0);
    assert_close(range.position_of(95.0).unwrap(), 0.0);
    assert_close(range.position_of(99.0).unwrap(), 1.0);
    assert_close(range.volatility(), 4.0 / 95.0);
}

#[test]
fn test_degenerate_range_has_no_position() {
    let range = close_range(&[10.0, 10.0, 10.0], 3).unwrap();
    assert_eq!(range.width(), 0.0);
    assert!(range.position_of(10.0).is_none());
}

#[test]
fn test_empty_window() {
    assert!(close_range(&[], 5).is_none());
    assert!(close_range(&[1.0, 2.0], 0).is_none());
}
