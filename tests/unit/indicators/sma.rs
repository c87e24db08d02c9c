//! Unit tests for SMA helpers

use crate::fixtures::assert_close;
use stockwatch::indicators::{sma, sma_at, SmaPair};

#[test]
fn test_sma_of_last_window() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_close(sma(&values, 5).unwrap(), 3.0);
    assert_close(sma(&values, 2).unwrap(), 4.5);
}

#[test]
fn test_sma_at_index() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_close(sma_at(&values, 2, 3).unwrap(), 2.0);
    assert!(sma_at(&values, 1, 3).is_none());
    assert!(sma_at(&values, 5, 1).is_none());
    assert!(sma_at(&values, 4, 0).is_none());
}

#[test]
fn test_sma_empty() {
    assert!(sma(&[], 3).is_none());
}

#[test]
fn test_cross_detection() {
    let below = SmaPair { short: 9.0, long: 10.0 };
    let equal = SmaPair { short: 10.0, long: 10.0 };
    let above = SmaPair { short: 11.0, long: 10.0 };

    assert!(above.crossed_up_from(&below));
    assert!(above.crossed_up_from(&equal));
    assert!(!above.crossed_up_from(&above));
    assert!(below.crossed_down_from(&above));
    assert!(below.crossed_down_from(&equal));
    assert!(!equal.crossed_down_from(&above));
}
