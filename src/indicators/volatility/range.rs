//! Trailing close-price range

/// Lowest and highest close over a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloseRange {
    pub low: f64,
    pub high: f64,
}

impl CloseRange {
    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    /// Position of `price` inside the range, 0 at the low and 1 at the high.
    /// `None` when the range is degenerate.
    pub fn position_of(&self, price: f64) -> Option<f64> {
        let width = self.width();
        if width == 0.0 {
            return None;
        }
        Some((price - self.low) / width)
    }

    /// Range width relative to the low.
    pub fn volatility(&self) -> f64 {
        self.width() / self.low
    }
}

/// Range of the last `days` closes.
pub fn close_range(closes: &[f64], days: usize) -> Option<CloseRange> {
    let start = closes.len().saturating_sub(days);
    let window = &closes[start..];
    if window.is_empty() {
        return None;
    }

    let (low, high) = window
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &c| (lo.min(c), hi.max(c)));

    Some(CloseRange { low, high })
}
