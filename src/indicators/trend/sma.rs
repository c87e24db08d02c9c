//! SMA (Simple Moving Average) indicator

/// Mean of the last `period` values.
pub fn sma(values: &[f64], period: usize) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    sma_at(values, values.len() - 1, period)
}

/// Mean of the `period` values ending at `index` (inclusive).
pub fn sma_at(values: &[f64], index: usize, period: usize) -> Option<f64> {
    if period == 0 || index >= values.len() || index + 1 < period {
        return None;
    }
    let window = &values[index + 1 - period..=index];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Short and long SMA sampled at one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmaPair {
    pub short: f64,
    pub long: f64,
}

impl SmaPair {
    /// Sample both averages at `index`.
    pub fn at(values: &[f64], index: usize, short_period: usize, long_period: usize) -> Option<Self> {
        Some(Self {
            short: sma_at(values, index, short_period)?,
            long: sma_at(values, index, long_period)?,
        })
    }

    /// Short average moved from at-or-below to strictly above the long one.
    pub fn crossed_up_from(&self, previous: &SmaPair) -> bool {
        previous.short <= previous.long && self.short > self.long
    }

    /// Short average moved from at-or-above to strictly below the long one.
    pub fn crossed_down_from(&self, previous: &SmaPair) -> bool {
        previous.short >= previous.long && self.short < self.long
    }
}
