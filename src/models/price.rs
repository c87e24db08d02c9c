use crate::error::SeriesError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: i64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Immutable, date-ordered bar history for one symbol.
///
/// Dates are unique and ascending; every close is finite and positive.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series from bars in any order. For a repeated date the bar
    /// that appears last in the input wins.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        for bar in &bars {
            if !bar.close.is_finite() {
                return Err(SeriesError::MalformedBar {
                    date: bar.date,
                    reason: "close is not a finite number",
                });
            }
            if bar.close <= 0.0 {
                return Err(SeriesError::MalformedBar {
                    date: bar.date,
                    reason: "close is not positive",
                });
            }
        }

        // Stable sort keeps input order within a date; dedup keeps the last.
        bars.sort_by_key(|b| b.date);
        let mut unique: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match unique.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => unique.push(bar),
            }
        }

        Ok(Self {
            symbol: symbol.into(),
            bars: unique,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Closes of the most recent `n` bars, oldest first.
    pub fn last_closes(&self, n: usize) -> Vec<f64> {
        let start = self.bars.len().saturating_sub(n);
        self.bars[start..].iter().map(|b| b.close).collect()
    }

    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }
}
