//! 5/20-day simple moving average crossover strategy.

use crate::indicators::SmaPair;
use crate::models::{PriceSeries, Signal, SignalCandidate, StrategyKind};

pub const SHORT_PERIOD: usize = 5;
pub const LONG_PERIOD: usize = 20;

pub const CROSS_CONFIDENCE: f64 = 85.0;
pub const ALIGNED_CONFIDENCE: f64 = 70.0;
pub const UNCLEAR_CONFIDENCE: f64 = 60.0;

/// Needs the long SMA at the latest and the preceding bar.
pub fn evaluate(series: &PriceSeries) -> Option<SignalCandidate> {
    let closes = series.closes();
    if closes.len() < LONG_PERIOD + 1 {
        return None;
    }

    let last = closes.len() - 1;
    let close = closes[last];
    let current = SmaPair::at(&closes, last, SHORT_PERIOD, LONG_PERIOD)?;
    let previous = SmaPair::at(&closes, last - 1, SHORT_PERIOD, LONG_PERIOD)?;

    let values = format!(
        "close {:.2}, {}-day SMA {:.2}, {}-day SMA {:.2}",
        close, SHORT_PERIOD, current.short, LONG_PERIOD, current.long
    );

    let (signal, confidence, rationale) = if current.crossed_up_from(&previous) {
        (
            Signal::Buy,
            CROSS_CONFIDENCE,
            format!("Golden cross: short SMA crossed above long SMA; {}; consider buying.", values),
        )
    } else if current.crossed_down_from(&previous) {
        (
            Signal::Sell,
            CROSS_CONFIDENCE,
            format!("Death cross: short SMA crossed below long SMA; {}; consider selling.", values),
        )
    } else if close > current.short && current.short > current.long {
        (
            Signal::HoldBullish,
            ALIGNED_CONFIDENCE,
            format!("Bullish alignment (close > short SMA > long SMA); {}; hold long.", values),
        )
    } else if close < current.short && current.short < current.long {
        (
            Signal::HoldBearish,
            ALIGNED_CONFIDENCE,
            format!("Bearish alignment (close < short SMA < long SMA); {}; hold short.", values),
        )
    } else {
        (
            Signal::Hold,
            UNCLEAR_CONFIDENCE,
            format!("No clear moving-average alignment; {}; wait.", values),
        )
    };

    Some(SignalCandidate::new(StrategyKind::MovingAverage, signal, confidence, rationale))
}
