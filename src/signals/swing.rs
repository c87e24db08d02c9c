//! Swing-positional strategy.
//!
//! Places the latest close inside the range of the last `short_term_days`
//! closes. Near the bottom of the range is a BUY, near the top a SELL. A range
//! narrower than `swing_threshold_pct` of its low overrides either into HOLD.

use crate::config::StrategyConfig;
use crate::indicators::close_range;
use crate::models::{PriceSeries, Signal, SignalCandidate, StrategyKind};
use tracing::debug;

pub const LOWER_BAND: f64 = 0.2;
pub const UPPER_BAND: f64 = 0.8;
pub const MAX_CONFIDENCE: f64 = 95.0;
pub const BASE_CONFIDENCE: f64 = 80.0;
pub const NEUTRAL_CONFIDENCE: f64 = 50.0;
pub const NARROW_RANGE_CONFIDENCE: f64 = 60.0;

/// Confidence for a BUY/SELL tier, growing with the distance past the band
/// and capped at [`MAX_CONFIDENCE`].
pub fn tier_confidence(distance_past_band: f64) -> f64 {
    (BASE_CONFIDENCE + distance_past_band * 100.0).min(MAX_CONFIDENCE)
}

pub fn evaluate(series: &PriceSeries, config: &StrategyConfig) -> Option<SignalCandidate> {
    let days = config.short_term_days;
    let latest = series.latest_close()?;
    let range = close_range(&series.last_closes(days), days)?;

    let Some(position) = range.position_of(latest) else {
        debug!(
            symbol = %series.symbol(),
            close = latest,
            "Swing: degenerate {}-day range for {} (high == low), no candidate",
            days,
            series.symbol()
        );
        return None;
    };

    let (mut signal, mut confidence, mut rationale) = if position < LOWER_BAND {
        (
            Signal::Buy,
            tier_confidence(LOWER_BAND - position),
            format!(
                "Price is near the {}-day low {:.2} (range {:.2}-{:.2}), current close {:.2}; consider buying.",
                days, range.low, range.low, range.high, latest
            ),
        )
    } else if position > UPPER_BAND {
        (
            Signal::Sell,
            tier_confidence(position - UPPER_BAND),
            format!(
                "Price is near the {}-day high {:.2} (range {:.2}-{:.2}), current close {:.2}; consider selling.",
                days, range.high, range.low, range.high, latest
            ),
        )
    } else {
        (
            Signal::Hold,
            NEUTRAL_CONFIDENCE,
            format!(
                "Price sits mid-range of the {}-day range [{:.2}, {:.2}], current close {:.2}; wait.",
                days, range.low, range.high, latest
            ),
        )
    };

    let volatility = range.volatility();
    if volatility < config.swing_threshold_pct / 100.0 {
        signal = Signal::Hold;
        confidence = NARROW_RANGE_CONFIDENCE;
        rationale = format!(
            "Narrow {}-day range [{:.2}, {:.2}] moved only {:.2}% (threshold {:.2}%), current close {:.2}; wait.",
            days,
            range.low,
            range.high,
            volatility * 100.0,
            config.swing_threshold_pct,
            latest
        );
    }

    Some(SignalCandidate::new(StrategyKind::Swing, signal, confidence, rationale))
}
