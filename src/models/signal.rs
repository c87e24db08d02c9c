use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Heuristic that produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategyKind {
    Swing,
    MovingAverage,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Swing => "SWING",
            StrategyKind::MovingAverage => "MOVING_AVERAGE",
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SWING" => Ok(StrategyKind::Swing),
            "MOVING_AVERAGE" => Ok(StrategyKind::MovingAverage),
            other => Err(format!("unknown strategy '{}'", other)),
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
    HoldBullish,
    HoldBearish,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
            Signal::Hold => "HOLD",
            Signal::HoldBullish => "HOLD_BULLISH",
            Signal::HoldBearish => "HOLD_BEARISH",
        }
    }

    /// BUY and SELL trigger an analysis notification.
    pub fn is_actionable(&self) -> bool {
        matches!(self, Signal::Buy | Signal::Sell)
    }
}

impl FromStr for Signal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(Signal::Buy),
            "SELL" => Ok(Signal::Sell),
            "HOLD" => Ok(Signal::Hold),
            "HOLD_BULLISH" => Ok(Signal::HoldBullish),
            "HOLD_BEARISH" => Ok(Signal::HoldBearish),
            other => Err(format!("unknown signal '{}'", other)),
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Output of a single strategy, consumed by the selection rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalCandidate {
    pub strategy: StrategyKind,
    pub signal: Signal,
    /// Heuristic score in [0, 100].
    pub confidence: f64,
    pub rationale: String,
}

impl SignalCandidate {
    pub fn new(strategy: StrategyKind, signal: Signal, confidence: f64, rationale: String) -> Self {
        Self {
            strategy,
            signal,
            confidence,
            rationale,
        }
    }
}

/// The persisted outcome of analysing one symbol on one day.
///
/// Unique per `(symbol, analysis_date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Option<i64>,
    pub symbol: String,
    pub analysis_date: NaiveDate,
    pub strategy: StrategyKind,
    pub signal: Signal,
    pub confidence: f64,
    pub rationale: String,
    pub created_at: DateTime<Utc>,
}
