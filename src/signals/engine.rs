//! Main signal analysis entry point.

use crate::config::StrategyConfig;
use crate::models::{AnalysisResult, PriceSeries, SignalCandidate};
use crate::signals::{moving_average, swing};
use chrono::{DateTime, Local, Utc};
use tracing::info;

/// Fewer bars than this and analysis is skipped.
pub const MIN_BARS: usize = 30;

pub struct SignalAnalyzer;

impl SignalAnalyzer {
    /// Analyse a series as of now. `None` means nothing should be persisted.
    pub fn analyze(series: &PriceSeries, config: &StrategyConfig) -> Option<AnalysisResult> {
        Self::analyze_at(series, config, Local::now())
    }

    /// Analyse a series, dating the result on the local calendar day of `as_of`.
    pub fn analyze_at(
        series: &PriceSeries,
        config: &StrategyConfig,
        as_of: DateTime<Local>,
    ) -> Option<AnalysisResult> {
        if series.bar_count() < MIN_BARS {
            info!(
                symbol = %series.symbol(),
                bars = series.bar_count(),
                min = MIN_BARS,
                "SignalAnalyzer: insufficient data for {} ({} < {} bars), skipping",
                series.symbol(),
                series.bar_count(),
                MIN_BARS
            );
            return None;
        }

        let candidates = Self::candidates(series, config);
        let best = select_best(candidates)?;

        Some(AnalysisResult {
            id: None,
            symbol: series.symbol().to_string(),
            analysis_date: as_of.date_naive(),
            strategy: best.strategy,
            signal: best.signal,
            confidence: best.confidence,
            rationale: best.rationale,
            created_at: as_of.with_timezone(&Utc),
        })
    }

    /// Candidates in production order: swing first, moving average second.
    pub fn candidates(series: &PriceSeries, config: &StrategyConfig) -> Vec<SignalCandidate> {
        [swing::evaluate(series, config), moving_average::evaluate(series)]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Highest confidence wins; on a tie the earlier candidate is kept.
pub fn select_best(candidates: Vec<SignalCandidate>) -> Option<SignalCandidate> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(current) if candidate.confidence <= current.confidence => Some(current),
        _ => Some(candidate),
    })
}
