//! Signal analysis: two independent strategies and a selection rule.

pub mod engine;
pub mod moving_average;
pub mod swing;

pub use engine::{select_best, SignalAnalyzer, MIN_BARS};
