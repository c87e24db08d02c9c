//! Volatility indicators

pub mod range;

pub use range::*;
