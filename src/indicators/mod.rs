//! Technical indicators computed over close prices.

pub mod trend;
pub mod volatility;

pub use trend::{sma, sma_at, SmaPair};
pub use volatility::{close_range, CloseRange};
