//! Shared data models spanning the engine layers.

pub mod news;
pub mod notification;
pub mod price;
pub mod signal;
pub mod stock;

pub use news::{NewsItem, Sentiment};
pub use notification::{Notification, NotificationKind, NotificationStatus};
pub use price::{PriceBar, PriceSeries};
pub use signal::{AnalysisResult, Signal, SignalCandidate, StrategyKind};
pub use stock::Stock;
