//! Recurring activities and the context they run against

pub mod context;
pub mod handlers;
pub mod types;

pub use context::JobContext;
pub use types::{Activity, RunSummary};
