//! Orchestration primitives: calendar gates, pacing, the timer orchestrator and
//! process bootstrap.

pub mod bootstrap;
pub mod calendar;
pub mod pacing;
pub mod scheduler;

pub use bootstrap::{build_services, Services};
pub use pacing::Pacer;
pub use scheduler::{JobOrchestrator, OrchestratorState, Trigger};
