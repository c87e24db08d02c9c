//! Minimum spacing between consecutive calls inside one activity run.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Enforces a minimum gap between the starts of consecutive calls. The first
/// call goes through immediately.
#[derive(Debug)]
pub struct Pacer {
    spacing: Duration,
    last: Option<Instant>,
}

impl Pacer {
    pub fn new(spacing: Duration) -> Self {
        Self { spacing, last: None }
    }

    pub fn spacing(&self) -> Duration {
        self.spacing
    }

    /// Wait until `spacing` has elapsed since the previous `wait` returned.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last {
            sleep_until(last + self.spacing).await;
        }
        self.last = Some(Instant::now());
    }
}
