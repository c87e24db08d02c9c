//! Tracing setup for the `worker` and `cli` binaries.
//!
//! `APP_ENV=production` (or `prod`) emits one JSON object per event, the other
//! environments (`sandbox` by default) a coloured line with file and line.
//! Events go to stderr so `cli results` and `cli notifications` keep stdout
//! for their tables.

use crate::config::AppConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. `RUST_LOG` overrides the `info` default,
/// e.g. `RUST_LOG=stockwatch=debug` to see gated fires and pacing.
pub fn init_logging(config: &AppConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let events = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.is_production() {
        registry.with(events.json()).init();
    } else {
        registry.with(events.with_ansi(true)).init();
    }
}
