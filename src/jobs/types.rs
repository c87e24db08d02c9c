//! Activity identities and per-run outcomes

use crate::core::calendar;
use chrono::NaiveDateTime;

/// The units of recurring work the orchestrator schedules. `InitialSync` is a
/// one-shot run shortly after start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activity {
    DailyFetch,
    DailyAnalysis,
    NewsRefresh,
    NotificationFlush,
    PriceMonitor,
    InitialSync,
}

impl Activity {
    pub const RECURRING: [Activity; 5] = [
        Activity::DailyFetch,
        Activity::DailyAnalysis,
        Activity::NewsRefresh,
        Activity::NotificationFlush,
        Activity::PriceMonitor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Activity::DailyFetch => "daily_fetch",
            Activity::DailyAnalysis => "daily_analysis",
            Activity::NewsRefresh => "news_refresh",
            Activity::NotificationFlush => "notification_flush",
            Activity::PriceMonitor => "price_monitor",
            Activity::InitialSync => "initial_sync",
        }
    }

    /// Whether a timer fire at `now` should run the body.
    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        match self {
            Activity::DailyFetch | Activity::DailyAnalysis => calendar::is_weekday(now.date()),
            Activity::PriceMonitor => calendar::is_trading_time(now),
            Activity::NewsRefresh | Activity::NotificationFlush | Activity::InitialSync => true,
        }
    }
}

impl std::fmt::Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What one activity run did, for logging and for synchronous CLI triggers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Symbols (or records) handled successfully.
    pub processed: usize,
    /// Symbols skipped without error (e.g. insufficient data).
    pub skipped: usize,
    pub failed: usize,
    /// Notifications created or delivered.
    pub notifications: usize,
}

impl RunSummary {
    pub fn merge(&mut self, other: RunSummary) {
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.notifications += other.notifications;
    }
}
