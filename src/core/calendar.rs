//! Weekday and trading-hours gates, and next-fire computation for the daily
//! activities. All times are local wall-clock times.

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use std::time::Duration;

/// Morning and afternoon sessions, each `[open, close)`.
const TRADING_SESSIONS: [((u32, u32), (u32, u32)); 2] = [((9, 30), (11, 30)), ((13, 0), (15, 0))];

pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_within_trading_hours(time: NaiveTime) -> bool {
    TRADING_SESSIONS.iter().any(|&((oh, om), (ch, cm))| {
        match (NaiveTime::from_hms_opt(oh, om, 0), NaiveTime::from_hms_opt(ch, cm, 0)) {
            (Some(open), Some(close)) => time >= open && time < close,
            _ => false,
        }
    })
}

pub fn is_trading_time(now: NaiveDateTime) -> bool {
    is_weekday(now.date()) && is_within_trading_hours(now.time())
}

/// Delay until the next occurrence of `target`: today if `now` is strictly
/// before it, tomorrow otherwise.
pub fn initial_delay(now: NaiveDateTime, target: NaiveTime) -> Duration {
    let today = now.date().and_time(target);
    let next = if now < today {
        today
    } else {
        today + ChronoDuration::days(1)
    };
    (next - now).to_std().unwrap_or_default()
}
