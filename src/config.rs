//! Application configuration.
//!
//! Built once at process start from environment variables (after `.env` is
//! loaded) and passed by `Arc` into every component.

use crate::error::ConfigError;
use crate::signals::MIN_BARS;
use chrono::NaiveTime;
use std::env;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_PROVIDER_URL: &str = "https://www.alphavantage.co/query";

/// Ten years.
pub const MAX_NEWS_RETENTION_DAYS: i64 = 3650;

/// Get the current environment name (`APP_ENV`), defaulting to `sandbox`.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// A watch-list entry as configured (`SYMBOL,Name,EXCHANGE`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistEntry {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
}

/// Parse `SYMBOL,Name,EXCHANGE;SYMBOL,Name,EXCHANGE`. Entries with fewer than
/// three fields are ignored.
pub fn parse_watchlist(raw: &str) -> Vec<WatchlistEntry> {
    raw.split(';')
        .filter_map(|entry| {
            let parts: Vec<&str> = entry.split(',').map(|p| p.trim()).collect();
            if parts.len() < 3 || parts[0].is_empty() {
                return None;
            }
            Some(WatchlistEntry {
                symbol: parts[0].to_uppercase(),
                name: parts[1].to_string(),
                exchange: parts[2].to_uppercase(),
            })
        })
        .collect()
}

/// Parameters of the swing-positional strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub short_term_days: usize,
    pub swing_threshold_pct: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            short_term_days: 5,
            swing_threshold_pct: 5.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: Url,
    pub api_key: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Minimum spacing between consecutive provider calls inside one activity.
    pub call_spacing: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_PROVIDER_URL).expect("default provider URL is valid"),
            api_key: "demo".to_string(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(10),
            call_spacing: Duration::from_secs(1),
        }
    }
}

/// What a flush does with notifications whose last delivery failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// FAILED records stay FAILED.
    #[default]
    Never,
    /// FAILED records are attempted again on the next flush.
    NextFlush,
}

impl FromStr for RetryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "never" => Ok(RetryPolicy::Never),
            "next_flush" | "next-flush" => Ok(RetryPolicy::NextFlush),
            other => Err(format!("unknown retry policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub webhook_url: Option<Url>,
    /// Value of the response's `code` field that marks a delivery as sent.
    pub success_code: i64,
    pub send_spacing: Duration,
    pub retry_policy: RetryPolicy,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            success_code: 0,
            send_spacing: Duration::from_secs(1),
            retry_policy: RetryPolicy::Never,
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(10),
        }
    }
}

/// Timing of the recurring activities.
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    pub fetch_time: NaiveTime,
    pub analysis_time: NaiveTime,
    pub news_interval: Duration,
    pub news_initial_delay: Duration,
    pub notification_interval: Duration,
    pub notification_initial_delay: Duration,
    pub price_monitor_interval: Duration,
    pub price_monitor_initial_delay: Duration,
    pub price_alert_threshold_pct: f64,
    pub pool_size: usize,
    pub shutdown_grace: Duration,
    pub initial_sync: bool,
    pub initial_sync_delay: Duration,
    pub news_retention_days: i64,
    pub analysis_lookback_bars: usize,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            fetch_time: NaiveTime::from_hms_opt(16, 0, 0).expect("valid time"),
            analysis_time: NaiveTime::from_hms_opt(16, 30, 0).expect("valid time"),
            news_interval: Duration::from_secs(4 * 3600),
            news_initial_delay: Duration::from_secs(10 * 60),
            notification_interval: Duration::from_secs(15 * 60),
            notification_initial_delay: Duration::from_secs(60),
            price_monitor_interval: Duration::from_secs(10 * 60),
            price_monitor_initial_delay: Duration::from_secs(2 * 60),
            price_alert_threshold_pct: 5.0,
            pool_size: 3,
            shutdown_grace: Duration::from_secs(60),
            initial_sync: true,
            initial_sync_delay: Duration::from_secs(5),
            news_retention_days: 30,
            analysis_lookback_bars: 100,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub environment: String,
    pub database_url: Option<String>,
    pub watchlist: Vec<WatchlistEntry>,
    pub provider: ProviderConfig,
    pub notifier: NotifierConfig,
    pub strategy: StrategyConfig,
    pub schedule: ScheduleConfig,
}

impl AppConfig {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider_defaults = ProviderConfig::default();
        let notifier_defaults = NotifierConfig::default();
        let strategy_defaults = StrategyConfig::default();
        let schedule_defaults = ScheduleConfig::default();

        let base_url = match env::var("ALPHAVANTAGE_BASE_URL") {
            Ok(raw) => parse_url("ALPHAVANTAGE_BASE_URL", &raw)?,
            Err(_) => provider_defaults.base_url.clone(),
        };
        let webhook_url = match env::var("WEBHOOK_URL") {
            Ok(raw) if !raw.trim().is_empty() => Some(parse_url("WEBHOOK_URL", &raw)?),
            _ => None,
        };

        let provider = ProviderConfig {
            base_url,
            api_key: env::var("ALPHAVANTAGE_API_KEY").unwrap_or(provider_defaults.api_key),
            connect_timeout: Duration::from_secs(env_parse(
                "PROVIDER_CONNECT_TIMEOUT_SECS",
                provider_defaults.connect_timeout.as_secs(),
            )?),
            read_timeout: Duration::from_secs(env_parse(
                "PROVIDER_READ_TIMEOUT_SECS",
                provider_defaults.read_timeout.as_secs(),
            )?),
            call_spacing: Duration::from_millis(env_parse(
                "PROVIDER_CALL_SPACING_MS",
                provider_defaults.call_spacing.as_millis() as u64,
            )?),
        };

        let notifier = NotifierConfig {
            webhook_url,
            success_code: env_parse("WEBHOOK_SUCCESS_CODE", notifier_defaults.success_code)?,
            send_spacing: Duration::from_millis(env_parse(
                "NOTIFICATION_SEND_SPACING_MS",
                notifier_defaults.send_spacing.as_millis() as u64,
            )?),
            retry_policy: env_parse("NOTIFICATION_RETRY_POLICY", notifier_defaults.retry_policy)?,
            ..notifier_defaults
        };

        let strategy = StrategyConfig {
            short_term_days: env_parse("STRATEGY_SHORT_TERM_DAYS", strategy_defaults.short_term_days)?,
            swing_threshold_pct: env_parse(
                "STRATEGY_SWING_THRESHOLD_PCT",
                strategy_defaults.swing_threshold_pct,
            )?,
        };

        let schedule = ScheduleConfig {
            fetch_time: env_time("DATA_FETCH_TIME", schedule_defaults.fetch_time)?,
            analysis_time: env_time("ANALYSIS_TIME", schedule_defaults.analysis_time)?,
            news_interval: scaled_duration(
                "NEWS_INTERVAL_HOURS",
                env_parse("NEWS_INTERVAL_HOURS", 4)?,
                3600,
            )?,
            notification_interval: scaled_duration(
                "NOTIFICATION_INTERVAL_MINUTES",
                env_parse("NOTIFICATION_INTERVAL_MINUTES", 15)?,
                60,
            )?,
            price_monitor_interval: scaled_duration(
                "PRICE_MONITOR_INTERVAL_MINUTES",
                env_parse("PRICE_MONITOR_INTERVAL_MINUTES", 10)?,
                60,
            )?,
            price_alert_threshold_pct: env_parse(
                "PRICE_ALERT_THRESHOLD_PCT",
                schedule_defaults.price_alert_threshold_pct,
            )?,
            pool_size: env_parse("WORKER_POOL_SIZE", schedule_defaults.pool_size)?,
            shutdown_grace: Duration::from_secs(env_parse(
                "SHUTDOWN_GRACE_SECS",
                schedule_defaults.shutdown_grace.as_secs(),
            )?),
            initial_sync: env_parse("INITIAL_SYNC", schedule_defaults.initial_sync)?,
            news_retention_days: env_parse(
                "NEWS_RETENTION_DAYS",
                schedule_defaults.news_retention_days,
            )?,
            analysis_lookback_bars: env_parse(
                "ANALYSIS_LOOKBACK_BARS",
                schedule_defaults.analysis_lookback_bars,
            )?,
            ..schedule_defaults
        };

        let config = Self {
            environment: get_environment(),
            database_url: env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()),
            watchlist: env::var("WATCHLIST")
                .map(|raw| parse_watchlist(&raw))
                .unwrap_or_default(),
            provider,
            notifier,
            strategy,
            schedule,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would silently disable an activity or overflow
    /// date arithmetic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategy.short_term_days == 0 {
            return Err(out_of_range(
                "STRATEGY_SHORT_TERM_DAYS",
                self.strategy.short_term_days,
                "must be at least 1".to_string(),
            ));
        }
        if self.schedule.analysis_lookback_bars < MIN_BARS {
            return Err(out_of_range(
                "ANALYSIS_LOOKBACK_BARS",
                self.schedule.analysis_lookback_bars,
                format!("must be at least {} bars", MIN_BARS),
            ));
        }
        if !(1..=MAX_NEWS_RETENTION_DAYS).contains(&self.schedule.news_retention_days) {
            return Err(out_of_range(
                "NEWS_RETENTION_DAYS",
                self.schedule.news_retention_days,
                format!("must be between 1 and {}", MAX_NEWS_RETENTION_DAYS),
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

fn env_parse<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// `units * unit_secs` seconds, rejecting overflow.
pub fn scaled_duration(key: &'static str, units: u64, unit_secs: u64) -> Result<Duration, ConfigError> {
    units
        .checked_mul(unit_secs)
        .map(Duration::from_secs)
        .ok_or_else(|| out_of_range(key, units, "interval is too large".to_string()))
}

fn out_of_range(key: &'static str, value: impl std::fmt::Display, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
        reason,
    }
}

fn env_time(key: &'static str, default: NaiveTime) -> Result<NaiveTime, ConfigError> {
    match env::var(key) {
        Ok(raw) => parse_time(key, &raw),
        Err(_) => Ok(default),
    }
}

/// Parse a local wall-clock time in `HH:MM` form.
pub fn parse_time(key: &'static str, raw: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").map_err(|e| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_url(key: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
