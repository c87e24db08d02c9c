//! Unit tests for configuration parsing

use std::time::Duration;
use stockwatch::config::{
    parse_time, parse_watchlist, scaled_duration, AppConfig, RetryPolicy, MAX_NEWS_RETENTION_DAYS,
};
use stockwatch::error::ConfigError;
use stockwatch::signals::MIN_BARS;

#[test]
fn test_parse_watchlist() {
    let entries = parse_watchlist("aapl,Apple Inc,nasdaq; MSFT,Microsoft,NASDAQ;broken,entry;");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].symbol, "AAPL");
    assert_eq!(entries[0].name, "Apple Inc");
    assert_eq!(entries[0].exchange, "NASDAQ");
    assert_eq!(entries[1].symbol, "MSFT");
}

#[test]
fn test_parse_time() {
    assert_eq!(
        parse_time("DATA_FETCH_TIME", "16:30").unwrap(),
        chrono::NaiveTime::from_hms_opt(16, 30, 0).unwrap()
    );
    assert!(parse_time("DATA_FETCH_TIME", "25:00").is_err());
    assert!(parse_time("DATA_FETCH_TIME", "soon").is_err());
}

#[test]
fn test_retry_policy_parse() {
    assert_eq!("never".parse::<RetryPolicy>().unwrap(), RetryPolicy::Never);
    assert_eq!("next_flush".parse::<RetryPolicy>().unwrap(), RetryPolicy::NextFlush);
    assert!("sometimes".parse::<RetryPolicy>().is_err());
}

#[test]
fn test_defaults() {
    let config = AppConfig::default();
    assert_eq!(config.strategy.short_term_days, 5);
    assert_eq!(config.strategy.swing_threshold_pct, 5.0);
    assert_eq!(config.schedule.pool_size, 3);
    assert_eq!(config.schedule.shutdown_grace, Duration::from_secs(60));
    assert_eq!(config.provider.call_spacing, Duration::from_secs(1));
    assert_eq!(config.notifier.retry_policy, RetryPolicy::Never);
    assert!(config.notifier.webhook_url.is_none());
    assert!(!config.is_production());
}

fn rejected_key(config: &AppConfig) -> Option<&'static str> {
    match config.validate() {
        Err(ConfigError::InvalidValue { key, .. }) => Some(key),
        Ok(()) => None,
    }
}

#[test]
fn test_defaults_validate() {
    assert!(AppConfig::default().validate().is_ok());
}

#[test]
fn test_lookback_below_minimum_bars_rejected() {
    let mut config = AppConfig::default();
    config.schedule.analysis_lookback_bars = MIN_BARS - 1;
    assert_eq!(rejected_key(&config), Some("ANALYSIS_LOOKBACK_BARS"));

    config.schedule.analysis_lookback_bars = MIN_BARS;
    assert_eq!(rejected_key(&config), None);
}

#[test]
fn test_zero_short_term_days_rejected() {
    let mut config = AppConfig::default();
    config.strategy.short_term_days = 0;
    assert_eq!(rejected_key(&config), Some("STRATEGY_SHORT_TERM_DAYS"));
}

#[test]
fn test_news_retention_bounds() {
    let mut config = AppConfig::default();
    for days in [0, -5, MAX_NEWS_RETENTION_DAYS + 1, i64::MAX] {
        config.schedule.news_retention_days = days;
        assert_eq!(rejected_key(&config), Some("NEWS_RETENTION_DAYS"), "{} days", days);
    }
    for days in [1, MAX_NEWS_RETENTION_DAYS] {
        config.schedule.news_retention_days = days;
        assert_eq!(rejected_key(&config), None);
    }
}

#[test]
fn test_scaled_duration_rejects_overflow() {
    assert_eq!(
        scaled_duration("NEWS_INTERVAL_HOURS", 4, 3600).unwrap(),
        Duration::from_secs(4 * 3600)
    );
    assert!(matches!(
        scaled_duration("NEWS_INTERVAL_HOURS", u64::MAX / 10, 3600),
        Err(ConfigError::InvalidValue { key: "NEWS_INTERVAL_HOURS", .. })
    ));
}

// The only test in this binary that reads the process environment.
#[test]
fn test_from_env_rejects_short_lookback() {
    std::env::set_var("ANALYSIS_LOOKBACK_BARS", "10");
    let result = AppConfig::from_env();
    std::env::remove_var("ANALYSIS_LOOKBACK_BARS");

    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue { key: "ANALYSIS_LOOKBACK_BARS", .. })
    ));
}

#[test]
fn test_production_environment_names() {
    let mut config = AppConfig::default();
    for (environment, production) in [("production", true), ("prod", true), ("sandbox", false), ("", false)] {
        config.environment = environment.to_string();
        assert_eq!(config.is_production(), production, "{}", environment);
    }
}
