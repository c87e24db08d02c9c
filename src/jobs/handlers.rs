//! Activity bodies.
//!
//! Each body walks the watch-list in order, one symbol at a time, and contains
//! every per-symbol failure. None of them check calendar gates; the
//! orchestrator does that before calling in, and CLI triggers bypass them.

use crate::core::pacing::Pacer;
use crate::error::ActivityError;
use crate::jobs::context::JobContext;
use crate::jobs::types::{Activity, RunSummary};
use crate::models::{AnalysisResult, NewsItem, PriceSeries, Sentiment, Stock};
use crate::signals::SignalAnalyzer;
use chrono::{DateTime, Duration as ChronoDuration, Local, Utc};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

async fn watchlist(ctx: &JobContext, component: &str) -> Option<Vec<Stock>> {
    match ctx.prices.list_stocks().await {
        Ok(stocks) => Some(stocks),
        Err(e) => {
            error!(error = %e, "{}: failed to load watch-list", component);
            None
        }
    }
}

/// Fetch and persist daily bars for every symbol.
pub async fn run_daily_fetch(ctx: &JobContext) -> RunSummary {
    let mut summary = RunSummary::default();
    let Some(stocks) = watchlist(ctx, "DailyFetch").await else {
        return summary;
    };
    info!(symbols = stocks.len(), "DailyFetch: starting for {} symbols", stocks.len());

    let mut pacer = Pacer::new(ctx.config.provider.call_spacing);
    for stock in &stocks {
        pacer.wait().await;
        match fetch_and_store_bars(ctx, &stock.symbol).await {
            Ok(count) => {
                summary.processed += 1;
                info!(symbol = %stock.symbol, bars = count, "DailyFetch: stored {} bars for {}", count, stock.symbol);
            }
            Err(e) => {
                summary.failed += 1;
                error!(symbol = %stock.symbol, error = %e, "DailyFetch: failed for {}", stock.symbol);
            }
        }
    }

    info!(
        processed = summary.processed,
        failed = summary.failed,
        "DailyFetch: completed"
    );
    summary
}

async fn fetch_and_store_bars(ctx: &JobContext, symbol: &str) -> Result<usize, ActivityError> {
    let bars = ctx.provider.fetch_daily_bars(symbol).await?;
    for bar in &bars {
        ctx.prices.upsert_price_bar(symbol, bar).await?;
    }
    Ok(bars.len())
}

/// Analyse every symbol, persist results and queue notifications for BUY/SELL.
pub async fn run_daily_analysis(ctx: &JobContext) -> RunSummary {
    let mut summary = RunSummary::default();
    let Some(stocks) = watchlist(ctx, "DailyAnalysis").await else {
        return summary;
    };
    info!(symbols = stocks.len(), "DailyAnalysis: starting for {} symbols", stocks.len());

    let as_of = Local::now();
    for stock in &stocks {
        match analyze_symbol(ctx, stock, as_of).await {
            Ok(Some((result, notified))) => {
                summary.processed += 1;
                if notified {
                    summary.notifications += 1;
                }
                info!(
                    symbol = %stock.symbol,
                    signal = %result.signal,
                    confidence = result.confidence,
                    strategy = %result.strategy,
                    "DailyAnalysis: {} -> {} ({:.1}%)",
                    stock.symbol,
                    result.signal,
                    result.confidence
                );
            }
            Ok(None) => summary.skipped += 1,
            Err(e) => {
                summary.failed += 1;
                error!(symbol = %stock.symbol, error = %e, "DailyAnalysis: failed for {}", stock.symbol);
            }
        }
    }

    info!(
        processed = summary.processed,
        skipped = summary.skipped,
        failed = summary.failed,
        notifications = summary.notifications,
        "DailyAnalysis: completed"
    );
    summary
}

async fn analyze_symbol(
    ctx: &JobContext,
    stock: &Stock,
    as_of: DateTime<Local>,
) -> Result<Option<(AnalysisResult, bool)>, ActivityError> {
    let bars = ctx
        .prices
        .recent_bars(&stock.symbol, ctx.config.schedule.analysis_lookback_bars)
        .await?;
    let series = PriceSeries::new(stock.symbol.clone(), bars)?;

    let Some(result) = SignalAnalyzer::analyze_at(&series, &ctx.config.strategy, as_of) else {
        return Ok(None);
    };
    let stored = ctx.analyses.upsert_analysis(&result).await?;

    let notified = if stored.signal.is_actionable() {
        ctx.notifier.create_analysis_notification(stock, &stored).await?;
        true
    } else {
        false
    };
    Ok(Some((stored, notified)))
}

/// Fetch news, tag untagged items, notify on new notable items and purge old
/// articles.
pub async fn run_news_refresh(ctx: &JobContext) -> RunSummary {
    let mut summary = RunSummary::default();
    let Some(stocks) = watchlist(ctx, "NewsRefresh").await else {
        return summary;
    };
    info!(symbols = stocks.len(), "NewsRefresh: starting for {} symbols", stocks.len());

    let mut fresh: Vec<(&Stock, Vec<NewsItem>)> = Vec::with_capacity(stocks.len());
    let mut pacer = Pacer::new(ctx.config.provider.call_spacing);
    for stock in &stocks {
        pacer.wait().await;
        match fetch_and_store_news(ctx, &stock.symbol).await {
            Ok(items) => {
                summary.processed += 1;
                debug!(symbol = %stock.symbol, new = items.len(), "NewsRefresh: {} new items for {}", items.len(), stock.symbol);
                fresh.push((stock, items));
            }
            Err(e) => {
                summary.failed += 1;
                error!(symbol = %stock.symbol, error = %e, "NewsRefresh: failed for {}", stock.symbol);
            }
        }
    }

    let tags = tag_untagged_news(ctx).await;

    for (stock, items) in fresh {
        let notable: Vec<NewsItem> = items
            .into_iter()
            .filter_map(|mut item| {
                if item.sentiment.is_none() {
                    item.sentiment = item.id.and_then(|id| tags.get(&id).copied());
                }
                item.sentiment.filter(Sentiment::is_notable).map(|_| item)
            })
            .collect();
        if notable.is_empty() {
            continue;
        }
        match ctx.notifier.create_news_notification(stock, &notable).await {
            Ok(Some(_)) => summary.notifications += 1,
            Ok(None) => {}
            Err(e) => {
                error!(symbol = %stock.symbol, error = %e, "NewsRefresh: failed to queue notification for {}", stock.symbol);
            }
        }
    }

    // `published_at` is UTC wall-clock time.
    let retention = ChronoDuration::days(ctx.config.schedule.news_retention_days);
    let cutoff = Utc::now().naive_utc() - retention;
    match ctx.news.purge_news_before(cutoff).await {
        Ok(0) => {}
        Ok(purged) => info!(purged, "NewsRefresh: purged {} old articles", purged),
        Err(e) => error!(error = %e, "NewsRefresh: failed to purge old articles"),
    }

    info!(
        processed = summary.processed,
        failed = summary.failed,
        notifications = summary.notifications,
        "NewsRefresh: completed"
    );
    summary
}

/// Stored items that were not already known, provider sentiment preserved.
async fn fetch_and_store_news(ctx: &JobContext, symbol: &str) -> Result<Vec<NewsItem>, ActivityError> {
    let items = ctx.provider.fetch_news(symbol).await?;
    let mut stored = Vec::new();
    for item in &items {
        if let Some(new_item) = ctx.news.insert_news(item).await? {
            stored.push(new_item);
        }
    }
    Ok(stored)
}

/// Tag every untagged article with the keyword tagger. Returns the tags set,
/// keyed by article id.
async fn tag_untagged_news(ctx: &JobContext) -> HashMap<i64, Sentiment> {
    let mut tags = HashMap::new();
    let untagged = match ctx.news.untagged_news().await {
        Ok(items) => items,
        Err(e) => {
            error!(error = %e, "NewsRefresh: failed to load untagged articles");
            return tags;
        }
    };

    for item in untagged {
        let Some(id) = item.id else {
            continue;
        };
        let sentiment = ctx.tagger.classify(&item.title, &item.summary);
        match ctx.news.set_sentiment(id, sentiment).await {
            Ok(()) => {
                tags.insert(id, sentiment);
            }
            Err(e) => warn!(id, error = %e, "NewsRefresh: failed to store sentiment"),
        }
    }
    debug!(tagged = tags.len(), "NewsRefresh: tagged {} articles", tags.len());
    tags
}

/// Deliver every due notification.
pub async fn run_notification_flush(ctx: &JobContext) -> RunSummary {
    match ctx.notifier.flush_pending().await {
        Ok(flush) => {
            info!(sent = flush.sent, failed = flush.failed, "NotificationFlush: completed");
            RunSummary {
                processed: flush.sent + flush.failed,
                failed: flush.failed,
                notifications: flush.sent,
                ..RunSummary::default()
            }
        }
        Err(e) => {
            error!(error = %e, "NotificationFlush: failed");
            RunSummary {
                failed: 1,
                ..RunSummary::default()
            }
        }
    }
}

/// Queue a price alert for every symbol whose latest close moved at least the
/// configured threshold from the previous close.
pub async fn run_price_monitor(ctx: &JobContext) -> RunSummary {
    let mut summary = RunSummary::default();
    let Some(stocks) = watchlist(ctx, "PriceMonitor").await else {
        return summary;
    };
    let threshold = ctx.config.schedule.price_alert_threshold_pct;
    debug!(symbols = stocks.len(), threshold, "PriceMonitor: starting");

    let mut pacer = Pacer::new(ctx.config.provider.call_spacing);
    for stock in &stocks {
        pacer.wait().await;
        match check_price(ctx, stock, threshold).await {
            Ok(Some(change_pct)) => {
                summary.processed += 1;
                summary.notifications += 1;
                info!(
                    symbol = %stock.symbol,
                    change_pct,
                    "PriceMonitor: {} moved {:.2}%",
                    stock.symbol,
                    change_pct
                );
            }
            Ok(None) => summary.processed += 1,
            Err(e) => {
                summary.failed += 1;
                error!(symbol = %stock.symbol, error = %e, "PriceMonitor: failed for {}", stock.symbol);
            }
        }
    }

    debug!(
        processed = summary.processed,
        alerts = summary.notifications,
        "PriceMonitor: completed"
    );
    summary
}

/// Percent change from previous to latest close, `None` when it cannot be
/// computed (missing data or a non-positive previous close).
pub fn change_pct(latest: f64, previous: f64) -> Option<f64> {
    if previous > 0.0 {
        Some((latest - previous) / previous * 100.0)
    } else {
        None
    }
}

/// Alerts fire at the threshold itself.
pub fn exceeds_threshold(change_pct: f64, threshold_pct: f64) -> bool {
    change_pct.abs() >= threshold_pct
}

async fn check_price(ctx: &JobContext, stock: &Stock, threshold: f64) -> Result<Option<f64>, ActivityError> {
    let (Some(latest), Some(previous)) = (
        ctx.prices.latest_close(&stock.symbol).await?,
        ctx.prices.previous_close(&stock.symbol).await?,
    ) else {
        return Ok(None);
    };
    let Some(change) = change_pct(latest, previous) else {
        return Ok(None);
    };
    if !exceeds_threshold(change, threshold) {
        return Ok(None);
    }

    ctx.notifier
        .create_price_alert_notification(stock, latest, change)
        .await?;
    Ok(Some(change))
}

/// Startup catch-up: fetch prices, refresh news, then analyse.
pub async fn run_initial_sync(ctx: &JobContext) -> RunSummary {
    info!("InitialSync: starting");
    let mut summary = run_daily_fetch(ctx).await;
    summary.merge(run_news_refresh(ctx).await);
    summary.merge(run_daily_analysis(ctx).await);
    info!(
        processed = summary.processed,
        failed = summary.failed,
        "InitialSync: completed"
    );
    summary
}

/// Run one activity body to completion.
pub async fn run_activity(activity: Activity, ctx: &JobContext) -> RunSummary {
    match activity {
        Activity::DailyFetch => run_daily_fetch(ctx).await,
        Activity::DailyAnalysis => run_daily_analysis(ctx).await,
        Activity::NewsRefresh => run_news_refresh(ctx).await,
        Activity::NotificationFlush => run_notification_flush(ctx).await,
        Activity::PriceMonitor => run_price_monitor(ctx).await,
        Activity::InitialSync => run_initial_sync(ctx).await,
    }
}
