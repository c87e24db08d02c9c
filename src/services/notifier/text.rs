//! Markdown title/body builders for outgoing notifications.

use crate::models::{AnalysisResult, NewsItem, Sentiment, Stock};
use chrono::{DateTime, Local};
use std::fmt::Write;

/// Articles listed in one news notification.
pub const MAX_NEWS_ITEMS: usize = 5;

const FOOTER: &str = "---\n*Generated automatically by stockwatch*";

pub fn analysis_title(stock: &Stock, result: &AnalysisResult) -> String {
    format!(
        "{} - {} signal (confidence: {:.1}%)",
        stock.name, result.signal, result.confidence
    )
}

pub fn analysis_body(stock: &Stock, result: &AnalysisResult) -> String {
    format!(
        "## {} ({}) trading signal\n\n\
         **Signal**: {}\n\n\
         **Strategy**: {}\n\n\
         **Confidence**: {:.1}%\n\n\
         **Analysis date**: {}\n\n\
         **Details**:\n{}\n\n\
         {}",
        stock.name,
        stock.symbol,
        result.signal,
        result.strategy,
        result.confidence,
        result.analysis_date.format("%Y-%m-%d"),
        result.rationale,
        FOOTER
    )
}

pub fn price_alert_title(stock: &Stock, change_pct: f64) -> String {
    let direction = if change_pct > 0.0 { "up" } else { "down" };
    format!("{} - price {} {:.2}%", stock.name, direction, change_pct.abs())
}

pub fn price_alert_body(stock: &Stock, price: f64, change_pct: f64, at: DateTime<Local>) -> String {
    let sign = if change_pct > 0.0 { "+" } else { "" };
    format!(
        "## {} ({}) price movement\n\n\
         **Current price**: {:.2}\n\n\
         **Change**: {}{:.2}%\n\n\
         **Time**: {}\n\n\
         {}",
        stock.name,
        stock.symbol,
        price,
        sign,
        change_pct,
        at.format("%Y-%m-%d %H:%M:%S"),
        FOOTER
    )
}

pub fn news_title(stock: &Stock, count: usize) -> String {
    format!("{} - {} new related articles", stock.name, count)
}

/// Lists at most [`MAX_NEWS_ITEMS`] articles. Empty input gives an empty body.
pub fn news_body(stock: &Stock, items: &[NewsItem]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut body = format!("## {} ({}) related news\n\n", stock.name, stock.symbol);
    for item in items.iter().take(MAX_NEWS_ITEMS) {
        let _ = write!(
            body,
            "### {}\n**Source**: {} | **Published**: {} | **Sentiment**: {}\n\n{}\n\n[Read more]({})\n\n",
            item.title,
            item.source,
            item.published_at.format("%Y-%m-%d %H:%M"),
            sentiment_label(item.sentiment),
            item.summary,
            item.url
        );
    }
    body.push_str(FOOTER);
    body
}

fn sentiment_label(sentiment: Option<Sentiment>) -> &'static str {
    match sentiment {
        Some(Sentiment::Positive) => "positive",
        Some(Sentiment::Negative) => "negative",
        Some(Sentiment::Neutral) => "neutral",
        None => "unknown",
    }
}
