//! Keyword-based news sentiment tagging.

use crate::models::Sentiment;

const POSITIVE_WORDS: &[&str] = &[
    "上涨", "增长", "盈利", "利润", "收益", "突破", "创新高", "超预期", "强劲", "看好", "乐观", "提升",
    "扩张", "成功", "领先", "优势", "rise", "gain", "profit", "growth", "increase", "up", "high",
    "exceed", "strong", "positive", "optimistic", "success", "advantage", "lead",
];

const NEGATIVE_WORDS: &[&str] = &[
    "下跌", "亏损", "跌破", "低于", "失败", "风险", "担忧", "问题", "困难", "挑战", "降低", "减少",
    "裁员", "危机", "调查", "处罚", "fall", "drop", "loss", "decline", "decrease", "down", "low",
    "below", "fail", "risk", "concern", "problem", "difficult", "challenge", "reduce", "cut",
];

/// Classifies articles by counting distinct positive and negative keywords
/// found in the lower-cased title and summary. Matching is by substring, so
/// "rising" counts for "rise" and "upgrade" for "up".
#[derive(Debug, Clone)]
pub struct SentimentTagger {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl Default for SentimentTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentTagger {
    pub fn new() -> Self {
        Self::with_words(POSITIVE_WORDS, NEGATIVE_WORDS)
    }

    pub fn with_words(positive: &[&str], negative: &[&str]) -> Self {
        Self {
            positive: positive.iter().map(|w| w.to_lowercase()).collect(),
            negative: negative.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn classify(&self, title: &str, summary: &str) -> Sentiment {
        let text = format!("{} {}", title, summary).to_lowercase();

        let positive = self.positive.iter().filter(|w| text.contains(w.as_str())).count();
        let negative = self.negative.iter().filter(|w| text.contains(w.as_str())).count();

        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}
