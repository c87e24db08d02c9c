//! Unit tests for keyword sentiment tagging

use stockwatch::models::Sentiment;
use stockwatch::services::sentiment::SentimentTagger;

#[test]
fn test_positive_english() {
    let tagger = SentimentTagger::new();
    assert_eq!(
        tagger.classify("Company reports record profit", "Revenue growth beat estimates"),
        Sentiment::Positive
    );
}

#[test]
fn test_negative_english() {
    let tagger = SentimentTagger::new();
    assert_eq!(
        tagger.classify("Shares fall on loss", "Investors voice concern"),
        Sentiment::Negative
    );
}

#[test]
fn test_chinese_keywords() {
    let tagger = SentimentTagger::new();
    assert_eq!(tagger.classify("公司利润大幅增长", ""), Sentiment::Positive);
    assert_eq!(tagger.classify("股价下跌", "亏损扩大"), Sentiment::Negative);
}

#[test]
fn test_tie_and_no_match_are_neutral() {
    let tagger = SentimentTagger::new();
    assert_eq!(tagger.classify("Profit and loss statement", ""), Sentiment::Neutral);
    assert_eq!(tagger.classify("Annual meeting scheduled", "Details announced soon"), Sentiment::Neutral);
}

#[test]
fn test_case_insensitive() {
    let tagger = SentimentTagger::new();
    assert_eq!(tagger.classify("PROFIT SOARS", ""), Sentiment::Positive);
}

#[test]
fn test_each_word_counted_once() {
    let tagger = SentimentTagger::with_words(&["gain"], &["drop", "risk"]);
    assert_eq!(
        tagger.classify("gain gain gain gain", "a drop with some risk"),
        Sentiment::Negative
    );
}
