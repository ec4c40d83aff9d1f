//! Keyword-lexicon sentiment analyzer for headline batches.
//!
//! Intentionally a fixed 24-word lexicon match, not an NLP model: each token
//! in the positive list adds one, each in the negative list subtracts one,
//! and the tally is normalized by the total token count.

use crate::utils::types::SentimentLabel;
use once_cell::sync::Lazy;
use regex::Regex;

const POSITIVE_WORDS: [&str; 12] = [
    "growth",
    "positive",
    "gain",
    "improve",
    "success",
    "record",
    "innovation",
    "bullish",
    "strong",
    "up",
    "surge",
    "rally",
];

const NEGATIVE_WORDS: [&str; 12] = [
    "down",
    "drop",
    "crash",
    "fail",
    "bug",
    "issue",
    "problem",
    "bearish",
    "weak",
    "cut",
    "loss",
    "decline",
];

static TOKEN_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\W+").expect("token boundary regex"));

/// Result of analyzing one text batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    /// Normalized score in [-1, 1], rounded to 3 decimal places.
    pub score: f64,
    pub label: SentimentLabel,
}

impl Sentiment {
    pub fn neutral() -> Self {
        Self { score: 0.0, label: SentimentLabel::Neutral }
    }
}

/// Score a batch of texts against the lexicon.
///
/// Texts are lower-cased and split on non-word-character boundaries; empty
/// fragments from leading/trailing punctuation do not count as tokens. An
/// empty batch scores 0.000 / Neutral.
pub fn analyze(texts: &[String]) -> Sentiment {
    let mut tally: i64 = 0;
    let mut total_tokens: u64 = 0;

    for text in texts {
        let lowered = text.to_lowercase();
        for token in TOKEN_BOUNDARY.split(&lowered).filter(|t| !t.is_empty()) {
            total_tokens += 1;
            if POSITIVE_WORDS.contains(&token) {
                tally += 1;
            }
            if NEGATIVE_WORDS.contains(&token) {
                tally -= 1;
            }
        }
    }

    let normalized = if total_tokens == 0 {
        0.0
    } else {
        tally as f64 / total_tokens as f64
    };
    let score = (normalized * 1000.0).round() / 1000.0;

    Sentiment { score, label: label_for(score) }
}

/// Threshold ladder for the normalized score. Scores exactly at a boundary
/// fall to the less extreme label for that side.
pub fn label_for(score: f64) -> SentimentLabel {
    if score > 0.05 {
        SentimentLabel::StronglyPositive
    } else if score > 0.02 {
        SentimentLabel::ModeratelyPositive
    } else if score < -0.05 {
        SentimentLabel::StronglyNegative
    } else if score < -0.02 {
        SentimentLabel::ModeratelyNegative
    } else {
        SentimentLabel::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_is_neutral() {
        let result = analyze(&[]);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.label, SentimentLabel::Neutral);

        // Texts with no word characters at all behave the same.
        let result = analyze(&["--- !!!".to_string()]);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    #[test]
    fn positive_batch_scores_positive() {
        let result = analyze(&["strong growth and record surge".to_string()]);
        // 4 lexicon hits over 5 tokens.
        assert!((result.score - 0.8).abs() < 1e-9);
        assert_eq!(result.label, SentimentLabel::StronglyPositive);
    }

    #[test]
    fn negative_batch_scores_strongly_negative() {
        let result = analyze(&["bug crash down decline".to_string()]);
        assert!((result.score - -1.0).abs() < 1e-9);
        assert_eq!(result.label, SentimentLabel::StronglyNegative);
    }

    #[test]
    fn case_and_punctuation_are_ignored() {
        let result = analyze(&["SURGE! Rally, GROWTH...".to_string()]);
        assert!((result.score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mixed_batch_dilutes_towards_neutral() {
        // One positive hit across 60 tokens lands under the 0.02 moderate
        // threshold.
        let mut text = String::from("gain");
        for _ in 0..59 {
            text.push_str(" filler");
        }
        let result = analyze(&[text]);
        assert!(result.score > 0.0);
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    #[test]
    fn boundary_scores_take_less_extreme_label() {
        assert_eq!(label_for(0.05), SentimentLabel::ModeratelyPositive);
        assert_eq!(label_for(0.02), SentimentLabel::Neutral);
        assert_eq!(label_for(-0.02), SentimentLabel::Neutral);
        assert_eq!(label_for(-0.05), SentimentLabel::ModeratelyNegative);
        assert_eq!(label_for(0.051), SentimentLabel::StronglyPositive);
        assert_eq!(label_for(-0.051), SentimentLabel::StronglyNegative);
    }

    #[test]
    fn tally_accumulates_across_texts() {
        let result = analyze(&[
            "surge".to_string(),
            "crash".to_string(),
            "neutral words here".to_string(),
        ]);
        // +1 -1 over 5 tokens.
        assert_eq!(result.score, 0.0);
        assert_eq!(result.label, SentimentLabel::Neutral);
    }
}
