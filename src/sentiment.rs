//! Headline sentiment scoring using VADER.
//!
//! Scores are the VADER (Valence Aware Dictionary and sEntiment Reasoner)
//! compound score: token valences from the lexicon, adjusted for negation,
//! intensifiers, capitalisation and contrastive conjunctions, then normalised
//! into `[-1, 1]`. The classification thresholds below are the conventional
//! VADER cut-offs and depend on that exact normalisation, so no extra boosting
//! is applied on top of the compound score.
//!
//! # Example
//! ```rust
//! use headline_sentiment::sentiment::{SentimentScorer, classify};
//! use headline_sentiment::models::SentimentCategory;
//!
//! let scorer = SentimentScorer::new();
//! let score = scorer.score("profits look great this quarter");
//! assert_eq!(classify(score), SentimentCategory::Positive);
//! ```

use once_cell::sync::Lazy;
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::models::SentimentCategory;

/// Scores at or above this are Positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Scores at or below this are Negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

static ANALYZER: Lazy<SentimentIntensityAnalyzer<'static>> =
    Lazy::new(SentimentIntensityAnalyzer::new);

/// Classify a compound score.
///
/// `>= 0.05` is Positive, `<= -0.05` is Negative, anything in between
/// (including NaN) is Neutral.
pub fn classify(score: f64) -> SentimentCategory {
    if score >= POSITIVE_THRESHOLD {
        SentimentCategory::Positive
    } else if score <= NEGATIVE_THRESHOLD {
        SentimentCategory::Negative
    } else {
        SentimentCategory::Neutral
    }
}

/// Stateless handle onto the shared VADER lexicon.
///
/// The lexicon is loaded once per process on first use; the scorer itself
/// carries no state, so it is cheap to copy around.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentScorer;

impl SentimentScorer {
    pub fn new() -> Self {
        Self
    }

    /// Compound polarity score of `text` in `[-1, 1]`.
    ///
    /// Blank text scores `0.0`.
    pub fn score(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }

        let scores = ANALYZER.polarity_scores(text);
        scores
            .get("compound")
            .copied()
            .unwrap_or(0.0)
            .clamp(-1.0, 1.0)
    }

    /// Score and classify in one step.
    pub fn score_and_classify(&self, text: &str) -> (f64, SentimentCategory) {
        let score = self.score(text);
        (score, classify(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_thresholds() {
        let cases = [
            (1.0, SentimentCategory::Positive),
            (0.05, SentimentCategory::Positive),
            (0.0499, SentimentCategory::Neutral),
            (0.0, SentimentCategory::Neutral),
            (-0.0499, SentimentCategory::Neutral),
            (-0.05, SentimentCategory::Negative),
            (-1.0, SentimentCategory::Negative),
        ];
        for (score, expected) in cases {
            assert_eq!(classify(score), expected, "score {}", score);
        }
    }

    #[test]
    fn test_classify_is_exhaustive_and_exclusive() {
        let mut s = -1.0;
        while s <= 1.0 {
            let cat = classify(s);
            let pos = s >= POSITIVE_THRESHOLD;
            let neg = s <= NEGATIVE_THRESHOLD;
            assert!(!(pos && neg));
            match cat {
                SentimentCategory::Positive => assert!(pos),
                SentimentCategory::Negative => assert!(neg),
                SentimentCategory::Neutral => assert!(!pos && !neg),
            }
            s += 0.001;
        }
    }

    #[test]
    fn test_classify_nan_is_neutral() {
        assert_eq!(classify(f64::NAN), SentimentCategory::Neutral);
    }

    #[test]
    fn test_positive_headlines() {
        let scorer = SentimentScorer::new();
        let headlines = [
            "investors are happy with the great results",
            "analysts love the excellent new product line",
        ];
        for headline in headlines {
            let (score, cat) = scorer.score_and_classify(headline);
            assert_eq!(
                cat,
                SentimentCategory::Positive,
                "Expected positive for '{}', got {}",
                headline,
                score
            );
        }
    }

    #[test]
    fn test_negative_headlines() {
        let scorer = SentimentScorer::new();
        let headlines = [
            "shareholders are angry after a terrible quarter",
            "the results were not good",
        ];
        for headline in headlines {
            let (score, cat) = scorer.score_and_classify(headline);
            assert_eq!(
                cat,
                SentimentCategory::Negative,
                "Expected negative for '{}', got {}",
                headline,
                score
            );
        }
    }

    #[test]
    fn test_lexicon_free_text_is_neutral() {
        let scorer = SentimentScorer::new();
        let score = scorer.score("the company published its quarterly filing on tuesday");
        assert_eq!(classify(score), SentimentCategory::Neutral);
    }

    #[test]
    fn test_empty_text() {
        let scorer = SentimentScorer::new();
        assert_eq!(scorer.score(""), 0.0);
        assert_eq!(scorer.score("   "), 0.0);
    }

    #[test]
    fn test_score_is_bounded_and_deterministic() {
        let scorer = SentimentScorer::new();
        let text = "great great great wonderful amazing excellent superb fantastic";
        let a = scorer.score(text);
        let b = scorer.score(text);
        assert_eq!(a, b);
        assert!((-1.0..=1.0).contains(&a));
    }
}
