//! Data models for scored headlines and the datasets built from them.
//!
//! - [`HeadlineRecord`]: one accepted headline with its sentiment
//! - [`SentimentCategory`]: the three-way classification of a score
//! - [`SourceNotice`]: a per-source failure the consumer may show
//! - [`AggregatedDataset`]: the ordered output of one pipeline run
//!
//! Records are immutable once built. The category is always derived from the
//! score inside [`HeadlineRecord::new`], so the two can never disagree.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::sentiment::classify;

/// Sentiment class of a compound score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentimentCategory {
    Positive,
    Negative,
    Neutral,
}

impl SentimentCategory {
    /// All categories in display order.
    pub const ALL: [SentimentCategory; 3] = [
        SentimentCategory::Positive,
        SentimentCategory::Negative,
        SentimentCategory::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Positive => "Positive",
            SentimentCategory::Negative => "Negative",
            SentimentCategory::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single scored headline.
///
/// # Fields
///
/// * `timestamp` - Synthetic recency stamp assigned by the aggregator
/// * `headline` - The trimmed fragment as it appeared in the document
/// * `source` - Short label derived from the originating URL's host
/// * `sentiment_score` - Compound polarity in `[-1, 1]`
/// * `sentiment_category` - Classification of `sentiment_score`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineRecord {
    timestamp: DateTime<Utc>,
    headline: String,
    source: String,
    sentiment_score: f64,
    sentiment_category: SentimentCategory,
}

impl HeadlineRecord {
    /// Build a record, deriving the category from `score`.
    ///
    /// The score is clamped into `[-1, 1]`.
    pub fn new(
        timestamp: DateTime<Utc>,
        headline: impl Into<String>,
        source: impl Into<String>,
        score: f64,
    ) -> Self {
        let sentiment_score = score.clamp(-1.0, 1.0);
        Self {
            timestamp,
            headline: headline.into(),
            source: source.into(),
            sentiment_score,
            sentiment_category: classify(sentiment_score),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn sentiment_score(&self) -> f64 {
        self.sentiment_score
    }

    pub fn sentiment_category(&self) -> SentimentCategory {
        self.sentiment_category
    }
}

/// A source that contributed nothing to a run, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceNotice {
    /// Short host label of the failed source.
    pub source: String,
    /// Human readable failure reason.
    pub reason: String,
}

/// Ordered output of one pipeline run.
///
/// Record order is extraction order across sources, not chronological order.
/// A dataset is replaced wholesale on every refresh; it is never merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedDataset {
    records: Vec<HeadlineRecord>,
    notices: Vec<SourceNotice>,
    fallback: bool,
}

impl AggregatedDataset {
    pub fn new(records: Vec<HeadlineRecord>, notices: Vec<SourceNotice>, fallback: bool) -> Self {
        Self {
            records,
            notices,
            fallback,
        }
    }

    pub fn records(&self) -> &[HeadlineRecord] {
        &self.records
    }

    pub fn notices(&self) -> &[SourceNotice] {
        &self.notices
    }

    /// True when live acquisition produced nothing and the mock rows were used.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
