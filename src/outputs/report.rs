//! Per-ticker report projected from filtered headline records.
//!
//! Everything here is derived from record fields alone: category counts, the
//! most frequent category, the share of Negative headlines, and an hourly
//! mean-polarity trend. [`render_text`] turns a report into the terminal view.

use std::fmt::Write as _;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use itertools::Itertools;
use serde::Serialize;

use crate::models::{AggregatedDataset, HeadlineRecord, SentimentCategory, SourceNotice};
use crate::utils::truncate_for_log;

/// Per-category tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl CategoryCounts {
    pub fn from_records(records: &[HeadlineRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.sentiment_category() {
                SentimentCategory::Positive => counts.positive += 1,
                SentimentCategory::Negative => counts.negative += 1,
                SentimentCategory::Neutral => counts.neutral += 1,
            }
        }
        counts
    }

    pub fn get(&self, category: SentimentCategory) -> usize {
        match category {
            SentimentCategory::Positive => self.positive,
            SentimentCategory::Negative => self.negative,
            SentimentCategory::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Category with the highest count; ties go to the earlier of
    /// Positive, Negative, Neutral. Neutral when there is nothing to count.
    pub fn most_frequent(&self) -> SentimentCategory {
        if self.total() == 0 {
            return SentimentCategory::Neutral;
        }
        SentimentCategory::ALL
            .into_iter()
            .rev()
            .max_by_key(|c| self.get(*c))
            .unwrap_or(SentimentCategory::Neutral)
    }

    /// Share of Negative records as a percentage; 0 when empty.
    pub fn negative_pct(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.negative as f64 / total as f64 * 100.0,
        }
    }
}

/// Mean polarity of the records stamped within one hour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub hour: DateTime<Utc>,
    pub avg_polarity: f64,
    pub count: usize,
}

/// Mean score per hour bucket, ascending; hours with no records are omitted.
pub fn hourly_trend(records: &[HeadlineRecord]) -> Vec<TrendPoint> {
    records
        .iter()
        .map(|r| (hour_floor(r.timestamp()), r.sentiment_score()))
        .sorted_by_key(|(hour, _)| *hour)
        .chunk_by(|(hour, _)| *hour)
        .into_iter()
        .map(|(hour, group)| {
            let scores: Vec<f64> = group.map(|(_, score)| score).collect();
            TrendPoint {
                hour,
                avg_polarity: scores.iter().sum::<f64>() / scores.len() as f64,
                count: scores.len(),
            }
        })
        .collect()
}

fn hour_floor(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(TimeDelta::hours(1)).unwrap_or(ts)
}

/// Everything the consumer needs to show one ticker.
#[derive(Debug, Clone, Serialize)]
pub struct TickerReport {
    pub ticker: String,
    pub keywords: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub total: usize,
    pub counts: CategoryCounts,
    pub most_frequent: SentimentCategory,
    pub negative_pct: f64,
    pub hourly_trend: Vec<TrendPoint>,
    /// Matching records, newest first.
    pub headlines: Vec<HeadlineRecord>,
    pub notices: Vec<SourceNotice>,
    pub fallback: bool,
}

impl TickerReport {
    /// Build a report from the filtered records for `ticker`.
    pub fn build(
        ticker: &str,
        keywords: &[String],
        filtered: Vec<HeadlineRecord>,
        dataset: &AggregatedDataset,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let counts = CategoryCounts::from_records(&filtered);
        let hourly_trend = hourly_trend(&filtered);
        let mut headlines = filtered;
        headlines.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));

        Self {
            ticker: ticker.to_string(),
            keywords: keywords.to_vec(),
            generated_at,
            total: counts.total(),
            most_frequent: counts.most_frequent(),
            negative_pct: counts.negative_pct(),
            counts,
            hourly_trend,
            headlines,
            notices: dataset.notices().to_vec(),
            fallback: dataset.is_fallback(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Plain-text rendering of a report for the terminal.
pub fn render_text(report: &TickerReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Sentiment Report for {}", report.ticker);
    let _ = writeln!(out, "{}", "=".repeat(22 + report.ticker.len()));

    for notice in &report.notices {
        let _ = writeln!(
            out,
            "note: live scraping failed for {} ({})",
            notice.source, notice.reason
        );
    }
    if report.fallback {
        let _ = writeln!(out, "note: showing mock data; no live headlines were collected");
    }

    if report.is_empty() {
        let _ = writeln!(
            out,
            "\nNo recent headlines found for {} matching keywords: [{}].",
            report.ticker,
            report.keywords.join(", ")
        );
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Total relevant headlines: {}", report.total);
    let _ = writeln!(out, "Most frequent sentiment:  {}", report.most_frequent);
    let _ = writeln!(out, "Negative headlines:       {:.1}%", report.negative_pct);

    let _ = writeln!(out, "\nSentiment distribution");
    for category in SentimentCategory::ALL {
        let _ = writeln!(
            out,
            "  {:<9} {:>3}",
            category.as_str(),
            report.counts.get(category)
        );
    }

    let _ = writeln!(out, "\nHourly polarity trend");
    for point in &report.hourly_trend {
        let _ = writeln!(
            out,
            "  {}  {:+.3}  (n={})",
            point.hour.format("%Y-%m-%d %H:00"),
            point.avg_polarity,
            point.count
        );
    }

    let _ = writeln!(out, "\nRecent analyzed headlines");
    let _ = writeln!(
        out,
        "  {:<19}  {:<9}  {:>6}  {:<20}  Headline",
        "Timestamp", "Sentiment", "Score", "Source"
    );
    for record in &report.headlines {
        let _ = writeln!(
            out,
            "  {:<19}  {:<9}  {:>+6.3}  {:<20}  {}",
            record.timestamp().format("%Y-%m-%d %H:%M:%S"),
            record.sentiment_category().as_str(),
            record.sentiment_score(),
            truncate_for_log(record.source(), 20),
            record.headline()
        );
    }
    out
}
