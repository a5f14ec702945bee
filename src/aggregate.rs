//! Per-run assembly of scored headline records.
//!
//! The [`Aggregator`] walks the source list in order. Each source is fetched
//! and extracted inside its own boundary, producing a [`SourceOutcome`]: either
//! the candidate fragments or the reason the source was skipped. A failed
//! source contributes nothing (no partial fragments) and the run moves on.
//!
//! Accepted fragments become [`HeadlineRecord`]s stamped with a synthetic
//! timestamp that steps back [`TIMESTAMP_STEP_MINUTES`] per record already
//! appended, so later-extracted records always look older.
//!
//! If the whole run yields nothing, the fixed [`fallback_dataset`] is returned
//! instead, so consumers always receive rows to display.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, instrument};

use crate::cache::Clock;
use crate::error::SourceError;
use crate::models::{AggregatedDataset, HeadlineRecord, SourceNotice};
use crate::scrapers::clean::Cleaner;
use crate::scrapers::extract::Extractor;
use crate::scrapers::fetch::Fetch;
use crate::sentiment::SentimentScorer;
use crate::utils::{source_label, truncate_for_log};

/// Minutes between consecutive synthetic timestamps.
pub const TIMESTAMP_STEP_MINUTES: i64 = 2;

/// Source label used for the fallback rows.
pub const FALLBACK_SOURCE: &str = "MockNews";

/// What one source produced during a run.
#[derive(Debug)]
pub struct SourceOutcome {
    /// The URL as configured.
    pub url: String,
    /// Short host label for the URL.
    pub source: String,
    /// Raw candidate fragments, or why there are none.
    pub result: Result<Vec<String>, SourceError>,
}

impl SourceOutcome {
    /// Convert a failed outcome into a consumer-facing notice.
    pub fn notice(&self) -> Option<SourceNotice> {
        self.result.as_ref().err().map(|e| SourceNotice {
            source: self.source.clone(),
            reason: e.to_string(),
        })
    }
}

/// The three mock rows used when every source comes up empty.
///
/// Two rows at `now` (one Positive, one Negative) and one Neutral row an hour
/// earlier.
pub fn fallback_dataset(now: DateTime<Utc>) -> Vec<HeadlineRecord> {
    vec![
        HeadlineRecord::new(
            now,
            "Apple stock surges on massive iPhone sales forecast.",
            FALLBACK_SOURCE,
            0.8,
        ),
        HeadlineRecord::new(
            now,
            "Tesla shares dip amid supply chain constraints.",
            FALLBACK_SOURCE,
            -0.7,
        ),
        HeadlineRecord::new(
            now - Duration::hours(1),
            "Google's new AI model shows neutral market reaction.",
            FALLBACK_SOURCE,
            0.02,
        ),
    ]
}

/// Runs fetch, extract, clean and score across a source list.
pub struct Aggregator<F> {
    fetcher: F,
    extractor: Extractor,
    cleaner: Cleaner,
    scorer: SentimentScorer,
    clock: Arc<dyn Clock>,
}

impl<F: Fetch> Aggregator<F> {
    pub fn new(fetcher: F, extractor: Extractor, cleaner: Cleaner, clock: Arc<dyn Clock>) -> Self {
        Self {
            fetcher,
            extractor,
            cleaner,
            scorer: SentimentScorer::new(),
            clock,
        }
    }

    /// Fetch and extract a single source inside its own error boundary.
    #[instrument(level = "info", skip(self))]
    pub async fn collect_source(&self, url: &str) -> SourceOutcome {
        let source = source_label(url);
        let result = match self.fetcher.fetch(url).await {
            Ok(body) => self.extractor.extract(&body).map_err(SourceError::from),
            Err(e) => Err(SourceError::from(e)),
        };

        match &result {
            Ok(fragments) => debug!(%source, count = fragments.len(), "Collected fragments"),
            Err(e) => info!(%source, error = %e, "Live scraping failed for source; skipping"),
        }

        SourceOutcome {
            url: url.to_string(),
            source,
            result,
        }
    }

    /// Run the full pipeline once over `urls`.
    ///
    /// Sources are processed sequentially in list order. A failing source is
    /// logged, noted and skipped.
    ///
    /// # Arguments
    ///
    /// * `urls` - Sources to fetch, in order.
    ///
    /// # Returns
    ///
    /// The accepted records with a notice per failed source. Never empty: a
    /// run with no accepted headlines returns [`fallback_dataset`] instead.
    #[instrument(level = "info", skip_all, fields(sources = urls.len()))]
    pub async fn run(&self, urls: &[String]) -> AggregatedDataset {
        let now = self.clock.now();
        let mut records: Vec<HeadlineRecord> = Vec::new();
        let mut notices = Vec::new();

        for url in urls {
            let outcome = self.collect_source(url).await;
            if let Some(notice) = outcome.notice() {
                notices.push(notice);
            }
            let Ok(fragments) = outcome.result else {
                continue;
            };

            let before = records.len();
            for fragment in &fragments {
                let Some(candidate) = self.cleaner.accept(fragment) else {
                    continue;
                };
                let score = self.scorer.score(&candidate.cleaned);
                let timestamp =
                    now - Duration::minutes(TIMESTAMP_STEP_MINUTES * records.len() as i64);
                debug!(
                    source = %outcome.source,
                    score,
                    headline = %truncate_for_log(&candidate.headline, 80),
                    "Scored headline"
                );
                records.push(HeadlineRecord::new(
                    timestamp,
                    candidate.headline,
                    outcome.source.clone(),
                    score,
                ));
            }
            info!(
                source = %outcome.source,
                candidates = fragments.len(),
                accepted = records.len() - before,
                "Processed source"
            );
        }

        if records.is_empty() {
            info!(
                failed_sources = notices.len(),
                "No live headlines collected; using fallback dataset"
            );
            return AggregatedDataset::new(fallback_dataset(now), notices, true);
        }

        info!(count = records.len(), "Aggregated headline records");
        AggregatedDataset::new(records, notices, false)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::error::FetchError;
    use crate::models::SentimentCategory;
    use crate::scrapers::clean::DEFAULT_AD_MARKER;
    use crate::scrapers::clean::DEFAULT_MIN_HEADLINE_CHARS;
    use crate::scrapers::extract::{DEFAULT_MAX_FRAGMENTS, DEFAULT_SELECTOR};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves canned bodies by URL; unknown URLs fail with a 503.
    #[derive(Default)]
    pub(crate) struct FakeFetcher {
        pub pages: HashMap<String, Vec<u8>>,
        pub calls: AtomicUsize,
    }

    impl FakeFetcher {
        pub fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.as_bytes().to_vec());
            self
        }
    }

    impl Fetch for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages.get(url).cloned().ok_or(FetchError::Status(503))
        }
    }

    impl Fetch for &FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            (**self).fetch(url).await
        }
    }

    pub(crate) fn aggregator<F: Fetch>(fetcher: F, clock: Arc<dyn Clock>) -> Aggregator<F> {
        Aggregator::new(
            fetcher,
            Extractor::new(DEFAULT_SELECTOR, DEFAULT_MAX_FRAGMENTS).unwrap(),
            Cleaner::new(DEFAULT_MIN_HEADLINE_CHARS, DEFAULT_AD_MARKER),
            clock,
        )
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    const PAGE_A: &str = r#"<html><body>
        <h2>Apple investors are happy with the great iPhone results</h2>
        <a href="/ad">Advertisement: the best credit card offers of the year</a>
        <a href="/short">Short link</a>
        <h3>Tesla shareholders are angry after a terrible quarter</h3>
    </body></html>"#;

    const PAGE_B: &str = r#"<html><body>
        <h2>Amazon files its quarterly report on Tuesday</h2>
    </body></html>"#;

    #[tokio::test]
    async fn test_run_collects_in_extraction_order() {
        let now = Utc::now();
        let clock = Arc::new(ManualClock::new(now));
        let fetcher = FakeFetcher::default()
            .with_page("https://a.example/news", PAGE_A)
            .with_page("https://b.example/news", PAGE_B);
        let agg = aggregator(fetcher, clock);

        let dataset = agg
            .run(&urls(&["https://a.example/news", "https://b.example/news"]))
            .await;

        assert!(!dataset.is_fallback());
        assert!(dataset.notices().is_empty());
        let headlines: Vec<&str> = dataset.records().iter().map(|r| r.headline()).collect();
        assert_eq!(
            headlines,
            vec![
                "Apple investors are happy with the great iPhone results",
                "Tesla shareholders are angry after a terrible quarter",
                "Amazon files its quarterly report on Tuesday",
            ]
        );

        let records = dataset.records();
        assert_eq!(records[0].source(), "a.example");
        assert_eq!(records[2].source(), "b.example");
        assert_eq!(records[0].sentiment_category(), SentimentCategory::Positive);
        assert_eq!(records[1].sentiment_category(), SentimentCategory::Negative);
        assert_eq!(records[2].sentiment_category(), SentimentCategory::Neutral);
    }

    #[tokio::test]
    async fn test_timestamps_strictly_decrease() {
        let now = Utc::now();
        let clock = Arc::new(ManualClock::new(now));
        let fetcher = FakeFetcher::default()
            .with_page("https://a.example/news", PAGE_A)
            .with_page("https://b.example/news", PAGE_B);
        let dataset = aggregator(fetcher, clock)
            .run(&urls(&["https://a.example/news", "https://b.example/news"]))
            .await;

        let stamps: Vec<_> = dataset.records().iter().map(|r| r.timestamp()).collect();
        assert_eq!(stamps[0], now);
        for pair in stamps.windows(2) {
            assert!(pair[0] > pair[1]);
        }
        assert_eq!(stamps[2], now - Duration::minutes(4));
    }

    #[tokio::test]
    async fn test_failed_source_is_skipped_not_fatal() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let fetcher = FakeFetcher::default().with_page("https://b.example/news", PAGE_B);
        let dataset = aggregator(fetcher, clock)
            .run(&urls(&["https://down.example/news", "https://b.example/news"]))
            .await;

        assert!(!dataset.is_fallback());
        assert_eq!(dataset.len(), 1);
        assert_eq!(
            dataset.notices(),
            &[SourceNotice {
                source: "down.example".to_string(),
                reason: "unexpected HTTP status 503".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_malformed_feed_contributes_nothing() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let broken_feed = "<rss><channel>\
            <item><title>Apple investors are happy with the great iPhone results</title></item>\
            <item><title>Tesla shareholders are angry after</item>\
            </channel></rss>";
        let fetcher = FakeFetcher::default()
            .with_page("https://feed.example/rss", broken_feed)
            .with_page("https://b.example/news", PAGE_B);
        let dataset = aggregator(fetcher, clock)
            .run(&urls(&["https://feed.example/rss", "https://b.example/news"]))
            .await;

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].source(), "b.example");
        assert_eq!(dataset.notices()[0].source, "feed.example");
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_fallback() {
        let now = Utc::now();
        let clock = Arc::new(ManualClock::new(now));
        let dataset = aggregator(FakeFetcher::default(), clock)
            .run(&urls(&["https://a.example/", "https://b.example/"]))
            .await;

        assert!(dataset.is_fallback());
        assert_eq!(dataset.records(), fallback_dataset(now).as_slice());
        assert_eq!(dataset.notices().len(), 2);
        let categories: Vec<_> = dataset
            .records()
            .iter()
            .map(|r| r.sentiment_category())
            .collect();
        assert_eq!(
            categories,
            vec![
                SentimentCategory::Positive,
                SentimentCategory::Negative,
                SentimentCategory::Neutral
            ]
        );
    }

    #[tokio::test]
    async fn test_only_rejected_fragments_yields_fallback() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let fetcher = FakeFetcher::default().with_page(
            "https://a.example/",
            "<h2>too short</h2><a>ADVERTISEMENT sponsored content for your holiday travel</a>",
        );
        let dataset = aggregator(fetcher, clock)
            .run(&urls(&["https://a.example/"]))
            .await;

        assert!(dataset.is_fallback());
        assert!(dataset.notices().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_fragments_never_appear() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let fetcher = FakeFetcher::default().with_page("https://a.example/news", PAGE_A);
        let dataset = aggregator(fetcher, clock)
            .run(&urls(&["https://a.example/news"]))
            .await;

        for record in dataset.records() {
            assert!(record.headline().chars().count() > DEFAULT_MIN_HEADLINE_CHARS);
            assert!(!record.headline().to_lowercase().contains("advertisement"));
        }
    }

    #[test]
    fn test_fallback_dataset_shape() {
        let now = Utc::now();
        let rows = fallback_dataset(now);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].timestamp(), now);
        assert_eq!(rows[1].timestamp(), now);
        assert_eq!(rows[2].timestamp(), now - Duration::hours(1));
        assert!(rows.iter().all(|r| r.source() == FALLBACK_SOURCE));
        assert_eq!(rows[0].sentiment_score(), 0.8);
        assert_eq!(rows[1].sentiment_score(), -0.7);
    }
}
