//! The cached `analyze` entry point.
//!
//! [`NewsPipeline`] owns an [`Aggregator`] and a [`TtlCache`] keyed by the
//! exact source list. Repeated calls within the TTL return the very same
//! dataset without touching the network; the first call after expiry
//! recomputes synchronously and replaces the stored dataset.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use tracing::{info, instrument};

use crate::aggregate::Aggregator;
use crate::cache::{Clock, SystemClock, TtlCache};
use crate::config::PipelineSettings;
use crate::error::SourceError;
use crate::models::AggregatedDataset;
use crate::scrapers::clean::Cleaner;
use crate::scrapers::extract::Extractor;
use crate::scrapers::fetch::{Fetch, HttpFetcher};

/// Shared handle to one run's output.
pub type Dataset = Arc<AggregatedDataset>;

/// Aggregator plus a per-source-list result cache.
pub struct NewsPipeline<F> {
    aggregator: Aggregator<F>,
    cache: TtlCache<Vec<String>, Dataset>,
}

impl NewsPipeline<HttpFetcher> {
    /// Build a live pipeline from settings, using the system clock.
    pub fn from_settings(settings: &PipelineSettings) -> Result<Self, SourceError> {
        Self::from_settings_with_clock(settings, Arc::new(SystemClock))
    }

    pub fn from_settings_with_clock(
        settings: &PipelineSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SourceError> {
        let fetcher = HttpFetcher::new(StdDuration::from_secs(settings.timeout_secs))?;
        let extractor = Extractor::new(&settings.selector, settings.max_fragments)?;
        let cleaner = Cleaner::new(settings.min_headline_chars, &settings.ad_marker);
        let aggregator = Aggregator::new(fetcher, extractor, cleaner, clock.clone());
        let ttl = settings.cache_ttl().unwrap_or(Duration::MAX);
        Ok(Self::new(aggregator, ttl, clock))
    }
}

impl<F: Fetch> NewsPipeline<F> {
    pub fn new(aggregator: Aggregator<F>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            aggregator,
            cache: TtlCache::new(ttl, clock),
        }
    }

    /// Scraped, scored headlines for `urls`, cached by the list's contents.
    ///
    /// A fresh cached dataset is returned as-is; otherwise one aggregation run
    /// is awaited (shared with any concurrent caller for the same list) and
    /// stored for the configured TTL.
    ///
    /// # Arguments
    ///
    /// * `urls` - Source list, in processing order. Order is part of the cache key.
    ///
    /// # Returns
    ///
    /// A shared [`AggregatedDataset`]. Never fails and never empty: a run with
    /// no live headlines yields the fallback rows.
    #[instrument(level = "info", skip_all, fields(sources = urls.len()))]
    pub async fn analyze(&self, urls: &[String]) -> Dataset {
        let key = urls.to_vec();
        let dataset = self
            .cache
            .get_or_compute(key, move || async move {
                info!("Refreshing headline dataset");
                Arc::new(self.aggregator.run(urls).await)
            })
            .await;
        info!(
            records = dataset.len(),
            fallback = dataset.is_fallback(),
            "Headline dataset ready"
        );
        dataset
    }

    /// Forget the cached dataset for `urls`.
    pub fn invalidate(&self, urls: &[String]) {
        self.cache.invalidate(&urls.to_vec());
    }

    /// Forget every cached dataset.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Cached dataset for `urls`, if still fresh. Never triggers a fetch.
    pub fn cached(&self, urls: &[String]) -> Option<Dataset> {
        self.cache.get(&urls.to_vec())
    }
}
