//! # Headline Sentiment
//!
//! Scrapes news headlines from a small fixed list of sources, scores their
//! sentiment with VADER, and selects the ones relevant to a stock ticker.
//!
//! ## Architecture
//!
//! The pipeline runs leaves first:
//! 1. **Fetching**: one bounded-timeout GET per source ([`scrapers::fetch`])
//! 2. **Extracting**: up to 15 heading/link fragments per document ([`scrapers::extract`])
//! 3. **Cleaning**: drop short and advertisement fragments, normalise the rest ([`scrapers::clean`])
//! 4. **Scoring**: VADER compound score and three-way classification ([`sentiment`])
//! 5. **Aggregating**: ordered records with per-source error boundaries and a
//!    fallback dataset ([`aggregate`])
//! 6. **Caching**: the whole run memoised per source list for a TTL ([`cache`], [`pipeline`])
//!
//! [`filter`] then picks a ticker's headlines and [`outputs`] projects them
//! into a report.
//!
//! ## Usage
//!
//! ```ignore
//! let config = AppConfig::default();
//! let pipeline = NewsPipeline::from_settings(&config.settings)?;
//! let dataset = pipeline.analyze(&config.sources).await;
//! let apple = filter_by_ticker(dataset.records(), "AAPL", &config.tickers);
//! ```

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod scrapers;
pub mod sentiment;
pub mod utils;

pub use config::AppConfig;
pub use filter::{TickerMap, filter_by_ticker};
pub use models::{AggregatedDataset, HeadlineRecord, SentimentCategory};
pub use pipeline::NewsPipeline;
