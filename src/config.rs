//! Startup configuration: source list, ticker map and pipeline tunables.
//!
//! Built-in defaults cover everything. An optional YAML file can override any
//! part of it:
//!
//! ```yaml
//! sources:
//!   - https://www.cnbc.com/finance/
//! tickers:
//!   NVDA: [Nvidia, GPU, Jensen Huang]
//! pipeline:
//!   timeout_secs: 5
//!   cache_ttl_secs: 600
//! ```
//!
//! The configuration is read once at startup and never changes afterwards.

use std::collections::BTreeMap;
use std::fs;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::cache::DEFAULT_TTL_SECS;
use crate::error::ConfigError;
use crate::filter::TickerMap;
use crate::scrapers::clean::{DEFAULT_AD_MARKER, DEFAULT_MIN_HEADLINE_CHARS};
use crate::scrapers::extract::{DEFAULT_MAX_FRAGMENTS, DEFAULT_SELECTOR};
use crate::scrapers::fetch::DEFAULT_TIMEOUT_SECS;

/// News sources polled by default.
pub const DEFAULT_SOURCES: &[&str] = &[
    "http://feeds.reuters.com/news/wealth",
    "https://www.cnbc.com/finance/",
];

/// Ticker symbols and the keywords that mark a headline as relevant.
pub const DEFAULT_TICKERS: &[(&str, &[&str])] = &[
    ("AAPL", &["Apple", "iPhone", "Tim Cook"]),
    ("TSLA", &["Tesla", "Musk", "Electric Vehicle"]),
    ("GOOGL", &["Google", "Alphabet", "Search"]),
    ("AMZN", &["Amazon", "Cloud", "AWS"]),
];

/// Tunables for one pipeline instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// How long a computed dataset is served from cache, in seconds.
    pub cache_ttl_secs: u64,
    /// Candidate fragments taken from each document.
    pub max_fragments: usize,
    /// Fragments this long or shorter are dropped.
    pub min_headline_chars: usize,
    /// CSS selector for headline candidates in HTML documents.
    pub selector: String,
    /// Fragments containing this (case-insensitive) are dropped.
    pub ad_marker: String,
}

impl PipelineSettings {
    /// The cache TTL as a [`TimeDelta`], or `None` if it doesn't fit one.
    pub fn cache_ttl(&self) -> Option<TimeDelta> {
        i64::try_from(self.cache_ttl_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            cache_ttl_secs: DEFAULT_TTL_SECS as u64,
            max_fragments: DEFAULT_MAX_FRAGMENTS,
            min_headline_chars: DEFAULT_MIN_HEADLINE_CHARS,
            selector: DEFAULT_SELECTOR.to_string(),
            ad_marker: DEFAULT_AD_MARKER.to_string(),
        }
    }
}

/// On-disk shape of the optional config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    sources: Option<Vec<String>>,
    tickers: Option<BTreeMap<String, Vec<String>>>,
    pipeline: Option<PipelineSettings>,
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sources: Vec<String>,
    pub tickers: TickerMap,
    pub settings: PipelineSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sources: DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect(),
            tickers: TickerMap::default(),
            settings: PipelineSettings::default(),
        }
    }
}

impl AppConfig {
    /// Defaults, overridden by the YAML file at `path` if one is given.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            debug!("No config file given; using built-in defaults");
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_yaml(&text, path)?;
        info!(
            path,
            sources = config.sources.len(),
            tickers = config.tickers.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Parse YAML text; `origin` only labels errors.
    pub fn from_yaml(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_yaml::from_str(text).map_err(|source| ConfigError::Yaml {
            path: origin.to_string(),
            source,
        })?;

        let mut config = Self::default();
        if let Some(sources) = file.sources {
            config.sources = sources;
        }
        if let Some(tickers) = file.tickers {
            config.tickers = TickerMap::new(tickers);
        }
        if let Some(settings) = file.pipeline {
            config.settings = settings;
        }
        config.validate()?;
        Ok(config)
    }

    /// Replace the source list (e.g. from the command line).
    pub fn with_sources(mut self, sources: Vec<String>) -> Result<Self, ConfigError> {
        self.sources = sources;
        self.validate()?;
        Ok(self)
    }

    /// Check the resolved configuration; call again after applying overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::EmptySources);
        }
        if self.settings.cache_ttl().is_none() {
            return Err(ConfigError::CacheTtlOutOfRange(self.settings.cache_ttl_secs));
        }
        Ok(())
    }

    /// The ticker shown when none is requested: the first in sorted order.
    pub fn default_ticker(&self) -> Option<&str> {
        self.tickers.symbols().next()
    }

    /// Check that `ticker` is configured, returning its canonical symbol.
    pub fn resolve_ticker(&self, ticker: &str) -> Result<String, ConfigError> {
        let symbol = ticker.trim().to_uppercase();
        if self.tickers.contains(&symbol) {
            Ok(symbol)
        } else {
            Err(ConfigError::UnknownTicker(ticker.to_string()))
        }
    }
}
