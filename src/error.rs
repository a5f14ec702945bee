//! Error types for the acquisition pipeline and configuration loading.
//!
//! Pipeline errors never reach the end consumer: a [`SourceError`] only ever
//! aborts the one source it came from, and an empty run is replaced by the
//! fallback dataset. They exist so the per-source outcome can say *why* a
//! source produced nothing.

use thiserror::Error;

/// Failure to retrieve a source document.
///
/// Network errors, timeouts and non-2xx responses are all treated the same
/// way by the aggregator; the variants only differ in what gets logged.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("failed to read response body: {0}")]
    Body(String),
}

impl FetchError {
    /// Classify a reqwest error, keeping timeouts distinguishable.
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(timeout_secs)
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

/// Failure to turn a fetched document into candidate fragments.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid candidate selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("document is not text")]
    Undecodable,

    #[error("malformed feed document: {0}")]
    Feed(String),
}

/// Why a single source contributed no records to a run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Problems with the startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no news sources configured")]
    EmptySources,

    #[error("unknown ticker `{0}`")]
    UnknownTicker(String),

    #[error("cache_ttl_secs = {0} is out of range")]
    CacheTtlOutOfRange(u64),
}
