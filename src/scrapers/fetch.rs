//! Bounded-timeout retrieval of source documents.
//!
//! The [`Fetch`] trait is the seam between the aggregator and the network:
//! production code uses [`HttpFetcher`], tests plug in canned documents.
//! There are no retries; a failed source simply sits out the run.

use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::error::FetchError;

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

const USER_AGENT: &str = concat!("headline_sentiment/", env!("CARGO_PKG_VERSION"));

/// Retrieve the raw body of a document.
///
/// Futures are awaited in place by the aggregator and never spawned, so no
/// `Send` bound is required of implementations.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// Fetch `url`, returning the body bytes on a 2xx response.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// [`Fetch`] implementation backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Fetch for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let t0 = Instant::now();
        let secs = self.timeout.as_secs();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, secs))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Source returned non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(secs)
            } else {
                FetchError::Body(e.to_string())
            }
        })?;

        debug!(
            %url,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched source document"
        );
        Ok(body.to_vec())
    }
}
