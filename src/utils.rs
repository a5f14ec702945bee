//! Small helpers for source labelling, log formatting and file system checks.

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Label used when a URL yields no usable host.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Derive a short source label from a URL.
///
/// The label is the URL's host (with port, if any). Otherwise the input is
/// split on `//` and the last piece is cut at its first `/`, so
/// `file:///tmp/x.html` has no label of its own. The result is never empty:
/// [`UNKNOWN_SOURCE`] stands in when nothing is left.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(source_label("https://www.cnbc.com/finance/"), "www.cnbc.com");
/// assert_eq!(source_label("feeds.reuters.com/news"), "feeds.reuters.com");
/// ```
pub fn source_label(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url) {
        if let Some(host) = parsed.host_str().filter(|h| !h.is_empty()) {
            return match parsed.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            };
        }
    }

    let after_scheme = url.split("//").last().unwrap_or(url);
    let host = after_scheme.split('/').next().unwrap_or("").trim();
    if host.is_empty() {
        UNKNOWN_SOURCE.to_string()
    } else {
        host.to_string()
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and the number
/// of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}…(+{} bytes)", &s[..idx], s.len() - idx),
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then writes and removes a probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;

    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
