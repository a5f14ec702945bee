//! Selecting the headlines relevant to a stock ticker.
//!
//! Each ticker maps to a small ordered set of keywords. A headline is
//! relevant when it contains any of them, ignoring case. Unknown tickers and
//! empty keyword sets select nothing; that is a normal "no headlines" result,
//! not an error.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use crate::config::DEFAULT_TICKERS;
use crate::models::HeadlineRecord;

/// Ticker symbol to keyword list. Symbols are stored upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl TickerMap {
    /// Build a map from `(symbol, keywords)` pairs.
    ///
    /// Blank keywords are dropped and repeated keywords (ignoring case) keep
    /// only their first occurrence. A repeated symbol replaces the earlier one.
    pub fn new<I, S, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<K>)>,
        S: AsRef<str>,
        K: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(symbol, keywords)| {
                let mut seen: Vec<String> = Vec::new();
                let mut kept = Vec::new();
                for keyword in keywords {
                    let keyword = keyword.as_ref().trim();
                    let folded = keyword.to_lowercase();
                    if keyword.is_empty() || seen.contains(&folded) {
                        continue;
                    }
                    seen.push(folded);
                    kept.push(keyword.to_string());
                }
                (normalize_symbol(symbol.as_ref()), kept)
            })
            .collect();
        Self { entries }
    }

    /// Keywords for `symbol`, if the symbol is known.
    pub fn keywords(&self, symbol: &str) -> Option<&[String]> {
        self.entries
            .get(&normalize_symbol(symbol))
            .map(|k| k.as_slice())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(&normalize_symbol(symbol))
    }

    /// Known symbols in sorted order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    /// Iterate `(symbol, keywords)` in sorted symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(s, k)| (s.as_str(), k.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive "any keyword" pattern for `symbol`.
    ///
    /// `None` when the symbol is unknown or has no keywords.
    pub fn pattern(&self, symbol: &str) -> Option<Regex> {
        let keywords = self.keywords(symbol)?;
        if keywords.is_empty() {
            return None;
        }
        let alternation = keywords
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        match RegexBuilder::new(&alternation).case_insensitive(true).build() {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(%symbol, error = %e, "Failed to build keyword pattern");
                None
            }
        }
    }
}

impl Default for TickerMap {
    fn default() -> Self {
        Self::new(
            DEFAULT_TICKERS
                .iter()
                .map(|(symbol, keywords)| (*symbol, keywords.to_vec())),
        )
    }
}

fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Records from `dataset` whose headline mentions any of `ticker`'s keywords.
///
/// Matching is a case-insensitive substring search over the raw headline.
///
/// # Arguments
///
/// * `dataset` - Records to search, typically from one `analyze` call.
/// * `ticker` - Symbol to look up in `tickers`; case does not matter.
/// * `tickers` - Symbol to keyword mapping.
///
/// # Returns
///
/// Matching records in their original order. Empty for an unknown ticker,
/// a ticker without keywords, or when nothing matches.
pub fn filter_by_ticker(
    dataset: &[HeadlineRecord],
    ticker: &str,
    tickers: &TickerMap,
) -> Vec<HeadlineRecord> {
    let Some(pattern) = tickers.pattern(ticker) else {
        debug!(%ticker, "No keywords for ticker");
        return Vec::new();
    };

    let matched: Vec<HeadlineRecord> = dataset
        .iter()
        .filter(|record| pattern.is_match(record.headline()))
        .cloned()
        .collect();
    debug!(%ticker, total = dataset.len(), matched = matched.len(), "Filtered by ticker");
    matched
}
