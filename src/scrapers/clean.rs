//! Fragment filtering and text normalisation.
//!
//! A fragment survives if its trimmed text is longer than the minimum
//! headline length and does not mention an advertisement. Survivors keep
//! their trimmed text for display; the cleaned variant is only ever fed to the
//! sentiment scorer.

/// Fragments with this many characters or fewer (after trimming) are dropped.
pub const DEFAULT_MIN_HEADLINE_CHARS: usize = 30;
/// Fragments containing this marker (case-insensitive) are dropped.
pub const DEFAULT_AD_MARKER: &str = "advertisement";

/// A fragment that passed filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Trimmed original text, shown to the reader.
    pub headline: String,
    /// Normalised text, used for scoring.
    pub cleaned: String,
}

/// Applies the acceptance rules and produces [`Candidate`]s.
#[derive(Debug, Clone)]
pub struct Cleaner {
    min_chars: usize,
    ad_marker: String,
}

impl Cleaner {
    pub fn new(min_chars: usize, ad_marker: &str) -> Self {
        Self {
            min_chars,
            ad_marker: ad_marker.to_lowercase(),
        }
    }

    /// Accept or reject a raw fragment.
    pub fn accept(&self, fragment: &str) -> Option<Candidate> {
        let headline = fragment.trim();
        if headline.chars().count() <= self.min_chars {
            return None;
        }
        if !self.ad_marker.is_empty() && headline.to_lowercase().contains(&self.ad_marker) {
            return None;
        }
        Some(Candidate {
            headline: headline.to_string(),
            cleaned: clean(headline),
        })
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_HEADLINE_CHARS, DEFAULT_AD_MARKER)
    }
}

/// Normalise text for scoring.
///
/// Keeps only ASCII letters and whitespace, lowercases, and trims. Applying it
/// twice gives the same result as applying it once.
pub fn clean(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase()
        .trim()
        .to_string()
}
