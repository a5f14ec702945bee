//! Headline acquisition: fetching, extracting and cleaning.
//!
//! Each source goes through the same three stages:
//!
//! 1. **Fetching** ([`fetch`]): one bounded-timeout GET per source URL
//! 2. **Extracting** ([`extract`]): up to 15 candidate fragments from the
//!    heading- and link-like elements of the document (or feed item titles)
//! 3. **Cleaning** ([`clean`]): drop short or advertisement fragments and
//!    normalise the rest for scoring
//!
//! Fetch and extract failures are reported per source; see
//! [`crate::aggregate`] for how they are recovered.

pub mod clean;
pub mod extract;
pub mod fetch;
