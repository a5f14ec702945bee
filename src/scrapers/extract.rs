//! Candidate headline extraction from fetched documents.
//!
//! HTML pages are parsed with `scraper` and the text of heading- and
//! link-like elements is collected in document order. RSS and Atom feeds are
//! recognised by their root element and read with `quick-xml`, taking the
//! `<title>` of each `<item>`/`<entry>`.
//!
//! Either way at most [`DEFAULT_MAX_FRAGMENTS`] candidates are returned per
//! document, and the limit is applied *before* any filtering.

use quick_xml::Reader;
use quick_xml::events::Event;
use scraper::{Html, Selector};
use tracing::{debug, instrument};

use crate::error::ExtractError;

/// Elements treated as headline candidates in HTML documents.
pub const DEFAULT_SELECTOR: &str = "h2, h3, a";
/// Maximum number of candidates taken from one document.
pub const DEFAULT_MAX_FRAGMENTS: usize = 15;

/// Extracts candidate text fragments from raw documents.
#[derive(Debug)]
pub struct Extractor {
    selector: Selector,
    max_fragments: usize,
}

impl Extractor {
    /// Build an extractor for a CSS selector and per-document limit.
    pub fn new(selector: &str, max_fragments: usize) -> Result<Self, ExtractError> {
        let parsed = Selector::parse(selector).map_err(|e| ExtractError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            selector: parsed,
            max_fragments,
        })
    }

    /// Extract up to `max_fragments` raw candidate fragments from `body`.
    ///
    /// Fragments are the concatenated text of each matched element, untrimmed;
    /// cleaning and filtering happen downstream.
    #[instrument(level = "debug", skip_all, fields(bytes = body.len()))]
    pub fn extract(&self, body: &[u8]) -> Result<Vec<String>, ExtractError> {
        if body.contains(&0) {
            return Err(ExtractError::Undecodable);
        }
        let text = String::from_utf8_lossy(body);

        let fragments = if looks_like_feed(&text) {
            self.extract_feed(&text)?
        } else {
            self.extract_html(&text)
        };

        debug!(count = fragments.len(), "Extracted candidate fragments");
        Ok(fragments)
    }

    fn extract_html(&self, text: &str) -> Vec<String> {
        let document = Html::parse_document(text);
        document
            .root_element()
            .select(&self.selector)
            .take(self.max_fragments)
            .map(|element| element.text().collect::<String>())
            .collect()
    }

    fn extract_feed(&self, text: &str) -> Result<Vec<String>, ExtractError> {
        let mut reader = Reader::from_str(text);
        let mut fragments = Vec::new();
        let mut in_entry = 0usize;
        let mut current_title: Option<String> = None;

        loop {
            if fragments.len() >= self.max_fragments {
                break;
            }
            let event = reader
                .read_event()
                .map_err(|e| ExtractError::Feed(e.to_string()))?;
            match event {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"item" | b"entry" => in_entry += 1,
                    b"title" if in_entry > 0 => current_title = Some(String::new()),
                    _ => {}
                },
                Event::End(e) => match e.local_name().as_ref() {
                    b"item" | b"entry" => in_entry = in_entry.saturating_sub(1),
                    b"title" => {
                        if let Some(title) = current_title.take() {
                            fragments.push(title);
                        }
                    }
                    _ => {}
                },
                Event::Text(t) => {
                    if let Some(title) = current_title.as_mut() {
                        title.push_str(&String::from_utf8_lossy(&t));
                    }
                }
                Event::CData(c) => {
                    if let Some(title) = current_title.as_mut() {
                        title.push_str(&String::from_utf8_lossy(&c));
                    }
                }
                Event::GeneralRef(r) => {
                    if let Some(title) = current_title.as_mut() {
                        let name = String::from_utf8_lossy(&r);
                        if let Some(ch) = resolve_char_ref(&name) {
                            title.push(ch);
                        } else if let Some(resolved) = resolve_xml_entity(&name) {
                            title.push_str(resolved);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(fragments)
    }
}

/// Resolve `#123` / `#x7B` character references.
fn resolve_char_ref(name: &str) -> Option<char> {
    let digits = name.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}

fn resolve_xml_entity(name: &str) -> Option<&'static str> {
    match name {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        _ => None,
    }
}

/// True if the document's root element is an RSS or Atom feed.
fn looks_like_feed(text: &str) -> bool {
    let head: String = text
        .trim_start_matches('\u{feff}')
        .trim_start()
        .chars()
        .take(512)
        .collect::<String>()
        .to_ascii_lowercase();
    if head.starts_with("<rss") || head.starts_with("<feed") {
        return true;
    }
    head.starts_with("<?xml") && (head.contains("<rss") || head.contains("<feed"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new(DEFAULT_SELECTOR, DEFAULT_MAX_FRAGMENTS).unwrap()
    }

    #[test]
    fn test_extract_html_in_document_order() {
        let html = r#"
            <html><body>
              <h2>First heading</h2>
              <p>Not a candidate</p>
              <a href="/x">A link</a>
              <h3>Third heading</h3>
              <h1>Not a candidate either</h1>
            </body></html>
        "#;
        let fragments = extractor().extract(html.as_bytes()).unwrap();
        assert_eq!(fragments, vec!["First heading", "A link", "Third heading"]);
    }

    #[test]
    fn test_extract_joins_nested_text() {
        let html = "<h2>Apple <em>beats</em> estimates</h2>";
        let fragments = extractor().extract(html.as_bytes()).unwrap();
        assert_eq!(fragments, vec!["Apple beats estimates"]);
    }

    #[test]
    fn test_extract_limit_applies() {
        let html: String = (0..40).map(|i| format!("<h2>Headline number {}</h2>", i)).collect();
        let fragments = extractor().extract(html.as_bytes()).unwrap();
        assert_eq!(fragments.len(), DEFAULT_MAX_FRAGMENTS);
        assert_eq!(fragments[0], "Headline number 0");
        assert_eq!(fragments[14], "Headline number 14");
    }

    #[test]
    fn test_extract_custom_selector() {
        let extractor = Extractor::new(".headline", 3).unwrap();
        let html = r#"<div class="headline">One</div><h2>skip</h2><span class="headline">Two</span>"#;
        assert_eq!(extractor.extract(html.as_bytes()).unwrap(), vec!["One", "Two"]);
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let err = Extractor::new("h2[", 15).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidSelector { .. }));
    }

    #[test]
    fn test_garbage_html_yields_nothing() {
        let fragments = extractor().extract(b"<<<>>> not really html").unwrap();
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_binary_body_is_undecodable() {
        let err = extractor().extract(&[0x89, b'P', b'N', b'G', 0, 0]).unwrap_err();
        assert!(matches!(err, ExtractError::Undecodable));
    }

    #[test]
    fn test_extract_rss_titles() {
        let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
            <rss version="2.0"><channel>
              <title>Channel title is skipped</title>
              <item><title>Tesla deliveries beat &amp; shares climb&#33;</title><link>http://x</link></item>
              <item><title><![CDATA[Amazon expands AWS regions]]></title></item>
            </channel></rss>"#;
        let fragments = extractor().extract(rss.as_bytes()).unwrap();
        assert_eq!(
            fragments,
            vec![
                "Tesla deliveries beat & shares climb!",
                "Amazon expands AWS regions"
            ]
        );
    }

    #[test]
    fn test_extract_atom_titles() {
        let atom = r#"<feed xmlns="http://www.w3.org/2005/Atom">
              <title>Feed</title>
              <entry><title>Alphabet unveils search update</title></entry>
            </feed>"#;
        let fragments = extractor().extract(atom.as_bytes()).unwrap();
        assert_eq!(fragments, vec!["Alphabet unveils search update"]);
    }

    #[test]
    fn test_malformed_feed_is_error() {
        let rss = "<rss><channel><item><title>broken</item></channel></rss>";
        let err = extractor().extract(rss.as_bytes()).unwrap_err();
        assert!(matches!(err, ExtractError::Feed(_)));
    }
}
