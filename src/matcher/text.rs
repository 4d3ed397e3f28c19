//! Visible-text extraction from fetched HTML
//!
//! Keyword scoring runs over the readable text of a page, not its markup.
//! Text nodes sitting directly inside non-content elements (scripts, styles,
//! metadata) are skipped.

use scraper::Html;

/// Elements whose direct text children never count as page content
const TAG_BLACKLIST: &[&str] = &["noscript", "html", "meta", "head", "input", "script", "style"];

/// Extracts the readable text of an HTML document
///
/// Invalid UTF-8 is decoded lossily. Text nodes are trimmed and joined with
/// single spaces; empty input gives empty text.
///
/// # Example
///
/// ```
/// use news_sweep::matcher::extract_text;
///
/// let html = br#"<html><body><p>Main Street</p><script>var x;</script></body></html>"#;
/// assert_eq!(extract_text(html), "Main Street");
/// ```
pub fn extract_text(html: &[u8]) -> String {
    if html.is_empty() {
        return String::new();
    }

    let source = String::from_utf8_lossy(html);
    let document = Html::parse_document(&source);

    let mut parts = Vec::new();
    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let blacklisted = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|e| e.name()))
            .is_some_and(|name| TAG_BLACKLIST.contains(&name));
        if blacklisted {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}
