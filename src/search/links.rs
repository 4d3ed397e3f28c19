//! Result-page HTML parsing
//!
//! This module extracts from a rendered search-results page:
//! - Outbound result links (engine-internal and non-document links excluded)
//! - The link to a numbered result page, if the pager offers one
//! - The "unusual traffic" interstitial marker

use scraper::{Html, Selector};
use url::{Host, Url};

/// Marker text the engine shows when it flags the session as automated
pub const BOT_BLOCK_MARKER: &str = "unusual traffic";

/// File extensions that never hold an article worth scoring
const NON_DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "txt", "png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Filters result links for one search engine
#[derive(Debug, Clone)]
pub struct ResultLinkFilter {
    /// Lowercase engine host, always excluded
    engine_host: String,

    /// Lowercase engine name, e.g. "google", matched against host labels;
    /// empty when the engine is addressed by IP
    engine_name: String,
}

/// Second-level labels that sit under a country code, as in `com.br`
const COUNTRY_SECOND_LEVEL: &[&str] = &["com", "co", "net", "org", "gov", "edu", "ac"];

/// Name label of a domain: the label left of its public suffix
///
/// Drops a leading `www`, the TLD and, under a two-letter country code,
/// a generic second level such as `com` or `co`.
fn registrable_name(domain: &str) -> String {
    let mut labels: Vec<&str> = domain.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() > 1 && labels[0] == "www" {
        labels.remove(0);
    }
    if labels.len() < 2 {
        return labels.first().map(|l| l.to_string()).unwrap_or_default();
    }

    let tld = labels.pop().unwrap_or_default();
    if tld.len() == 2 && labels.len() > 1 {
        if let Some(second) = labels.last() {
            if COUNTRY_SECOND_LEVEL.contains(second) {
                labels.pop();
            }
        }
    }

    labels.last().map(|l| l.to_string()).unwrap_or_default()
}

impl ResultLinkFilter {
    /// Derives the engine name from the engine's search URL
    ///
    /// `https://www.google.com/search` and `https://www.google.com.br/search`
    /// both yield `google`.
    pub fn for_engine(base_url: &Url) -> Self {
        let engine_host = base_url.host_str().unwrap_or_default().to_lowercase();

        let engine_name = match base_url.host() {
            Some(Host::Domain(domain)) => registrable_name(&domain.to_lowercase()),
            _ => String::new(),
        };

        Self {
            engine_host,
            engine_name,
        }
    }

    /// True if the host belongs to the engine's own domain family
    fn is_engine_host(&self, host: &str) -> bool {
        let host = host.to_lowercase();
        if host == self.engine_host {
            return true;
        }

        !self.engine_name.is_empty()
            && host
                .split('.')
                .any(|label| label.contains(self.engine_name.as_str()))
    }

    /// Extracts result links from a rendered results page, in page order
    ///
    /// Duplicates are kept.
    pub fn extract(&self, html: &str, page_url: &Url) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut links = Vec::new();

        if let Ok(a_selector) = Selector::parse("a[href]") {
            for element in document.select(&a_selector) {
                if let Some(href) = element.value().attr("href") {
                    if let Some(link) = self.resolve_result_link(href, page_url) {
                        links.push(link);
                    }
                }
            }
        }

        links
    }

    /// Resolves an href and applies the result-link rules
    ///
    /// Returns None if the link should be excluded:
    /// - not HTTPS after resolution
    /// - on the engine's own domains or a `/search` path
    /// - pointing at a non-document file
    fn resolve_result_link(&self, href: &str, page_url: &Url) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            return None;
        }

        let mut url = page_url.join(href).ok()?;

        // Engine redirect wrappers carry the real target in a parameter
        if self.is_engine_host(url.host_str()?) {
            if let Some(target) = unwrap_redirect(&url) {
                url = target;
            }
        }

        if url.scheme() != "https" {
            return None;
        }

        let host = url.host_str()?;
        if self.is_engine_host(host) {
            return None;
        }

        let path = url.path().to_lowercase();
        if path.contains("/search") {
            return None;
        }

        if let Some((_, extension)) = path.rsplit_once('.') {
            if NON_DOCUMENT_EXTENSIONS.contains(&extension) {
                return None;
            }
        }

        Some(url.to_string())
    }
}

/// Extracts the target of an engine redirect such as `/url?q=https://...`
fn unwrap_redirect(url: &Url) -> Option<Url> {
    if url.path() != "/url" {
        return None;
    }

    url.query_pairs()
        .find(|(key, _)| key == "q" || key == "url")
        .and_then(|(_, value)| Url::parse(&value).ok())
}

/// Finds the href of the pager control for result page `n`
///
/// The pager is an anchor of class `fl` whose text is the page number, or
/// an anchor labelled `Page n`.
pub fn find_page_link(html: &str, n: u32, page_url: &Url) -> Option<String> {
    let document = Html::parse_document(html);
    let number = n.to_string();

    if let Ok(selector) = Selector::parse("a.fl[href]") {
        for element in document.select(&selector) {
            let text: String = element.text().collect();
            if text.trim() == number {
                let href = element.value().attr("href")?;
                return page_url.join(href).ok().map(|u| u.to_string());
            }
        }
    }

    let labelled = format!("a[aria-label='Page {}'][href]", n);
    if let Ok(selector) = Selector::parse(&labelled) {
        if let Some(element) = document.select(&selector).next() {
            let href = element.value().attr("href")?;
            return page_url.join(href).ok().map(|u| u.to_string());
        }
    }

    None
}

/// Whether the page is the engine's automated-traffic interstitial
pub fn contains_bot_block_marker(html: &str) -> bool {
    html.contains(BOT_BLOCK_MARKER)
}
