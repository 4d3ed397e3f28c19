//! Shared helpers: an HTML-over-HTTP search session and a rewriting fetcher
//!
//! `HtmlSession` plays the browser's part against a wiremock "engine": it
//! GETs the query URL and pager links and runs the real link filter over
//! the returned HTML.

use async_trait::async_trait;
use news_sweep::crawler::{HttpFetcher, PageFetcher};
use news_sweep::search::{
    contains_bot_block_marker, find_page_link, ResultLinkFilter, ResultPageExtractor,
    SearchError, SearchQuery, SessionFactory,
};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

/// Host the canned result links point at
pub const NEWS_HOST: &str = "https://news.example.com";

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A results page with the given result links and optional pager entries
pub fn results_page(result_paths: &[&str], pager: &[(u32, &str)], blocked: bool) -> String {
    let mut body = String::from("<html><head><title>Results</title></head><body>");
    if blocked {
        body.push_str(
            "<p>Our systems have detected unusual traffic from your computer network.</p>",
        );
    }
    for path in result_paths {
        body.push_str(&format!(
            r#"<div class="g"><a href="{}{}">Result</a></div>"#,
            NEWS_HOST, path
        ));
    }
    // Engine-internal links that must never be collected
    body.push_str(r#"<a href="/search?q=related">Related</a>"#);
    body.push_str(r#"<a href="https://news.example.com/report.pdf">PDF</a>"#);
    for (n, href) in pager {
        body.push_str(&format!(r#"<a class="fl" href="{}">{}</a>"#, href, n));
    }
    body.push_str("</body></html>");
    body
}

/// A result-page session served over plain HTTP
pub struct HtmlSession {
    client: Client,
    base_url: Url,
    filter: ResultLinkFilter,
    current: Option<(Url, String)>,
    navigations: Arc<Mutex<Vec<String>>>,
}

impl HtmlSession {
    async fn load(&mut self, url: &str) -> Result<(), SearchError> {
        let navigation_error = |message: String| SearchError::Navigation {
            url: url.to_string(),
            message,
        };

        let parsed = Url::parse(url).map_err(|e| navigation_error(e.to_string()))?;
        let html = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| navigation_error(e.to_string()))?
            .text()
            .await
            .map_err(|e| navigation_error(e.to_string()))?;

        self.current = Some((parsed, html));
        Ok(())
    }

    fn page(&self) -> Result<&(Url, String), SearchError> {
        self.current
            .as_ref()
            .ok_or_else(|| SearchError::Extraction("nothing loaded".to_string()))
    }
}

#[async_trait]
impl ResultPageExtractor for HtmlSession {
    async fn navigate(&mut self, query: &SearchQuery) -> Result<(), SearchError> {
        let url = query.to_url(self.base_url.as_str());
        self.navigations.lock().unwrap().push(url.clone());
        self.load(&url).await
    }

    async fn current_page_urls(&mut self) -> Result<Vec<String>, SearchError> {
        let (url, html) = self.page()?;
        Ok(self.filter.extract(html, url))
    }

    async fn has_bot_block_signal(&mut self) -> Result<bool, SearchError> {
        let (_, html) = self.page()?;
        Ok(contains_bot_block_marker(html))
    }

    async fn goto_page(&mut self, n: u32) -> Result<bool, SearchError> {
        let (url, html) = self.page()?;
        match find_page_link(html, n, url) {
            Some(href) => {
                self.load(&href).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Launches [`HtmlSession`]s against one engine URL
#[derive(Clone)]
pub struct HtmlSessionFactory {
    client: Client,
    base_url: Url,
    launches: Arc<AtomicUsize>,
    navigations: Arc<Mutex<Vec<String>>>,
}

impl HtmlSessionFactory {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: Url::parse(base_url).unwrap(),
            launches: Arc::new(AtomicUsize::new(0)),
            navigations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    /// Every query URL navigated to, in order
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionFactory for HtmlSessionFactory {
    type Session = HtmlSession;

    async fn launch(&self) -> Result<HtmlSession, SearchError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(HtmlSession {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            filter: ResultLinkFilter::for_engine(&self.base_url),
            current: None,
            navigations: self.navigations.clone(),
        })
    }
}

/// Sends result-link fetches for [`NEWS_HOST`] to a mock server instead
pub struct RewritingFetcher {
    inner: HttpFetcher,
    target: String,
}

impl RewritingFetcher {
    pub fn new(target: &str) -> Self {
        Self {
            inner: HttpFetcher::new(Client::new()),
            target: target.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PageFetcher for RewritingFetcher {
    async fn fetch(&self, url: &str) -> Vec<u8> {
        let rewritten = url.replacen(NEWS_HOST, &self.target, 1);
        self.inner.fetch(&rewritten).await
    }
}
