//! Chromium-backed search session
//!
//! Each [`ChromeSession`] owns one browser process and one tab. Restarting a
//! search means closing the session and launching a brand-new one through
//! [`ChromeSessionFactory`], which sheds cookies, flagged fingerprints and
//! crashed tabs alike.

use crate::config::BrowserConfig;
use crate::search::extractor::{ResultPageExtractor, SessionFactory};
use crate::search::links::{contains_bot_block_marker, find_page_link, ResultLinkFilter};
use crate::search::{SearchError, SearchQuery};
use async_trait::async_trait;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use url::Url;

/// Launch flags applied to every session
const CHROME_ARGS: &[&str] = &[
    "--disable-dev-shm-usage",
    "--incognito",
    "--disable-blink-features=AutomationControlled",
    "--disable-popup-blocking",
];

/// Launches fresh Chromium sessions pointed at one search engine
#[derive(Debug, Clone)]
pub struct ChromeSessionFactory {
    config: BrowserConfig,
    base_url: Url,
    link_filter: ResultLinkFilter,
}

impl ChromeSessionFactory {
    pub fn new(config: BrowserConfig, base_url: &str) -> Result<Self, SearchError> {
        let base_url = Url::parse(base_url).map_err(|e| SearchError::Navigation {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        let link_filter = ResultLinkFilter::for_engine(&base_url);

        Ok(Self {
            config,
            base_url,
            link_filter,
        })
    }

    fn browser_config(&self) -> Result<chromiumoxide::BrowserConfig, SearchError> {
        let mut builder = chromiumoxide::BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(Duration::from_secs(self.config.page_load_timeout));

        for arg in CHROME_ARGS {
            builder = builder.arg(*arg);
        }

        if !self.config.headless {
            builder = builder.with_head();
        }

        if let Some(executable) = &self.config.chrome_executable {
            builder = builder.chrome_executable(executable);
        }

        builder.build().map_err(SearchError::Browser)
    }
}

#[async_trait]
impl SessionFactory for ChromeSessionFactory {
    type Session = ChromeSession;

    async fn launch(&self) -> Result<ChromeSession, SearchError> {
        tracing::debug!("Launching browser (headless: {})", self.config.headless);

        let (browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| SearchError::Browser(format!("launch failed: {}", e)))?;

        // The CDP handler must be polled for the browser to make progress
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    // Newer Chrome builds emit messages chromiumoxide cannot decode
                    tracing::trace!("CDP handler error (continuing): {}", e);
                }
            }
            tracing::debug!("CDP handler task completed");
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(SearchError::Browser(format!("failed to open tab: {}", e)));
            }
        };

        Ok(ChromeSession {
            browser,
            page,
            handler_task,
            base_url: self.base_url.clone(),
            link_filter: self.link_filter.clone(),
        })
    }
}

/// One live browser process with a single results tab
pub struct ChromeSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    base_url: Url,
    link_filter: ResultLinkFilter,
}

impl ChromeSession {
    async fn html(&self) -> Result<String, SearchError> {
        self.page
            .content()
            .await
            .map_err(|e| SearchError::Extraction(format!("failed to read page: {}", e)))
    }

    /// URL of the loaded page, falling back to the engine URL
    async fn page_url(&self) -> Url {
        match self.page.url().await {
            Ok(Some(current)) => Url::parse(&current).unwrap_or_else(|_| self.base_url.clone()),
            _ => self.base_url.clone(),
        }
    }

    async fn goto(&self, url: &str) -> Result<(), SearchError> {
        tracing::trace!("Navigating to {}", url);
        self.page
            .goto(url)
            .await
            .map(|_| ())
            .map_err(|e| SearchError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl ResultPageExtractor for ChromeSession {
    async fn navigate(&mut self, query: &SearchQuery) -> Result<(), SearchError> {
        let url = query.to_url(self.base_url.as_str());
        self.goto(&url).await
    }

    async fn current_page_urls(&mut self) -> Result<Vec<String>, SearchError> {
        let html = self.html().await?;
        let page_url = self.page_url().await;
        Ok(self.link_filter.extract(&html, &page_url))
    }

    async fn has_bot_block_signal(&mut self) -> Result<bool, SearchError> {
        let html = self.html().await?;
        Ok(contains_bot_block_marker(&html))
    }

    async fn goto_page(&mut self, n: u32) -> Result<bool, SearchError> {
        let html = self.html().await?;
        let page_url = self.page_url().await;

        match find_page_link(&html, n, &page_url) {
            Some(href) => {
                self.goto(&href).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn close(&mut self) -> Result<(), SearchError> {
        let result = self.browser.close().await;
        // Reap the child process so restarts do not pile up zombies
        if let Err(e) = self.browser.wait().await {
            tracing::debug!("Failed to reap browser process: {}", e);
        }
        self.handler_task.abort();

        result
            .map(|_| ())
            .map_err(|e| SearchError::Browser(format!("close failed: {}", e)))
    }
}
