//! One day of crawling: search, collect, fetch, score
//!
//! The pipeline performs no day-level recovery: whatever the search runner
//! gives up on propagates unchanged to the coordinator.

use crate::config::Config;
use crate::crawler::fetcher::PageFetcher;
use crate::matcher::{extract_text, KeywordMatchCounts, KeywordMatcher};
use crate::output::DailyResult;
use crate::search::{DateWindow, ResilientSearchRunner, SearchQuery, SessionFactory};
use crate::SweepError;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Per-run search parameters shared by every day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    pub required_keywords: Vec<String>,
    pub optional_keywords: Vec<String>,
    pub max_pages: u32,
    pub max_attempts: u32,
    /// Pages fetched and scored at once
    pub concurrency: usize,
}

impl SearchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            required_keywords: config.search.required_keywords.clone(),
            optional_keywords: config.search.optional_keywords.clone(),
            max_pages: config.search.max_pages,
            max_attempts: config.search.max_attempts,
            concurrency: config.fetcher.concurrency as usize,
        }
    }
}

/// Composes search, collection and scoring for a single day
pub struct DailyPipeline<F: SessionFactory> {
    runner: ResilientSearchRunner<F>,
    fetcher: Arc<dyn PageFetcher>,
    matcher: Arc<KeywordMatcher>,
    settings: SearchSettings,
}

impl<F: SessionFactory> DailyPipeline<F> {
    pub fn new(
        runner: ResilientSearchRunner<F>,
        fetcher: Arc<dyn PageFetcher>,
        matcher: Arc<KeywordMatcher>,
        settings: SearchSettings,
    ) -> Self {
        Self {
            runner,
            fetcher,
            matcher,
            settings,
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn content_keywords(&self) -> &[String] {
        self.matcher.keywords()
    }

    /// Searches `date` and scores every collected page
    ///
    /// # Arguments
    ///
    /// * `date` - The day to search, as a single-day window
    ///
    /// # Returns
    ///
    /// * `Ok(DailyResult)` - URLs plus pages matched per content keyword
    /// * `Err(SweepError)` - The search runner gave up; day not completed
    pub async fn run_day(&mut self, date: NaiveDate) -> Result<DailyResult, SweepError> {
        let query = SearchQuery::new(
            self.settings.required_keywords.clone(),
            self.settings.optional_keywords.clone(),
            DateWindow::single_day(date),
        );

        tracing::info!("Searching {}", date);
        let urls = self
            .runner
            .run(&query, self.settings.max_pages, self.settings.max_attempts)
            .await?;

        tracing::info!("{}: {} result URLs, scoring pages", date, urls.len());
        let match_counts = self.score(&urls).await;

        Ok(DailyResult {
            date,
            urls,
            match_counts,
        })
    }

    /// Closes the browser session held by the runner
    pub async fn shutdown(&mut self) {
        self.runner.shutdown().await;
    }

    /// Fetches every URL and counts, per keyword, the pages that match
    async fn score(&self, urls: &[String]) -> KeywordMatchCounts {
        let fetcher = &self.fetcher;
        let matcher = &self.matcher;

        let mut pages = stream::iter(urls)
            .map(|url| async move {
                let body = fetcher.fetch(url).await;
                let matches = matcher.match_text(&extract_text(&body));
                tracing::trace!("Scored {} ({} bytes)", url, body.len());
                matches
            })
            .buffer_unordered(self.settings.concurrency.max(1));

        let mut counts = KeywordMatchCounts::new(matcher.keywords());
        while let Some(matches) = pages.next().await {
            counts.record_page(&matches);
        }
        counts
    }
}
