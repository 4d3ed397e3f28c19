//! Bounded-retry search runner
//!
//! Runs one day's search through a [`RetryState`]. Each failed attempt
//! tears the browser session down, launches a fresh one, re-navigates to
//! the same query and tries again, until the attempt budget is spent.

use crate::crawler::{Pacer, Pause};
use crate::search::collector::PaginatedCollector;
use crate::search::extractor::{ResultPageExtractor, SessionFactory};
use crate::search::{SearchError, SearchQuery};
use crate::state::{RetryState, SearchPhase};
use crate::SweepError;
use std::sync::Arc;

/// Owns the live browser session and runs searches with restarts
///
/// The session survives across successful days; only a failed attempt
/// replaces it.
pub struct ResilientSearchRunner<F: SessionFactory> {
    factory: F,
    session: Option<F::Session>,
    pacer: Arc<dyn Pacer>,
}

impl<F: SessionFactory> ResilientSearchRunner<F> {
    /// Creates a runner; the first session is launched lazily
    pub fn new(factory: F, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            factory,
            session: None,
            pacer,
        }
    }

    /// Searches `query` and collects up to `max_pages` pages of result URLs
    ///
    /// # Arguments
    ///
    /// * `query` - The day's search
    /// * `max_pages` - Page budget per attempt
    /// * `max_attempts` - Total attempts, the first one included
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<String>)` - Result URLs in discovery order, duplicates kept
    /// * `Err(SweepError::MaxTrialsReached)` - Every attempt failed
    /// * `Err(SweepError::Interrupted)` - Shutdown requested mid-search
    pub async fn run(
        &mut self,
        query: &SearchQuery,
        max_pages: u32,
        max_attempts: u32,
    ) -> Result<Vec<String>, SweepError> {
        let mut state = RetryState::new(max_attempts);
        // A restart leaves the fresh session already on the query
        let mut navigated = false;

        loop {
            match state.phase() {
                SearchPhase::Collecting => match self.attempt(query, max_pages, navigated).await {
                    Ok(urls) => {
                        state.succeed()?;
                        return Ok(urls);
                    }
                    Err(SearchError::Interrupted) => return Err(SweepError::Interrupted),
                    Err(e) => {
                        tracing::warn!(
                            "Search for {} failed on attempt {}/{}: {}",
                            query.window().from(),
                            state.attempt(),
                            state.max_attempts(),
                            e
                        );
                        navigated = false;
                        state.fail()?;
                    }
                },
                SearchPhase::Restarting => {
                    tracing::info!(
                        "Restarting browser session for attempt {}/{}",
                        state.attempt() + 1,
                        state.max_attempts()
                    );
                    match self.restart(query).await {
                        Ok(()) => {
                            navigated = true;
                            state.resume()?;
                        }
                        Err(SearchError::Interrupted) => return Err(SweepError::Interrupted),
                        Err(e) => {
                            tracing::warn!("Browser restart failed: {}", e);
                            // The failed restart consumes the attempt it was preparing
                            state.resume()?;
                            state.fail()?;
                        }
                    }
                }
                SearchPhase::Succeeded | SearchPhase::Exhausted => break,
            }
        }

        Err(SweepError::MaxTrialsReached {
            date: query.window().from(),
            attempts: state.attempt(),
        })
    }

    /// Closes the live session, if any
    pub async fn shutdown(&mut self) {
        if let Some(mut session) = self.session.take() {
            if let Err(e) = session.close().await {
                tracing::warn!("Failed to close browser session: {}", e);
            }
        }
    }

    async fn attempt(
        &mut self,
        query: &SearchQuery,
        max_pages: u32,
        navigated: bool,
    ) -> Result<Vec<String>, SearchError> {
        if self.session.is_none() {
            self.session = Some(self.factory.launch().await?);
        }
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| SearchError::Browser("no browser session".to_string()))?;

        if !navigated {
            session.navigate(query).await?;
        }

        PaginatedCollector::new(session, self.pacer.as_ref())
            .collect(max_pages)
            .await
    }

    async fn restart(&mut self, query: &SearchQuery) -> Result<(), SearchError> {
        self.shutdown().await;

        let session = self.session.insert(self.factory.launch().await?);
        self.pacer.pause(Pause::RestartCooldown).await?;
        session.navigate(query).await?;
        self.pacer.pause(Pause::RenavigateCooldown).await?;
        Ok(())
    }
}
