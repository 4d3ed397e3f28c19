//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the day loop that coordinates the whole run:
//! - Walking the date window one day at a time, strictly in order
//! - Pacing between days
//! - Truncating the run at the first failed day
//! - Assembling the final report

use crate::crawler::daily::DailyPipeline;
use crate::crawler::pacing::{Pacer, Pause};
use crate::output::{CrawlReport, RunMetadata};
use crate::search::{DateWindow, SessionFactory};
use chrono::NaiveDate;
use std::sync::Arc;

/// Main crawler coordinator structure
pub struct Coordinator<F: SessionFactory> {
    pipeline: DailyPipeline<F>,
    pacer: Arc<dyn Pacer>,
    config_hash: Option<String>,
}

impl<F: SessionFactory> Coordinator<F> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `pipeline` - Runs one day at a time
    /// * `pacer` - Provides the inter-day pause
    pub fn new(pipeline: DailyPipeline<F>, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            pipeline,
            pacer,
            config_hash: None,
        }
    }

    /// Records the configuration hash in the report metadata
    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    /// Runs every day of `window` and assembles the report
    ///
    /// # Partial failure
    ///
    /// The first day whose pipeline fails (search exhausted, interrupted,
    /// anything else) ends the loop. The report keeps every day completed
    /// before it and its `actual_to` becomes the day preceding the failed
    /// one. An interruption during the pause after a completed day keeps
    /// that day.
    ///
    /// The browser session is closed before returning.
    pub async fn run(&mut self, window: DateWindow) -> CrawlReport {
        tracing::info!(
            "Starting crawl of {} days ({} to {})",
            window.len_days(),
            window.from(),
            window.to()
        );

        let mut rows = Vec::new();
        let mut actual_to = window.to();

        for date in window.days() {
            match self.pipeline.run_day(date).await {
                Ok(result) => {
                    tracing::info!(
                        "Completed {}: {} URLs collected",
                        date,
                        result.url_quantity()
                    );
                    rows.push(result);

                    if date < window.to() && self.pacer.pause(Pause::BetweenDays).await.is_err() {
                        tracing::warn!("Interrupted after {}, stopping crawl", date);
                        actual_to = date;
                        break;
                    }
                }
                Err(e) => {
                    if e.is_day_ending() {
                        tracing::warn!("Day {} failed: {}", date, e);
                    } else {
                        tracing::error!("Unexpected failure on {}: {}", date, e);
                    }
                    actual_to = date.pred_opt().unwrap_or(NaiveDate::MIN);
                    tracing::warn!(
                        "Truncating run: reporting {} to {} instead of {}",
                        window.from(),
                        actual_to,
                        window.to()
                    );
                    break;
                }
            }
        }

        self.pipeline.shutdown().await;

        tracing::info!("Crawl finished with {} completed days", rows.len());

        let settings = self.pipeline.settings();
        CrawlReport {
            rows,
            metadata: RunMetadata {
                required_keywords: settings.required_keywords.clone(),
                optional_keywords: settings.optional_keywords.clone(),
                content_keywords: self.pipeline.content_keywords().to_vec(),
                actual_from: window.from(),
                actual_to,
                requested_to: window.to(),
                max_pages: settings.max_pages,
                config_hash: self.config_hash.clone(),
            },
        }
    }
}
