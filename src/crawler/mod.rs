//! Crawler module for day-by-day search crawling
//!
//! This module contains the core crawling logic, including:
//! - Fail-soft page fetching
//! - Randomized, cancellable pacing
//! - The per-day search-and-score pipeline
//! - Overall crawl coordination

mod coordinator;
mod daily;
mod fetcher;
mod pacing;

pub use coordinator::Coordinator;
pub use daily::{DailyPipeline, SearchSettings};
pub use fetcher::{build_http_client, HttpFetcher, PageFetcher};
pub use pacing::{InstantPacer, Interrupted, JitterPacer, Pacer, Pause};

use crate::config::Config;
use crate::matcher::KeywordMatcher;
use crate::output::{CsvReportWriter, ReportPaths, ReportWriter};
use crate::search::{ChromeSessionFactory, DateWindow, ResilientSearchRunner};
use crate::SweepError;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the browser session factory and the HTTP client
/// 2. Search, collect and score every day of the configured range
/// 3. Stop at the first failed day, keeping the completed ones
/// 4. Write the report CSV and its metadata sidecar
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file, recorded in the sidecar
/// * `cancel` - Cancelled on shutdown; interrupts the current wait
///
/// # Returns
///
/// * `Ok(ReportPaths)` - The files written
/// * `Err(SweepError)` - Setup or report writing failed
pub async fn crawl(
    config: Config,
    config_hash: Option<String>,
    cancel: CancellationToken,
) -> Result<ReportPaths, SweepError> {
    let window = DateWindow::new(config.dates.from, config.dates.to)?;

    let pacer: Arc<dyn Pacer> = Arc::new(JitterPacer::new(config.pacing, cancel));
    let factory = ChromeSessionFactory::new(config.browser.clone(), &config.search.base_url)?;
    let runner = ResilientSearchRunner::new(factory, pacer.clone());
    let fetcher = Arc::new(HttpFetcher::from_config(&config.fetcher)?);
    let matcher = Arc::new(KeywordMatcher::new(&config.content.keywords));

    let pipeline = DailyPipeline::new(
        runner,
        fetcher,
        matcher,
        SearchSettings::from_config(&config),
    );
    let mut coordinator = Coordinator::new(pipeline, pacer);
    if let Some(hash) = config_hash {
        coordinator = coordinator.with_config_hash(hash);
    }

    let report = coordinator.run(window).await;
    if report.is_truncated() {
        tracing::warn!(
            "Run covers {} to {} (requested up to {})",
            report.metadata.actual_from,
            report.metadata.actual_to,
            report.metadata.requested_to
        );
    }

    let paths = CsvReportWriter::new(&config.output.folder).write_report(&report)?;
    Ok(paths)
}
