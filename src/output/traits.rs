//! Report writer trait and report types
//!
//! This module defines the trait interface for report writers and the
//! data structures a crawl produces.

use crate::matcher::KeywordMatchCounts;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed report: {0}")]
    Format(String),

    #[error("Column not found in any report: {0}")]
    MissingColumn(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One successfully completed day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyResult {
    /// The searched day
    pub date: NaiveDate,

    /// Collected result URLs, discovery order, duplicates kept
    pub urls: Vec<String>,

    /// Pages matched per content keyword
    pub match_counts: KeywordMatchCounts,
}

impl DailyResult {
    pub fn url_quantity(&self) -> usize {
        self.urls.len()
    }
}

/// Run-level facts written to the metadata sidecar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    #[serde(rename = "search keywords")]
    pub required_keywords: Vec<String>,

    #[serde(rename = "optional search keywords")]
    pub optional_keywords: Vec<String>,

    #[serde(rename = "content keywords")]
    pub content_keywords: Vec<String>,

    /// First day of the run
    #[serde(rename = "from date")]
    pub actual_from: NaiveDate,

    /// Last day actually covered; before `requested_to` when truncated
    #[serde(rename = "to date")]
    pub actual_to: NaiveDate,

    #[serde(rename = "requested to date")]
    pub requested_to: NaiveDate,

    #[serde(rename = "max pages by search")]
    pub max_pages: u32,

    #[serde(rename = "config hash")]
    pub config_hash: Option<String>,
}

/// The rows of a run plus its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub rows: Vec<DailyResult>,
    pub metadata: RunMetadata,
}

impl CrawlReport {
    /// Whether a failed day cut the run short
    pub fn is_truncated(&self) -> bool {
        self.metadata.actual_to < self.metadata.requested_to
    }
}

/// Where a report was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub csv: PathBuf,
    pub metadata: PathBuf,
}

/// Trait for report writers
///
/// Implementations persist a finished [`CrawlReport`] and tell the caller
/// where it went.
pub trait ReportWriter {
    /// Persists the report
    ///
    /// # Arguments
    ///
    /// * `report` - The finished crawl report
    ///
    /// # Returns
    ///
    /// * `Ok(ReportPaths)` - Files written
    /// * `Err(OutputError)` - Failed to write the report
    fn write_report(&self, report: &CrawlReport) -> OutputResult<ReportPaths>;
}
