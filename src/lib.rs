//! News-Sweep: a date-windowed search crawler
//!
//! For every day in a date range this crate issues a date-filtered search,
//! paginates through the result pages with a real browser session, fetches
//! every discovered page and counts how many of them mention each content
//! keyword. Completed days become rows of a CSV report.

pub mod config;
pub mod crawler;
pub mod matcher;
pub mod output;
pub mod search;
pub mod state;

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for News-Sweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Search error: {0}")]
    Search(#[from] search::SearchError),

    #[error("Search for {date} abandoned after {attempts} attempts")]
    MaxTrialsReached { date: NaiveDate, attempts: u32 },

    #[error("Interrupted by shutdown signal")]
    Interrupted,

    #[error("Invalid retry transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::SearchPhase,
        to: state::SearchPhase,
    },

    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SweepError {
    /// Returns true for failures that end the current day
    ///
    /// Every error escaping a day's pipeline ends that day; this only
    /// distinguishes the expected ones from bugs worth a louder log line.
    pub fn is_day_ending(&self) -> bool {
        matches!(
            self,
            Self::MaxTrialsReached { .. } | Self::Interrupted | Self::Search(_)
        )
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid keyword: {0}")]
    InvalidKeyword(String),
}

/// Result type alias for News-Sweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator, DailyPipeline};
pub use matcher::{KeywordMatchCounts, KeywordMatcher};
pub use output::{CrawlReport, DailyResult};
pub use search::{DateWindow, SearchQuery};
pub use state::{RetryState, SearchPhase};
