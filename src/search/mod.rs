//! Search module: from a date window to a list of result URLs
//!
//! This module handles:
//! - Building date-filtered search queries
//! - Driving a browser session over the results pages
//! - Filtering result links and detecting the bot-block interstitial
//! - Paginating and retrying a day's search with fresh sessions

mod browser;
mod collector;
mod extractor;
mod links;
mod query;
mod runner;

#[cfg(test)]
pub(crate) mod fake;

pub use browser::{ChromeSession, ChromeSessionFactory};
pub use collector::PaginatedCollector;
pub use extractor::{ResultPageExtractor, SessionFactory};
pub use links::{contains_bot_block_marker, find_page_link, ResultLinkFilter, BOT_BLOCK_MARKER};
pub use query::{DateWindow, SearchQuery, ENGINE_DATE_FORMAT};
pub use runner::ResilientSearchRunner;

use thiserror::Error;

/// Errors raised while driving a search session
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Bot-block interstitial detected (\"{marker}\")")]
    BotDetected { marker: String },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Failed to extract results: {0}")]
    Extraction(String),

    #[error("Interrupted by shutdown signal")]
    Interrupted,
}
