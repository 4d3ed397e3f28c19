//! Content scoring
//!
//! This module turns fetched page bytes into keyword hits:
//! - HTML text extraction
//! - Diacritic- and case-insensitive keyword matching
//! - Per-day accumulation of matched-page counts

mod counts;
mod keyword;
mod text;

pub use counts::KeywordMatchCounts;
pub use keyword::{match_keywords, normalize_text, KeywordMatcher};
pub use text::extract_text;
