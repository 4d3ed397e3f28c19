//! State module for tracking search progress
//!
//! # Components
//!
//! - `RetryState`: Attempt counter and phase of one day's search
//! - `SearchPhase`: Collecting / Restarting / Succeeded / Exhausted

mod search_state;

// Re-export main types
pub use search_state::{RetryState, SearchPhase};
