//! Capability traits over the browser session
//!
//! The collector and the retry runner only ever talk to a results page
//! through [`ResultPageExtractor`], and only ever obtain a fresh session
//! through [`SessionFactory`]. The production implementation drives a real
//! Chromium instance; tests substitute scripted fakes.

use crate::search::{SearchError, SearchQuery};
use async_trait::async_trait;

/// A live, stateful search-results page
#[async_trait]
pub trait ResultPageExtractor: Send {
    /// Loads the engine at the URL built from `query`
    async fn navigate(&mut self, query: &SearchQuery) -> Result<(), SearchError>;

    /// Outbound result links on the currently loaded page, in page order
    ///
    /// Links back to the engine itself and links to non-document files are
    /// already filtered out.
    async fn current_page_urls(&mut self) -> Result<Vec<String>, SearchError>;

    /// Whether the loaded page is the engine's "unusual traffic" interstitial
    async fn has_bot_block_signal(&mut self) -> Result<bool, SearchError>;

    /// Activates result page `n`; `Ok(false)` means there is no such page
    async fn goto_page(&mut self, n: u32) -> Result<bool, SearchError>;

    /// Releases the session; the default does nothing
    async fn close(&mut self) -> Result<(), SearchError> {
        Ok(())
    }
}

/// Launches brand-new sessions, shedding any state the previous one carried
#[async_trait]
pub trait SessionFactory: Send + Sync {
    type Session: ResultPageExtractor;

    async fn launch(&self) -> Result<Self::Session, SearchError>;
}
