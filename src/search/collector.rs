//! Paginated result collection
//!
//! Walks an already-navigated results page forward, page by page, pausing
//! between pages and bailing out the moment the engine shows its bot-block
//! interstitial.

use crate::crawler::{Pacer, Pause};
use crate::search::extractor::ResultPageExtractor;
use crate::search::links::BOT_BLOCK_MARKER;
use crate::search::SearchError;

/// Collects result URLs across up to `max_pages` pages
pub struct PaginatedCollector<'a, E: ResultPageExtractor + ?Sized> {
    extractor: &'a mut E,
    pacer: &'a dyn Pacer,
}

impl<'a, E: ResultPageExtractor + ?Sized> PaginatedCollector<'a, E> {
    pub fn new(extractor: &'a mut E, pacer: &'a dyn Pacer) -> Self {
        Self { extractor, pacer }
    }

    /// Collects URLs from the current page and up to `max_pages - 1` more
    ///
    /// # Algorithm
    ///
    /// 1. Read the URLs of the current (first) page
    /// 2. For pages 2..=max_pages:
    ///    a. Fail with `BotDetected` if the bot-block marker is showing
    ///    b. Pause to emulate human pacing
    ///    c. Ask for the next page; stop early (successfully) if there is none
    ///    d. Append that page's URLs
    ///
    /// Duplicates across pages are kept, in discovery order.
    pub async fn collect(&mut self, max_pages: u32) -> Result<Vec<String>, SearchError> {
        let mut urls = self.extractor.current_page_urls().await?;
        tracing::debug!("Page 1: {} result links", urls.len());

        for page in 2..=max_pages {
            if self.extractor.has_bot_block_signal().await? {
                tracing::warn!("Bot-block interstitial seen before page {}", page);
                return Err(SearchError::BotDetected {
                    marker: BOT_BLOCK_MARKER.to_string(),
                });
            }

            self.pacer.pause(Pause::BetweenPages).await?;

            if !self.extractor.goto_page(page).await? {
                tracing::debug!("No page {}, pagination ends", page);
                break;
            }

            let page_urls = self.extractor.current_page_urls().await?;
            tracing::debug!("Page {}: {} result links", page, page_urls.len());
            urls.extend(page_urls);
        }

        Ok(urls)
    }
}
