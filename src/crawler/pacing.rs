//! Randomized human-like pauses
//!
//! Every wait in a crawl goes through a [`Pacer`]: between result pages,
//! around a browser restart and between days. The production pacer sleeps
//! a uniformly random number of whole seconds and wakes early when the
//! shutdown token fires.

use crate::config::PacingConfig;
use crate::search::SearchError;
use crate::SweepError;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A wait cut short by a shutdown request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interrupted;

impl From<Interrupted> for SearchError {
    fn from(_: Interrupted) -> Self {
        SearchError::Interrupted
    }
}

impl From<Interrupted> for SweepError {
    fn from(_: Interrupted) -> Self {
        SweepError::Interrupted
    }
}

/// The points in a crawl where a pause is taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pause {
    /// Before requesting the next results page
    BetweenPages,
    /// After a new browser session is launched
    RestartCooldown,
    /// After the fresh session re-navigated to the query
    RenavigateCooldown,
    /// After a day completed, before the next one starts
    BetweenDays,
}

impl Pause {
    /// The `[min, max]` seconds configured for this pause
    pub fn range(&self, config: &PacingConfig) -> [u64; 2] {
        match self {
            Self::BetweenPages => config.between_pages,
            Self::RestartCooldown => config.restart_cooldown,
            Self::RenavigateCooldown => config.renavigate_cooldown,
            Self::BetweenDays => config.between_days,
        }
    }
}

/// Something that can wait between crawl steps
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Waits for `pause`; `Err(Interrupted)` if shutdown was requested
    async fn pause(&self, pause: Pause) -> Result<(), Interrupted>;
}

/// Sleeps a random duration drawn from the configured ranges
#[derive(Debug, Clone)]
pub struct JitterPacer {
    config: PacingConfig,
    cancel: CancellationToken,
}

impl JitterPacer {
    pub fn new(config: PacingConfig, cancel: CancellationToken) -> Self {
        Self { config, cancel }
    }

    /// Draws a duration for `pause`, inclusive of both bounds
    pub fn sample(&self, pause: Pause) -> Duration {
        let [min, max] = pause.range(&self.config);
        let secs = if min >= max {
            min
        } else {
            rand::rng().random_range(min..=max)
        };
        Duration::from_secs(secs)
    }
}

#[async_trait]
impl Pacer for JitterPacer {
    async fn pause(&self, pause: Pause) -> Result<(), Interrupted> {
        if self.cancel.is_cancelled() {
            return Err(Interrupted);
        }

        let duration = self.sample(pause);
        tracing::trace!("Pausing {:?} for {}s", pause, duration.as_secs());

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Interrupted),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}

/// Never waits; used where pacing is irrelevant
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantPacer;

#[async_trait]
impl Pacer for InstantPacer {
    async fn pause(&self, _pause: Pause) -> Result<(), Interrupted> {
        Ok(())
    }
}
