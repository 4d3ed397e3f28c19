//! Retry state for one day's search
//!
//! The bounded collect/restart cycle as an explicit state machine: every
//! attempt starts in `Collecting`, and only `fail` and `resume` move it.

use crate::SweepError;
use std::fmt;

/// Phase of a day's search attempt cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchPhase {
    // ===== Active States =====
    /// Navigated and paginating through results
    Collecting,

    /// Tearing down the browser session and building a fresh one
    Restarting,

    // ===== Terminal States =====
    /// Results collected
    Succeeded,

    /// Every allowed attempt failed
    Exhausted,
}

impl SearchPhase {
    /// Returns true if no further transition is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Exhausted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collecting => "collecting",
            Self::Restarting => "restarting",
            Self::Succeeded => "succeeded",
            Self::Exhausted => "exhausted",
        }
    }
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attempt counter plus current phase, alive for one day's search
///
/// Starts at attempt 1 in `Collecting`. A failed attempt moves to
/// `Restarting` while attempts remain and to `Exhausted` otherwise, so an
/// attempt beyond `max_attempts` is never started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    max_attempts: u32,
    phase: SearchPhase,
}

impl RetryState {
    /// Creates the state for a fresh day; `max_attempts` is clamped to >= 1
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 1,
            max_attempts: max_attempts.max(1),
            phase: SearchPhase::Collecting,
        }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Collecting -> Succeeded
    pub fn succeed(&mut self) -> Result<(), SweepError> {
        self.transition(SearchPhase::Collecting, SearchPhase::Succeeded)
    }

    /// Collecting -> Restarting, or Collecting -> Exhausted on the last attempt
    pub fn fail(&mut self) -> Result<SearchPhase, SweepError> {
        let next = if self.attempt < self.max_attempts {
            SearchPhase::Restarting
        } else {
            SearchPhase::Exhausted
        };
        self.transition(SearchPhase::Collecting, next)?;
        Ok(next)
    }

    /// Restarting -> Collecting, starting the next attempt
    pub fn resume(&mut self) -> Result<(), SweepError> {
        self.transition(SearchPhase::Restarting, SearchPhase::Collecting)?;
        self.attempt += 1;
        Ok(())
    }

    fn transition(&mut self, expected: SearchPhase, to: SearchPhase) -> Result<(), SweepError> {
        if self.phase != expected {
            return Err(SweepError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        Ok(())
    }
}
