//! Timer state structure and transitions
//!
//! Elapsed time is always derived from a persisted start instant and the
//! current clock (`stored_elapsed_at_start + (now - start_epoch)`), never
//! from counting ticks, so delayed ticks and full process restarts
//! self-correct instead of losing time.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::EngineError;

/// Authoritative run/pause state of a single timer.
///
/// Invariants:
/// - `running == true` iff `start_epoch` is present.
/// - `elapsed_seconds` never decreases except through [`TimerState::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Frozen elapsed time while paused; while running it is a snapshot
    /// that `current_elapsed` supersedes.
    pub elapsed_seconds: u64,
    pub running: bool,
    /// Unix timestamp (seconds) at which the current run segment began.
    pub start_epoch: Option<u64>,
    /// `elapsed_seconds` at the moment the current run segment began.
    /// Keeps the `now - start_epoch` baseline stable across pause/resume.
    pub stored_elapsed_at_start: u64,
}

impl TimerState {
    /// Create a paused timer at zero elapsed time.
    pub fn new() -> Self {
        Self {
            elapsed_seconds: 0,
            running: false,
            start_epoch: None,
            stored_elapsed_at_start: 0,
        }
    }

    /// Begin a run segment at `now`.
    ///
    /// Rejected with `InvalidState` if already running; `start_epoch` is
    /// never overwritten by a second start.
    pub fn start(&mut self, now: u64) -> Result<(), EngineError> {
        if self.running {
            return Err(EngineError::InvalidState("timer is already running"));
        }
        self.stored_elapsed_at_start = self.elapsed_seconds;
        self.start_epoch = Some(now);
        self.running = true;
        Ok(())
    }

    /// End the current run segment at `now`, freezing elapsed time.
    ///
    /// Rejected with `InvalidState` if already paused.
    pub fn pause(&mut self, now: u64) -> Result<(), EngineError> {
        if !self.running {
            return Err(EngineError::InvalidState("timer is not running"));
        }
        self.elapsed_seconds = self.current_elapsed(now);
        self.stored_elapsed_at_start = self.elapsed_seconds;
        self.running = false;
        self.start_epoch = None;
        Ok(())
    }

    /// Return to zero elapsed, paused. Always succeeds.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Elapsed seconds at instant `now`. Pure read, safe at any frequency.
    ///
    /// A clock that moved backwards past `start_epoch` yields a zero delta,
    /// never a negative one, so the result is always at least
    /// `stored_elapsed_at_start`.
    pub fn current_elapsed(&self, now: u64) -> u64 {
        match (self.running, self.start_epoch) {
            (true, Some(epoch)) => self.stored_elapsed_at_start + now.saturating_sub(epoch),
            _ => self.elapsed_seconds,
        }
    }

    /// The value to persist under the `elapsed_seconds` key: the frozen
    /// total while paused, the run-segment baseline while running.
    pub fn persisted_elapsed(&self) -> u64 {
        if self.running {
            self.stored_elapsed_at_start
        } else {
            self.elapsed_seconds
        }
    }

    /// Rebuild a timer from persisted values, reconciling elapsed time
    /// against the current clock.
    ///
    /// If the timer was persisted as running, all wall-clock time since
    /// `start_epoch` is credited immediately, including time the process
    /// itself was not alive. A running flag without a start instant is
    /// corrupted state and degrades to paused at the stored elapsed value.
    pub fn from_persisted(
        elapsed_seconds: u64,
        running: bool,
        start_epoch: Option<u64>,
        now: u64,
    ) -> Self {
        match (running, start_epoch) {
            (true, Some(epoch)) => Self {
                elapsed_seconds: elapsed_seconds + now.saturating_sub(epoch),
                running: true,
                start_epoch: Some(epoch),
                stored_elapsed_at_start: elapsed_seconds,
            },
            (true, None) => {
                warn!(
                    "persisted state says running but has no start_epoch, \
                     recovering as paused at {}s",
                    elapsed_seconds
                );
                Self {
                    elapsed_seconds,
                    running: false,
                    start_epoch: None,
                    stored_elapsed_at_start: elapsed_seconds,
                }
            }
            (false, _) => Self {
                elapsed_seconds,
                running: false,
                start_epoch: None,
                stored_elapsed_at_start: elapsed_seconds,
            },
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
