//! Timer engine module
//!
//! Owns the timer state machine and the task ledger, and the combined
//! [`Tracker`] that commands operate on.

pub mod error;
pub mod ledger;
pub mod timer;

pub use error::EngineError;
pub use ledger::{TaskLedger, TaskSegment};
pub use timer::TimerState;

/// Timer plus ledger as one unit.
///
/// `cut` reads timer state and mutates ledger state as a single logical
/// transaction, so the two always live behind the same mutex.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tracker {
    pub timer: TimerState,
    pub ledger: TaskLedger,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the current task segment at instant `now`.
    ///
    /// Cutting while paused is rejected: the segment's duration would be
    /// ambiguous with no run segment open.
    pub fn cut(&mut self, now: u64, name: Option<String>) -> Result<TaskSegment, EngineError> {
        if !self.timer.running {
            return Err(EngineError::InvalidState(
                "cannot cut a task while the timer is paused",
            ));
        }
        let elapsed = self.timer.current_elapsed(now);
        Ok(self.ledger.cut(elapsed, name))
    }

    /// Zero the timer and empty the ledger. Always succeeds.
    pub fn reset(&mut self) {
        self.timer.reset();
        self.ledger.clear();
    }
}
