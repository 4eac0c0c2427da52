//! Persistence module
//!
//! Durable key-value snapshot of the tracker, written through on every
//! state change and reconciled on startup.

pub mod sqlite;

pub use sqlite::Store;

use serde::{Deserialize, Serialize};

use crate::engine::{TaskLedger, TaskSegment, TimerState, Tracker};

/// Everything the tracker persists, in the shape of the key-value
/// contract: `elapsed_seconds`, `is_running`, `start_epoch` (present iff
/// running), `tasks`, and the ledger's `cutoff_elapsed` boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    /// Frozen elapsed time while paused; run-segment baseline while running.
    pub elapsed_seconds: u64,
    pub is_running: bool,
    pub start_epoch: Option<u64>,
    pub cutoff_elapsed: u64,
    pub tasks: Vec<TaskSegment>,
}

impl PersistedState {
    /// Snapshot a tracker for write-through.
    pub fn capture(tracker: &Tracker) -> Self {
        Self {
            elapsed_seconds: tracker.timer.persisted_elapsed(),
            is_running: tracker.timer.running,
            start_epoch: tracker.timer.start_epoch,
            cutoff_elapsed: tracker.ledger.cutoff_elapsed(),
            tasks: tracker.ledger.segments().to_vec(),
        }
    }

    /// Rebuild a tracker, reconciling elapsed time against instant `now`.
    pub fn reconcile(self, now: u64) -> Tracker {
        Tracker {
            timer: TimerState::from_persisted(
                self.elapsed_seconds,
                self.is_running,
                self.start_epoch,
                now,
            ),
            ledger: TaskLedger::from_persisted(self.tasks, self.cutoff_elapsed),
        }
    }
}
