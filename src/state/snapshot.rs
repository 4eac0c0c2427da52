//! Read-only views of tracker state for the presentation layer

use serde::{Deserialize, Serialize};

use crate::engine::{TaskSegment, Tracker};
use crate::utils::{format_compact, format_hms};

/// Point-in-time view of the timer, published on every command and tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub elapsed_seconds: u64,
    pub running: bool,
    /// Elapsed time as zero-padded `HH:MM:SS`.
    pub display: String,
}

impl TimerSnapshot {
    /// Capture the timer at instant `now`.
    pub fn of(tracker: &Tracker, now: u64) -> Self {
        let elapsed_seconds = tracker.timer.current_elapsed(now);
        Self {
            elapsed_seconds,
            running: tracker.timer.running,
            display: format_hms(elapsed_seconds),
        }
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self {
            elapsed_seconds: 0,
            running: false,
            display: format_hms(0),
        }
    }
}

/// One task segment as rendered for clients, with its compact duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskView {
    pub id: u64,
    pub name: String,
    pub duration_seconds: u64,
    /// Duration in its largest whole unit (`Ns`/`Nm`/`Nh`).
    pub display: String,
}

impl From<&TaskSegment> for TaskView {
    fn from(segment: &TaskSegment) -> Self {
        Self {
            id: segment.id,
            name: segment.name.clone(),
            duration_seconds: segment.duration_seconds,
            display: format_compact(segment.duration_seconds),
        }
    }
}
