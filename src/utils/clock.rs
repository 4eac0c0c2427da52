//! Wall-clock abstraction
//!
//! The engine never reads the system clock directly; it is handed epoch
//! seconds from a [`Clock`], which keeps every time-dependent transition
//! deterministic under test.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Source of the current wall-clock time, in seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // A pre-1970 system clock reads as zero rather than panicking.
        Utc::now().timestamp().max(0) as u64
    }
}

/// Deterministic clock that only moves when told to. Shareable across
/// threads, so a test can hold it while the state under test reads it.
#[derive(Debug, Default)]
pub struct ManualClock {
    current: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            current: AtomicU64::new(start),
        }
    }

    pub fn set(&self, now: u64) {
        self.current.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, delta: u64) {
        self.current.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.current.load(Ordering::SeqCst)
    }
}
