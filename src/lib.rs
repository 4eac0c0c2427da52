//! Time Tally - A state-managed HTTP server for elapsed-time tracking
//!
//! This library provides a stopwatch-style timer with named task segments
//! (laps), persisted across restarts. Elapsed time is always reconciled
//! from a persisted start instant and the current clock, so pause/resume
//! cycles, delayed ticks and full process restarts never lose or
//! double-count time.

pub mod api;
pub mod config;
pub mod engine;
pub mod state;
pub mod store;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use engine::{EngineError, TaskLedger, TaskSegment, TimerState, Tracker};
pub use state::AppState;
pub use store::Store;
pub use utils::shutdown_signal;
