//! State management module
//!
//! The application state wrapping the tracker, plus the read-only views
//! published to the presentation layer.

pub mod app_state;
pub mod snapshot;

// Re-export main types
pub use app_state::{AppState, CommandError};
pub use snapshot::{TaskView, TimerSnapshot};
