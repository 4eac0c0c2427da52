//! Utility functions module
//!
//! Clock abstraction, display formatting and signal handling shared
//! across the application.

pub mod clock;
pub mod format;
pub mod signals;

// Re-export main items
pub use clock::{Clock, ManualClock, SystemClock};
pub use format::{format_compact, format_hms};
pub use signals::shutdown_signal;
