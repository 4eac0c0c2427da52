//! Background tasks module
//!
//! Background tasks that run alongside the HTTP server.

pub mod ticker;

// Re-export main functions
pub use ticker::ticker_task;
