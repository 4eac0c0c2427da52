//! Engine error taxonomy

use thiserror::Error;

/// Errors produced by timer and ledger commands.
///
/// All variants are local and recoverable: a rejected command leaves the
/// tracker unchanged. `CorruptPersistence` never escapes the store layer;
/// it is logged there and replaced by safe defaults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Command is illegal in the current run/pause state
    /// (double start, double pause, cut while paused).
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Operation referenced a task id that is not in the ledger.
    #[error("no task with id {0}")]
    NotFound(u64),

    /// A persisted value could not be parsed.
    #[error("corrupt persisted value for key '{key}': {detail}")]
    CorruptPersistence { key: &'static str, detail: String },
}
