//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{TaskView, TimerSnapshot};

/// API response structure for timer command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Response for a command that left the timer running
    pub fn running(message: String, timer: TimerSnapshot) -> Self {
        Self::new("running".to_string(), message, timer)
    }

    /// Response for a command that left the timer paused
    pub fn paused(message: String, timer: TimerSnapshot) -> Self {
        Self::new("paused".to_string(), message, timer)
    }

    /// Create an error response
    pub fn error(message: String, timer: TimerSnapshot) -> Self {
        Self::new("error".to_string(), message, timer)
    }
}

/// API response for ledger command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub task: TaskView,
}

impl TaskResponse {
    pub fn ok(message: String, task: TaskView) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            task,
        }
    }
}

/// Full status response: timer, ledger and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub tasks: Vec<TaskView>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
