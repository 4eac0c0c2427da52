//! HTTP endpoint handlers
//!
//! Thin presentation glue: each endpoint maps 1:1 onto a tracker command
//! and renders its outcome. Rejected commands come back as 409 (illegal
//! in the current run/pause state) or 404 (unknown task id) with the
//! state unchanged.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::engine::EngineError;
use crate::state::{AppState, CommandError};

use super::responses::{ApiResponse, HealthResponse, StatusResponse, TaskResponse};

/// Body for POST /task: cut the current segment, optionally named.
#[derive(Debug, Deserialize)]
pub struct CutRequest {
    pub name: Option<String>,
}

/// Body for POST /task/:id/rename.
#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

type ApiError = (StatusCode, Json<ApiResponse>);

/// Map a command failure to its HTTP shape, attaching the (unchanged)
/// timer snapshot so clients can re-render.
fn command_error(state: &Arc<AppState>, err: CommandError) -> ApiError {
    let status = match &err {
        CommandError::Engine(EngineError::InvalidState(_)) => StatusCode::CONFLICT,
        CommandError::Engine(EngineError::NotFound(_)) => StatusCode::NOT_FOUND,
        CommandError::Engine(EngineError::CorruptPersistence { .. })
        | CommandError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Command failed: {}", err);
    } else {
        info!("Command rejected: {}", err);
    }
    let timer = state.snapshot().unwrap_or_default();
    (status, Json(ApiResponse::error(err.to_string(), timer)))
}

/// Handle POST /start - Begin a run segment
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, ApiError> {
    match state.start() {
        Ok(timer) => Ok(Json(ApiResponse::running(
            "Timer started".to_string(),
            timer,
        ))),
        Err(e) => Err(command_error(&state, e)),
    }
}

/// Handle POST /pause - Freeze elapsed time
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, ApiError> {
    match state.pause() {
        Ok(timer) => Ok(Json(ApiResponse::paused("Timer paused".to_string(), timer))),
        Err(e) => Err(command_error(&state, e)),
    }
}

/// Handle POST /reset - Zero the timer, clear the ledger, purge the store
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse>, ApiError> {
    match state.reset() {
        Ok(timer) => Ok(Json(ApiResponse::paused("Timer reset".to_string(), timer))),
        Err(e) => Err(command_error(&state, e)),
    }
}

/// Handle POST /task - Cut the current task segment
pub async fn cut_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CutRequest>>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let name = body.and_then(|Json(req)| req.name);
    match state.cut(name) {
        Ok(task) => {
            info!("Cut task '{}' ({})", task.name, task.display);
            Ok((
                StatusCode::CREATED,
                Json(TaskResponse::ok("Task segment cut".to_string(), task)),
            ))
        }
        Err(e) => Err(command_error(&state, e)),
    }
}

/// Handle POST /task/:id/rename - Rename a task segment
pub async fn rename_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    match state.rename_task(id, req.name) {
        Ok(task) => Ok(Json(TaskResponse::ok("Task renamed".to_string(), task))),
        Err(e) => Err(command_error(&state, e)),
    }
}

/// Handle POST /task/:id/remove - Remove a task segment
pub async fn remove_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<TaskResponse>, ApiError> {
    match state.remove_task(id) {
        Ok(task) => Ok(Json(TaskResponse::ok("Task removed".to_string(), task))),
        Err(e) => Err(command_error(&state, e)),
    }
}

/// Handle GET /status - Return timer, ledger and server metadata
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to read timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    let tasks = match state.tasks() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to read task ledger: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        tasks,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
