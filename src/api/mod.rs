//! HTTP API module
//!
//! The presentation surface: endpoints map 1:1 onto tracker commands.

pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/pause", post(pause_handler))
        .route("/reset", post(reset_handler))
        .route("/task", post(cut_handler))
        .route("/task/:id/rename", post(rename_handler))
        .route("/task/:id/remove", post(remove_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Tracker;
    use crate::store::Store;
    use crate::utils::ManualClock;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> (Router, Arc<AppState>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let state = Arc::new(AppState::new(
            Tracker::new(),
            Store::open_in_memory().unwrap(),
            clock.clone(),
            0,
            "127.0.0.1".to_string(),
        ));
        (create_router(state.clone()), state, clock)
    }

    async fn post_empty(app: &Router, uri: &str) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn post_json(app: &Router, uri: &str, body: &str) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_start_then_double_start() {
        let (app, _state, _clock) = test_app();

        let response = post_empty(&app, "/start").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "running");
        assert_eq!(json["timer"]["display"], "00:00:00");

        let response = post_empty(&app, "/start").await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["status"], "error");
    }

    #[tokio::test]
    async fn test_cut_while_paused_is_conflict() {
        let (app, state, _clock) = test_app();
        let response = post_empty(&app, "/task").await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(state.tasks().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_full_command_flow_over_http() {
        let (app, _state, clock) = test_app();

        post_empty(&app, "/start").await;
        clock.advance(90);
        let response = post_json(&app, "/task", r#"{"name":"warmup"}"#).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["task"]["name"], "warmup");
        assert_eq!(json["task"]["duration_seconds"], 90);
        assert_eq!(json["task"]["display"], "1m");
        let id = json["task"]["id"].as_u64().unwrap();

        let response =
            post_json(&app, &format!("/task/{}/rename", id), r#"{"name":"setup"}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["task"]["name"], "setup");

        clock.advance(10);
        let response = post_empty(&app, "/pause").await;
        let json = body_json(response).await;
        assert_eq!(json["timer"]["elapsed_seconds"], 100);
        assert_eq!(json["timer"]["display"], "00:01:40");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["timer"]["running"], false);
        assert_eq!(json["tasks"].as_array().unwrap().len(), 1);

        let response = post_empty(&app, &format!("/task/{}/remove", id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = post_empty(&app, &format!("/task/{}/remove", id)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reset_over_http() {
        let (app, state, clock) = test_app();
        post_empty(&app, "/start").await;
        clock.advance(30);
        post_empty(&app, "/task").await;

        let response = post_empty(&app, "/reset").await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["timer"]["elapsed_seconds"], 0);
        assert_eq!(json["timer"]["running"], false);
        assert!(state.tasks().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _state, _clock) = test_app();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
    }
}
