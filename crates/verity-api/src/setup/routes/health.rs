//! Health check handlers and response types.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use verity_core::Modality;

const TIMEOUT: Duration = Duration::from_secs(5);

/// Run an async check with timeout; returns "healthy", "timeout", or "{prefix}: {error}".
async fn run_check<F, E>(timeout: Duration, f: F, error_prefix: &str) -> String
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    match tokio::time::timeout(timeout, f).await {
        Ok(Ok(())) => "healthy".to_string(),
        Ok(Err(e)) => format!("{}: {}", error_prefix, e),
        Err(_) => "timeout".to_string(),
    }
}

#[derive(Debug, Serialize)]
pub(super) struct AnalyzerStatus {
    pub modality: Modality,
    pub analyzer: String,
}

#[derive(Debug, Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub history: String,
    pub history_backend: &'static str,
    pub analyzers: Vec<AnalyzerStatus>,
}

/// Liveness probe - process is running.
pub(super) async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the history store answers.
pub(super) async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let history = state.orchestrator.history().clone();
    let store = run_check(TIMEOUT, async move { history.ping().await }, "not_ready").await;

    if store == "healthy" {
        (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ready", "history": "ready" })),
        )
    } else {
        tracing::error!(history = %store, "History store readiness check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "not_ready", "history": store })),
        )
    }
}

/// Full health check: history store plus the analyzer roster.
pub(super) async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let history = state.orchestrator.history().clone();
    let history_backend = history.backend_name();
    let store = run_check(TIMEOUT, async move { history.ping().await }, "unhealthy").await;
    let healthy = store == "healthy";

    let analyzers = state
        .orchestrator
        .registry()
        .roster()
        .into_iter()
        .map(|(modality, analyzer)| AnalyzerStatus { modality, analyzer })
        .collect();

    let response = HealthCheckResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        history: store,
        history_backend,
        analyzers,
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
