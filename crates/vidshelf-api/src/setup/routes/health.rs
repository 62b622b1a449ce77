//! Health check handlers.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use std::time::Duration;

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(serde::Serialize)]
struct HealthCheckResponse {
    status: String,
    store: String,
    backend: &'static str,
}

/// Run the store check with a timeout.
async fn check_store(state: &AppState) -> Result<(), String> {
    match tokio::time::timeout(CHECK_TIMEOUT, state.store.health_check()).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(format!("unhealthy: {}", e)),
        Err(_) => Err("timeout".to_string()),
    }
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status_code, status, store) = match check_store(&state).await {
        Ok(()) => (StatusCode::OK, "healthy", "healthy".to_string()),
        Err(e) => {
            tracing::error!(error = %e, "Store health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "unhealthy", e)
        }
    };

    (
        status_code,
        Json(HealthCheckResponse {
            status: status.to_string(),
            store,
            backend: state.store.backend_name(),
        }),
    )
}

/// Liveness probe - process is running.
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness probe - the record store answers.
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match check_store(&state).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ready", "store": "ready" })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Store readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "status": "not_ready", "store": e })),
            )
        }
    }
}
