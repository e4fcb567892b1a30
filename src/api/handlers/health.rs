//! Health check endpoint handlers.
//!
//! The only dependency worth checking is whether the Bot API client can
//! send at all, i.e. whether token and chat target are configured. No
//! request to the Bot API is made here.

use std::collections::HashMap;

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};

use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::state::AppState;

/// Creates health check routes.
///
/// # Routes
/// - `GET /health` - Basic health check
/// - `GET /health/ready` - Readiness probe
/// - `GET /health/live` - Liveness probe
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/ready", get(readiness_check))
        .route("/health/live", get(liveness_check))
}

/// Reports `degraded` while credentials are missing; the server still
/// accepts events and reports them as not configured.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let telegram = check_telegram(&state).await;
    let status = telegram.status;

    let mut checks = HashMap::new();
    checks.insert("telegram".to_string(), telegram);

    Json(HealthResponse {
        status,
        version: crate::pkg_version().to_string(),
        timestamp: jiff::Timestamp::now().to_string(),
        checks,
    })
}

/// `200 OK` once credentials are configured, `503` before that.
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match check_telegram(&state).await.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded | HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

async fn check_telegram(state: &AppState) -> ComponentHealth {
    if state.notifications.has_credentials().await {
        ComponentHealth::new(HealthStatus::Healthy, "Credentials configured")
    } else {
        ComponentHealth::new(HealthStatus::Degraded, "Bot token or chat id is not configured")
    }
}
