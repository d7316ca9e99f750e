//! Health check handlers.
//!
//! Probe bodies are returned without the success envelope so that
//! orchestrators can read `status` directly.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use gatehouse_service::health::{HealthReport, LiveReport, MetricsReport};

use crate::dto::response::ReadyResponse;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.health_monitor.health().await;
    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}

/// GET /api/health/metrics
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsReport> {
    Json(state.health_monitor.metrics().await)
}

/// GET /api/health/ready
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    if state.health_monitor.ready().await {
        (
            StatusCode::OK,
            Json(ReadyResponse {
                status: "ready".to_string(),
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                status: "not ready".to_string(),
            }),
        )
    }
}

/// GET /api/health/live
pub async fn live(State(state): State<AppState>) -> Json<LiveReport> {
    Json(state.health_monitor.live())
}
