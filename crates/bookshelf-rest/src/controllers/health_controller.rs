//! Health check controller.

use crate::{extractors::Context, state::AppState};
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use bookshelf_core::HealthStatus;

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/live", get(liveness_check))
        .route("/ready", get(readiness_check))
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Process is serving", body = HealthStatus)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.health_service.liveness())
}

/// Liveness check endpoint.
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses(
        (status = 200, description = "Process is alive", body = HealthStatus)
    )
)]
pub async fn liveness_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.health_service.liveness())
}

/// Readiness check endpoint.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Store and cache reachable", body = HealthStatus),
        (status = 503, description = "A dependency failed", body = HealthStatus)
    )
)]
pub async fn readiness_check(
    State(state): State<AppState>,
    Context(ctx): Context,
) -> (StatusCode, Json<HealthStatus>) {
    let status = state.health_service.readiness(&ctx).await;
    let code = if status.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}
