//! Health check endpoint.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;
use tracing::warn;
use warehouse_db::TableBackend;
use warehouse_db::backend::schema::COMPANIES;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Whether the table backend answered.
    pub backend: &'static str,
}

/// Reports the service version and whether the backend answers a count.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.backend.count(COMPANIES, &[]).await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                version: env!("CARGO_PKG_VERSION"),
                backend: "reachable",
            }),
        ),
        Err(e) => {
            warn!(error = %e, "backend health probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded",
                    version: env!("CARGO_PKG_VERSION"),
                    backend: "unreachable",
                }),
            )
        }
    }
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
