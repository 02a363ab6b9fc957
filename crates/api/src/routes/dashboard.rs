//! Dashboard routes.

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};
use warehouse_db::DashboardRepository;

use super::error_response;
use crate::AppState;

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/dashboard/metrics", get(get_dashboard_metrics))
}

/// Shipment counts and budget totals for the current week. Recomputed on
/// every call.
async fn get_dashboard_metrics(State(state): State<AppState>) -> impl IntoResponse {
    let repo = DashboardRepository::new(state.backend, state.tz);
    match repo.metrics().await {
        Ok(metrics) => (StatusCode::OK, Json(metrics)).into_response(),
        Err(e) => error_response(e),
    }
}
