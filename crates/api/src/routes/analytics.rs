//! Summary routes over repairs, shipments, and budget.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use warehouse_db::{BudgetRepository, RepairRepository, ShipmentRepository};

use super::error_response;
use crate::AppState;

/// Creates the analytics routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/repairs/status-summary", get(repair_status_summary))
        .route("/analytics/repairs/priority-summary", get(repair_priority_summary))
        .route("/analytics/shipments/status-summary", get(shipment_status_summary))
        .route("/analytics/budget/weekly-summary", get(weekly_budget_summary))
}

/// Query parameters for the weekly budget summary.
#[derive(Debug, Deserialize)]
pub struct WeeklySummaryQuery {
    /// First day of the week, `YYYY-MM-DD`.
    pub week_start: NaiveDate,
}

async fn repair_status_summary(State(state): State<AppState>) -> impl IntoResponse {
    let repo = RepairRepository::new(state.backend);
    match repo.status_summary().await {
        Ok(summary) => (StatusCode::OK, Json(json!({ "summary": summary }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn repair_priority_summary(State(state): State<AppState>) -> impl IntoResponse {
    let repo = RepairRepository::new(state.backend);
    match repo.priority_summary().await {
        Ok(summary) => (StatusCode::OK, Json(json!({ "summary": summary }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn shipment_status_summary(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ShipmentRepository::new(state.backend);
    match repo.status_summary().await {
        Ok(summary) => (StatusCode::OK, Json(json!({ "summary": summary }))).into_response(),
        Err(e) => error_response(e),
    }
}

/// Budget versus actual for one week. 404 when the week has no entries.
async fn weekly_budget_summary(
    State(state): State<AppState>,
    Query(query): Query<WeeklySummaryQuery>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new(state.backend);
    match repo.weekly_summary(query.week_start).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => error_response(e),
    }
}
