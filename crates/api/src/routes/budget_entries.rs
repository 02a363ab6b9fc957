//! Weekly budget entry routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use warehouse_core::budget::{BudgetEntryUpdate, NewBudgetEntry};
use warehouse_db::{BudgetFilter, BudgetRepository};
use warehouse_shared::types::BudgetEntryId;

use super::{PageQuery, error_response, not_found};
use crate::AppState;

/// Creates the budget entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budget-entries", get(list_entries).post(create_entry))
        .route(
            "/budget-entries/{id}",
            get(get_entry).patch(update_entry).delete(delete_entry),
        )
}

/// Lists entries, latest week first, each with its remaining amount and
/// usage. `?category=` and `?week_start=` filter.
async fn list_entries(
    State(state): State<AppState>,
    Query(filter): Query<BudgetFilter>,
    Query(page): Query<PageQuery>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new(state.backend);
    match repo.lines(&filter, page.request().as_ref()).await {
        Ok(lines) => (StatusCode::OK, Json(json!({ "entries": lines }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<BudgetEntryId>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new(state.backend);
    match repo.find_by_id(id).await {
        Ok(Some(entry)) => (StatusCode::OK, Json(entry)).into_response(),
        Ok(None) => not_found("budget entry", id),
        Err(e) => error_response(e),
    }
}

async fn create_entry(
    State(state): State<AppState>,
    Json(input): Json<NewBudgetEntry>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new(state.backend);
    match repo.create(input).await {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<BudgetEntryId>,
    Json(input): Json<BudgetEntryUpdate>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new(state.backend);
    match repo.update(id, input).await {
        Ok(entry) => (StatusCode::OK, Json(entry)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<BudgetEntryId>,
) -> impl IntoResponse {
    let repo = BudgetRepository::new(state.backend);
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
