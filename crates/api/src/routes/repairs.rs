//! Repair routes, including the component lines of a repair.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use serde_json::json;
use warehouse_core::repair::{NewRepair, NewRepairComponent, RepairComponentUpdate, RepairUpdate};
use warehouse_db::{RepairComponentRepository, RepairFilter, RepairRepository};
use warehouse_shared::types::{RepairComponentId, RepairId};

use super::{PageQuery, error_response, not_found};
use crate::AppState;

/// Creates the repair routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/repairs", get(list_repairs).post(create_repair))
        .route(
            "/repairs/{id}",
            get(get_repair).patch(update_repair).delete(delete_repair),
        )
        .route(
            "/repairs/{id}/components",
            get(list_repair_components).post(add_repair_component),
        )
        .route(
            "/repair-components/{id}",
            patch(update_repair_component).delete(delete_repair_component),
        )
}

// ============================================================================
// Repairs
// ============================================================================

/// Lists repairs with their component lines, latest start first.
/// `?status=` and `?priority=` filter.
async fn list_repairs(
    State(state): State<AppState>,
    Query(filter): Query<RepairFilter>,
    Query(page): Query<PageQuery>,
) -> impl IntoResponse {
    let repo = RepairRepository::new(state.backend);
    match repo.list(&filter, page.request().as_ref()).await {
        Ok(repairs) => (StatusCode::OK, Json(json!({ "repairs": repairs }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_repair(State(state): State<AppState>, Path(id): Path<RepairId>) -> impl IntoResponse {
    let repo = RepairRepository::new(state.backend);
    match repo.find_by_id(id).await {
        Ok(Some(repair)) => (StatusCode::OK, Json(repair)).into_response(),
        Ok(None) => not_found("repair", id),
        Err(e) => error_response(e),
    }
}

async fn create_repair(
    State(state): State<AppState>,
    Json(input): Json<NewRepair>,
) -> impl IntoResponse {
    let repo = RepairRepository::new(state.backend);
    match repo.create(input).await {
        Ok(repair) => (StatusCode::CREATED, Json(repair)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_repair(
    State(state): State<AppState>,
    Path(id): Path<RepairId>,
    Json(input): Json<RepairUpdate>,
) -> impl IntoResponse {
    let repo = RepairRepository::new(state.backend);
    match repo.update(id, input).await {
        Ok(repair) => (StatusCode::OK, Json(repair)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_repair(State(state): State<AppState>, Path(id): Path<RepairId>) -> impl IntoResponse {
    let repo = RepairRepository::new(state.backend);
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

// ============================================================================
// Repair component lines
// ============================================================================

async fn list_repair_components(
    State(state): State<AppState>,
    Path(id): Path<RepairId>,
) -> impl IntoResponse {
    let repo = RepairComponentRepository::new(state.backend);
    match repo.list_for_repair(id).await {
        Ok(lines) => (StatusCode::OK, Json(json!({ "components": lines }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn add_repair_component(
    State(state): State<AppState>,
    Path(id): Path<RepairId>,
    Json(input): Json<NewRepairComponent>,
) -> impl IntoResponse {
    let repo = RepairComponentRepository::new(state.backend);
    match repo.create(id, input).await {
        Ok(line) => (StatusCode::CREATED, Json(line)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_repair_component(
    State(state): State<AppState>,
    Path(id): Path<RepairComponentId>,
    Json(input): Json<RepairComponentUpdate>,
) -> impl IntoResponse {
    let repo = RepairComponentRepository::new(state.backend);
    match repo.update(id, input).await {
        Ok(line) => (StatusCode::OK, Json(line)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_repair_component(
    State(state): State<AppState>,
    Path(id): Path<RepairComponentId>,
) -> impl IntoResponse {
    let repo = RepairComponentRepository::new(state.backend);
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
