//! Inventory component routes: catalogue, low-stock alerts, and stock
//! adjustments.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use warehouse_core::inventory::{ComponentUpdate, NewComponent, StockAdjustment};
use warehouse_db::{ComponentFilter, ComponentRepository};
use warehouse_shared::types::ComponentId;

use super::{PageQuery, error_response, not_found};
use crate::AppState;

/// Creates the component routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/components", get(list_components).post(create_component))
        .route("/components/low-stock", get(list_low_stock))
        .route("/components/sku/{sku}", get(get_component_by_sku))
        .route(
            "/components/{id}",
            get(get_component)
                .patch(update_component)
                .delete(delete_component),
        )
        .route("/components/{id}/stock", post(adjust_stock))
        .route("/components/{id}/reconcile", post(reconcile_stock))
}

/// Lists components by name. `?category=` filters.
async fn list_components(
    State(state): State<AppState>,
    Query(filter): Query<ComponentFilter>,
    Query(page): Query<PageQuery>,
) -> impl IntoResponse {
    let repo = ComponentRepository::new(state.backend);
    match repo.list(&filter, page.request().as_ref()).await {
        Ok(components) => {
            (StatusCode::OK, Json(json!({ "components": components }))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Components at or below their reorder level, lowest stock first.
async fn list_low_stock(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ComponentRepository::new(state.backend);
    match repo.low_stock().await {
        Ok(items) => (StatusCode::OK, Json(json!({ "components": items }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_component(
    State(state): State<AppState>,
    Path(id): Path<ComponentId>,
) -> impl IntoResponse {
    let repo = ComponentRepository::new(state.backend);
    match repo.find_by_id(id).await {
        Ok(Some(component)) => (StatusCode::OK, Json(component)).into_response(),
        Ok(None) => not_found("component", id),
        Err(e) => error_response(e),
    }
}

async fn get_component_by_sku(
    State(state): State<AppState>,
    Path(sku): Path<String>,
) -> impl IntoResponse {
    let repo = ComponentRepository::new(state.backend);
    match repo.find_by_sku(&sku).await {
        Ok(Some(component)) => (StatusCode::OK, Json(component)).into_response(),
        Ok(None) => not_found("component with SKU", sku),
        Err(e) => error_response(e),
    }
}

async fn create_component(
    State(state): State<AppState>,
    Json(input): Json<NewComponent>,
) -> impl IntoResponse {
    let repo = ComponentRepository::new(state.backend);
    match repo.create(input).await {
        Ok(component) => (StatusCode::CREATED, Json(component)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_component(
    State(state): State<AppState>,
    Path(id): Path<ComponentId>,
    Json(input): Json<ComponentUpdate>,
) -> impl IntoResponse {
    let repo = ComponentRepository::new(state.backend);
    match repo.update(id, input).await {
        Ok(component) => (StatusCode::OK, Json(component)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_component(
    State(state): State<AppState>,
    Path(id): Path<ComponentId>,
) -> impl IntoResponse {
    let repo = ComponentRepository::new(state.backend);
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}

/// Records a movement and returns the component with its new stock.
/// Movements that would take stock below zero are rejected with 422.
async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<ComponentId>,
    Json(adjustment): Json<StockAdjustment>,
) -> impl IntoResponse {
    let repo = ComponentRepository::new(state.backend);
    match repo.adjust_stock(id, adjustment).await {
        Ok(component) => (StatusCode::OK, Json(component)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn reconcile_stock(
    State(state): State<AppState>,
    Path(id): Path<ComponentId>,
) -> impl IntoResponse {
    let repo = ComponentRepository::new(state.backend);
    match repo.reconcile(id).await {
        Ok(component) => (StatusCode::OK, Json(component)).into_response(),
        Err(e) => error_response(e),
    }
}
