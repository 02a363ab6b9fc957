//! Shipment routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde_json::json;
use warehouse_core::shipment::{NewShipment, ShipmentUpdate};
use warehouse_db::{ShipmentFilter, ShipmentRepository};
use warehouse_shared::types::ShipmentId;

use super::{PageQuery, StatusRequest, error_response, not_found};
use crate::AppState;

/// Creates the shipment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shipments", get(list_shipments).post(create_shipment))
        .route(
            "/shipments/{id}",
            get(get_shipment).patch(update_shipment).delete(delete_shipment),
        )
        .route("/shipments/{id}/status", put(update_shipment_status))
}

/// Lists shipments by expected arrival. `?type=` and `?status=` filter.
async fn list_shipments(
    State(state): State<AppState>,
    Query(filter): Query<ShipmentFilter>,
    Query(page): Query<PageQuery>,
) -> impl IntoResponse {
    let repo = ShipmentRepository::new(state.backend);
    match repo.list(&filter, page.request().as_ref()).await {
        Ok(shipments) => (StatusCode::OK, Json(json!({ "shipments": shipments }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<ShipmentId>,
) -> impl IntoResponse {
    let repo = ShipmentRepository::new(state.backend);
    match repo.find_by_id(id).await {
        Ok(Some(shipment)) => (StatusCode::OK, Json(shipment)).into_response(),
        Ok(None) => not_found("shipment", id),
        Err(e) => error_response(e),
    }
}

async fn create_shipment(
    State(state): State<AppState>,
    Json(input): Json<NewShipment>,
) -> impl IntoResponse {
    let repo = ShipmentRepository::new(state.backend);
    match repo.create(input).await {
        Ok(shipment) => (StatusCode::CREATED, Json(shipment)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_shipment(
    State(state): State<AppState>,
    Path(id): Path<ShipmentId>,
    Json(input): Json<ShipmentUpdate>,
) -> impl IntoResponse {
    let repo = ShipmentRepository::new(state.backend);
    match repo.update(id, input).await {
        Ok(shipment) => (StatusCode::OK, Json(shipment)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_shipment_status(
    State(state): State<AppState>,
    Path(id): Path<ShipmentId>,
    Json(body): Json<StatusRequest>,
) -> impl IntoResponse {
    let repo = ShipmentRepository::new(state.backend);
    match repo.update_status(id, body.status).await {
        Ok(shipment) => (StatusCode::OK, Json(shipment)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_shipment(
    State(state): State<AppState>,
    Path(id): Path<ShipmentId>,
) -> impl IntoResponse {
    let repo = ShipmentRepository::new(state.backend);
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
