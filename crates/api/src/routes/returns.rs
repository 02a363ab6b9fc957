//! Return (RMA) routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde_json::json;
use warehouse_core::returns::{NewReturn, ReturnUpdate};
use warehouse_db::{ReturnFilter, ReturnRepository};
use warehouse_shared::types::ReturnId;

use super::{PageQuery, StatusRequest, error_response, not_found};
use crate::AppState;

/// Creates the return routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/returns", get(list_returns).post(create_return))
        .route(
            "/returns/{id}",
            get(get_return).patch(update_return).delete(delete_return),
        )
        .route("/returns/{id}/status", put(update_return_status))
}

/// Lists returns with their company, latest first. `?status=` filters.
async fn list_returns(
    State(state): State<AppState>,
    Query(filter): Query<ReturnFilter>,
    Query(page): Query<PageQuery>,
) -> impl IntoResponse {
    let repo = ReturnRepository::new(state.backend);
    match repo.list(&filter, page.request().as_ref()).await {
        Ok(returns) => (StatusCode::OK, Json(json!({ "returns": returns }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_return(State(state): State<AppState>, Path(id): Path<ReturnId>) -> impl IntoResponse {
    let repo = ReturnRepository::new(state.backend);
    match repo.find_by_id(id).await {
        Ok(Some(found)) => (StatusCode::OK, Json(found)).into_response(),
        Ok(None) => not_found("return", id),
        Err(e) => error_response(e),
    }
}

async fn create_return(
    State(state): State<AppState>,
    Json(input): Json<NewReturn>,
) -> impl IntoResponse {
    let repo = ReturnRepository::new(state.backend);
    match repo.create(input).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_return(
    State(state): State<AppState>,
    Path(id): Path<ReturnId>,
    Json(input): Json<ReturnUpdate>,
) -> impl IntoResponse {
    let repo = ReturnRepository::new(state.backend);
    match repo.update(id, input).await {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_return_status(
    State(state): State<AppState>,
    Path(id): Path<ReturnId>,
    Json(body): Json<StatusRequest>,
) -> impl IntoResponse {
    let repo = ReturnRepository::new(state.backend);
    match repo.update_status(id, body.status).await {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_return(State(state): State<AppState>, Path(id): Path<ReturnId>) -> impl IntoResponse {
    let repo = ReturnRepository::new(state.backend);
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
