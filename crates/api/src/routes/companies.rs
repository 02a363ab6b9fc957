//! Company routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use warehouse_core::company::{CompanyUpdate, NewCompany};
use warehouse_db::CompanyRepository;
use warehouse_shared::types::CompanyId;

use super::{PageQuery, error_response, not_found};
use crate::AppState;

/// Creates the company routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/{id}",
            get(get_company).patch(update_company).delete(delete_company),
        )
}

async fn list_companies(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> impl IntoResponse {
    let repo = CompanyRepository::new(state.backend);
    match repo.list(page.request().as_ref()).await {
        Ok(companies) => (StatusCode::OK, Json(json!({ "companies": companies }))).into_response(),
        Err(e) => error_response(e),
    }
}

async fn get_company(State(state): State<AppState>, Path(id): Path<CompanyId>) -> impl IntoResponse {
    let repo = CompanyRepository::new(state.backend);
    match repo.find_by_id(id).await {
        Ok(Some(company)) => (StatusCode::OK, Json(company)).into_response(),
        Ok(None) => not_found("company", id),
        Err(e) => error_response(e),
    }
}

async fn create_company(
    State(state): State<AppState>,
    Json(input): Json<NewCompany>,
) -> impl IntoResponse {
    let repo = CompanyRepository::new(state.backend);
    match repo.create(input).await {
        Ok(company) => (StatusCode::CREATED, Json(company)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<CompanyId>,
    Json(input): Json<CompanyUpdate>,
) -> impl IntoResponse {
    let repo = CompanyRepository::new(state.backend);
    match repo.update(id, input).await {
        Ok(company) => (StatusCode::OK, Json(company)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<CompanyId>,
) -> impl IntoResponse {
    let repo = CompanyRepository::new(state.backend);
    match repo.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(e),
    }
}
