//! Stock movement log routes. The log is read-only over HTTP; movements are
//! written through `POST /components/{id}/stock`.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use warehouse_db::{MovementFilter, StockMovementRepository};

use super::{PageQuery, error_response};
use crate::AppState;

/// Creates the stock movement routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/stock-movements", get(list_movements))
}

/// Lists movements newest first. `?component_id=` and `?movement_type=`
/// filter.
async fn list_movements(
    State(state): State<AppState>,
    Query(filter): Query<MovementFilter>,
    Query(page): Query<PageQuery>,
) -> impl IntoResponse {
    let repo = StockMovementRepository::new(state.backend);
    match repo.list(&filter, page.request().as_ref()).await {
        Ok(movements) => (StatusCode::OK, Json(json!({ "movements": movements }))).into_response(),
        Err(e) => error_response(e),
    }
}
