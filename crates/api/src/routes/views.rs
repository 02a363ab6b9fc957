//! Tab view routes.
//!
//! `GET /views/{tab}` loads the tab and answers with its load state. A failed
//! load is still a 200: the failure and any earlier data are in the body.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use warehouse_core::view::Tab;
use warehouse_shared::AppError;

use super::error_response;
use crate::AppState;

/// Creates the view routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/views", get(list_tabs))
        .route("/views/{tab}", get(load_tab))
}

/// One navigation entry.
#[derive(Debug, Serialize)]
pub struct TabInfo {
    /// URL id.
    pub id: &'static str,
    /// Label shown in navigation.
    pub label: &'static str,
}

async fn list_tabs() -> impl IntoResponse {
    let tabs: Vec<TabInfo> = Tab::ALL
        .into_iter()
        .map(|tab| TabInfo {
            id: tab.id(),
            label: tab.label(),
        })
        .collect();
    Json(json!({ "tabs": tabs }))
}

async fn load_tab(State(state): State<AppState>, Path(tab): Path<String>) -> impl IntoResponse {
    let tab: Tab = match tab.parse() {
        Ok(tab) => tab,
        Err(e) => return error_response(AppError::NotFound(e.to_string())),
    };
    let view = state.views.load(tab).await;
    (StatusCode::OK, Json(json!({ "tab": tab, "view": view }))).into_response()
}
