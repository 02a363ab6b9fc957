//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};
use warehouse_shared::AppError;
use warehouse_shared::types::PageRequest;

use crate::AppState;

pub mod analytics;
pub mod budget_entries;
pub mod companies;
pub mod components;
pub mod dashboard;
pub mod health;
pub mod repairs;
pub mod returns;
pub mod shipments;
pub mod stock_movements;
pub mod views;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(companies::routes())
        .merge(returns::routes())
        .merge(repairs::routes())
        .merge(shipments::routes())
        .merge(components::routes())
        .merge(stock_movements::routes())
        .merge(budget_entries::routes())
        .merge(dashboard::routes())
        .merge(analytics::routes())
        .merge(views::routes())
}

// ============================================================================
// Shared helpers
// ============================================================================

/// `page` / `per_page` query parameters. Both absent means "everything".
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl PageQuery {
    /// Page request to push down to the backend, if any was asked for.
    pub fn request(&self) -> Option<PageRequest> {
        if self.page.is_none() && self.per_page.is_none() {
            return None;
        }
        let defaults = PageRequest::default();
        Some(PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.per_page.unwrap_or(defaults.per_page),
        ))
    }
}

/// Body of the status-only update routes.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// New status.
    pub status: warehouse_core::WorkStatus,
}

/// Renders an error as `{"error": code, "message": text}` with its status.
pub(crate) fn error_response(err: impl Into<AppError>) -> Response {
    let err = err.into();
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "request failed");
    } else {
        warn!(error = %err, "request rejected");
    }
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

/// 404 for a missing row.
pub(crate) fn not_found(entity: &str, id: impl std::fmt::Display) -> Response {
    error_response(AppError::NotFound(format!("{entity} {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_absent_means_unpaged() {
        assert!(PageQuery::default().request().is_none());
    }

    #[test]
    fn test_page_query_fills_and_clamps() {
        let query = PageQuery {
            page: Some(3),
            per_page: None,
        };
        let request = query.request().unwrap();
        assert_eq!(request.offset(), 40);
        assert_eq!(request.limit(), 20);

        let query = PageQuery {
            page: None,
            per_page: Some(0),
        };
        assert_eq!(query.request().unwrap().limit(), 1);
    }

    #[test]
    fn test_error_response_status() {
        let response = error_response(AppError::BusinessRule("stock below zero".into()));
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(not_found("component", "abc").status(), StatusCode::NOT_FOUND);
    }
}
