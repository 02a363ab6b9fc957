//! HTTP API layer with Axum routes and per-tab views.
//!
//! This crate provides:
//! - REST routes for every warehouse entity
//! - Dashboard and analytics routes
//! - The view service holding each tab's load state

pub mod routes;
pub mod views;

use std::sync::Arc;

use axum::Router;
use chrono_tz::Tz;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use warehouse_db::SharedBackend;

use crate::views::ViewService;

/// Application state shared across handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Table backend every repository reads and writes through.
    pub backend: SharedBackend,
    /// Zone in which the dashboard week starts.
    pub tz: Tz,
    /// Per-tab load state.
    pub views: Arc<ViewService>,
}

impl AppState {
    /// Builds the state and an empty view service over `backend`.
    #[must_use]
    pub fn new(backend: SharedBackend, tz: Tz) -> Self {
        let views = Arc::new(ViewService::new(backend.clone(), tz));
        Self { backend, tz, views }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
