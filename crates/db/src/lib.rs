//! Data access layer over the hosted table API.
//!
//! This crate provides:
//! - The `TableBackend` port with HTTP and in-memory adapters
//! - A backend-neutral query model (filters, ordering, embeds, windows)
//! - One repository per entity plus the dashboard aggregation reads

pub mod backend;
pub mod error;
pub mod repositories;

use std::sync::Arc;

pub use backend::{MemoryBackend, RestBackend, Row, SharedBackend, TableBackend};
pub use error::DataError;
pub use repositories::{
    BudgetFilter, BudgetRepository, CompanyRepository, ComponentFilter, ComponentRepository,
    DashboardRepository, MovementFilter, RepairComponentRepository, RepairFilter,
    RepairRepository, ReturnFilter, ReturnRepository, ShipmentFilter, ShipmentRepository,
    StockMovementRepository,
};

use warehouse_shared::BackendConfig;

/// Connects to the hosted table API.
///
/// No request is made; the first repository call is the first round trip.
///
/// # Errors
///
/// Returns `DataError::Config` if the URL or access key is missing or unusable.
pub fn connect(config: &BackendConfig) -> Result<SharedBackend, DataError> {
    let backend = RestBackend::new(config)?;
    tracing::info!(url = %config.url, "backend client ready");
    Ok(Arc::new(backend))
}
