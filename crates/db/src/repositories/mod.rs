//! Repository abstractions for data access.
//!
//! Repositories hide the table API behind typed operations. Each one issues
//! single reads or writes against the shared backend and returns typed rows
//! or the backend's error unchanged.

pub mod budget;
pub mod company;
pub mod component;
pub mod dashboard;
pub mod repair;
pub mod repair_component;
pub mod returns;
pub mod shipment;
pub mod stock_movement;

pub use budget::{BudgetFilter, BudgetRepository};
pub use company::CompanyRepository;
pub use component::{ComponentFilter, ComponentRepository};
pub use dashboard::DashboardRepository;
pub use repair::{RepairFilter, RepairRepository};
pub use repair_component::RepairComponentRepository;
pub use returns::{ReturnFilter, ReturnRepository};
pub use shipment::{ShipmentFilter, ShipmentRepository};
pub use stock_movement::{MovementFilter, StockMovementRepository};

use std::fmt::Display;

use serde::Serialize;
use serde::de::DeserializeOwned;
use warehouse_shared::types::PageRequest;

use crate::backend::{Filter, Select, TableBackend, from_row, from_rows, to_row};
use crate::error::DataError;

fn by_id(id: impl Display) -> Filter {
    Filter::eq("id", id.to_string())
}

/// Applies an optional page window.
pub(crate) fn paged(query: Select, page: Option<&PageRequest>) -> Select {
    match page {
        Some(page) => query.page(page),
        None => query,
    }
}

/// Reads every row matching `query`.
pub(crate) async fn fetch_all<T: DeserializeOwned>(
    backend: &dyn TableBackend,
    query: &Select,
) -> Result<Vec<T>, DataError> {
    from_rows(backend.select(query).await?)
}

/// Reads the first row matching `query`.
pub(crate) async fn find_one<T: DeserializeOwned>(
    backend: &dyn TableBackend,
    query: Select,
) -> Result<Option<T>, DataError> {
    let rows = backend.select(&query.limit(1)).await?;
    rows.into_iter().next().map(from_row).transpose()
}

/// Reads one row of `table` by id.
pub(crate) async fn find_by_id<T: DeserializeOwned>(
    backend: &dyn TableBackend,
    query: Select,
    id: impl Display,
) -> Result<Option<T>, DataError> {
    find_one(backend, query.filter(by_id(id))).await
}

/// Inserts `payload` and returns the stored row.
pub(crate) async fn insert_one<T: DeserializeOwned, P: Serialize>(
    backend: &dyn TableBackend,
    table: &str,
    payload: &P,
) -> Result<T, DataError> {
    from_row(backend.insert(table, to_row(payload)?).await?)
}

/// Patches one row by id and returns it as stored.
///
/// An empty patch is refused before any request is made.
pub(crate) async fn update_by_id<T: DeserializeOwned, P: Serialize>(
    backend: &dyn TableBackend,
    table: &str,
    entity: &'static str,
    id: impl Display,
    patch: &P,
) -> Result<T, DataError> {
    let patch = to_row(patch)?;
    if patch.is_empty() {
        return Err(DataError::EmptyUpdate);
    }
    let id = id.to_string();
    let rows = backend.update(table, &[by_id(&id)], patch).await?;
    rows.into_iter()
        .next()
        .map(from_row)
        .transpose()?
        .ok_or_else(|| DataError::not_found(entity, id))
}

/// Deletes one row by id.
pub(crate) async fn delete_by_id(
    backend: &dyn TableBackend,
    table: &str,
    entity: &'static str,
    id: impl Display,
) -> Result<(), DataError> {
    let id = id.to_string();
    let removed = backend.delete(table, &[by_id(&id)]).await?;
    if removed.is_empty() {
        return Err(DataError::not_found(entity, id));
    }
    Ok(())
}
