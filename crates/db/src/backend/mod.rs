//! Table-API port and its adapters.
//!
//! Repositories talk to a `TableBackend`, never to HTTP directly:
//! - `RestBackend` calls the hosted PostgREST-style table API
//! - `MemoryBackend` keeps tables in process, for tests and local demos

pub mod eval;
pub mod memory;
pub mod query;
pub mod rest;
pub mod schema;

#[cfg(test)]
mod eval_props;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::DataError;

pub use memory::MemoryBackend;
pub use query::{Embed, Filter, FilterOp, Operand, Order, Select};
pub use rest::RestBackend;

/// One table row as column name to JSON value.
pub type Row = serde_json::Map<String, Value>;

/// Backend shared across repositories and request handlers.
pub type SharedBackend = Arc<dyn TableBackend>;

/// Operations the data layer needs from a hosted table store.
///
/// Every call is a single request. Failures are returned as-is and never
/// retried.
#[async_trait]
pub trait TableBackend: Send + Sync + std::fmt::Debug {
    /// Reads rows matching `query`.
    async fn select(&self, query: &Select) -> Result<Vec<Row>, DataError>;

    /// Counts rows of `table` matching every filter.
    async fn count(&self, table: &str, filters: &[Filter]) -> Result<u64, DataError>;

    /// Inserts one row and returns it as stored, with generated columns.
    async fn insert(&self, table: &str, row: Row) -> Result<Row, DataError>;

    /// Patches rows matching every filter and returns them as stored.
    async fn update(&self, table: &str, filters: &[Filter], patch: Row) -> Result<Vec<Row>, DataError>;

    /// Deletes rows matching every filter and returns them.
    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<Vec<Row>, DataError>;
}

/// Serializes a payload into a row.
///
/// # Errors
///
/// Returns `DataError::Decode` if the payload is not a JSON object.
pub fn to_row<T: Serialize>(payload: &T) -> Result<Row, DataError> {
    match serde_json::to_value(payload)? {
        Value::Object(row) => Ok(row),
        other => Err(DataError::Decode(format!(
            "expected an object payload, got {other}"
        ))),
    }
}

/// Deserializes a row into its typed form.
///
/// # Errors
///
/// Returns `DataError::Decode` if a column is missing or mistyped.
pub fn from_row<T: DeserializeOwned>(row: Row) -> Result<T, DataError> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

/// Deserializes every row.
///
/// # Errors
///
/// Returns `DataError::Decode` on the first row that fails.
pub fn from_rows<T: DeserializeOwned>(rows: Vec<Row>) -> Result<Vec<T>, DataError> {
    rows.into_iter().map(from_row).collect()
}
