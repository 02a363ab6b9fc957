//! Data access errors.

use thiserror::Error;
use warehouse_core::ValidationError;
use warehouse_core::budget::BudgetError;
use warehouse_core::inventory::InventoryError;
use warehouse_shared::AppError;

/// Errors raised by backends and repositories.
///
/// Backend failures are never retried; they reach the caller as-is.
#[derive(Debug, Error)]
pub enum DataError {
    /// The backend rejected the request or could not be reached.
    #[error("Backend operation failed: {message}")]
    Backend {
        /// HTTP status, when a response was received.
        status: Option<u16>,
        /// Backend message.
        message: String,
    },

    /// A row could not be converted to or from its typed form.
    #[error("Could not decode row: {0}")]
    Decode(String),

    /// No row has this id.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name.
        entity: &'static str,
        /// Id that was looked up.
        id: String,
    },

    /// A patch with no fields was submitted.
    #[error("Update contains no fields")]
    EmptyUpdate,

    /// Input failed validation before reaching the backend.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Stock rule violated.
    #[error(transparent)]
    Inventory(#[from] InventoryError),

    /// Budget rule violated.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// Backend settings are unusable.
    #[error("Backend configuration error: {0}")]
    Config(String),
}

impl DataError {
    /// Backend failure with a known HTTP status.
    pub fn backend(status: u16, message: impl Into<String>) -> Self {
        Self::Backend {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Missing row.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        Self::Backend {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        match err {
            DataError::Backend {
                status: Some(409),
                message,
            } => Self::Conflict(message),
            DataError::Backend { message, .. } => Self::Backend(message),
            DataError::Decode(_) => Self::Internal(err.to_string()),
            DataError::NotFound { entity, id } => Self::NotFound(format!("{entity} {id}")),
            DataError::Budget(BudgetError::NoEntriesForWeek(_)) => Self::NotFound(err.to_string()),
            DataError::EmptyUpdate | DataError::Validation(_) => Self::Validation(err.to_string()),
            DataError::Inventory(_) => Self::BusinessRule(err.to_string()),
            DataError::Config(message) => Self::Config(message),
        }
    }
}
