//! Inventory error types.

use thiserror::Error;

/// Stock arithmetic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    /// The movement would take stock below zero.
    #[error("Insufficient stock: {current} on hand, movement of {delta} would leave {result}")]
    NegativeStock {
        /// Stock before the movement.
        current: i32,
        /// Signed movement quantity.
        delta: i32,
        /// Level the movement would produce.
        result: i64,
    },

    /// The stock level or quantity does not fit in the stock column.
    #[error("Stock quantity out of range")]
    Overflow,
}
