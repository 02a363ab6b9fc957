//! Components, stock movements, and the stock arithmetic that ties them
//! together.
//!
//! `current_stock` only ever changes through a recorded movement:
//! - the movement's quantity is signed by its type (`signed_quantity`)
//! - the new level is computed before anything is written (`apply_movement`)
//! - the level can be recomputed from history (`reconcile_stock`)

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::InventoryError;
pub use service::{apply_movement, reconcile_stock, signed_quantity};
pub use types::{
    Component, ComponentRef, ComponentUpdate, LowStockItem, MANUAL_ADJUSTMENT, MovementType,
    NewComponent, NewStockMovement, OPENING_BALANCE, StockAdjustment, StockMovement,
    StockMovementWithPart,
};
