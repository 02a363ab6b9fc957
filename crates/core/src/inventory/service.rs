//! Stock arithmetic.

use warehouse_shared::types::ComponentId;

use super::error::InventoryError;
use super::types::{
    MANUAL_ADJUSTMENT, MovementType, NewStockMovement, StockAdjustment, StockMovement,
};

/// Signs an entered quantity by movement type: `out` always removes,
/// `in` always adds, `adjustment` keeps the sign it was given.
///
/// # Errors
///
/// Returns `InventoryError::Overflow` for `i32::MIN`, whose magnitude has
/// no `i32` representation.
pub fn signed_quantity(quantity: i32, movement_type: MovementType) -> Result<i32, InventoryError> {
    let magnitude = quantity.checked_abs().ok_or(InventoryError::Overflow);
    match movement_type {
        MovementType::In => magnitude,
        MovementType::Out => magnitude.map(|q| -q),
        MovementType::Adjustment => Ok(quantity),
    }
}

/// Stock level after applying one movement.
///
/// Nothing is written by this function; callers use the result to decide
/// whether the movement may be recorded at all.
///
/// # Errors
///
/// Returns `InventoryError::NegativeStock` if the level would drop below
/// zero, or `InventoryError::Overflow` if it does not fit in `i32`.
pub fn apply_movement(current: i32, movement: &NewStockMovement) -> Result<i32, InventoryError> {
    let delta = movement.quantity;
    let result = i64::from(current) + i64::from(delta);
    if result < 0 {
        return Err(InventoryError::NegativeStock {
            current,
            delta,
            result,
        });
    }
    i32::try_from(result).map_err(|_| InventoryError::Overflow)
}

/// Recomputes a stock level from the full movement history.
///
/// Intermediate levels are not checked, since movements sharing a timestamp
/// have no reliable order; only the final level must be non-negative.
///
/// # Errors
///
/// Returns `InventoryError::Overflow` if the sum leaves the `i32` range and
/// `InventoryError::NegativeStock` if it is below zero.
pub fn reconcile_stock(history: &[StockMovement]) -> Result<i32, InventoryError> {
    let total: i64 = history.iter().map(|m| i64::from(m.quantity)).sum();
    if total < 0 {
        return Err(InventoryError::NegativeStock {
            current: 0,
            delta: i32::try_from(total).unwrap_or(i32::MIN),
            result: total,
        });
    }
    i32::try_from(total).map_err(|_| InventoryError::Overflow)
}

impl StockAdjustment {
    /// Builds the movement row for this adjustment with its quantity
    /// signed.
    ///
    /// # Errors
    ///
    /// Propagates `signed_quantity` errors.
    pub fn into_movement(self, component_id: ComponentId) -> Result<NewStockMovement, InventoryError> {
        Ok(NewStockMovement {
            component_id,
            movement_type: self.movement_type,
            quantity: signed_quantity(self.quantity, self.movement_type)?,
            reference_id: self.reference_id,
            reference_type: Some(
                self.reference_type
                    .unwrap_or_else(|| MANUAL_ADJUSTMENT.to_string()),
            ),
            notes: Some(
                self.notes
                    .unwrap_or_else(|| "Manual stock adjustment".to_string()),
            ),
        })
    }
}
