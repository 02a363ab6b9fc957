//! Property-based tests for stock arithmetic.

use proptest::prelude::*;
use warehouse_shared::types::{ComponentId, StockMovementId};

use super::service::{apply_movement, reconcile_stock, signed_quantity};
use super::types::{MovementType, NewStockMovement, StockMovement};

fn movement_type() -> impl Strategy<Value = MovementType> {
    prop_oneof![
        Just(MovementType::In),
        Just(MovementType::Out),
        Just(MovementType::Adjustment),
    ]
}

fn new_movement(component_id: ComponentId, quantity: i32) -> NewStockMovement {
    NewStockMovement {
        component_id,
        movement_type: MovementType::In,
        quantity,
        reference_id: None,
        reference_type: None,
        notes: None,
    }
}

fn recorded(component_id: ComponentId, quantity: i32) -> StockMovement {
    StockMovement {
        id: StockMovementId::new(),
        component_id: Some(component_id),
        movement_type: MovementType::Adjustment,
        quantity,
        reference_id: None,
        reference_type: None,
        notes: None,
        created_at: None,
    }
}

proptest! {
    /// Receipts only: folding movements with apply_movement lands on the
    /// plain sum, and reconcile agrees.
    #[test]
    fn test_fold_equals_sum_of_receipts(quantities in prop::collection::vec(0i32..10_000, 0..50)) {
        let id = ComponentId::new();
        let mut stock = 0;
        for q in &quantities {
            stock = apply_movement(stock, &new_movement(id, *q)).unwrap();
        }

        let expected: i32 = quantities.iter().sum();
        prop_assert_eq!(stock, expected);

        let history: Vec<_> = quantities.iter().map(|q| recorded(id, *q)).collect();
        prop_assert_eq!(reconcile_stock(&history).unwrap(), expected);
    }

    /// Whenever a sequence of signed movements is accepted step by step, the
    /// final level equals the sum of the accepted quantities.
    #[test]
    fn test_fold_equals_sum_of_accepted(
        entries in prop::collection::vec((-500i32..500, movement_type()), 0..60),
    ) {
        let id = ComponentId::new();
        let mut stock = 0i32;
        let mut accepted = Vec::new();
        for (q, kind) in entries {
            let delta = signed_quantity(q, kind).unwrap();
            match apply_movement(stock, &new_movement(id, delta)) {
                Ok(next) => {
                    stock = next;
                    accepted.push(recorded(id, delta));
                }
                Err(_) => prop_assert!(i64::from(stock) + i64::from(delta) < 0),
            }
            prop_assert!(stock >= 0);
        }

        let sum: i64 = accepted.iter().map(|m| i64::from(m.quantity)).sum();
        prop_assert_eq!(i64::from(stock), sum);
        prop_assert_eq!(reconcile_stock(&accepted).unwrap(), stock);
    }

    /// Out movements never add stock and in movements never remove it.
    #[test]
    fn test_signed_quantity_direction(q in -100_000i32..100_000) {
        prop_assert!(signed_quantity(q, MovementType::Out).unwrap() <= 0);
        prop_assert!(signed_quantity(q, MovementType::In).unwrap() >= 0);
        prop_assert_eq!(signed_quantity(q, MovementType::Adjustment).unwrap(), q);
    }

    /// A movement that would go negative is rejected and reports the
    /// attempted level.
    #[test]
    fn test_negative_result_rejected(current in 0i32..1_000, extra in 1i32..1_000) {
        let id = ComponentId::new();
        let delta = -(current + extra);
        let result = apply_movement(current, &new_movement(id, delta));
        prop_assert!(result.is_err());
    }
}
