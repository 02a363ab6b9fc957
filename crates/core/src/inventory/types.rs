//! Inventory data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};
use uuid::Uuid;
use warehouse_shared::types::{ComponentId, StockMovementId};

use crate::status::UnknownVariant;
use crate::validation::{
    ValidationError, require_non_negative, require_non_negative_amount, require_text,
};

/// Reference type stamped on adjustments entered by an operator.
pub const MANUAL_ADJUSTMENT: &str = "manual_adjustment";

/// Reference type stamped on the movement recorded when a component is
/// created with stock on hand.
pub const OPENING_BALANCE: &str = "opening_balance";

/// A stocked component row.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Row ID.
    pub id: ComponentId,
    /// Stock keeping unit, unique across components.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Category, e.g. `Sensors`.
    #[serde(default)]
    pub category: Option<String>,
    /// Units on hand.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub current_stock: i32,
    /// Safety stock.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub minimum_stock: i32,
    /// Reorder when stock falls to this level.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub reorder_level: i32,
    /// Cost of one unit.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub unit_cost: Decimal,
    /// Supplier name.
    #[serde(default)]
    pub supplier: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Component {
    /// At or below the reorder level.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.current_stock <= self.reorder_level
    }

    /// Units needed to get back up to the reorder level.
    #[must_use]
    pub fn shortfall(&self) -> i64 {
        i64::from(self.reorder_level) - i64::from(self.current_stock)
    }

    /// Value of the stock on hand.
    #[must_use]
    pub fn stock_value(&self) -> Decimal {
        Decimal::from(self.current_stock) * self.unit_cost
    }
}

/// Component columns embedded into other rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRef {
    /// Display name.
    pub name: String,
    /// Stock keeping unit.
    pub sku: String,
}

/// A low-stock component together with how far below its reorder level it
/// sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockItem {
    /// The component.
    #[serde(flatten)]
    pub component: Component,
    /// `reorder_level - current_stock`.
    pub shortfall: i64,
}

impl From<Component> for LowStockItem {
    fn from(component: Component) -> Self {
        let shortfall = component.shortfall();
        Self {
            component,
            shortfall,
        }
    }
}

/// Insert payload for a component. A non-zero `current_stock` is recorded
/// as an opening movement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewComponent {
    /// Stock keeping unit.
    pub sku: String,
    /// Display name.
    pub name: String,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Opening stock.
    #[serde(default)]
    pub current_stock: i32,
    /// Safety stock.
    #[serde(default)]
    pub minimum_stock: i32,
    /// Reorder level.
    #[serde(default)]
    pub reorder_level: i32,
    /// Cost of one unit.
    #[serde(default)]
    pub unit_cost: Decimal,
    /// Supplier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

impl NewComponent {
    /// Checks identifiers, stock levels, and cost.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("sku", &self.sku)?;
        require_text("name", &self.name)?;
        require_non_negative("current_stock", self.current_stock)?;
        require_non_negative("minimum_stock", self.minimum_stock)?;
        require_non_negative("reorder_level", self.reorder_level)?;
        require_non_negative_amount("unit_cost", self.unit_cost)
    }
}

/// Partial update for a component. Stock is not patchable here; it moves
/// only through stock movements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentUpdate {
    /// New SKU.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub description: Option<Option<String>>,
    /// New category.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub category: Option<Option<String>>,
    /// New safety stock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_stock: Option<i32>,
    /// New reorder level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reorder_level: Option<i32>,
    /// New unit cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<Decimal>,
    /// New supplier.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub supplier: Option<Option<String>>,
}

impl ComponentUpdate {
    /// Checks fields that are present.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(sku) = &self.sku {
            require_text("sku", sku)?;
        }
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(level) = self.minimum_stock {
            require_non_negative("minimum_stock", level)?;
        }
        if let Some(level) = self.reorder_level {
            require_non_negative("reorder_level", level)?;
        }
        if let Some(cost) = self.unit_cost {
            require_non_negative_amount("unit_cost", cost)?;
        }
        Ok(())
    }
}

/// Kind of stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Goods received.
    In,
    /// Goods issued.
    Out,
    /// Correction; the quantity carries its own sign.
    Adjustment,
}

impl MovementType {
    /// Backend representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Adjustment => "adjustment",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovementType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            "adjustment" => Ok(Self::Adjustment),
            _ => Err(UnknownVariant {
                kind: "movement type",
                value: s.to_string(),
            }),
        }
    }
}

/// A stock movement row. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    /// Row ID.
    pub id: StockMovementId,
    /// Component moved.
    #[serde(default)]
    pub component_id: Option<ComponentId>,
    /// Kind of movement.
    pub movement_type: MovementType,
    /// Signed quantity delta.
    pub quantity: i32,
    /// Business document that caused the movement.
    #[serde(default)]
    pub reference_id: Option<Uuid>,
    /// Kind of business document, e.g. `manual_adjustment`.
    #[serde(default)]
    pub reference_type: Option<String>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A stock movement joined with its component's name and SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovementWithPart {
    /// The movement.
    #[serde(flatten)]
    pub movement: StockMovement,
    /// Embedded component.
    #[serde(default)]
    pub components: Option<ComponentRef>,
}

/// Insert payload for a stock movement. `quantity` is already signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStockMovement {
    /// Component moved.
    pub component_id: ComponentId,
    /// Kind of movement.
    pub movement_type: MovementType,
    /// Signed quantity delta.
    pub quantity: i32,
    /// Business document that caused the movement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<Uuid>,
    /// Kind of business document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<String>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewStockMovement {
    /// Opening movement for a component created with stock on hand.
    #[must_use]
    pub fn opening_balance(component_id: ComponentId, quantity: i32) -> Self {
        Self {
            component_id,
            movement_type: MovementType::Adjustment,
            quantity,
            reference_id: None,
            reference_type: Some(OPENING_BALANCE.to_string()),
            notes: Some("Opening stock".to_string()),
        }
    }
}

/// Operator request to move stock for one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustment {
    /// Quantity as entered. Its sign is ignored for `in` and `out`.
    pub quantity: i32,
    /// Kind of movement.
    pub movement_type: MovementType,
    /// Business document that caused the movement.
    #[serde(default)]
    pub reference_id: Option<Uuid>,
    /// Kind of business document; `manual_adjustment` when omitted.
    #[serde(default)]
    pub reference_type: Option<String>,
    /// Notes; `Manual stock adjustment` when omitted.
    #[serde(default)]
    pub notes: Option<String>,
}

impl StockAdjustment {
    /// Manual adjustment with no reference document.
    #[must_use]
    pub const fn manual(quantity: i32, movement_type: MovementType) -> Self {
        Self {
            quantity,
            movement_type,
            reference_id: None,
            reference_type: None,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn component(current: i32, reorder: i32) -> Component {
        Component {
            id: ComponentId::new(),
            sku: "PWH-SEN-001".into(),
            name: "Sensor Unit".into(),
            description: None,
            category: Some("Sensors".into()),
            current_stock: current,
            minimum_stock: 0,
            reorder_level: reorder,
            unit_cost: dec!(67.25),
            supplier: Some("Sensor Tech Corp".into()),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_low_stock_boundary_is_inclusive() {
        assert!(component(8, 12).is_low_stock());
        assert!(component(12, 12).is_low_stock());
        assert!(!component(13, 12).is_low_stock());
    }

    #[test]
    fn test_low_stock_item_shortfall() {
        let item = LowStockItem::from(component(8, 12));
        assert_eq!(item.shortfall, 4);

        let body = serde_json::to_value(&item).unwrap();
        assert_eq!(body["sku"], json!("PWH-SEN-001"));
        assert_eq!(body["shortfall"], json!(4));
    }

    #[test]
    fn test_stock_value() {
        assert_eq!(component(8, 12).stock_value(), dec!(538.00));
    }

    #[test]
    fn test_movement_type_wire_names() {
        assert_eq!(serde_json::to_value(MovementType::In).unwrap(), json!("in"));
        assert_eq!("adjustment".parse::<MovementType>().unwrap(), MovementType::Adjustment);
        assert!("transfer".parse::<MovementType>().is_err());
    }

    #[test]
    fn test_movement_with_component_embed() {
        let row = json!({
            "id": "0198a0c4-51d2-7c62-9d38-2f4e1b3a5c40",
            "component_id": "0198a0c4-51d2-7c62-9d38-2f4e1b3a5c41",
            "movement_type": "out",
            "quantity": -5,
            "reference_id": null,
            "reference_type": "manual_adjustment",
            "notes": "Manual stock adjustment",
            "created_at": "2025-08-07T10:00:00+00:00",
            "components": {"name": "Control Board", "sku": "PWH-PCB-001"}
        });

        let movement: StockMovementWithPart = serde_json::from_value(row).unwrap();
        assert_eq!(movement.movement.quantity, -5);
        assert_eq!(movement.components.unwrap().name, "Control Board");
    }

    #[test]
    fn test_new_component_validation() {
        let payload = NewComponent {
            sku: "PWH-CAB-001".into(),
            name: "Power Cable".into(),
            current_stock: -1,
            ..NewComponent::default()
        };
        assert_eq!(
            payload.validate(),
            Err(ValidationError::Negative {
                field: "current_stock"
            })
        );
    }

    #[test]
    fn test_component_update_has_no_stock_field() {
        let update: ComponentUpdate =
            serde_json::from_value(json!({"current_stock": 99, "reorder_level": 10})).unwrap();
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, json!({"reorder_level": 10}));
    }
}
