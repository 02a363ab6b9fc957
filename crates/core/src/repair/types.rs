//! Repair data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};
use warehouse_shared::types::{ComponentId, RepairComponentId, RepairId};

use crate::inventory::ComponentRef;
use crate::status::{RepairPriority, WorkStatus};
use crate::validation::{
    ValidationError, require_non_negative, require_non_negative_amount, require_text,
};

/// A repair job row.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repair {
    /// Row ID.
    pub id: RepairId,
    /// Human-facing repair code, e.g. `SRV-001`.
    pub repair_id: String,
    /// Customer who brought the device in.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Device model under repair.
    #[serde(default)]
    pub device_model: Option<String>,
    /// What is wrong with the device.
    pub issue_description: String,
    /// Urgency.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub priority: RepairPriority,
    /// Processing status.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub status: WorkStatus,
    /// Technician working the job.
    #[serde(default)]
    pub assigned_technician: Option<String>,
    /// When work started.
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Promised completion.
    #[serde(default)]
    pub estimated_completion: Option<DateTime<Utc>>,
    /// Actual completion.
    #[serde(default)]
    pub actual_completion: Option<DateTime<Utc>>,
    /// Labor charged.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub labor_cost: Decimal,
    /// Parts charged.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub parts_cost: Decimal,
    /// Total as computed by the backend (labor + parts).
    #[serde(default)]
    pub total_cost: Option<Decimal>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Repair {
    /// Labor plus parts, independent of the backend's computed column.
    #[must_use]
    pub fn cost(&self) -> Decimal {
        self.labor_cost + self.parts_cost
    }
}

/// A part consumed (or reserved) by a repair.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairComponent {
    /// Row ID.
    pub id: RepairComponentId,
    /// Owning repair.
    #[serde(default)]
    pub repair_id: Option<RepairId>,
    /// Component used.
    #[serde(default)]
    pub component_id: Option<ComponentId>,
    /// Units required.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub quantity_needed: i32,
    /// Units actually used.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub quantity_used: i32,
    /// Price per unit.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub cost_per_unit: Decimal,
    /// Backend-computed `quantity_used * cost_per_unit`.
    #[serde(default)]
    pub total_cost: Option<Decimal>,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl RepairComponent {
    /// Units used times unit price.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity_used) * self.cost_per_unit
    }
}

/// A repair component joined with the component's name and SKU.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairComponentWithPart {
    /// The repair component.
    #[serde(flatten)]
    pub line: RepairComponent,
    /// Embedded component.
    #[serde(default)]
    pub components: Option<ComponentRef>,
}

/// A repair with all of its component lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairWithComponents {
    /// The repair.
    #[serde(flatten)]
    pub repair: Repair,
    /// Component lines, each with its part name and SKU.
    #[serde(default)]
    pub repair_components: Vec<RepairComponentWithPart>,
}

/// Insert payload for a repair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRepair {
    /// Human-facing repair code.
    pub repair_id: String,
    /// Customer name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    /// Device model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_model: Option<String>,
    /// What is wrong with the device.
    pub issue_description: String,
    /// Urgency, medium unless given.
    #[serde(default)]
    pub priority: RepairPriority,
    /// Initial status.
    #[serde(default)]
    pub status: WorkStatus,
    /// Technician.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_technician: Option<String>,
    /// When work started.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    /// Promised completion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<DateTime<Utc>>,
    /// Labor charged.
    #[serde(default)]
    pub labor_cost: Decimal,
    /// Parts charged.
    #[serde(default)]
    pub parts_cost: Decimal,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewRepair {
    /// Checks required text, costs, and the planned schedule.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("repair_id", &self.repair_id)?;
        require_text("issue_description", &self.issue_description)?;
        require_non_negative_amount("labor_cost", self.labor_cost)?;
        require_non_negative_amount("parts_cost", self.parts_cost)?;
        if let (Some(start), Some(due)) = (self.start_date, self.estimated_completion)
            && due < start
        {
            return Err(ValidationError::InvertedRange {
                start: "start_date",
                end: "estimated_completion",
            });
        }
        Ok(())
    }
}

/// Partial update for a repair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepairUpdate {
    /// New repair code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_id: Option<String>,
    /// New customer name.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub customer_name: Option<Option<String>>,
    /// New device model.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub device_model: Option<Option<String>>,
    /// New issue description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_description: Option<String>,
    /// New priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<RepairPriority>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkStatus>,
    /// New technician, or `Some(None)` to unassign.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub assigned_technician: Option<Option<String>>,
    /// New start.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub start_date: Option<Option<DateTime<Utc>>>,
    /// New promised completion.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub estimated_completion: Option<Option<DateTime<Utc>>>,
    /// New actual completion.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub actual_completion: Option<Option<DateTime<Utc>>>,
    /// New labor cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labor_cost: Option<Decimal>,
    /// New parts cost.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts_cost: Option<Decimal>,
    /// New notes.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub notes: Option<Option<String>>,
}

impl RepairUpdate {
    /// Checks fields that are present.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(code) = &self.repair_id {
            require_text("repair_id", code)?;
        }
        if let Some(issue) = &self.issue_description {
            require_text("issue_description", issue)?;
        }
        if let Some(cost) = self.labor_cost {
            require_non_negative_amount("labor_cost", cost)?;
        }
        if let Some(cost) = self.parts_cost {
            require_non_negative_amount("parts_cost", cost)?;
        }
        Ok(())
    }
}

/// Insert payload for a repair component line. The owning repair is
/// supplied separately by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRepairComponent {
    /// Component used.
    pub component_id: ComponentId,
    /// Units required.
    #[serde(default = "default_quantity_needed")]
    pub quantity_needed: i32,
    /// Units actually used.
    #[serde(default)]
    pub quantity_used: i32,
    /// Price per unit.
    #[serde(default)]
    pub cost_per_unit: Decimal,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_quantity_needed() -> i32 {
    1
}

impl NewRepairComponent {
    /// Checks quantities and price.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_negative("quantity_needed", self.quantity_needed)?;
        require_non_negative("quantity_used", self.quantity_used)?;
        require_non_negative_amount("cost_per_unit", self.cost_per_unit)
    }
}

/// Partial update for a repair component line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepairComponentUpdate {
    /// New required quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_needed: Option<i32>,
    /// New used quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_used: Option<i32>,
    /// New unit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_per_unit: Option<Decimal>,
    /// New notes.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub notes: Option<Option<String>>,
}

impl RepairComponentUpdate {
    /// Checks fields that are present.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(quantity) = self.quantity_needed {
            require_non_negative("quantity_needed", quantity)?;
        }
        if let Some(quantity) = self.quantity_used {
            require_non_negative("quantity_used", quantity)?;
        }
        if let Some(cost) = self.cost_per_unit {
            require_non_negative_amount("cost_per_unit", cost)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn repair_row() -> serde_json::Value {
        json!({
            "id": "0198a0c4-51d2-7c62-9d38-2f4e1b3a5c20",
            "repair_id": "SRV-001",
            "customer_name": "John Smith",
            "device_model": "PWH-Model-X",
            "issue_description": "Motor does not spin up",
            "priority": "high",
            "status": "in-progress",
            "assigned_technician": "Mike Johnson",
            "start_date": "2025-08-06T08:30:00+00:00",
            "estimated_completion": null,
            "actual_completion": null,
            "labor_cost": 120.00,
            "parts_cost": 125.50,
            "total_cost": 245.50,
            "notes": null,
            "created_at": "2025-08-06T08:30:00+00:00",
            "updated_at": "2025-08-06T08:30:00+00:00"
        })
    }

    #[test]
    fn test_repair_cost_sums_labor_and_parts() {
        let repair: Repair = serde_json::from_value(repair_row()).unwrap();
        assert_eq!(repair.cost(), dec!(245.50));
        assert_eq!(repair.total_cost, Some(dec!(245.50)));
        assert_eq!(repair.priority, RepairPriority::High);
    }

    #[test]
    fn test_null_priority_defaults_to_medium() {
        let mut row = repair_row();
        row["priority"] = json!(null);
        row["labor_cost"] = json!(null);
        let repair: Repair = serde_json::from_value(row).unwrap();
        assert_eq!(repair.priority, RepairPriority::Medium);
        assert_eq!(repair.cost(), dec!(125.50));
    }

    #[test]
    fn test_repair_with_nested_components() {
        let mut row = repair_row();
        row["repair_components"] = json!([{
            "id": "0198a0c4-51d2-7c62-9d38-2f4e1b3a5c21",
            "repair_id": "0198a0c4-51d2-7c62-9d38-2f4e1b3a5c20",
            "component_id": "0198a0c4-51d2-7c62-9d38-2f4e1b3a5c22",
            "quantity_needed": 1,
            "quantity_used": 1,
            "cost_per_unit": 125.50,
            "total_cost": 125.50,
            "notes": null,
            "created_at": "2025-08-06T08:30:00+00:00",
            "components": {"name": "Motor Assembly", "sku": "PWH-MOT-001"}
        }]);

        let repair: RepairWithComponents = serde_json::from_value(row).unwrap();
        assert_eq!(repair.repair.repair_id, "SRV-001");
        assert_eq!(repair.repair_components.len(), 1);
        let line = &repair.repair_components[0];
        assert_eq!(line.line.line_total(), dec!(125.50));
        assert_eq!(line.components.as_ref().unwrap().sku, "PWH-MOT-001");
    }

    #[test]
    fn test_new_repair_rejects_inverted_schedule() {
        let start = Utc.with_ymd_and_hms(2025, 8, 6, 9, 0, 0).unwrap();
        let payload = NewRepair {
            repair_id: "SRV-003".into(),
            customer_name: None,
            device_model: None,
            issue_description: "Cracked housing".into(),
            priority: RepairPriority::default(),
            status: WorkStatus::default(),
            assigned_technician: None,
            start_date: Some(start),
            estimated_completion: Some(start - chrono::Duration::hours(1)),
            labor_cost: Decimal::ZERO,
            parts_cost: Decimal::ZERO,
            notes: None,
        };
        assert_eq!(
            payload.validate(),
            Err(ValidationError::InvertedRange {
                start: "start_date",
                end: "estimated_completion",
            })
        );
    }

    #[test]
    fn test_new_repair_component_defaults() {
        let line: NewRepairComponent = serde_json::from_value(json!({
            "component_id": "0198a0c4-51d2-7c62-9d38-2f4e1b3a5c22"
        }))
        .unwrap();
        assert_eq!(line.quantity_needed, 1);
        assert_eq!(line.quantity_used, 0);
        assert_eq!(line.cost_per_unit, Decimal::ZERO);
        assert!(line.validate().is_ok());
    }

    #[test]
    fn test_unassign_technician_serializes_null() {
        let update = RepairUpdate {
            assigned_technician: Some(None),
            ..RepairUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"assigned_technician": null})
        );
    }
}
