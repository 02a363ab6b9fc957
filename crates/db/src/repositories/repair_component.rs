//! Repair component line repository.

use serde_json::Value;
use tracing::info;
use warehouse_core::repair::{
    NewRepairComponent, RepairComponent, RepairComponentUpdate, RepairComponentWithPart,
};
use warehouse_shared::types::{RepairComponentId, RepairId};

use super::{delete_by_id, fetch_all, update_by_id};
use crate::backend::schema::{COMPONENTS, REPAIR_COMPONENTS, REPAIRS};
use crate::backend::{Embed, Filter, Select, SharedBackend, from_row, to_row};
use crate::error::DataError;

/// Repository for the parts used on a repair.
#[derive(Debug, Clone)]
pub struct RepairComponentRepository {
    backend: SharedBackend,
}

impl RepairComponentRepository {
    /// Creates a new repair component repository.
    #[must_use]
    pub const fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Lists the lines of one repair in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn list_for_repair(&self, repair_id: RepairId) -> Result<Vec<RepairComponentWithPart>, DataError> {
        let query = Select::table(REPAIR_COMPONENTS)
            .embed(Embed::new(COMPONENTS, &["name", "sku"]))
            .filter(Filter::eq("repair_id", repair_id.to_string()))
            .order_by("created_at", true);
        fetch_all(self.backend.as_ref(), &query).await
    }

    /// Adds a line to a repair.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid, the repair or component does
    /// not exist, or the insert fails.
    pub async fn create(&self, repair_id: RepairId, input: NewRepairComponent) -> Result<RepairComponent, DataError> {
        input.validate()?;

        let exists = self
            .backend
            .count(REPAIRS, &[Filter::eq("id", repair_id.to_string())])
            .await?;
        if exists == 0 {
            return Err(DataError::not_found("repair", repair_id));
        }

        let mut row = to_row(&input)?;
        row.insert("repair_id".into(), Value::from(repair_id.to_string()));
        let line: RepairComponent = from_row(self.backend.insert(REPAIR_COMPONENTS, row).await?)?;

        info!(%repair_id, component_id = %input.component_id, "repair component added");
        Ok(line)
    }

    /// Patches a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch is empty or invalid, the line does not
    /// exist, or the update fails.
    pub async fn update(&self, id: RepairComponentId, input: RepairComponentUpdate) -> Result<RepairComponent, DataError> {
        input.validate()?;
        update_by_id(self.backend.as_ref(), REPAIR_COMPONENTS, "repair component", id, &input).await
    }

    /// Removes a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line does not exist or the delete fails.
    pub async fn delete(&self, id: RepairComponentId) -> Result<(), DataError> {
        delete_by_id(self.backend.as_ref(), REPAIR_COMPONENTS, "repair component", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::backend;
    use crate::repositories::{ComponentRepository, RepairRepository};
    use rust_decimal_macros::dec;
    use warehouse_core::inventory::NewComponent;
    use warehouse_core::repair::NewRepair;
    use warehouse_core::{RepairPriority, WorkStatus};

    async fn fixture() -> (RepairComponentRepository, RepairRepository, RepairId, NewRepairComponent) {
        let backend = backend();
        let part = ComponentRepository::new(backend.clone())
            .create(NewComponent {
                sku: "PWH-PCB-001".into(),
                name: "Control Board".into(),
                unit_cost: dec!(89.99),
                ..NewComponent::default()
            })
            .await
            .unwrap();
        let repairs = RepairRepository::new(backend.clone());
        let repair = repairs
            .create(NewRepair {
                repair_id: "SRV-002".into(),
                customer_name: None,
                device_model: None,
                issue_description: "Control panel unresponsive".into(),
                priority: RepairPriority::Medium,
                status: WorkStatus::InProgress,
                assigned_technician: Some("Lisa Wang".into()),
                start_date: None,
                estimated_completion: None,
                labor_cost: dec!(75.00),
                parts_cost: dec!(89.99),
                notes: None,
            })
            .await
            .unwrap();
        let line = NewRepairComponent {
            component_id: part.id,
            quantity_needed: 1,
            quantity_used: 1,
            cost_per_unit: dec!(89.99),
            notes: None,
        };
        (RepairComponentRepository::new(backend), repairs, repair.id, line)
    }

    #[tokio::test]
    async fn test_line_shows_on_repair_with_part() {
        let (lines, repairs, repair_id, input) = fixture().await;
        let line = lines.create(repair_id, input).await.unwrap();
        assert_eq!(line.repair_id, Some(repair_id));
        assert_eq!(line.total_cost, Some(dec!(89.99)));

        let repair = repairs.find_by_id(repair_id).await.unwrap().unwrap();
        assert_eq!(repair.repair_components.len(), 1);
        let part = repair.repair_components[0].components.as_ref().unwrap();
        assert_eq!(part.sku, "PWH-PCB-001");

        let listed = lines.list_for_repair(repair_id).await.unwrap();
        assert_eq!(listed[0].line.id, line.id);
    }

    #[tokio::test]
    async fn test_unknown_repair_is_not_found() {
        let (lines, _, _, input) = fixture().await;
        let err = lines.create(RepairId::new(), input).await.unwrap_err();
        assert!(matches!(err, DataError::NotFound { entity: "repair", .. }));
    }

    #[tokio::test]
    async fn test_update_recomputes_line_total() {
        let (lines, _, repair_id, input) = fixture().await;
        let line = lines.create(repair_id, input).await.unwrap();

        let updated = lines
            .update(
                line.id,
                RepairComponentUpdate {
                    quantity_used: Some(3),
                    ..RepairComponentUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.total_cost, Some(dec!(269.97)));

        lines.delete(line.id).await.unwrap();
        assert!(lines.list_for_repair(repair_id).await.unwrap().is_empty());
    }
}
