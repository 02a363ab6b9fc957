//! Component repository: catalogue reads and writes plus stock changes.
//!
//! `current_stock` is never patched directly by callers. Every change goes
//! through `adjust_stock`, which records a movement and then writes the
//! level computed by `apply_movement`.

use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};
use warehouse_core::inventory::{
    Component, ComponentUpdate, LowStockItem, NewComponent, NewStockMovement, StockAdjustment,
    apply_movement, reconcile_stock,
};
use warehouse_shared::types::{ComponentId, PageRequest};

use super::stock_movement::StockMovementRepository;
use super::{delete_by_id, fetch_all, find_by_id, find_one, insert_one, paged, update_by_id};
use crate::backend::schema::COMPONENTS;
use crate::backend::{Filter, FilterOp, Row, Select, SharedBackend};
use crate::error::DataError;

/// Filter for listing components.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComponentFilter {
    /// Only components in this category.
    #[serde(default)]
    pub category: Option<String>,
}

/// Repository for inventory components.
#[derive(Debug, Clone)]
pub struct ComponentRepository {
    backend: SharedBackend,
    movements: StockMovementRepository,
}

impl ComponentRepository {
    /// Creates a new component repository.
    #[must_use]
    pub fn new(backend: SharedBackend) -> Self {
        let movements = StockMovementRepository::new(backend.clone());
        Self { backend, movements }
    }

    /// Lists components by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn list(
        &self,
        filter: &ComponentFilter,
        page: Option<&PageRequest>,
    ) -> Result<Vec<Component>, DataError> {
        let query = Select::table(COMPONENTS)
            .filter_opt("category", filter.category.clone())
            .order_by("name", true);
        fetch_all(self.backend.as_ref(), &paged(query, page)).await
    }

    /// Finds a component by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn find_by_id(&self, id: ComponentId) -> Result<Option<Component>, DataError> {
        find_by_id(self.backend.as_ref(), Select::table(COMPONENTS), id).await
    }

    /// Finds a component by SKU.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn find_by_sku(&self, sku: &str) -> Result<Option<Component>, DataError> {
        find_one(self.backend.as_ref(), Select::table(COMPONENTS).filter(Filter::eq("sku", sku))).await
    }

    /// Components at or below their reorder level, lowest stock first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn low_stock(&self) -> Result<Vec<LowStockItem>, DataError> {
        let query = Select::table(COMPONENTS)
            .filter(Filter::column("current_stock", FilterOp::Lte, "reorder_level"))
            .order_by("current_stock", true);
        let components: Vec<Component> = fetch_all(self.backend.as_ref(), &query).await?;
        Ok(components.into_iter().map(LowStockItem::from).collect())
    }

    /// Creates a component.
    ///
    /// A non-zero opening stock is recorded as an `adjustment` movement so
    /// the stock level always matches the movement log.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid, the SKU is taken, or a
    /// write fails. If the opening movement fails the component remains.
    pub async fn create(&self, input: NewComponent) -> Result<Component, DataError> {
        input.validate()?;
        let component: Component = insert_one(self.backend.as_ref(), COMPONENTS, &input).await?;

        if component.current_stock != 0 {
            self.movements
                .record(&NewStockMovement::opening_balance(component.id, component.current_stock))
                .await?;
        }

        info!(sku = %component.sku, stock = component.current_stock, "component created");
        Ok(component)
    }

    /// Patches catalogue fields. Stock is not patchable here.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch is empty or invalid, the component does
    /// not exist, or the update fails.
    pub async fn update(&self, id: ComponentId, input: ComponentUpdate) -> Result<Component, DataError> {
        input.validate()?;
        update_by_id(self.backend.as_ref(), COMPONENTS, "component", id, &input).await
    }

    /// Deletes a component.
    ///
    /// # Errors
    ///
    /// Returns an error if the component does not exist or is still
    /// referenced by movements or repair lines.
    pub async fn delete(&self, id: ComponentId) -> Result<(), DataError> {
        delete_by_id(self.backend.as_ref(), COMPONENTS, "component", id).await
    }

    async fn write_stock(&self, id: ComponentId, stock: i32) -> Result<Component, DataError> {
        let mut patch = Row::new();
        patch.insert("current_stock".into(), Value::from(stock));
        update_by_id(self.backend.as_ref(), COMPONENTS, "component", id, &patch).await
    }

    /// Changes stock by recording a movement.
    ///
    /// The new level is computed before anything is written. The movement is
    /// appended first; if that fails nothing else is written. The stock
    /// patch follows and the updated component is returned. The two writes
    /// are not atomic.
    ///
    /// The patch writes an absolute level read before the movement, so two
    /// concurrent adjustments of one component leave the last writer's level
    /// and the stock no longer equals the movement sum. [`Self::reconcile`]
    /// repairs that drift from the movement log.
    ///
    /// # Errors
    ///
    /// Returns an error if the component does not exist, the movement would
    /// leave negative stock or overflow, or either write fails.
    pub async fn adjust_stock(&self, id: ComponentId, adjustment: StockAdjustment) -> Result<Component, DataError> {
        let component = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DataError::not_found("component", id))?;

        let movement = adjustment.into_movement(id)?;
        let new_stock = apply_movement(component.current_stock, &movement)?;

        self.movements.record(&movement).await?;
        let updated = self.write_stock(id, new_stock).await?;

        info!(
            sku = %updated.sku,
            from = component.current_stock,
            to = updated.current_stock,
            kind = %movement.movement_type,
            "stock adjusted"
        );
        Ok(updated)
    }

    /// Recomputes stock from the movement log and writes it back if it has
    /// drifted.
    ///
    /// # Errors
    ///
    /// Returns an error if the component does not exist, the history sums
    /// to a negative or overflowing level, or a backend request fails.
    pub async fn reconcile(&self, id: ComponentId) -> Result<Component, DataError> {
        let component = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| DataError::not_found("component", id))?;

        let history = self.movements.history(id).await?;
        let expected = reconcile_stock(&history)?;
        if expected == component.current_stock {
            return Ok(component);
        }

        warn!(
            sku = %component.sku,
            recorded = component.current_stock,
            expected,
            "stock drifted from movement log, correcting"
        );
        self.write_stock(id, expected).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::schema::STOCK_MOVEMENTS;
    use crate::backend::{MemoryBackend, TableBackend};
    use crate::repositories::test_support::{Call, FailingBackend, backend};
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use warehouse_core::inventory::{InventoryError, MovementType, OPENING_BALANCE};

    fn part(sku: &str, name: &str, stock: i32, reorder: i32) -> NewComponent {
        NewComponent {
            sku: sku.to_string(),
            name: name.to_string(),
            category: Some("Electronics".to_string()),
            current_stock: stock,
            minimum_stock: reorder / 2,
            reorder_level: reorder,
            unit_cost: dec!(10.00),
            ..NewComponent::default()
        }
    }

    async fn seeded(repo: &ComponentRepository) {
        repo.create(part("PWH-MOT-001", "Motor Assembly", 45, 15)).await.unwrap();
        repo.create(part("PWH-PCB-001", "Control Board", 5, 8)).await.unwrap();
        repo.create(part("PWH-CAB-001", "Power Cable", 156, 25)).await.unwrap();
        repo.create(part("PWH-SEN-001", "Sensor Unit", 8, 12)).await.unwrap();
    }

    #[tokio::test]
    async fn test_low_stock_rows_are_low_and_ascending() {
        let repo = ComponentRepository::new(backend());
        seeded(&repo).await;
        repo.create(part("PWH-FAN-001", "Cooling Fan", 12, 12)).await.unwrap();

        let rows = repo.low_stock().await.unwrap();
        let skus: Vec<_> = rows.iter().map(|r| r.component.sku.as_str()).collect();
        assert_eq!(skus, ["PWH-PCB-001", "PWH-SEN-001", "PWH-FAN-001"]);
        assert!(rows.iter().all(|r| r.component.current_stock <= r.component.reorder_level));
        assert!(rows.windows(2).all(|w| w[0].component.current_stock <= w[1].component.current_stock));
        assert_eq!(rows[0].shortfall, 3);
        assert_eq!(rows[2].shortfall, 0);
    }

    #[tokio::test]
    async fn test_out_adjustment_records_negative_movement() {
        let repo = ComponentRepository::new(backend());
        seeded(&repo).await;
        let motor = repo.find_by_sku("PWH-MOT-001").await.unwrap().unwrap();

        let updated = repo
            .adjust_stock(motor.id, StockAdjustment::manual(5, MovementType::Out))
            .await
            .unwrap();
        assert_eq!(updated.current_stock, 40);

        let reread = repo.find_by_id(motor.id).await.unwrap().unwrap();
        assert_eq!(reread.current_stock, 40);

        let history = repo.movements.history(motor.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].reference_type.as_deref(), Some(OPENING_BALANCE));
        assert_eq!(history[1].quantity, -5);
        assert_eq!(history[1].movement_type, MovementType::Out);
    }

    #[tokio::test]
    async fn test_overdraw_is_rejected_before_any_write() {
        let backend = Arc::new(MemoryBackend::new());
        let repo = ComponentRepository::new(backend.clone());
        let board = repo.create(part("PWH-PCB-001", "Control Board", 5, 8)).await.unwrap();

        let err = repo
            .adjust_stock(board.id, StockAdjustment::manual(6, MovementType::Out))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::Inventory(InventoryError::NegativeStock { result: -1, .. })
        ));
        assert_eq!(backend.rows(STOCK_MOVEMENTS).await.len(), 1);
        assert_eq!(repo.find_by_id(board.id).await.unwrap().unwrap().current_stock, 5);
    }

    #[tokio::test]
    async fn test_failed_movement_write_leaves_stock_unchanged() {
        let failing = Arc::new(FailingBackend::new(Call::Insert, STOCK_MOVEMENTS));
        let repo = ComponentRepository::new(failing.clone());
        let motor = repo.create(part("PWH-MOT-001", "Motor Assembly", 45, 15)).await.unwrap();
        failing.arm();

        let err = repo
            .adjust_stock(motor.id, StockAdjustment::manual(5, MovementType::Out))
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Backend { status: Some(503), .. }));

        let reread = repo.find_by_id(motor.id).await.unwrap().unwrap();
        assert_eq!(reread.current_stock, 45);
        assert_eq!(repo.movements.history(motor.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_sku_lookup_matches_text_exactly() {
        let repo = ComponentRepository::new(backend());
        repo.create(part("001", "Legacy Fuse", 3, 1)).await.unwrap();
        let plain = repo.create(part("1", "Spare Fuse", 7, 1)).await.unwrap();

        let found = repo.find_by_sku("1").await.unwrap().unwrap();
        assert_eq!(found.id, plain.id);
        assert!(repo.find_by_sku("01").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_adjusting_missing_component_is_not_found() {
        let repo = ComponentRepository::new(backend());
        let err = repo
            .adjust_stock(ComponentId::new(), StockAdjustment::manual(1, MovementType::In))
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::NotFound { entity: "component", .. }));
    }

    #[tokio::test]
    async fn test_zero_opening_stock_records_nothing() {
        let backend = Arc::new(MemoryBackend::new());
        let repo = ComponentRepository::new(backend.clone());
        repo.create(part("PWH-NEW-001", "New Part", 0, 5)).await.unwrap();
        assert!(backend.rows(STOCK_MOVEMENTS).await.is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_corrects_drift() {
        let backend = Arc::new(MemoryBackend::new());
        let repo = ComponentRepository::new(backend.clone());
        let sensor = repo.create(part("PWH-SEN-001", "Sensor Unit", 8, 12)).await.unwrap();
        repo.adjust_stock(sensor.id, StockAdjustment::manual(4, MovementType::In))
            .await
            .unwrap();

        let mut drift = Row::new();
        drift.insert("current_stock".into(), Value::from(99));
        backend
            .update(COMPONENTS, &[Filter::eq("id", sensor.id.to_string())], drift)
            .await
            .unwrap();

        let fixed = repo.reconcile(sensor.id).await.unwrap();
        assert_eq!(fixed.current_stock, 12);
        assert_eq!(repo.reconcile(sensor.id).await.unwrap().current_stock, 12);
    }

    #[tokio::test]
    async fn test_reconcile_after_concurrent_adjustments_matches_movement_sum() {
        let repo = ComponentRepository::new(backend());
        let motor = repo.create(part("PWH-MOT-001", "Motor Assembly", 45, 15)).await.unwrap();

        let (first, second) = tokio::join!(
            repo.adjust_stock(motor.id, StockAdjustment::manual(5, MovementType::Out)),
            repo.adjust_stock(motor.id, StockAdjustment::manual(3, MovementType::Out)),
        );
        first.unwrap();
        second.unwrap();

        let fixed = repo.reconcile(motor.id).await.unwrap();
        assert_eq!(fixed.current_stock, 37);
        assert_eq!(repo.movements.history(motor.id).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_cannot_touch_stock_and_sku_is_unique() {
        let repo = ComponentRepository::new(backend());
        seeded(&repo).await;
        let cable = repo.find_by_sku("PWH-CAB-001").await.unwrap().unwrap();

        let updated = repo
            .update(
                cable.id,
                ComponentUpdate {
                    reorder_level: Some(200),
                    ..ComponentUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.current_stock, 156);
        assert!(updated.is_low_stock());

        let err = repo
            .update(
                cable.id,
                ComponentUpdate {
                    sku: Some("PWH-MOT-001".into()),
                    ..ComponentUpdate::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Backend { status: Some(409), .. }));
    }

    #[tokio::test]
    async fn test_category_filter() {
        let repo = ComponentRepository::new(backend());
        seeded(&repo).await;
        repo.create(NewComponent {
            category: Some("Sensors".into()),
            ..part("PWH-SEN-002", "Sensor Mk2", 30, 10)
        })
        .await
        .unwrap();

        let filter = ComponentFilter {
            category: Some("Sensors".into()),
        };
        let rows = repo.list(&filter, None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sku, "PWH-SEN-002");
    }
}
