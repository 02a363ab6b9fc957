//! Stock movement repository.
//!
//! Movements are an append-only log; there is no update or delete.

use serde::Deserialize;
use tracing::debug;
use warehouse_core::inventory::{MovementType, NewStockMovement, StockMovement, StockMovementWithPart};
use warehouse_shared::types::{ComponentId, PageRequest};

use super::{fetch_all, insert_one, paged};
use crate::backend::schema::{COMPONENTS, STOCK_MOVEMENTS};
use crate::backend::{Embed, Filter, Select, SharedBackend};
use crate::error::DataError;

/// Filter for listing movements.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovementFilter {
    /// Only movements of this component.
    #[serde(default)]
    pub component_id: Option<ComponentId>,
    /// Only movements of this type.
    #[serde(default)]
    pub movement_type: Option<MovementType>,
}

/// Repository for the stock movement log.
#[derive(Debug, Clone)]
pub struct StockMovementRepository {
    backend: SharedBackend,
}

impl StockMovementRepository {
    /// Creates a new stock movement repository.
    #[must_use]
    pub const fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Lists movements with their component's name and SKU, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn list(
        &self,
        filter: &MovementFilter,
        page: Option<&PageRequest>,
    ) -> Result<Vec<StockMovementWithPart>, DataError> {
        let query = Select::table(STOCK_MOVEMENTS)
            .embed(Embed::new(COMPONENTS, &["name", "sku"]))
            .filter_opt("component_id", filter.component_id.map(|id| id.to_string()))
            .filter_opt("movement_type", filter.movement_type.map(MovementType::as_str))
            .order_by("created_at", false);
        fetch_all(self.backend.as_ref(), &paged(query, page)).await
    }

    /// Full history of one component, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn history(&self, component_id: ComponentId) -> Result<Vec<StockMovement>, DataError> {
        let query = Select::table(STOCK_MOVEMENTS)
            .filter(Filter::eq("component_id", component_id.to_string()))
            .order_by("created_at", true);
        fetch_all(self.backend.as_ref(), &query).await
    }

    /// Appends a movement to the log.
    ///
    /// Does not touch the component's stock; callers pair this with the
    /// stock patch.
    ///
    /// # Errors
    ///
    /// Returns an error if the component does not exist or the insert fails.
    pub async fn record(&self, movement: &NewStockMovement) -> Result<StockMovement, DataError> {
        let recorded: StockMovement = insert_one(self.backend.as_ref(), STOCK_MOVEMENTS, movement).await?;
        debug!(
            component_id = %movement.component_id,
            quantity = movement.quantity,
            kind = %movement.movement_type,
            "stock movement recorded"
        );
        Ok(recorded)
    }
}
