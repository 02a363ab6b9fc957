//! Repair repository.

use serde::Deserialize;
use tracing::info;
use warehouse_core::repair::{
    NewRepair, PriorityCount, Repair, RepairUpdate, RepairWithComponents, StatusCostSummary,
    summarize_by_priority, summarize_by_status,
};
use warehouse_core::{RepairPriority, WorkStatus};
use warehouse_shared::types::{PageRequest, RepairId};

use super::{delete_by_id, fetch_all, find_by_id, insert_one, paged, update_by_id};
use crate::backend::schema::{COMPONENTS, REPAIR_COMPONENTS, REPAIRS};
use crate::backend::{Embed, Select, SharedBackend};
use crate::error::DataError;

/// Filter for listing repairs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepairFilter {
    /// Only repairs in this status.
    #[serde(default)]
    pub status: Option<WorkStatus>,
    /// Only repairs with this priority.
    #[serde(default)]
    pub priority: Option<RepairPriority>,
}

/// Repository for repair jobs.
#[derive(Debug, Clone)]
pub struct RepairRepository {
    backend: SharedBackend,
}

/// Repairs with their component lines and each line's part name and SKU.
fn with_components() -> Select {
    Select::table(REPAIRS)
        .embed(Embed::all(REPAIR_COMPONENTS).with(Embed::new(COMPONENTS, &["name", "sku"])))
}

impl RepairRepository {
    /// Creates a new repair repository.
    #[must_use]
    pub const fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Lists repairs with their component lines, latest start first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn list(
        &self,
        filter: &RepairFilter,
        page: Option<&PageRequest>,
    ) -> Result<Vec<RepairWithComponents>, DataError> {
        let query = with_components()
            .filter_opt("status", filter.status.map(WorkStatus::as_str))
            .filter_opt("priority", filter.priority.map(RepairPriority::as_str))
            .order_by("start_date", false);
        fetch_all(self.backend.as_ref(), &paged(query, page)).await
    }

    /// Finds a repair by ID, with its component lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn find_by_id(&self, id: RepairId) -> Result<Option<RepairWithComponents>, DataError> {
        find_by_id(self.backend.as_ref(), with_components(), id).await
    }

    /// Creates a repair.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid, the repair code is taken, or
    /// the insert fails.
    pub async fn create(&self, input: NewRepair) -> Result<Repair, DataError> {
        input.validate()?;
        let repair: Repair = insert_one(self.backend.as_ref(), REPAIRS, &input).await?;
        info!(repair_id = %repair.repair_id, priority = %repair.priority, "repair created");
        Ok(repair)
    }

    /// Patches a repair.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch is empty or invalid, the repair does not
    /// exist, or the update fails.
    pub async fn update(&self, id: RepairId, input: RepairUpdate) -> Result<Repair, DataError> {
        input.validate()?;
        update_by_id(self.backend.as_ref(), REPAIRS, "repair", id, &input).await
    }

    /// Deletes a repair.
    ///
    /// # Errors
    ///
    /// Returns an error if the repair does not exist or still has component
    /// lines.
    pub async fn delete(&self, id: RepairId) -> Result<(), DataError> {
        delete_by_id(self.backend.as_ref(), REPAIRS, "repair", id).await
    }

    /// Count and total cost per status.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn status_summary(&self) -> Result<Vec<StatusCostSummary>, DataError> {
        let repairs: Vec<Repair> = fetch_all(self.backend.as_ref(), &Select::table(REPAIRS)).await?;
        Ok(summarize_by_status(&repairs))
    }

    /// Count per priority.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn priority_summary(&self) -> Result<Vec<PriorityCount>, DataError> {
        let repairs: Vec<Repair> = fetch_all(self.backend.as_ref(), &Select::table(REPAIRS)).await?;
        Ok(summarize_by_priority(&repairs))
    }
}
