//! Shipment repository.

use serde::Deserialize;
use tracing::info;
use warehouse_core::shipment::{
    NewShipment, Shipment, ShipmentStatusSummary, ShipmentUpdate, summarize_by_type_and_status,
};
use warehouse_core::{ShipmentType, WorkStatus};
use warehouse_shared::types::{PageRequest, ShipmentId};

use super::{delete_by_id, fetch_all, find_by_id, insert_one, paged, update_by_id};
use crate::backend::schema::SHIPMENTS;
use crate::backend::{Select, SharedBackend};
use crate::error::DataError;

/// Filter for listing shipments.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShipmentFilter {
    /// Only incoming or only outgoing shipments.
    #[serde(default, rename = "type")]
    pub shipment_type: Option<ShipmentType>,
    /// Only shipments in this status.
    #[serde(default)]
    pub status: Option<WorkStatus>,
}

/// Repository for shipments.
#[derive(Debug, Clone)]
pub struct ShipmentRepository {
    backend: SharedBackend,
}

impl ShipmentRepository {
    /// Creates a new shipment repository.
    #[must_use]
    pub const fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Lists shipments by expected arrival, soonest first. Shipments without
    /// an expected arrival come last.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn list(
        &self,
        filter: &ShipmentFilter,
        page: Option<&PageRequest>,
    ) -> Result<Vec<Shipment>, DataError> {
        let query = Select::table(SHIPMENTS)
            .filter_opt("type", filter.shipment_type.map(ShipmentType::as_str))
            .filter_opt("status", filter.status.map(WorkStatus::as_str))
            .order_by("estimated_arrival", true);
        fetch_all(self.backend.as_ref(), &paged(query, page)).await
    }

    /// Finds a shipment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn find_by_id(&self, id: ShipmentId) -> Result<Option<Shipment>, DataError> {
        find_by_id(self.backend.as_ref(), Select::table(SHIPMENTS), id).await
    }

    /// Creates a shipment.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid, the shipment code is taken,
    /// or the insert fails.
    pub async fn create(&self, input: NewShipment) -> Result<Shipment, DataError> {
        input.validate()?;
        let shipment: Shipment = insert_one(self.backend.as_ref(), SHIPMENTS, &input).await?;
        info!(
            shipment_id = %shipment.shipment_id,
            kind = %shipment.shipment_type,
            "shipment created"
        );
        Ok(shipment)
    }

    /// Patches a shipment.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch is empty or invalid, the shipment does
    /// not exist, or the update fails.
    pub async fn update(&self, id: ShipmentId, input: ShipmentUpdate) -> Result<Shipment, DataError> {
        input.validate()?;
        update_by_id(self.backend.as_ref(), SHIPMENTS, "shipment", id, &input).await
    }

    /// Sets only the status of a shipment.
    ///
    /// # Errors
    ///
    /// Returns an error if the shipment does not exist or the update fails.
    pub async fn update_status(&self, id: ShipmentId, status: WorkStatus) -> Result<Shipment, DataError> {
        let shipment: Shipment =
            update_by_id(self.backend.as_ref(), SHIPMENTS, "shipment", id, &ShipmentUpdate::status(status))
                .await?;
        info!(shipment_id = %shipment.shipment_id, %status, "shipment status changed");
        Ok(shipment)
    }

    /// Deletes a shipment.
    ///
    /// # Errors
    ///
    /// Returns an error if the shipment does not exist or the delete fails.
    pub async fn delete(&self, id: ShipmentId) -> Result<(), DataError> {
        delete_by_id(self.backend.as_ref(), SHIPMENTS, "shipment", id).await
    }

    /// Count and units per type and status.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn status_summary(&self) -> Result<Vec<ShipmentStatusSummary>, DataError> {
        let shipments: Vec<Shipment> = fetch_all(self.backend.as_ref(), &Select::table(SHIPMENTS)).await?;
        Ok(summarize_by_type_and_status(&shipments))
    }
}
