//! Shipment analytics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::Shipment;
use crate::status::{ShipmentType, WorkStatus};

/// Shipments grouped by direction and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentStatusSummary {
    /// Direction of the group.
    #[serde(rename = "type")]
    pub shipment_type: ShipmentType,
    /// Status of the group.
    pub status: WorkStatus,
    /// Number of shipments.
    pub count: u64,
    /// Units across the group.
    pub total_units: i64,
}

/// Groups shipments by `(type, status)`; incoming groups come first.
#[must_use]
pub fn summarize_by_type_and_status(shipments: &[Shipment]) -> Vec<ShipmentStatusSummary> {
    let mut groups: BTreeMap<(ShipmentType, WorkStatus), (u64, i64)> = BTreeMap::new();
    for shipment in shipments {
        let entry = groups
            .entry((shipment.shipment_type, shipment.status))
            .or_default();
        entry.0 += 1;
        entry.1 += i64::from(shipment.total_units);
    }

    groups
        .into_iter()
        .map(
            |((shipment_type, status), (count, total_units))| ShipmentStatusSummary {
                shipment_type,
                status,
                count,
                total_units,
            },
        )
        .collect()
}
