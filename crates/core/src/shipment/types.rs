//! Shipment data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};
use warehouse_shared::types::ShipmentId;

use crate::status::{ShipmentType, WorkStatus};
use crate::validation::{
    ValidationError, require_non_negative, require_non_negative_amount, require_text,
};

/// A shipment row.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    /// Row ID.
    pub id: ShipmentId,
    /// Human-facing shipment code, e.g. `OS-2025-089`.
    pub shipment_id: String,
    /// Direction.
    #[serde(rename = "type")]
    pub shipment_type: ShipmentType,
    /// Where it ships from.
    #[serde(default)]
    pub origin: Option<String>,
    /// Where it ships to.
    #[serde(default)]
    pub destination: Option<String>,
    /// Carrier name.
    #[serde(default)]
    pub carrier: Option<String>,
    /// Carrier tracking number.
    #[serde(default)]
    pub tracking_number: Option<String>,
    /// First serial number in the consignment.
    #[serde(default)]
    pub serial_start: Option<String>,
    /// Last serial number in the consignment.
    #[serde(default)]
    pub serial_end: Option<String>,
    /// Units in the consignment.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub total_units: i32,
    /// Gross weight.
    #[serde(default)]
    pub weight_kg: Option<Decimal>,
    /// Expected arrival.
    #[serde(default)]
    pub estimated_arrival: Option<DateTime<Utc>>,
    /// Actual arrival.
    #[serde(default)]
    pub actual_arrival: Option<DateTime<Utc>>,
    /// Processing status.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub status: WorkStatus,
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

impl Shipment {
    /// Serial range as `start - end`, when both ends are known.
    #[must_use]
    pub fn serial_range(&self) -> Option<String> {
        match (&self.serial_start, &self.serial_end) {
            (Some(start), Some(end)) => Some(format!("{start} - {end}")),
            _ => None,
        }
    }
}

/// Insert payload for a shipment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewShipment {
    /// Human-facing shipment code.
    pub shipment_id: String,
    /// Direction.
    #[serde(rename = "type")]
    pub shipment_type: ShipmentType,
    /// Origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Destination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// Carrier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<String>,
    /// Tracking number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    /// First serial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_start: Option<String>,
    /// Last serial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_end: Option<String>,
    /// Units.
    #[serde(default)]
    pub total_units: i32,
    /// Weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<Decimal>,
    /// Expected arrival.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_arrival: Option<DateTime<Utc>>,
    /// Initial status.
    #[serde(default)]
    pub status: WorkStatus,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewShipment {
    /// Checks the code, units, and weight.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("shipment_id", &self.shipment_id)?;
        require_non_negative("total_units", self.total_units)?;
        if let Some(weight) = self.weight_kg {
            require_non_negative_amount("weight_kg", weight)?;
        }
        Ok(())
    }
}

/// Partial update for a shipment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipmentUpdate {
    /// New shipment code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipment_id: Option<String>,
    /// New direction.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub shipment_type: Option<ShipmentType>,
    /// New origin.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub origin: Option<Option<String>>,
    /// New destination.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub destination: Option<Option<String>>,
    /// New carrier.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub carrier: Option<Option<String>>,
    /// New tracking number.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub tracking_number: Option<Option<String>>,
    /// New first serial.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub serial_start: Option<Option<String>>,
    /// New last serial.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub serial_end: Option<Option<String>>,
    /// New unit count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_units: Option<i32>,
    /// New weight.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub weight_kg: Option<Option<Decimal>>,
    /// New expected arrival.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub estimated_arrival: Option<Option<DateTime<Utc>>>,
    /// Arrival stamp, or `Some(None)` to clear it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub actual_arrival: Option<Option<DateTime<Utc>>>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkStatus>,
    /// New notes.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub notes: Option<Option<String>>,
}

impl ShipmentUpdate {
    /// Update that only changes the status.
    #[must_use]
    pub fn status(status: WorkStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Checks fields that are present.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(code) = &self.shipment_id {
            require_text("shipment_id", code)?;
        }
        if let Some(units) = self.total_units {
            require_non_negative("total_units", units)?;
        }
        if let Some(Some(weight)) = self.weight_kg {
            require_non_negative_amount("weight_kg", weight)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row() -> serde_json::Value {
        json!({
            "id": "0198a0c4-51d2-7c62-9d38-2f4e1b3a5c30",
            "shipment_id": "OS-2025-089",
            "type": "incoming",
            "origin": "Shanghai, CN",
            "destination": "San Jose, CA",
            "carrier": null,
            "tracking_number": null,
            "serial_start": "SN-1000",
            "serial_end": "SN-1149",
            "total_units": 150,
            "weight_kg": null,
            "estimated_arrival": "2025-08-10T00:00:00+00:00",
            "actual_arrival": null,
            "status": "in-progress",
            "notes": null,
            "created_at": "2025-08-01T12:00:00+00:00",
            "updated_at": "2025-08-01T12:00:00+00:00"
        })
    }

    #[test]
    fn test_shipment_type_column_renamed() {
        let shipment: Shipment = serde_json::from_value(row()).unwrap();
        assert_eq!(shipment.shipment_type, ShipmentType::Incoming);
        assert_eq!(shipment.total_units, 150);

        let back = serde_json::to_value(&shipment).unwrap();
        assert_eq!(back["type"], json!("incoming"));
        assert!(back.get("shipment_type").is_none());
    }

    #[test]
    fn test_serial_range() {
        let mut shipment: Shipment = serde_json::from_value(row()).unwrap();
        assert_eq!(shipment.serial_range().as_deref(), Some("SN-1000 - SN-1149"));

        shipment.serial_end = None;
        assert!(shipment.serial_range().is_none());
    }

    #[test]
    fn test_status_update_payload() {
        let body = serde_json::to_value(ShipmentUpdate::status(WorkStatus::Cancelled)).unwrap();
        assert_eq!(body, json!({"status": "cancelled"}));
    }

    #[test]
    fn test_negative_units_rejected() {
        let update = ShipmentUpdate {
            total_units: Some(-3),
            ..ShipmentUpdate::default()
        };
        assert_eq!(
            update.validate(),
            Err(ValidationError::Negative { field: "total_units" })
        );
    }
}
