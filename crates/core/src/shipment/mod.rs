//! Incoming and outgoing shipments.

pub mod summary;
pub mod types;

pub use summary::{ShipmentStatusSummary, summarize_by_type_and_status};
pub use types::{NewShipment, Shipment, ShipmentUpdate};
