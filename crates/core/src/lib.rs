//! Core business logic for the warehouse dashboard.
//!
//! This crate contains pure domain logic with ZERO web or database dependencies.
//! All entity types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `status` - Work status, shipment type, and repair priority enums
//! - `company` - Customer companies referenced by returns
//! - `returns` - Product returns
//! - `repair` - Repair jobs, their component lines, and summaries
//! - `shipment` - Incoming/outgoing shipments and summaries
//! - `inventory` - Components, stock movements, and `apply_movement`
//! - `budget` - Weekly budget entries, totals, and usage
//! - `dashboard` - Week boundaries and overview metrics aggregation
//! - `view` - Tab identifiers and the per-tab load state machine

pub mod budget;
pub mod company;
pub mod dashboard;
pub mod inventory;
pub mod repair;
pub mod returns;
pub mod shipment;
pub mod status;
pub mod validation;
pub mod view;

pub use status::{RepairPriority, ShipmentType, UnknownVariant, WorkStatus};
pub use validation::ValidationError;
