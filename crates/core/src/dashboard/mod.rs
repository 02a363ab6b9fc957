//! Dashboard metrics for the overview tab.
//!
//! This module provides:
//! - Sunday-anchored week boundaries, evaluated in a caller-chosen time zone
//! - Aggregation of shipment counts and budget totals into one metrics value

pub mod service;
pub mod types;
pub mod week;

pub use service::aggregate;
pub use types::DashboardMetrics;
pub use week::{week_start, week_start_instant};
