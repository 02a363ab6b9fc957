//! Dashboard data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Dashboard metrics response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    /// Sunday the figures are counted from.
    pub week_start: NaiveDate,
    /// Incoming shipments expected on or after the week start.
    pub incoming_shipments: u64,
    /// Outgoing shipments created on or after the week start.
    pub outgoing_shipments: u64,
    /// Sum of budgeted amounts for weeks starting on or after the week start.
    pub total_budget: Decimal,
    /// Sum of actual amounts over the same entries.
    pub total_used: Decimal,
    /// `total_budget - total_used`.
    pub budget_remaining: Decimal,
}
