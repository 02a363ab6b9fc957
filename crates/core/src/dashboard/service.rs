//! Metrics aggregation.

use chrono::NaiveDate;

use super::types::DashboardMetrics;
use crate::budget::{BudgetEntry, BudgetService};

/// Combines the two shipment counts and the week's budget entries into
/// dashboard metrics. Counts and entries must already be restricted to the
/// week starting at `week_start`.
#[must_use]
pub fn aggregate(
    week_start: NaiveDate,
    incoming_shipments: u64,
    outgoing_shipments: u64,
    entries: &[BudgetEntry],
) -> DashboardMetrics {
    let totals = BudgetService::totals(entries);

    DashboardMetrics {
        week_start,
        incoming_shipments,
        outgoing_shipments,
        total_budget: totals.total_budget,
        total_used: totals.total_used,
        budget_remaining: totals.remaining,
    }
}
