//! Repair analytics computed from fetched rows.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::Repair;
use crate::status::{RepairPriority, WorkStatus};

/// Repairs grouped by status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCostSummary {
    /// Status of the group.
    pub status: WorkStatus,
    /// Number of repairs.
    pub count: u64,
    /// Sum of labor plus parts across the group.
    pub total_cost: Decimal,
}

/// Repairs grouped by priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCount {
    /// Priority of the group.
    pub priority: RepairPriority,
    /// Number of repairs.
    pub count: u64,
}

/// Groups repairs by status. Only statuses that occur are reported, in
/// workflow order.
#[must_use]
pub fn summarize_by_status(repairs: &[Repair]) -> Vec<StatusCostSummary> {
    let mut groups: BTreeMap<WorkStatus, (u64, Decimal)> = BTreeMap::new();
    for repair in repairs {
        let entry = groups.entry(repair.status).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += repair.cost();
    }

    groups
        .into_iter()
        .map(|(status, (count, total_cost))| StatusCostSummary {
            status,
            count,
            total_cost,
        })
        .collect()
}

/// Groups repairs by priority, least urgent first.
#[must_use]
pub fn summarize_by_priority(repairs: &[Repair]) -> Vec<PriorityCount> {
    let mut groups: BTreeMap<RepairPriority, u64> = BTreeMap::new();
    for repair in repairs {
        *groups.entry(repair.priority).or_default() += 1;
    }

    groups
        .into_iter()
        .map(|(priority, count)| PriorityCount { priority, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use warehouse_shared::types::RepairId;

    fn repair(status: WorkStatus, priority: RepairPriority, labor: Decimal, parts: Decimal) -> Repair {
        Repair {
            id: RepairId::new(),
            repair_id: "SRV".into(),
            customer_name: None,
            device_model: None,
            issue_description: "issue".into(),
            priority,
            status,
            assigned_technician: None,
            start_date: None,
            estimated_completion: None,
            actual_completion: None,
            labor_cost: labor,
            parts_cost: parts,
            total_cost: None,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_status_summary_groups_costs() {
        let repairs = vec![
            repair(WorkStatus::InProgress, RepairPriority::High, dec!(120), dec!(125.50)),
            repair(WorkStatus::Pending, RepairPriority::Medium, dec!(100), dec!(89.25)),
            repair(WorkStatus::InProgress, RepairPriority::Low, dec!(10), dec!(0)),
        ];

        let summary = summarize_by_status(&repairs);
        assert_eq!(
            summary,
            vec![
                StatusCostSummary {
                    status: WorkStatus::Pending,
                    count: 1,
                    total_cost: dec!(189.25),
                },
                StatusCostSummary {
                    status: WorkStatus::InProgress,
                    count: 2,
                    total_cost: dec!(255.50),
                },
            ]
        );
    }

    #[test]
    fn test_priority_summary_counts() {
        let repairs = vec![
            repair(WorkStatus::Pending, RepairPriority::Critical, dec!(0), dec!(0)),
            repair(WorkStatus::Pending, RepairPriority::Critical, dec!(0), dec!(0)),
            repair(WorkStatus::Completed, RepairPriority::Low, dec!(0), dec!(0)),
        ];

        let summary = summarize_by_priority(&repairs);
        assert_eq!(
            summary,
            vec![
                PriorityCount {
                    priority: RepairPriority::Low,
                    count: 1,
                },
                PriorityCount {
                    priority: RepairPriority::Critical,
                    count: 2,
                },
            ]
        );
    }

    #[test]
    fn test_empty_input_yields_empty_summary() {
        assert!(summarize_by_status(&[]).is_empty());
        assert!(summarize_by_priority(&[]).is_empty());
    }
}
