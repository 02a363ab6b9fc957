//! Repair jobs, the parts they consume, and repair analytics.

pub mod summary;
pub mod types;

pub use summary::{PriorityCount, StatusCostSummary, summarize_by_priority, summarize_by_status};
pub use types::{
    NewRepair, NewRepairComponent, Repair, RepairComponent, RepairComponentUpdate,
    RepairComponentWithPart, RepairUpdate, RepairWithComponents,
};
