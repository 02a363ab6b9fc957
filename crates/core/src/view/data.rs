//! What each tab displays once loaded.

use serde::Serialize;

use crate::budget::BudgetLine;
use crate::dashboard::DashboardMetrics;
use crate::inventory::{Component, LowStockItem};
use crate::repair::RepairWithComponents;
use crate::returns::ReturnWithCompany;
use crate::shipment::Shipment;
use crate::view::Tab;

/// Overview tab: headline metrics plus low-stock alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverviewData {
    /// Week metrics.
    pub metrics: DashboardMetrics,
    /// Components at or below their reorder level, lowest stock first.
    pub low_stock: Vec<LowStockItem>,
}

/// Loaded data of one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TabData {
    /// Overview tab.
    Overview(OverviewData),
    /// Returns with their company.
    Returns(Vec<ReturnWithCompany>),
    /// Repairs with their component lines.
    Repairs(Vec<RepairWithComponents>),
    /// Shipments by expected arrival.
    Shipments(Vec<Shipment>),
    /// Components by name.
    Inventory(Vec<Component>),
    /// Budget rows with derived figures.
    Budget(Vec<BudgetLine>),
}

impl TabData {
    /// Tab this data belongs to.
    #[must_use]
    pub const fn tab(&self) -> Tab {
        match self {
            Self::Overview(_) => Tab::Overview,
            Self::Returns(_) => Tab::Returns,
            Self::Repairs(_) => Tab::Repairs,
            Self::Shipments(_) => Tab::Shipments,
            Self::Inventory(_) => Tab::Inventory,
            Self::Budget(_) => Tab::Budget,
        }
    }

    /// Number of rows shown (low-stock alerts for the overview).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Overview(data) => data.low_stock.len(),
            Self::Returns(rows) => rows.len(),
            Self::Repairs(rows) => rows.len(),
            Self::Shipments(rows) => rows.len(),
            Self::Inventory(rows) => rows.len(),
            Self::Budget(rows) => rows.len(),
        }
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
