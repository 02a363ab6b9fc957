//! Dashboard tabs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// View-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// No tab has this id.
    #[error("Unknown tab: {0}")]
    UnknownTab(String),
}

/// A dashboard tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// Metrics and low-stock alerts.
    Overview,
    /// Customer returns.
    Returns,
    /// Repair jobs.
    Repairs,
    /// Shipments.
    Shipments,
    /// Components and stock.
    Inventory,
    /// Weekly budget.
    Budget,
}

impl Tab {
    /// Tabs in display order.
    pub const ALL: [Self; 6] = [
        Self::Overview,
        Self::Returns,
        Self::Repairs,
        Self::Shipments,
        Self::Inventory,
        Self::Budget,
    ];

    /// URL id.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Returns => "returns",
            Self::Repairs => "repairs",
            Self::Shipments => "shipments",
            Self::Inventory => "inventory",
            Self::Budget => "budget",
        }
    }

    /// Navigation label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Returns => "Returns (RMA)",
            Self::Repairs => "Service & Repair",
            Self::Shipments => "Shipments",
            Self::Inventory => "Inventory",
            Self::Budget => "Budget",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tab {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tab| tab.id() == s)
            .ok_or_else(|| ViewError::UnknownTab(s.to_string()))
    }
}
