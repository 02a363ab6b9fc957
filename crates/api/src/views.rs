//! Per-tab view state.
//!
//! Each tab owns one [`LoadState`]. Loading a tab always re-reads the
//! backend; the lock is only held to flip the state, never across a fetch.

use std::collections::HashMap;

use chrono_tz::Tz;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use warehouse_core::view::{LoadState, OverviewData, Tab, TabData};
use warehouse_db::{
    BudgetFilter, BudgetRepository, ComponentFilter, ComponentRepository, DashboardRepository,
    DataError, RepairFilter, RepairRepository, ReturnFilter, ReturnRepository, SharedBackend,
    ShipmentFilter, ShipmentRepository,
};

/// Holds the load state of every tab.
#[derive(Debug)]
pub struct ViewService {
    backend: SharedBackend,
    tz: Tz,
    states: RwLock<HashMap<Tab, LoadState<TabData>>>,
}

impl ViewService {
    /// Creates a service with every tab idle.
    #[must_use]
    pub fn new(backend: SharedBackend, tz: Tz) -> Self {
        Self {
            backend,
            tz,
            states: RwLock::new(HashMap::new()),
        }
    }

    /// Current state of `tab` without loading it.
    pub async fn state(&self, tab: Tab) -> LoadState<TabData> {
        self.states.read().await.get(&tab).cloned().unwrap_or_default()
    }

    /// Loads `tab` and returns the state it lands in.
    ///
    /// A failed load is not an error here: the failure is recorded in the
    /// returned state along with whatever the tab showed before.
    pub async fn load(&self, tab: Tab) -> LoadState<TabData> {
        self.states.write().await.entry(tab).or_default().begin();
        debug!(%tab, "loading tab");

        let result = self.fetch(tab).await;
        if let Err(err) = &result {
            warn!(%tab, error = %err, "tab load failed");
        }

        let mut states = self.states.write().await;
        let state = states.entry(tab).or_default();
        state.finish(result);
        state.clone()
    }

    async fn fetch(&self, tab: Tab) -> Result<TabData, DataError> {
        let backend = self.backend.clone();
        let data = match tab {
            Tab::Overview => {
                let dashboard = DashboardRepository::new(backend.clone(), self.tz);
                let components = ComponentRepository::new(backend);
                let (metrics, low_stock) =
                    tokio::try_join!(dashboard.metrics(), components.low_stock())?;
                TabData::Overview(OverviewData { metrics, low_stock })
            }
            Tab::Returns => TabData::Returns(
                ReturnRepository::new(backend)
                    .list(&ReturnFilter::default(), None)
                    .await?,
            ),
            Tab::Repairs => TabData::Repairs(
                RepairRepository::new(backend)
                    .list(&RepairFilter::default(), None)
                    .await?,
            ),
            Tab::Shipments => TabData::Shipments(
                ShipmentRepository::new(backend)
                    .list(&ShipmentFilter::default(), None)
                    .await?,
            ),
            Tab::Inventory => TabData::Inventory(
                ComponentRepository::new(backend)
                    .list(&ComponentFilter::default(), None)
                    .await?,
            ),
            Tab::Budget => TabData::Budget(
                BudgetRepository::new(backend)
                    .lines(&BudgetFilter::default(), None)
                    .await?,
            ),
        };
        Ok(data)
    }
}
