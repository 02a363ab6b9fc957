//! Dashboard repository: the reads behind the overview metrics.

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;
use tracing::debug;
use warehouse_core::ShipmentType;
use warehouse_core::dashboard::{DashboardMetrics, aggregate, week_start, week_start_instant};

use super::budget::BudgetRepository;
use crate::backend::schema::SHIPMENTS;
use crate::backend::{Filter, SharedBackend};
use crate::error::DataError;

/// Repository for overview metrics.
///
/// Nothing is cached; every call re-reads the backend.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    backend: SharedBackend,
    budget: BudgetRepository,
    tz: Tz,
}

impl DashboardRepository {
    /// Creates a new dashboard repository. `tz` decides where "today" and
    /// midnight fall.
    #[must_use]
    pub fn new(backend: SharedBackend, tz: Tz) -> Self {
        let budget = BudgetRepository::new(backend.clone());
        Self { backend, budget, tz }
    }

    /// Metrics for the current week.
    ///
    /// # Errors
    ///
    /// Returns the first backend error among the reads.
    pub async fn metrics(&self) -> Result<DashboardMetrics, DataError> {
        self.metrics_for(Utc::now()).await
    }

    /// Metrics for the week containing `now`:
    /// - incoming shipments expected on or after the week start
    /// - outgoing shipments created on or after the week start
    /// - budget totals over entries whose week starts on or after it
    ///
    /// The three reads run concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first backend error among the reads.
    pub async fn metrics_for(&self, now: DateTime<Utc>) -> Result<DashboardMetrics, DataError> {
        let local = now.with_timezone(&self.tz);
        let start_date = week_start(local.date_naive());
        let start = week_start_instant(&local).to_rfc3339_opts(SecondsFormat::Secs, false);
        debug!(%start_date, %start, tz = self.tz.name(), "computing dashboard metrics");

        let incoming = [
            Filter::eq("type", ShipmentType::Incoming.as_str()),
            Filter::gte("estimated_arrival", start.clone()),
        ];
        let outgoing = [
            Filter::eq("type", ShipmentType::Outgoing.as_str()),
            Filter::gte("created_at", start),
        ];

        let (incoming, outgoing, entries) = tokio::try_join!(
            self.backend.count(SHIPMENTS, &incoming),
            self.backend.count(SHIPMENTS, &outgoing),
            self.budget.entries_from(start_date),
        )?;

        Ok(aggregate(start_date, incoming, outgoing, &entries))
    }
}
