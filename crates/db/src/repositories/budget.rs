//! Budget entry repository.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use warehouse_core::budget::{
    BudgetEntry, BudgetEntryUpdate, BudgetLine, BudgetService, NewBudgetEntry, WeeklyBudgetSummary,
};
use warehouse_shared::types::{BudgetEntryId, PageRequest};

use super::{delete_by_id, fetch_all, find_by_id, insert_one, paged, update_by_id};
use crate::backend::schema::BUDGET_ENTRIES;
use crate::backend::{Filter, Select, SharedBackend};
use crate::error::DataError;

/// Filter for listing budget entries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BudgetFilter {
    /// Only entries in this category.
    #[serde(default)]
    pub category: Option<String>,
    /// Only entries for the week starting on this date.
    #[serde(default)]
    pub week_start: Option<NaiveDate>,
}

/// Repository for weekly budget entries.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    backend: SharedBackend,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Lists entries, latest week first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn list(
        &self,
        filter: &BudgetFilter,
        page: Option<&PageRequest>,
    ) -> Result<Vec<BudgetEntry>, DataError> {
        let query = Select::table(BUDGET_ENTRIES)
            .filter_opt("category", filter.category.clone())
            .filter_opt("week_start", filter.week_start.map(|d| d.to_string()))
            .order_by("week_start", false);
        fetch_all(self.backend.as_ref(), &paged(query, page)).await
    }

    /// Lists entries with remaining amount and usage, as the budget tab shows
    /// them.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn lines(
        &self,
        filter: &BudgetFilter,
        page: Option<&PageRequest>,
    ) -> Result<Vec<BudgetLine>, DataError> {
        let entries = self.list(filter, page).await?;
        Ok(entries.into_iter().map(BudgetService::line).collect())
    }

    /// Entries for weeks starting on or after `week_start`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn entries_from(&self, week_start: NaiveDate) -> Result<Vec<BudgetEntry>, DataError> {
        let query = Select::table(BUDGET_ENTRIES)
            .filter(Filter::gte("week_start", week_start.to_string()))
            .order_by("week_start", true);
        fetch_all(self.backend.as_ref(), &query).await
    }

    /// Budget versus actual for the week starting exactly on `week_start`.
    ///
    /// # Errors
    ///
    /// Returns `DataError::Budget` if the week has no entries, or an error if
    /// the backend request fails.
    pub async fn weekly_summary(&self, week_start: NaiveDate) -> Result<WeeklyBudgetSummary, DataError> {
        let query = Select::table(BUDGET_ENTRIES)
            .filter(Filter::eq("week_start", week_start.to_string()))
            .order_by("category", true);
        let entries: Vec<BudgetEntry> = fetch_all(self.backend.as_ref(), &query).await?;
        Ok(BudgetService::weekly_summary(week_start, &entries)?)
    }

    /// Finds an entry by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend request fails.
    pub async fn find_by_id(&self, id: BudgetEntryId) -> Result<Option<BudgetEntry>, DataError> {
        find_by_id(self.backend.as_ref(), Select::table(BUDGET_ENTRIES), id).await
    }

    /// Creates an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is invalid or the insert fails.
    pub async fn create(&self, input: NewBudgetEntry) -> Result<BudgetEntry, DataError> {
        input.validate()?;
        let entry: BudgetEntry = insert_one(self.backend.as_ref(), BUDGET_ENTRIES, &input).await?;
        info!(
            category = %entry.category,
            week_start = %entry.week_start,
            budgeted = %entry.budgeted_amount,
            "budget entry created"
        );
        Ok(entry)
    }

    /// Patches an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the patch is empty or invalid, the entry does not
    /// exist, or the update fails.
    pub async fn update(&self, id: BudgetEntryId, input: BudgetEntryUpdate) -> Result<BudgetEntry, DataError> {
        input.validate()?;
        update_by_id(self.backend.as_ref(), BUDGET_ENTRIES, "budget entry", id, &input).await
    }

    /// Deletes an entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry does not exist or the delete fails.
    pub async fn delete(&self, id: BudgetEntryId) -> Result<(), DataError> {
        delete_by_id(self.backend.as_ref(), BUDGET_ENTRIES, "budget entry", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::backend;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use warehouse_core::budget::BudgetError;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, day).unwrap()
    }

    fn entry(category: &str, start: u32, budgeted: Decimal, actual: Option<Decimal>) -> NewBudgetEntry {
        NewBudgetEntry {
            week_start: date(start),
            week_end: date(start + 6),
            category: category.to_string(),
            budgeted_amount: budgeted,
            actual_amount: actual,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_lines_show_remaining_and_usage() {
        let repo = BudgetRepository::new(backend());
        repo.create(entry("Parts & Components", 3, dec!(50000), Some(dec!(32450.75))))
            .await
            .unwrap();

        let lines = repo.lines(&BudgetFilter::default(), None).await.unwrap();
        assert_eq!(lines[0].remaining, dec!(17549.25));
        assert_eq!(lines[0].usage_percent, dec!(64.90));
    }

    #[tokio::test]
    async fn test_weekly_summary_only_counts_that_week() {
        let repo = BudgetRepository::new(backend());
        repo.create(entry("Labor Costs", 3, dec!(25000), Some(dec!(18250.50)))).await.unwrap();
        repo.create(entry("Shipping & Logistics", 3, dec!(15000), Some(dec!(12100.25)))).await.unwrap();
        repo.create(entry("Labor Costs", 10, dec!(99999), None)).await.unwrap();

        let summary = repo.weekly_summary(date(3)).await.unwrap();
        assert_eq!(summary.total_budgeted, dec!(40000));
        assert_eq!(summary.total_actual, dec!(30350.75));
        assert_eq!(summary.categories.len(), 2);
        assert_eq!(summary.week_end, date(9));
    }

    #[tokio::test]
    async fn test_weekly_summary_without_entries() {
        let repo = BudgetRepository::new(backend());
        let err = repo.weekly_summary(date(3)).await.unwrap_err();
        assert!(matches!(err, DataError::Budget(BudgetError::NoEntriesForWeek(d)) if d == date(3)));
    }

    #[tokio::test]
    async fn test_entries_from_and_week_filter() {
        let repo = BudgetRepository::new(backend());
        repo.create(entry("Labor Costs", 3, dec!(1), None)).await.unwrap();
        repo.create(entry("Labor Costs", 10, dec!(2), None)).await.unwrap();
        repo.create(entry("Labor Costs", 17, dec!(3), None)).await.unwrap();

        let from = repo.entries_from(date(10)).await.unwrap();
        assert_eq!(from.len(), 2);

        let filter = BudgetFilter {
            week_start: Some(date(17)),
            ..BudgetFilter::default()
        };
        let listed = repo.list(&filter, None).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].budgeted_amount, dec!(3));
    }

    #[tokio::test]
    async fn test_update_clears_actual_amount() {
        let repo = BudgetRepository::new(backend());
        let created = repo
            .create(entry("Labor Costs", 3, dec!(25000), Some(dec!(10))))
            .await
            .unwrap();

        let updated = repo
            .update(
                created.id,
                BudgetEntryUpdate {
                    actual_amount: Some(None),
                    ..BudgetEntryUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.actual_amount, None);
        assert_eq!(updated.actual_or_zero(), Decimal::ZERO);
    }
}
