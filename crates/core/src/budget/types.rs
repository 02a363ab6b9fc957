//! Budget data types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use warehouse_shared::types::BudgetEntryId;

use crate::validation::{ValidationError, require_non_negative_amount, require_text};

/// A budget entry row: one category's budget for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEntry {
    /// Row ID.
    pub id: BudgetEntryId,
    /// First day of the budget week.
    pub week_start: NaiveDate,
    /// Last day of the budget week.
    pub week_end: NaiveDate,
    /// Spending category, e.g. `Parts & Components`.
    pub category: String,
    /// Planned spend.
    pub budgeted_amount: Decimal,
    /// Actual spend; `None` until it has been booked.
    #[serde(default)]
    pub actual_amount: Option<Decimal>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BudgetEntry {
    /// Actual spend with an unbooked amount counted as zero.
    #[must_use]
    pub fn actual_or_zero(&self) -> Decimal {
        self.actual_amount.unwrap_or(Decimal::ZERO)
    }
}

/// Insert payload for a budget entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBudgetEntry {
    /// First day of the week.
    pub week_start: NaiveDate,
    /// Last day of the week.
    pub week_end: NaiveDate,
    /// Category.
    pub category: String,
    /// Planned spend.
    pub budgeted_amount: Decimal,
    /// Actual spend, if already known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_amount: Option<Decimal>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewBudgetEntry {
    /// Checks category, amounts, and the week range.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("category", &self.category)?;
        require_non_negative_amount("budgeted_amount", self.budgeted_amount)?;
        if let Some(actual) = self.actual_amount {
            require_non_negative_amount("actual_amount", actual)?;
        }
        if self.week_end < self.week_start {
            return Err(ValidationError::InvertedRange {
                start: "week_start",
                end: "week_end",
            });
        }
        Ok(())
    }
}

/// Partial update for a budget entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetEntryUpdate {
    /// New week start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_start: Option<NaiveDate>,
    /// New week end.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week_end: Option<NaiveDate>,
    /// New category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New planned spend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budgeted_amount: Option<Decimal>,
    /// Booked spend, or `Some(None)` to unbook it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub actual_amount: Option<Option<Decimal>>,
    /// New description.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub description: Option<Option<String>>,
}

impl BudgetEntryUpdate {
    /// Checks fields that are present.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(category) = &self.category {
            require_text("category", category)?;
        }
        if let Some(amount) = self.budgeted_amount {
            require_non_negative_amount("budgeted_amount", amount)?;
        }
        if let Some(Some(amount)) = self.actual_amount {
            require_non_negative_amount("actual_amount", amount)?;
        }
        if let (Some(start), Some(end)) = (self.week_start, self.week_end)
            && end < start
        {
            return Err(ValidationError::InvertedRange {
                start: "week_start",
                end: "week_end",
            });
        }
        Ok(())
    }
}

/// A budget tab row: the entry plus its derived figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    /// The entry.
    #[serde(flatten)]
    pub entry: BudgetEntry,
    /// `budgeted - actual`.
    pub remaining: Decimal,
    /// `actual / budgeted * 100`, two decimals, zero for a zero budget.
    pub usage_percent: Decimal,
    /// `usage_percent` capped at 100 for progress bars.
    pub display_percent: Decimal,
}

/// Summed budget figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BudgetTotals {
    /// Sum of budgeted amounts.
    pub total_budget: Decimal,
    /// Sum of actual amounts, unbooked counted as zero.
    pub total_used: Decimal,
    /// `total_budget - total_used`.
    pub remaining: Decimal,
}

/// One category's line in a weekly summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVariance {
    /// Category.
    pub category: String,
    /// Planned spend.
    pub budgeted_amount: Decimal,
    /// Actual spend, unbooked counted as zero.
    pub actual_amount: Decimal,
    /// `actual - budgeted`; positive means overspent.
    pub variance: Decimal,
    /// Entry description.
    pub description: Option<String>,
}

/// Budget versus actual for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyBudgetSummary {
    /// Week requested.
    pub week_start: NaiveDate,
    /// Week end, taken from the first entry.
    pub week_end: NaiveDate,
    /// Sum of budgeted amounts.
    pub total_budgeted: Decimal,
    /// Sum of actual amounts.
    pub total_actual: Decimal,
    /// `total_actual - total_budgeted`.
    pub variance: Decimal,
    /// Variance as a percentage of the budget, zero for a zero budget.
    pub variance_percent: Decimal,
    /// Per-category lines in entry order.
    pub categories: Vec<CategoryVariance>,
}
