//! Budget arithmetic.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::{BudgetEntry, BudgetLine, BudgetTotals, CategoryVariance, WeeklyBudgetSummary};

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// `part / whole * 100`, rounded to two decimals; zero when the whole is
    /// not positive.
    #[must_use]
    pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
        if whole <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            (part / whole * Decimal::ONE_HUNDRED).round_dp(2)
        }
    }

    /// Sums budgeted and actual amounts independently. Unbooked actual
    /// amounts count as zero, and an empty input sums to zero throughout.
    #[must_use]
    pub fn totals(entries: &[BudgetEntry]) -> BudgetTotals {
        let total_budget: Decimal = entries.iter().map(|e| e.budgeted_amount).sum();
        let total_used: Decimal = entries.iter().map(BudgetEntry::actual_or_zero).sum();

        BudgetTotals {
            total_budget,
            total_used,
            remaining: total_budget - total_used,
        }
    }

    /// Derived figures for one budget tab row.
    #[must_use]
    pub fn line(entry: BudgetEntry) -> BudgetLine {
        let actual = entry.actual_or_zero();
        let remaining = entry.budgeted_amount - actual;
        let usage_percent = Self::percent_of(actual, entry.budgeted_amount);
        let display_percent = usage_percent.min(Decimal::ONE_HUNDRED);

        BudgetLine {
            entry,
            remaining,
            usage_percent,
            display_percent,
        }
    }

    /// Budget versus actual for one week.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NoEntriesForWeek` if `entries` is empty.
    pub fn weekly_summary(
        week_start: NaiveDate,
        entries: &[BudgetEntry],
    ) -> Result<WeeklyBudgetSummary, BudgetError> {
        let first = entries
            .first()
            .ok_or(BudgetError::NoEntriesForWeek(week_start))?;

        let totals = Self::totals(entries);
        let variance = totals.total_used - totals.total_budget;

        let categories = entries
            .iter()
            .map(|entry| {
                let actual = entry.actual_or_zero();
                CategoryVariance {
                    category: entry.category.clone(),
                    budgeted_amount: entry.budgeted_amount,
                    actual_amount: actual,
                    variance: actual - entry.budgeted_amount,
                    description: entry.description.clone(),
                }
            })
            .collect();

        Ok(WeeklyBudgetSummary {
            week_start,
            week_end: first.week_end,
            total_budgeted: totals.total_budget,
            total_actual: totals.total_used,
            variance,
            variance_percent: Self::percent_of(variance, totals.total_budget),
            categories,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use warehouse_shared::types::BudgetEntryId;

    fn entry(category: &str, budgeted: Decimal, actual: Option<Decimal>) -> BudgetEntry {
        BudgetEntry {
            id: BudgetEntryId::new(),
            week_start: NaiveDate::from_ymd_opt(2025, 8, 3).unwrap(),
            week_end: NaiveDate::from_ymd_opt(2025, 8, 9).unwrap(),
            category: category.into(),
            budgeted_amount: budgeted,
            actual_amount: actual,
            description: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_totals_treat_null_actual_as_zero() {
        let entries = vec![
            entry("Parts & Components", dec!(50000), Some(dec!(32450.75))),
            entry("Labor Costs", dec!(25000), None),
        ];

        let totals = BudgetService::totals(&entries);
        assert_eq!(totals.total_budget, dec!(75000));
        assert_eq!(totals.total_used, dec!(32450.75));
        assert_eq!(totals.remaining, dec!(42549.25));
    }

    #[test]
    fn test_totals_of_nothing_are_zero() {
        let totals = BudgetService::totals(&[]);
        assert_eq!(totals, BudgetTotals::default());
        assert_eq!(totals.remaining, Decimal::ZERO);
    }

    #[test]
    fn test_line_figures() {
        let line = BudgetService::line(entry("Parts & Components", dec!(50000), Some(dec!(32450.75))));
        assert_eq!(line.remaining, dec!(17549.25));
        assert_eq!(line.usage_percent, dec!(64.90));
        assert_eq!(line.display_percent, dec!(64.90));
    }

    #[test]
    fn test_line_over_budget_caps_display() {
        let line = BudgetService::line(entry("Shipping & Logistics", dec!(1000), Some(dec!(1500))));
        assert_eq!(line.remaining, dec!(-500));
        assert_eq!(line.usage_percent, dec!(150.00));
        assert_eq!(line.display_percent, dec!(100));
    }

    #[test]
    fn test_line_zero_budget() {
        let line = BudgetService::line(entry("Misc", Decimal::ZERO, Some(dec!(10))));
        assert_eq!(line.usage_percent, Decimal::ZERO);
        assert_eq!(line.remaining, dec!(-10));
    }

    #[test]
    fn test_weekly_summary() {
        let entries = vec![
            entry("Parts & Components", dec!(50000), Some(dec!(32450.75))),
            entry("Labor Costs", dec!(25000), Some(dec!(18250.50))),
            entry("Shipping & Logistics", dec!(15000), Some(dec!(12100.25))),
        ];
        let week = NaiveDate::from_ymd_opt(2025, 8, 3).unwrap();

        let summary = BudgetService::weekly_summary(week, &entries).unwrap();
        assert_eq!(summary.total_budgeted, dec!(90000));
        assert_eq!(summary.total_actual, dec!(62801.50));
        assert_eq!(summary.variance, dec!(-27198.50));
        assert_eq!(summary.variance_percent, dec!(-30.22));
        assert_eq!(summary.week_end, NaiveDate::from_ymd_opt(2025, 8, 9).unwrap());
        assert_eq!(summary.categories.len(), 3);
        assert_eq!(summary.categories[1].variance, dec!(-6749.50));
    }

    #[test]
    fn test_weekly_summary_requires_entries() {
        let week = NaiveDate::from_ymd_opt(2025, 8, 3).unwrap();
        assert_eq!(
            BudgetService::weekly_summary(week, &[]),
            Err(BudgetError::NoEntriesForWeek(week))
        );
    }
}
