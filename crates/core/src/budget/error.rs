//! Budget error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// No entries exist for the requested week.
    #[error("No budget entries found for week starting {0}")]
    NoEntriesForWeek(NaiveDate),
}
