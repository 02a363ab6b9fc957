//! Weekly budget entries and the arithmetic shown on the budget tab.

pub mod error;
pub mod service;
pub mod types;


pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{
    BudgetEntry, BudgetEntryUpdate, BudgetLine, BudgetTotals, CategoryVariance, NewBudgetEntry,
    WeeklyBudgetSummary,
};
