//! Customer returns (RMA) records.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};
use warehouse_shared::types::{CompanyId, ReturnId};

use crate::company::CompanyRef;
use crate::status::WorkStatus;
use crate::validation::{
    ValidationError, require_non_negative, require_non_negative_amount, require_text,
};

/// A return row.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Return {
    /// Row ID.
    pub id: ReturnId,
    /// Human-facing return code, e.g. `RET-2025-001`.
    pub return_id: String,
    /// Company that sent the return.
    #[serde(default)]
    pub company_id: Option<CompanyId>,
    /// Date the return was received.
    pub return_date: NaiveDate,
    /// Reason given by the customer.
    #[serde(default)]
    pub reason: Option<String>,
    /// Number of items returned.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub total_items: i32,
    /// Declared value of the returned items.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub total_value: Decimal,
    /// Processing status.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub status: WorkStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A return joined with its company's name and contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnWithCompany {
    /// The return itself.
    #[serde(flatten)]
    pub record: Return,
    /// Embedded company, absent when the return has no company.
    #[serde(default)]
    pub companies: Option<CompanyRef>,
}

/// Insert payload for a return.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReturn {
    /// Human-facing return code.
    pub return_id: String,
    /// Company that sent the return.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<CompanyId>,
    /// Date the return was received.
    pub return_date: NaiveDate,
    /// Reason given by the customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Number of items returned.
    #[serde(default)]
    pub total_items: i32,
    /// Declared value.
    #[serde(default)]
    pub total_value: Decimal,
    /// Initial status.
    #[serde(default)]
    pub status: WorkStatus,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewReturn {
    /// Checks required fields and non-negative totals.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("return_id", &self.return_id)?;
        require_non_negative("total_items", self.total_items)?;
        require_non_negative_amount("total_value", self.total_value)
    }
}

/// Partial update for a return.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReturnUpdate {
    /// New return code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_id: Option<String>,
    /// New company, or `Some(None)` to detach.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub company_id: Option<Option<CompanyId>>,
    /// New return date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    /// New reason.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub reason: Option<Option<String>>,
    /// New item count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<i32>,
    /// New declared value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_value: Option<Decimal>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkStatus>,
    /// New notes.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub notes: Option<Option<String>>,
}

impl ReturnUpdate {
    /// Update that only changes the status.
    #[must_use]
    pub fn status(status: WorkStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Checks fields that are present.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(code) = &self.return_id {
            require_text("return_id", code)?;
        }
        if let Some(items) = self.total_items {
            require_non_negative("total_items", items)?;
        }
        if let Some(value) = self.total_value {
            require_non_negative_amount("total_value", value)?;
        }
        Ok(())
    }
}
