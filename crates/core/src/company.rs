//! Customer companies that send returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use warehouse_shared::types::CompanyId;

use crate::validation::{ValidationError, require_text};

/// A company row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Company ID.
    pub id: CompanyId,
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Named contact at the company.
    #[serde(default)]
    pub contact_person: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Company columns embedded into other rows (e.g. returns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRef {
    /// Display name.
    pub name: String,
    /// Named contact at the company.
    #[serde(default)]
    pub contact_person: Option<String>,
}

/// Insert payload for a company.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCompany {
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Named contact at the company.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
}

impl NewCompany {
    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)
    }
}

/// Partial update for a company. `None` leaves a column untouched;
/// `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyUpdate {
    /// New name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub email: Option<Option<String>>,
    /// New phone.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub phone: Option<Option<String>>,
    /// New address.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub address: Option<Option<String>>,
    /// New contact person.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub contact_person: Option<Option<String>>,
}

impl CompanyUpdate {
    /// Checks fields that are present.
    ///
    /// # Errors
    ///
    /// Returns an error if a new name is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        Ok(())
    }
}
