//! Input validation shared by the create payloads.

use rust_decimal::Decimal;
use thiserror::Error;

/// Validation errors for create and update payloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field is empty or whitespace.
    #[error("{field} must not be blank")]
    Blank {
        /// Field name.
        field: &'static str,
    },

    /// A count or amount is below zero.
    #[error("{field} must not be negative")]
    Negative {
        /// Field name.
        field: &'static str,
    },

    /// A date range ends before it starts.
    #[error("{end} must not be before {start}")]
    InvertedRange {
        /// Field holding the start of the range.
        start: &'static str,
        /// Field holding the end of the range.
        end: &'static str,
    },
}

/// Rejects empty or whitespace-only text.
///
/// # Errors
///
/// Returns `ValidationError::Blank` naming `field`.
pub fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Blank { field });
    }
    Ok(())
}

/// Rejects negative integers.
///
/// # Errors
///
/// Returns `ValidationError::Negative` naming `field`.
pub fn require_non_negative(field: &'static str, value: i32) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}

/// Rejects negative amounts.
///
/// # Errors
///
/// Returns `ValidationError::Negative` naming `field`.
pub fn require_non_negative_amount(
    field: &'static str,
    value: Decimal,
) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::Negative { field });
    }
    Ok(())
}
