//! # Input Validation
//!
//! Required-field and range checks shared by all record drafts and patches.
//! Every check returns a structured [`LedgerError`] naming the field.

use crate::primitives::MAX_SEARCH_LENGTH;
use crate::{LedgerError, Money};

/// Validate a required text field: trimmed, non-empty, and within `max` bytes.
///
/// Returns the trimmed value.
pub fn require_text(field: &'static str, value: &str, max: usize) -> Result<String, LedgerError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::MissingField(field));
    }
    check_length(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Validate an optional text field. Blank input collapses to `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, LedgerError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => {
            check_length(field, v, max)?;
            Ok(Some(v.to_string()))
        }
    }
}

/// Reject negative money.
pub fn require_non_negative(field: &'static str, amount: Money) -> Result<Money, LedgerError> {
    if amount.is_negative() {
        return Err(LedgerError::InvalidAmount { field, amount });
    }
    Ok(amount)
}

/// Normalize a search string for case-insensitive matching.
///
/// Blank searches become `None`; over-long searches are rejected.
pub fn normalize_search(search: Option<&str>) -> Result<Option<String>, LedgerError> {
    Ok(optional_text("search", search, MAX_SEARCH_LENGTH)?.map(|s| s.to_lowercase()))
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), LedgerError> {
    if value.len() > max {
        return Err(LedgerError::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}
