//! # Core Type Definitions
//!
//! This module contains the shared building blocks of the ledger:
//! - Record identifiers (`ProjectId`, `InvoiceId`, `TransactionId`)
//! - Money in integer minor units (`Money`)
//! - Currency codes (`Currency`)
//! - Error types (`LedgerError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Use saturating arithmetic for money sums to prevent overflow

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// RECORD IDENTIFIERS
// =============================================================================

/// Unique identifier for a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

/// Unique identifier for an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub u64);

/// Unique identifier for a cash transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

impl std::fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "I-{}", self.0)
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T-{}", self.0)
    }
}

// =============================================================================
// MONEY
// =============================================================================

/// An amount of money in integer minor units (e.g. cents).
///
/// Uses i64 with saturating arithmetic. Negative values are only produced
/// by subtraction (a debt that has been overpaid); stored amounts are
/// validated to be non-negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(pub i64);

impl Money {
    /// Zero minor units.
    pub const ZERO: Money = Money(0);

    /// Create an amount from minor units.
    #[must_use]
    pub const fn new(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Create an amount from whole major units (e.g. dollars).
    #[must_use]
    pub const fn from_major(major_units: i64) -> Self {
        Self(major_units.saturating_mul(100))
    }

    /// Get the raw minor unit value.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn saturating_add(self, other: Money) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    #[must_use]
    pub const fn saturating_sub(self, other: Money) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// True if the amount is strictly greater than zero.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Money::saturating_add)
    }
}

// =============================================================================
// CURRENCY
// =============================================================================

/// Three-letter currency code (ISO 4217 style, e.g. "USD").
///
/// Amounts in different currencies are reported side by side and never
/// converted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency(pub String);

impl Currency {
    /// Create a currency code after validating it.
    pub fn parse(code: &str) -> Result<Self, LedgerError> {
        let code = code.trim();
        if code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(code.to_string()))
        } else {
            Err(LedgerError::InvalidCurrency(code.to_string()))
        }
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the ledger.
///
/// - No silent failures
/// - Use `Result<T, LedgerError>` for fallible operations
/// - The ledger never panics; rejected operations leave state untouched
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The requested project does not exist.
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The requested invoice does not exist.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    /// The requested transaction does not exist.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// A required field was empty or absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A text field exceeded its length limit.
    #[error("Field '{field}' is {len} bytes, maximum is {max}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// A money field held a negative amount.
    #[error("Invalid amount for '{field}': {amount}")]
    InvalidAmount { field: &'static str, amount: Money },

    /// A currency code was not three uppercase ASCII letters.
    #[error("Invalid currency code: '{0}'")]
    InvalidCurrency(String),

    /// The design project already has an execution successor.
    #[error("Project {project} already moved to execution as {successor}")]
    AlreadyTransitioned {
        project: ProjectId,
        successor: ProjectId,
    },

    /// Closing the project would leave an unpaid balance; the caller must confirm.
    #[error("Project {project} has {outstanding} outstanding; confirmation required")]
    ConfirmationRequired {
        project: ProjectId,
        outstanding: Money,
    },

    /// The project is referenced by invoices or transactions.
    #[error("Project {project} is referenced by {references} record(s)")]
    ProjectInUse {
        project: ProjectId,
        references: usize,
    },

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_saturating_add() {
        let max = Money::new(i64::MAX);
        assert_eq!(max.saturating_add(Money::new(1)), max);
    }

    #[test]
    fn money_display_formats_minor_units() {
        assert_eq!(Money::new(123_456).to_string(), "1234.56");
        assert_eq!(Money::new(-5).to_string(), "-0.05");
        assert_eq!(Money::from_major(7).to_string(), "7.00");
    }

    #[test]
    fn money_sum() {
        let total: Money = [Money::new(100), Money::new(250)].into_iter().sum();
        assert_eq!(total, Money::new(350));
    }

    #[test]
    fn currency_parse() {
        assert!(Currency::parse("USD").is_ok());
        assert_eq!(Currency::parse(" EGP ").map(|c| c.0).ok(), Some("EGP".to_string()));
        assert!(matches!(
            Currency::parse("usd"),
            Err(LedgerError::InvalidCurrency(_))
        ));
        assert!(Currency::parse("EURO").is_err());
    }

    #[test]
    fn ids_display_with_prefix() {
        assert_eq!(ProjectId(4).to_string(), "P-4");
        assert_eq!(InvoiceId(9).to_string(), "I-9");
        assert_eq!(TransactionId(1).to_string(), "T-1");
    }
}
