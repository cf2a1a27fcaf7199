//! # Invoices
//!
//! Sales invoices are money the firm is owed; purchase and supplier
//! invoices are money it owes. [`InvoiceType::side`] is the single place
//! that split is decided, so filters and dashboard totals agree.

use crate::primitives::{MAX_NAME_LENGTH, MAX_NUMBER_LENGTH};
use crate::validation::{require_non_negative, require_text};
use crate::{InvoiceId, LedgerError, Money, ProjectId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// =============================================================================
// INVOICE TYPE & SIDE
// =============================================================================

/// Invoice type as entered on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    Sales,
    Purchase,
    Supplier,
}

/// Which side of the books an invoice lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceSide {
    /// Owed to the firm (sales).
    Receivable,
    /// Owed by the firm (purchase and supplier).
    Payable,
}

impl InvoiceType {
    pub const ALL: [InvoiceType; 3] = [
        InvoiceType::Sales,
        InvoiceType::Purchase,
        InvoiceType::Supplier,
    ];

    #[must_use]
    pub fn side(&self) -> InvoiceSide {
        match self {
            InvoiceType::Sales => InvoiceSide::Receivable,
            InvoiceType::Purchase | InvoiceType::Supplier => InvoiceSide::Payable,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            InvoiceType::Sales => "Sales",
            InvoiceType::Purchase => "Purchase",
            InvoiceType::Supplier => "Supplier",
        }
    }
}

impl std::fmt::Display for InvoiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InvoiceType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InvoiceType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LedgerError::SerializationError(format!("Unknown invoice type: {}", s)))
    }
}

// =============================================================================
// INVOICE STATUS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 3] = [
        InvoiceStatus::Pending,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
        }
    }

    /// Pending and overdue invoices are still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !matches!(self, InvoiceStatus::Paid)
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InvoiceStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InvoiceStatus::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                LedgerError::SerializationError(format!("Unknown invoice status: {}", s))
            })
    }
}

// =============================================================================
// INVOICE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub number: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectId>,
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: InvoiceType,
    pub status: InvoiceStatus,
    pub counterparty: String,
}

impl Invoice {
    #[must_use]
    pub fn side(&self) -> InvoiceSide {
        self.kind.side()
    }

    /// Re-run the draft checks on a record loaded from outside the ledger.
    pub fn validated(self) -> Result<Self, LedgerError> {
        InvoiceDraft {
            number: self.number,
            date: self.date,
            project: self.project,
            amount: self.amount,
            kind: self.kind,
            status: self.status,
            counterparty: self.counterparty,
        }
        .into_invoice(self.id)
    }

    /// Case-insensitive match on number and counterparty.
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        self.number.to_lowercase().contains(needle)
            || self.counterparty.to_lowercase().contains(needle)
    }
}

/// Fields for creating an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub number: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub project: Option<ProjectId>,
    pub amount: Money,
    #[serde(rename = "type")]
    pub kind: InvoiceType,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub counterparty: String,
}

impl InvoiceDraft {
    /// Validate the draft and build the invoice under the given id.
    ///
    /// Project existence is checked by the store, not here.
    pub fn into_invoice(self, id: InvoiceId) -> Result<Invoice, LedgerError> {
        Ok(Invoice {
            id,
            number: require_text("number", &self.number, MAX_NUMBER_LENGTH)?,
            date: self.date,
            project: self.project,
            amount: require_non_negative("amount", self.amount)?,
            kind: self.kind,
            status: self.status,
            counterparty: require_text("counterparty", &self.counterparty, MAX_NAME_LENGTH)?,
        })
    }
}

/// Editable invoice fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvoicePatch {
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// `Some(None)` detaches the invoice from its project.
    #[serde(default, with = "double_option")]
    pub project: Option<Option<ProjectId>>,
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default, rename = "type")]
    pub kind: Option<InvoiceType>,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    #[serde(default)]
    pub counterparty: Option<String>,
}

impl InvoicePatch {
    /// Apply the patch to a copy of `invoice`, validating every changed field.
    pub fn apply_to(self, invoice: &Invoice) -> Result<Invoice, LedgerError> {
        let mut updated = invoice.clone();
        if let Some(number) = self.number {
            updated.number = require_text("number", &number, MAX_NUMBER_LENGTH)?;
        }
        if let Some(date) = self.date {
            updated.date = date;
        }
        if let Some(project) = self.project {
            updated.project = project;
        }
        if let Some(amount) = self.amount {
            updated.amount = require_non_negative("amount", amount)?;
        }
        if let Some(kind) = self.kind {
            updated.kind = kind;
        }
        if let Some(status) = self.status {
            updated.status = status;
        }
        if let Some(counterparty) = self.counterparty {
            updated.counterparty = require_text("counterparty", &counterparty, MAX_NAME_LENGTH)?;
        }
        Ok(updated)
    }
}

/// Distinguishes an absent field from an explicit `null`.
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<T: Serialize, S: Serializer>(
        value: &Option<Option<T>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, T: Deserialize<'de>, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Option<T>>, D::Error> {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn draft(kind: InvoiceType) -> InvoiceDraft {
        InvoiceDraft {
            number: "INV-001".to_string(),
            date: date(2024, 3, 1),
            project: None,
            amount: Money::from_major(250),
            kind,
            status: InvoiceStatus::Pending,
            counterparty: "Cairo Steel".to_string(),
        }
    }

    #[test]
    fn sides_split_sales_from_purchases() {
        assert_eq!(InvoiceType::Sales.side(), InvoiceSide::Receivable);
        assert_eq!(InvoiceType::Purchase.side(), InvoiceSide::Payable);
        assert_eq!(InvoiceType::Supplier.side(), InvoiceSide::Payable);
    }

    #[test]
    fn draft_requires_number_and_counterparty() {
        let mut d = draft(InvoiceType::Sales);
        d.number = String::new();
        assert!(matches!(
            d.into_invoice(InvoiceId(1)),
            Err(LedgerError::MissingField("number"))
        ));

        let mut d = draft(InvoiceType::Sales);
        d.counterparty = "  ".to_string();
        assert!(matches!(
            d.into_invoice(InvoiceId(1)),
            Err(LedgerError::MissingField("counterparty"))
        ));
    }

    #[test]
    fn type_serializes_under_type_key() {
        let invoice = draft(InvoiceType::Supplier)
            .into_invoice(InvoiceId(3))
            .expect("valid");
        let json = serde_json::to_value(&invoice).expect("json");
        assert_eq!(json["type"], "supplier");
        assert_eq!(json["date"], "2024-03-01");
        assert_eq!(json["amount"], 25000);
    }

    #[test]
    fn patch_null_project_detaches() {
        let mut invoice = draft(InvoiceType::Sales)
            .into_invoice(InvoiceId(1))
            .expect("valid");
        invoice.project = Some(ProjectId(7));

        let patch: InvoicePatch = serde_json::from_str(r#"{"project": null}"#).expect("json");
        assert_eq!(patch.project, Some(None));
        let updated = patch.apply_to(&invoice).expect("apply");
        assert_eq!(updated.project, None);

        let patch: InvoicePatch = serde_json::from_str(r#"{"status": "paid"}"#).expect("json");
        assert_eq!(patch.project, None);
        let updated = patch.apply_to(&invoice).expect("apply");
        assert_eq!(updated.project, Some(ProjectId(7)));
        assert_eq!(updated.status, InvoiceStatus::Paid);
    }

    #[test]
    fn search_matches_number_or_counterparty() {
        let invoice = draft(InvoiceType::Sales)
            .into_invoice(InvoiceId(1))
            .expect("valid");
        assert!(invoice.matches_search("inv-0"));
        assert!(invoice.matches_search("steel"));
        assert!(!invoice.matches_search("granite"));
    }
}
