//! # Cash Transactions
//!
//! Payments, receipts and transfers between accounts. A completed receipt
//! or payment that references a project feeds that project's revenue or
//! expense accumulator; see [`Transaction::project_effect`].

use crate::primitives::MAX_NAME_LENGTH;
use crate::validation::{require_non_negative, require_text};
use crate::{Currency, LedgerError, Money, ProjectId, TransactionId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Payment,
    Receipt,
    Transfer,
}

impl TransactionType {
    pub const ALL: [TransactionType; 3] = [
        TransactionType::Payment,
        TransactionType::Receipt,
        TransactionType::Transfer,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TransactionType::Payment => "Payment",
            TransactionType::Receipt => "Receipt",
            TransactionType::Transfer => "Transfer",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                LedgerError::SerializationError(format!("Unknown transaction type: {}", s))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl TransactionStatus {
    pub const ALL: [TransactionStatus; 3] = [
        TransactionStatus::Pending,
        TransactionStatus::Completed,
        TransactionStatus::Cancelled,
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransactionStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionStatus::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                LedgerError::SerializationError(format!("Unknown transaction status: {}", s))
            })
    }
}

/// Contribution of a transaction to a project's accumulators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectEffect {
    Revenue(ProjectId, Money),
    Expense(ProjectId, Money),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: NaiveDate,
    pub amount: Money,
    pub currency: Currency,
    pub from_account: String,
    pub to_account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectId>,
    pub status: TransactionStatus,
}

impl Transaction {
    /// The accumulator change this transaction currently contributes.
    ///
    /// Only completed receipts and payments tied to a project count.
    #[must_use]
    pub fn project_effect(&self) -> Option<ProjectEffect> {
        if self.status != TransactionStatus::Completed {
            return None;
        }
        let project = self.project?;
        match self.kind {
            TransactionType::Receipt => Some(ProjectEffect::Revenue(project, self.amount)),
            TransactionType::Payment => Some(ProjectEffect::Expense(project, self.amount)),
            TransactionType::Transfer => None,
        }
    }

    /// Re-run the draft checks on a record loaded from outside the ledger.
    /// Currency codes are parsed again, so a lowercase code is rejected.
    pub fn validated(self) -> Result<Self, LedgerError> {
        TransactionDraft {
            kind: self.kind,
            date: self.date,
            amount: self.amount,
            currency: self.currency.as_str().to_string(),
            from_account: self.from_account,
            to_account: self.to_account,
            project: self.project,
            status: self.status,
        }
        .into_transaction(self.id)
    }

    /// Case-insensitive match on the account names.
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        self.from_account.to_lowercase().contains(needle)
            || self.to_account.to_lowercase().contains(needle)
    }
}

/// Fields for recording a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: NaiveDate,
    pub amount: Money,
    pub currency: String,
    pub from_account: String,
    pub to_account: String,
    #[serde(default)]
    pub project: Option<ProjectId>,
    #[serde(default)]
    pub status: TransactionStatus,
}

impl TransactionDraft {
    /// Validate the draft and build the transaction under the given id.
    pub fn into_transaction(self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let amount = require_non_negative("amount", self.amount)?;
        if amount == Money::ZERO {
            return Err(LedgerError::InvalidAmount {
                field: "amount",
                amount,
            });
        }
        Ok(Transaction {
            id,
            kind: self.kind,
            date: self.date,
            amount,
            currency: Currency::parse(&self.currency)?,
            from_account: require_text("from_account", &self.from_account, MAX_NAME_LENGTH)?,
            to_account: require_text("to_account", &self.to_account, MAX_NAME_LENGTH)?,
            project: self.project,
            status: self.status,
        })
    }
}
