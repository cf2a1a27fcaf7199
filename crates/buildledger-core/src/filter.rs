//! # Filters
//!
//! List filters for the dashboard tables. Every filter keeps ledger (id)
//! order and treats `None` fields as "any".

use crate::invoice::{Invoice, InvoiceSide, InvoiceStatus, InvoiceType};
use crate::project::{Project, ProjectKind, ProjectStatus};
use crate::transaction::{Transaction, TransactionStatus, TransactionType};
use crate::validation::normalize_search;
use crate::{LedgerError, Money, ProjectId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Inclusive date window check.
fn within(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.is_none_or(|f| date >= f) && to.is_none_or(|t| date <= t)
}

// =============================================================================
// INVOICES
// =============================================================================

/// Invoice table tab. Sales and Purchases never overlap and together
/// cover every invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceTab {
    #[default]
    All,
    Sales,
    Purchases,
}

impl InvoiceTab {
    #[must_use]
    pub fn includes(&self, kind: InvoiceType) -> bool {
        match self {
            InvoiceTab::All => true,
            InvoiceTab::Sales => kind.side() == InvoiceSide::Receivable,
            InvoiceTab::Purchases => kind.side() == InvoiceSide::Payable,
        }
    }
}

impl FromStr for InvoiceTab {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(InvoiceTab::All),
            "sales" => Ok(InvoiceTab::Sales),
            "purchases" | "purchase" => Ok(InvoiceTab::Purchases),
            other => Err(LedgerError::SerializationError(format!(
                "Unknown invoice tab: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvoiceFilter {
    #[serde(default)]
    pub tab: InvoiceTab,
    #[serde(default)]
    pub status: Option<InvoiceStatus>,
    #[serde(default)]
    pub project: Option<ProjectId>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl InvoiceFilter {
    #[must_use]
    pub fn tab(tab: InvoiceTab) -> Self {
        Self {
            tab,
            ..Self::default()
        }
    }

    /// Keep the invoices matching every set field.
    pub fn apply<'a>(
        &self,
        invoices: impl IntoIterator<Item = &'a Invoice>,
    ) -> Result<Vec<&'a Invoice>, LedgerError> {
        let needle = normalize_search(self.search.as_deref())?;
        Ok(invoices
            .into_iter()
            .filter(|i| self.tab.includes(i.kind))
            .filter(|i| self.status.is_none_or(|s| i.status == s))
            .filter(|i| self.project.is_none_or(|p| i.project == Some(p)))
            .filter(|i| within(i.date, self.from, self.to))
            .filter(|i| needle.as_deref().is_none_or(|n| i.matches_search(n)))
            .collect())
    }

    /// Apply the filter and compute the tab totals over every tab.
    ///
    /// Totals honor all fields except `tab`, so each tab header counts what
    /// that tab would show under the current search.
    pub fn apply_with_totals<'a>(
        &self,
        invoices: impl IntoIterator<Item = &'a Invoice>,
    ) -> Result<(Vec<&'a Invoice>, TabTotals), LedgerError> {
        let untabbed = InvoiceFilter {
            tab: InvoiceTab::All,
            ..self.clone()
        };
        let matching = untabbed.apply(invoices)?;
        let totals = TabTotals::from_invoices(matching.iter().copied());
        let listed = matching
            .into_iter()
            .filter(|i| self.tab.includes(i.kind))
            .collect();
        Ok((listed, totals))
    }
}

/// Count and amount of one invoice tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TabTotal {
    pub count: usize,
    pub amount: Money,
}

/// Per-tab totals shown above the invoice table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TabTotals {
    pub all: TabTotal,
    pub sales: TabTotal,
    pub purchases: TabTotal,
}

impl TabTotals {
    #[must_use]
    pub fn from_invoices<'a>(invoices: impl IntoIterator<Item = &'a Invoice>) -> Self {
        let mut totals = Self::default();
        for invoice in invoices {
            let slot = match invoice.side() {
                InvoiceSide::Receivable => &mut totals.sales,
                InvoiceSide::Payable => &mut totals.purchases,
            };
            slot.count += 1;
            slot.amount = slot.amount.saturating_add(invoice.amount);
            totals.all.count += 1;
            totals.all.amount = totals.all.amount.saturating_add(invoice.amount);
        }
        totals
    }
}

// =============================================================================
// PROJECTS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProjectFilter {
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub kind: Option<ProjectKind>,
    #[serde(default)]
    pub search: Option<String>,
}

impl ProjectFilter {
    pub fn apply<'a>(
        &self,
        projects: impl IntoIterator<Item = &'a Project>,
    ) -> Result<Vec<&'a Project>, LedgerError> {
        let needle = normalize_search(self.search.as_deref())?;
        Ok(projects
            .into_iter()
            .filter(|p| self.status.is_none_or(|s| p.status == s))
            .filter(|p| self.kind.is_none_or(|k| p.kind == k))
            .filter(|p| needle.as_deref().is_none_or(|n| p.matches_search(n)))
            .collect())
    }
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TransactionFilter {
    #[serde(default, rename = "type")]
    pub kind: Option<TransactionType>,
    #[serde(default)]
    pub status: Option<TransactionStatus>,
    #[serde(default)]
    pub project: Option<ProjectId>,
    /// Currency code, compared case-insensitively.
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn apply<'a>(
        &self,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Result<Vec<&'a Transaction>, LedgerError> {
        let needle = normalize_search(self.search.as_deref())?;
        let currency = self.currency.as_deref().map(str::trim);
        Ok(transactions
            .into_iter()
            .filter(|t| self.kind.is_none_or(|k| t.kind == k))
            .filter(|t| self.status.is_none_or(|s| t.status == s))
            .filter(|t| self.project.is_none_or(|p| t.project == Some(p)))
            .filter(|t| currency.is_none_or(|c| t.currency.as_str().eq_ignore_ascii_case(c)))
            .filter(|t| within(t.date, self.from, self.to))
            .filter(|t| needle.as_deref().is_none_or(|n| t.matches_search(n)))
            .collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================
