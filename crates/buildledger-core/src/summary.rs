//! # Dashboard Metrics
//!
//! Totals shown on the dashboard landing page. Everything is computed in
//! integer minor units; cash flow is reported per currency and never
//! converted.

use crate::invoice::InvoiceSide;
use crate::project::ProjectStatus;
use crate::store::{Ledger, LedgerStore};
use crate::transaction::{TransactionStatus, TransactionType};
use crate::{InvoiceStatus, Money};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Completed cash movement in one currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CashFlow {
    /// Completed receipts.
    pub cash_in: Money,
    /// Completed payments.
    pub cash_out: Money,
}

impl CashFlow {
    #[must_use]
    pub fn net(&self) -> Money {
        self.cash_in.saturating_sub(self.cash_out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DashboardMetrics {
    pub project_count: usize,
    /// Project count per status. Every status is present, possibly zero.
    pub projects_by_status: BTreeMap<ProjectStatus, usize>,
    /// Design, Execution and Delayed projects.
    pub active_projects: usize,
    pub total_budget: Money,
    pub total_revenue: Money,
    pub total_expenses: Money,
    /// Unpaid budget of projects that are not delivered or stopped.
    pub outstanding_debt: Money,
    pub invoice_count: usize,
    /// Open sales invoices.
    pub receivables: Money,
    /// Open purchase and supplier invoices.
    pub payables: Money,
    pub overdue_invoices: usize,
    pub transaction_count: usize,
    pub pending_transactions: usize,
    /// Keyed by currency code.
    pub cash_flow: BTreeMap<String, CashFlow>,
}

impl DashboardMetrics {
    /// Compute metrics from a ledger.
    #[must_use]
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let mut metrics = Self {
            projects_by_status: ProjectStatus::ALL.iter().map(|s| (*s, 0)).collect(),
            ..Self::default()
        };

        for project in ledger.projects() {
            metrics.project_count += 1;
            *metrics.projects_by_status.entry(project.status).or_insert(0) += 1;
            if project.status.is_active() {
                metrics.active_projects += 1;
            }
            metrics.total_budget = metrics.total_budget.saturating_add(project.budget);
            metrics.total_revenue = metrics.total_revenue.saturating_add(project.revenue);
            metrics.total_expenses = metrics.total_expenses.saturating_add(project.expenses);

            let debt = project.design_debt();
            if !project.status.is_closed() && debt.is_positive() {
                metrics.outstanding_debt = metrics.outstanding_debt.saturating_add(debt);
            }
        }

        for invoice in ledger.invoices() {
            metrics.invoice_count += 1;
            if invoice.status == InvoiceStatus::Overdue {
                metrics.overdue_invoices += 1;
            }
            if !invoice.status.is_open() {
                continue;
            }
            match invoice.side() {
                InvoiceSide::Receivable => {
                    metrics.receivables = metrics.receivables.saturating_add(invoice.amount);
                }
                InvoiceSide::Payable => {
                    metrics.payables = metrics.payables.saturating_add(invoice.amount);
                }
            }
        }

        for tx in ledger.transactions() {
            metrics.transaction_count += 1;
            match tx.status {
                TransactionStatus::Pending => metrics.pending_transactions += 1,
                TransactionStatus::Cancelled => {}
                TransactionStatus::Completed => {
                    let flow = metrics
                        .cash_flow
                        .entry(tx.currency.as_str().to_string())
                        .or_default();
                    match tx.kind {
                        TransactionType::Receipt => {
                            flow.cash_in = flow.cash_in.saturating_add(tx.amount);
                        }
                        TransactionType::Payment => {
                            flow.cash_out = flow.cash_out.saturating_add(tx.amount);
                        }
                        TransactionType::Transfer => {}
                    }
                }
            }
        }

        metrics
    }
}

// =============================================================================
// TESTS
// =============================================================================
