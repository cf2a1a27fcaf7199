//! # Ledger Store
//!
//! The in-memory storage for projects, invoices and cash transactions.
//!
//! This module defines the `LedgerStore` trait used by the lifecycle engine
//! and implements it for [`Ledger`]. All collections use `BTreeMap` keyed
//! by id, so listings come back in creation order.

use crate::invoice::{Invoice, InvoiceDraft, InvoicePatch};
use crate::primitives::MAX_SNAPSHOT_RECORDS;
use crate::project::{Project, ProjectDraft, ProjectPatch};
use crate::transaction::{ProjectEffect, Transaction, TransactionDraft, TransactionStatus};
use crate::{InvoiceId, LedgerError, Money, ProjectId, TransactionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// LEDGERSTORE TRAIT
// =============================================================================

/// Project storage operations needed by the stage-transition engine.
///
/// Writes through `put_project` replace the whole record; callers validate
/// everything before the first write so a rejected transition leaves the
/// store untouched.
pub trait LedgerStore {
    /// Reserve the next unused project id.
    fn allocate_project_id(&mut self) -> ProjectId;

    /// Look up a project by id.
    fn get_project(&self, id: ProjectId) -> Option<&Project>;

    /// Insert a project or replace the record with the same id.
    fn put_project(&mut self, project: Project);

    /// All projects in id order.
    fn projects(&self) -> impl Iterator<Item = &Project>;

    /// The Execution project created from `id` by an earlier transition, if any.
    ///
    /// Scans every project for an Execution-kind record whose
    /// `related_project_id` points back at `id`. The successor keeps
    /// counting after it is itself delivered or stopped.
    fn successor_of(&self, id: ProjectId) -> Option<ProjectId> {
        self.projects()
            .find(|p| {
                p.id != id
                    && p.related_project_id == Some(id)
                    && p.kind == crate::ProjectKind::Execution
            })
            .map(|p| p.id)
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Plain serializable view of a ledger, used for JSON seed files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

// =============================================================================
// LEDGER IMPLEMENTATION
// =============================================================================

/// The in-memory ledger.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    projects: BTreeMap<ProjectId, Project>,
    invoices: BTreeMap<InvoiceId, Invoice>,
    transactions: BTreeMap<TransactionId, Transaction>,
    /// Highest id handed out so far, per collection. Ids are never reused.
    last_project_id: u64,
    last_invoice_id: u64,
    last_transaction_id: u64,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from a snapshot.
    ///
    /// Every record goes through the same checks as a draft. Duplicate ids,
    /// links or references to unknown projects and oversized collections are
    /// rejected. Accumulators are taken as stored.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, LedgerError> {
        let largest = snapshot
            .projects
            .len()
            .max(snapshot.invoices.len())
            .max(snapshot.transactions.len());
        if largest > MAX_SNAPSHOT_RECORDS {
            return Err(LedgerError::SerializationError(format!(
                "Snapshot holds {} records of one kind, maximum is {}",
                largest, MAX_SNAPSHOT_RECORDS
            )));
        }

        let mut ledger = Self::new();
        for project in snapshot.projects {
            if ledger.projects.contains_key(&project.id) {
                return Err(LedgerError::SerializationError(format!(
                    "Duplicate project id {}",
                    project.id
                )));
            }
            ledger.put_project(project.validated()?);
        }
        let dangling = ledger
            .projects
            .values()
            .filter_map(|p| p.related_project_id)
            .find(|related| !ledger.projects.contains_key(related));
        if let Some(related) = dangling {
            return Err(LedgerError::ProjectNotFound(related));
        }
        for invoice in snapshot.invoices {
            let invoice = invoice.validated()?;
            ledger.check_project_ref(invoice.project)?;
            if ledger.invoices.contains_key(&invoice.id) {
                return Err(LedgerError::SerializationError(format!(
                    "Duplicate invoice id {}",
                    invoice.id
                )));
            }
            ledger.last_invoice_id = ledger.last_invoice_id.max(invoice.id.0);
            ledger.invoices.insert(invoice.id, invoice);
        }
        for tx in snapshot.transactions {
            let tx = tx.validated()?;
            ledger.check_project_ref(tx.project)?;
            if ledger.transactions.contains_key(&tx.id) {
                return Err(LedgerError::SerializationError(format!(
                    "Duplicate transaction id {}",
                    tx.id
                )));
            }
            ledger.last_transaction_id = ledger.last_transaction_id.max(tx.id.0);
            ledger.transactions.insert(tx.id, tx);
        }
        Ok(ledger)
    }

    /// Copy the ledger into a serializable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            projects: self.projects.values().cloned().collect(),
            invoices: self.invoices.values().cloned().collect(),
            transactions: self.transactions.values().cloned().collect(),
        }
    }

    #[must_use]
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    #[must_use]
    pub fn invoice_count(&self) -> usize {
        self.invoices.len()
    }

    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    // -------------------------------------------------------------------------
    // Projects
    // -------------------------------------------------------------------------

    /// Validate a draft and store it as a new project.
    pub fn add_project(&mut self, draft: ProjectDraft) -> Result<ProjectId, LedgerError> {
        let id = ProjectId(self.last_project_id.saturating_add(1));
        let project = draft.into_project(id)?;
        self.put_project(project);
        Ok(id)
    }

    /// Apply a patch to an existing project.
    pub fn update_project(
        &mut self,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> Result<&Project, LedgerError> {
        let current = self
            .projects
            .get(&id)
            .ok_or(LedgerError::ProjectNotFound(id))?;
        let updated = patch.apply_to(current)?;
        self.projects.insert(id, updated);
        self.projects.get(&id).ok_or(LedgerError::ProjectNotFound(id))
    }

    /// Remove a project that no invoice or transaction references.
    ///
    /// A linked predecessor or successor loses its link.
    pub fn remove_project(&mut self, id: ProjectId) -> Result<Project, LedgerError> {
        if !self.projects.contains_key(&id) {
            return Err(LedgerError::ProjectNotFound(id));
        }
        let references = self
            .invoices
            .values()
            .filter(|i| i.project == Some(id))
            .count()
            + self
                .transactions
                .values()
                .filter(|t| t.project == Some(id))
                .count();
        if references > 0 {
            return Err(LedgerError::ProjectInUse {
                project: id,
                references,
            });
        }

        let removed = self
            .projects
            .remove(&id)
            .ok_or(LedgerError::ProjectNotFound(id))?;
        for project in self.projects.values_mut() {
            if project.related_project_id == Some(id) {
                project.related_project_id = None;
            }
        }
        Ok(removed)
    }

    // -------------------------------------------------------------------------
    // Invoices
    // -------------------------------------------------------------------------

    pub fn get_invoice(&self, id: InvoiceId) -> Option<&Invoice> {
        self.invoices.get(&id)
    }

    /// All invoices in id order.
    pub fn invoices(&self) -> impl Iterator<Item = &Invoice> {
        self.invoices.values()
    }

    /// Find an invoice by its number (exact match).
    pub fn invoice_by_number(&self, number: &str) -> Option<&Invoice> {
        self.invoices.values().find(|i| i.number == number)
    }

    /// Validate a draft and store it as a new invoice.
    pub fn add_invoice(&mut self, draft: InvoiceDraft) -> Result<InvoiceId, LedgerError> {
        self.check_project_ref(draft.project)?;
        let id = InvoiceId(self.last_invoice_id.saturating_add(1));
        let invoice = draft.into_invoice(id)?;
        self.last_invoice_id = id.0;
        self.invoices.insert(id, invoice);
        Ok(id)
    }

    /// Apply a patch to an existing invoice.
    pub fn update_invoice(
        &mut self,
        id: InvoiceId,
        patch: InvoicePatch,
    ) -> Result<&Invoice, LedgerError> {
        let current = self
            .invoices
            .get(&id)
            .ok_or(LedgerError::InvoiceNotFound(id))?;
        let updated = patch.apply_to(current)?;
        self.check_project_ref(updated.project)?;
        self.invoices.insert(id, updated);
        self.invoices.get(&id).ok_or(LedgerError::InvoiceNotFound(id))
    }

    pub fn remove_invoice(&mut self, id: InvoiceId) -> Result<Invoice, LedgerError> {
        self.invoices
            .remove(&id)
            .ok_or(LedgerError::InvoiceNotFound(id))
    }

    /// Merge fetched invoices into the ledger.
    ///
    /// Invoices whose number already exists are skipped. References to
    /// projects this ledger does not know are dropped. Returns the ids of
    /// the invoices added.
    pub fn merge_invoices(
        &mut self,
        drafts: impl IntoIterator<Item = InvoiceDraft>,
    ) -> Result<Vec<InvoiceId>, LedgerError> {
        let mut added = Vec::new();
        for mut draft in drafts {
            if self.invoice_by_number(draft.number.trim()).is_some() {
                continue;
            }
            if draft.project.is_some_and(|p| !self.projects.contains_key(&p)) {
                draft.project = None;
            }
            added.push(self.add_invoice(draft)?);
        }
        Ok(added)
    }

    // -------------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------------

    pub fn get_transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.get(&id)
    }

    /// All transactions in id order.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.values()
    }

    /// Validate and record a transaction, updating project accumulators.
    pub fn add_transaction(
        &mut self,
        draft: TransactionDraft,
    ) -> Result<TransactionId, LedgerError> {
        self.check_project_ref(draft.project)?;
        let id = TransactionId(self.last_transaction_id.saturating_add(1));
        let tx = draft.into_transaction(id)?;
        self.last_transaction_id = id.0;
        self.apply_effect(tx.project_effect(), false);
        self.transactions.insert(id, tx);
        Ok(id)
    }

    /// Change a transaction's status, moving its accumulator contribution.
    pub fn set_transaction_status(
        &mut self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<&Transaction, LedgerError> {
        let tx = self
            .transactions
            .get(&id)
            .ok_or(LedgerError::TransactionNotFound(id))?;
        let before = tx.project_effect();
        let mut updated = tx.clone();
        updated.status = status;
        let after = updated.project_effect();

        self.apply_effect(before, true);
        self.apply_effect(after, false);
        self.transactions.insert(id, updated);
        self.transactions
            .get(&id)
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    /// Delete a transaction, reversing its accumulator contribution.
    pub fn remove_transaction(&mut self, id: TransactionId) -> Result<Transaction, LedgerError> {
        let tx = self
            .transactions
            .remove(&id)
            .ok_or(LedgerError::TransactionNotFound(id))?;
        self.apply_effect(tx.project_effect(), true);
        Ok(tx)
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    fn check_project_ref(&self, project: Option<ProjectId>) -> Result<(), LedgerError> {
        match project {
            Some(id) if !self.projects.contains_key(&id) => Err(LedgerError::ProjectNotFound(id)),
            _ => Ok(()),
        }
    }

    /// Add (or with `reverse`, subtract) a transaction's contribution.
    fn apply_effect(&mut self, effect: Option<ProjectEffect>, reverse: bool) {
        let step = |value: Money, amount: Money| {
            if reverse {
                value.saturating_sub(amount)
            } else {
                value.saturating_add(amount)
            }
        };
        match effect {
            Some(ProjectEffect::Revenue(id, amount)) => {
                if let Some(project) = self.projects.get_mut(&id) {
                    project.revenue = step(project.revenue, amount);
                }
            }
            Some(ProjectEffect::Expense(id, amount)) => {
                if let Some(project) = self.projects.get_mut(&id) {
                    project.expenses = step(project.expenses, amount);
                }
            }
            None => {}
        }
    }
}

impl LedgerStore for Ledger {
    fn allocate_project_id(&mut self) -> ProjectId {
        self.last_project_id = self.last_project_id.saturating_add(1);
        ProjectId(self.last_project_id)
    }

    fn get_project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.get(&id)
    }

    fn put_project(&mut self, project: Project) {
        self.last_project_id = self.last_project_id.max(project.id.0);
        self.projects.insert(project.id, project);
    }

    fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }
}

// =============================================================================
// TESTS
// =============================================================================
