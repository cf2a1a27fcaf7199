//! # buildledger-core
//!
//! The ledger engine for buildledger.
//!
//! This crate holds the projects, invoices and cash transactions of a
//! design/construction firm in memory and applies the project lifecycle
//! rules: archiving paid design work, splitting unpaid design debt off into
//! a continuing project, and closing projects with outstanding balances
//! only on confirmation.
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - No logging: operations return outcomes and the app layer traces them
//! - `BTreeMap` only, integer money only, ids never reused
//!
//! ## Example
//!
//! ```
//! use buildledger_core::{
//!     ContractTerms, ContractType, Ledger, Money, ProjectDraft, ProjectStatus, StageTransition,
//!     TransitionOutcome, TransitionRequest,
//! };
//!
//! let mut ledger = Ledger::new();
//! let id = ledger
//!     .add_project(
//!         ProjectDraft::new("Villa", "Client", Money::from_major(100))
//!             .with_status(ProjectStatus::Design)
//!             .with_revenue(Money::from_major(40)),
//!     )?;
//!
//! let request = TransitionRequest::to(ProjectStatus::Execution)
//!     .with_contract(ContractTerms::new(ContractType::LumpSum, Money::from_major(500)));
//! let outcome = StageTransition::apply(&mut ledger, id, request)?;
//! assert!(matches!(outcome, TransitionOutcome::Split { .. }));
//! # Ok::<(), buildledger_core::LedgerError>(())
//! ```

// =============================================================================
// MODULES
// =============================================================================

pub mod filter;
pub mod fixtures;
pub mod invoice;
pub mod lifecycle;
pub mod primitives;
pub mod project;
pub mod store;
pub mod summary;
pub mod transaction;
pub mod types;
pub mod validation;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{Currency, InvoiceId, LedgerError, Money, ProjectId, TransactionId};

// =============================================================================
// RE-EXPORTS: Records
// =============================================================================

pub use invoice::{Invoice, InvoiceDraft, InvoicePatch, InvoiceSide, InvoiceStatus, InvoiceType};
pub use project::{
    ContractTerms, ContractType, Project, ProjectDraft, ProjectKind, ProjectPatch, ProjectStatus,
};
pub use transaction::{
    ProjectEffect, Transaction, TransactionDraft, TransactionStatus, TransactionType,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use filter::{InvoiceFilter, InvoiceTab, ProjectFilter, TabTotal, TabTotals, TransactionFilter};
pub use lifecycle::{StageTransition, TransitionOutcome, TransitionRequest};
pub use store::{Ledger, LedgerSnapshot, LedgerStore};
pub use summary::{CashFlow, DashboardMetrics};
