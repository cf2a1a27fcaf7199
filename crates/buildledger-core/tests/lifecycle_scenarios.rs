//! # Lifecycle Scenario Tests (L0-L3)
//!
//! ## Tiers
//! - L0: Record validation
//! - L1: Design to Execution
//! - L2: Closing projects
//! - L3: Ledger bookkeeping around transitions

use buildledger_core::{
    ContractTerms, ContractType, InvoiceDraft, InvoiceStatus, InvoiceType, Ledger, LedgerError,
    LedgerStore, Money, ProjectDraft, ProjectId, ProjectKind, ProjectStatus, StageTransition,
    TransactionDraft, TransactionStatus, TransactionType, TransitionOutcome, TransitionRequest,
};
use chrono::NaiveDate;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).expect("date")
}

fn design(ledger: &mut Ledger, budget: i64) -> ProjectId {
    ledger
        .add_project(
            ProjectDraft::new("Riverside Lofts", "Hana Ltd", Money::from_major(budget))
                .with_status(ProjectStatus::Design),
        )
        .expect("add design")
}

fn receipt(project: ProjectId, amount: i64, status: TransactionStatus) -> TransactionDraft {
    TransactionDraft {
        kind: TransactionType::Receipt,
        date: date(),
        amount: Money::from_major(amount),
        currency: "USD".to_string(),
        from_account: "Hana Ltd".to_string(),
        to_account: "Operating".to_string(),
        project: Some(project),
        status,
    }
}

fn to_execution(value: i64) -> TransitionRequest {
    TransitionRequest::to(ProjectStatus::Execution)
        .with_contract(ContractTerms::new(ContractType::CostPlus, Money::from_major(value)))
}

// =============================================================================
// TIER L0: RECORD VALIDATION
// =============================================================================

mod l0_validation {
    use super::*;

    /// L0.1: Projects need a name and a client.
    #[test]
    fn project_requires_name_and_client() {
        let mut ledger = Ledger::new();
        let result = ledger.add_project(ProjectDraft::new("", "Client", Money::ZERO));
        assert!(matches!(result, Err(LedgerError::MissingField("name"))));

        let result = ledger.add_project(ProjectDraft::new("Name", " ", Money::ZERO));
        assert!(matches!(result, Err(LedgerError::MissingField("client"))));
        assert_eq!(ledger.project_count(), 0);
    }

    /// L0.2: Negative budgets are rejected.
    #[test]
    fn negative_budget_rejected() {
        let mut ledger = Ledger::new();
        let result = ledger.add_project(ProjectDraft::new("Name", "Client", Money::new(-1)));
        assert!(matches!(result, Err(LedgerError::InvalidAmount { .. })));
    }

    /// L0.3: Transactions need a known project.
    #[test]
    fn transaction_with_unknown_project_rejected() {
        let mut ledger = Ledger::new();
        let result = ledger.add_transaction(receipt(ProjectId(99), 10, TransactionStatus::Completed));
        assert!(matches!(result, Err(LedgerError::ProjectNotFound(ProjectId(99)))));
    }

    /// L0.4: Contract values cannot be negative.
    #[test]
    fn negative_contract_value_rejected() {
        let mut ledger = Ledger::new();
        let id = design(&mut ledger, 100);
        let result = StageTransition::apply(&mut ledger, id, to_execution(-5));
        assert!(matches!(result, Err(LedgerError::InvalidAmount { .. })));
        assert_eq!(ledger.project_count(), 1);
    }
}

// =============================================================================
// TIER L1: DESIGN TO EXECUTION
// =============================================================================

mod l1_design_to_execution {
    use super::*;

    /// L1.1: Paid in full by receipts, the design record is archived.
    #[test]
    fn receipts_cover_budget_then_convert() {
        let mut ledger = Ledger::new();
        let id = design(&mut ledger, 300);
        ledger
            .add_transaction(receipt(id, 300, TransactionStatus::Completed))
            .expect("receipt");

        let outcome = StageTransition::apply(&mut ledger, id, to_execution(2000)).expect("convert");
        let TransitionOutcome::Converted { execution, archive } = outcome else {
            unreachable!("expected conversion, got {:?}", outcome);
        };
        assert_eq!(archive, id);
        assert_ne!(execution, id);
        assert_eq!(ledger.project_count(), 2);

        let archived = ledger.get_project(archive).expect("archive");
        assert_eq!(archived.status, ProjectStatus::Delivered);
        assert_eq!(archived.kind, ProjectKind::Design);
        assert_eq!(archived.revenue, Money::from_major(300));

        let exec = ledger.get_project(execution).expect("execution");
        assert_eq!(exec.budget, Money::from_major(2000));
        assert_eq!(exec.revenue, Money::ZERO);
        assert_eq!(
            exec.contract.as_ref().map(|c| c.contract_type),
            Some(ContractType::CostPlus)
        );
    }

    /// L1.2: Design-phase history stays on the archived record.
    #[test]
    fn conversion_keeps_history_on_archive() {
        let mut ledger = Ledger::new();
        let id = design(&mut ledger, 100);
        let tx = ledger
            .add_transaction(receipt(id, 100, TransactionStatus::Completed))
            .expect("receipt");

        let outcome = StageTransition::apply(&mut ledger, id, to_execution(500)).expect("convert");
        let TransitionOutcome::Converted { execution, archive } = outcome else {
            unreachable!("expected conversion, got {:?}", outcome);
        };
        assert_eq!(archive, id);
        assert_eq!(ledger.get_transaction(tx).and_then(|t| t.project), Some(id));

        // Cancelling the design receipt reduces the archive, not the execution project.
        ledger
            .set_transaction_status(tx, TransactionStatus::Cancelled)
            .expect("cancel");
        assert_eq!(ledger.get_project(id).map(|p| p.revenue), Some(Money::ZERO));
        assert_eq!(ledger.get_project(execution).map(|p| p.revenue), Some(Money::ZERO));
    }

    /// L1.3: Pending receipts do not count toward the design budget.
    #[test]
    fn pending_receipts_leave_debt() {
        let mut ledger = Ledger::new();
        let id = design(&mut ledger, 300);
        ledger
            .add_transaction(receipt(id, 300, TransactionStatus::Pending))
            .expect("receipt");

        let outcome = StageTransition::apply(&mut ledger, id, to_execution(900)).expect("split");
        assert!(matches!(
            outcome,
            TransitionOutcome::Split { outstanding, .. } if outstanding == Money::from_major(300)
        ));
    }

    /// L1.4: A split design keeps its debt and can still collect it.
    #[test]
    fn split_design_collects_debt_independently() {
        let mut ledger = Ledger::new();
        let id = design(&mut ledger, 300);
        let outcome = StageTransition::apply(&mut ledger, id, to_execution(900)).expect("split");
        let TransitionOutcome::Split { execution, .. } = outcome else {
            unreachable!("expected split, got {:?}", outcome);
        };

        ledger
            .add_transaction(receipt(id, 300, TransactionStatus::Completed))
            .expect("late receipt");

        assert_eq!(ledger.get_project(id).map(|p| p.design_debt()), Some(Money::ZERO));
        assert_eq!(ledger.get_project(execution).map(|p| p.revenue), Some(Money::ZERO));
    }

    /// L1.5: A converted design cannot move to Execution again.
    #[test]
    fn converted_design_cannot_transition_again() {
        let mut ledger = Ledger::new();
        let id = design(&mut ledger, 0);
        let outcome = StageTransition::apply(&mut ledger, id, to_execution(10)).expect("convert");
        let TransitionOutcome::Converted { execution, .. } = outcome else {
            unreachable!("expected conversion, got {:?}", outcome);
        };
        let before = ledger.snapshot();

        let result = StageTransition::apply(&mut ledger, id, to_execution(10));
        assert!(matches!(
            result,
            Err(LedgerError::AlreadyTransitioned { successor, .. }) if successor == execution
        ));
        assert_eq!(ledger.snapshot(), before);
        assert_eq!(ledger.project_count(), 2);
    }

    /// L1.6: Even after the successor is stopped, no second split.
    #[test]
    fn stopped_successor_still_blocks() {
        let mut ledger = Ledger::new();
        let id = design(&mut ledger, 100);
        let outcome = StageTransition::apply(&mut ledger, id, to_execution(10)).expect("split");
        let TransitionOutcome::Split { execution, .. } = outcome else {
            unreachable!("expected split, got {:?}", outcome);
        };
        StageTransition::apply(
            &mut ledger,
            execution,
            TransitionRequest::to(ProjectStatus::Stopped),
        )
        .expect("stop");

        let result = StageTransition::apply(&mut ledger, id, to_execution(10));
        assert!(matches!(result, Err(LedgerError::AlreadyTransitioned { .. })));
    }

    /// L1.7: A proposal moving straight to Execution is a plain update.
    #[test]
    fn proposal_to_execution_is_plain_update() {
        let mut ledger = Ledger::new();
        let id = ledger
            .add_project(ProjectDraft::new("Kiosk", "Mall", Money::from_major(50)))
            .expect("add");

        let outcome = StageTransition::apply(
            &mut ledger,
            id,
            TransitionRequest::to(ProjectStatus::Execution),
        )
        .expect("update");
        assert!(matches!(outcome, TransitionOutcome::StatusUpdated { .. }));
        assert_eq!(ledger.project_count(), 1);
    }
}

// =============================================================================
// TIER L2: CLOSING PROJECTS
// =============================================================================

mod l2_closing {
    use super::*;

    /// L2.1: Unconfirmed close with debt changes nothing.
    #[test]
    fn unconfirmed_close_is_rejected_without_writes() {
        let mut ledger = Ledger::new();
        let id = design(&mut ledger, 100);
        let before = ledger.snapshot();

        let result = StageTransition::apply(
            &mut ledger,
            id,
            TransitionRequest::to(ProjectStatus::Delivered),
        );
        assert!(matches!(result, Err(LedgerError::ConfirmationRequired { .. })));
        assert_eq!(ledger.snapshot(), before);
    }

    /// L2.2: Stopping a project never asks for confirmation.
    #[test]
    fn stopping_with_debt_is_allowed() {
        let mut ledger = Ledger::new();
        let id = design(&mut ledger, 100);
        let outcome =
            StageTransition::apply(&mut ledger, id, TransitionRequest::to(ProjectStatus::Stopped))
                .expect("stop");
        assert_eq!(
            outcome,
            TransitionOutcome::StatusUpdated {
                project: id,
                from: ProjectStatus::Design,
                to: ProjectStatus::Stopped,
            }
        );
    }

    /// L2.3: A delivered project can be reopened with a plain update.
    #[test]
    fn delivered_project_can_be_delayed() {
        let mut ledger = Ledger::new();
        let id = design(&mut ledger, 0);
        StageTransition::apply(&mut ledger, id, TransitionRequest::to(ProjectStatus::Delivered))
            .expect("deliver");
        let outcome =
            StageTransition::apply(&mut ledger, id, TransitionRequest::to(ProjectStatus::Delayed))
                .expect("reopen");
        assert!(matches!(outcome, TransitionOutcome::StatusUpdated { .. }));
    }
}

// =============================================================================
// TIER L3: BOOKKEEPING AROUND TRANSITIONS
// =============================================================================

mod l3_bookkeeping {
    use super::*;

    /// L3.1: Removing a split successor frees the design for another split.
    #[test]
    fn removing_successor_clears_link() {
        let mut ledger = Ledger::new();
        let id = design(&mut ledger, 100);
        let outcome = StageTransition::apply(&mut ledger, id, to_execution(10)).expect("split");
        let TransitionOutcome::Split { execution, .. } = outcome else {
            unreachable!("expected split, got {:?}", outcome);
        };

        ledger.remove_project(execution).expect("remove");
        assert_eq!(ledger.get_project(id).and_then(|p| p.related_project_id), None);
        assert_eq!(ledger.successor_of(id), None);

        let again = StageTransition::apply(&mut ledger, id, to_execution(10)).expect("split");
        let TransitionOutcome::Split { execution: second, .. } = again else {
            unreachable!("expected split, got {:?}", again);
        };
        assert_ne!(second, execution);
    }

    /// L3.2: Invoices keep pointing at the design project after a split.
    #[test]
    fn invoices_stay_on_split_design() {
        let mut ledger = Ledger::new();
        let id = design(&mut ledger, 100);
        let invoice = ledger
            .add_invoice(InvoiceDraft {
                number: "INV-9".to_string(),
                date: date(),
                project: Some(id),
                amount: Money::from_major(100),
                kind: InvoiceType::Sales,
                status: InvoiceStatus::Pending,
                counterparty: "Hana Ltd".to_string(),
            })
            .expect("invoice");

        StageTransition::apply(&mut ledger, id, to_execution(10)).expect("split");
        assert_eq!(ledger.get_invoice(invoice).and_then(|i| i.project), Some(id));
    }

    /// L3.3: Snapshots preserve links and keep id allocation moving forward.
    #[test]
    fn snapshot_preserves_links() {
        let mut ledger = Ledger::new();
        let id = design(&mut ledger, 100);
        StageTransition::apply(&mut ledger, id, to_execution(10)).expect("split");

        let mut restored = Ledger::from_snapshot(ledger.snapshot()).expect("restore");
        assert!(restored.successor_of(id).is_some());
        let next = design(&mut restored, 5);
        assert_eq!(next, ProjectId(3));
    }
}
