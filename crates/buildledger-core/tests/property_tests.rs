//! # Property-Based Tests
//!
//! Lifecycle and bookkeeping invariants checked with proptest.

use buildledger_core::{
    ContractTerms, ContractType, Invoice, InvoiceDraft, InvoiceFilter, InvoiceId, InvoiceStatus,
    InvoiceTab, InvoiceType, Ledger, LedgerError, LedgerStore, Money, ProjectDraft, ProjectId,
    ProjectKind, ProjectStatus, StageTransition, TransactionDraft, TransactionId,
    TransactionStatus, TransactionType, TransitionOutcome, TransitionRequest,
};
use chrono::NaiveDate;
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("date")
}

fn design_with_revenue(ledger: &mut Ledger, budget: i64, revenue: i64) -> ProjectId {
    ledger
        .add_project(
            ProjectDraft::new("Prop", "Client", Money::new(budget))
                .with_status(ProjectStatus::Design)
                .with_revenue(Money::new(revenue)),
        )
        .expect("add")
}

fn execution_request(value: i64) -> TransitionRequest {
    TransitionRequest::to(ProjectStatus::Execution)
        .with_contract(ContractTerms::new(ContractType::LumpSum, Money::new(value)))
}

fn invoice_type() -> impl Strategy<Value = InvoiceType> {
    prop_oneof![
        Just(InvoiceType::Sales),
        Just(InvoiceType::Purchase),
        Just(InvoiceType::Supplier),
    ]
}

fn transaction_status() -> impl Strategy<Value = TransactionStatus> {
    prop_oneof![
        Just(TransactionStatus::Pending),
        Just(TransactionStatus::Completed),
        Just(TransactionStatus::Cancelled),
    ]
}

fn transaction_type() -> impl Strategy<Value = TransactionType> {
    prop_oneof![
        Just(TransactionType::Payment),
        Just(TransactionType::Receipt),
        Just(TransactionType::Transfer),
    ]
}

/// One step in a random bookkeeping session.
#[derive(Debug, Clone)]
enum Step {
    Add(TransactionType, TransactionStatus, i64),
    SetStatus(usize, TransactionStatus),
    Remove(usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (transaction_type(), transaction_status(), 1i64..10_000)
            .prop_map(|(k, s, a)| Step::Add(k, s, a)),
        (0usize..16, transaction_status()).prop_map(|(i, s)| Step::SetStatus(i, s)),
        (0usize..16).prop_map(Step::Remove),
    ]
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// A paid design converts into exactly one archive and one execution
    /// record that point at each other.
    #[test]
    fn paid_design_yields_linked_archive_and_execution(
        budget in 0i64..1_000_000,
        overpaid in 0i64..1_000,
        contract in 0i64..1_000_000,
    ) {
        let mut ledger = Ledger::new();
        let id = design_with_revenue(&mut ledger, budget, budget + overpaid);

        let outcome = StageTransition::apply(&mut ledger, id, execution_request(contract))
            .expect("transition");
        let TransitionOutcome::Converted { execution, archive } = outcome else {
            return Err(TestCaseError::fail(format!("expected conversion, got {:?}", outcome)));
        };

        prop_assert_eq!(archive, id);
        prop_assert_eq!(ledger.project_count(), 2);
        let archives: Vec<_> = ledger
            .projects()
            .filter(|p| p.status == ProjectStatus::Delivered && p.kind == ProjectKind::Design)
            .collect();
        let executions: Vec<_> = ledger
            .projects()
            .filter(|p| p.status == ProjectStatus::Execution && p.kind == ProjectKind::Execution)
            .collect();
        prop_assert_eq!(archives.len(), 1);
        prop_assert_eq!(executions.len(), 1);
        prop_assert_eq!(archives[0].id, archive);
        prop_assert_eq!(executions[0].id, execution);
        prop_assert_eq!(archives[0].related_project_id, Some(execution));
        prop_assert_eq!(executions[0].related_project_id, Some(archive));
        prop_assert_eq!(executions[0].budget, Money::new(contract));
    }

    /// An unpaid design splits into itself plus one linked execution record,
    /// keeping its debt.
    #[test]
    fn unpaid_design_splits_and_keeps_debt(
        budget in 1i64..1_000_000,
        paid_share in 0i64..100,
        contract in 0i64..1_000_000,
    ) {
        let revenue = budget * paid_share / 100;
        prop_assume!(revenue < budget);
        let mut ledger = Ledger::new();
        let id = design_with_revenue(&mut ledger, budget, revenue);

        let outcome = StageTransition::apply(&mut ledger, id, execution_request(contract))
            .expect("transition");
        let TransitionOutcome::Split { design, execution, outstanding } = outcome else {
            return Err(TestCaseError::fail(format!("expected split, got {:?}", outcome)));
        };

        prop_assert_eq!(design, id);
        prop_assert_eq!(outstanding, Money::new(budget - revenue));
        let d = ledger.get_project(design).expect("design");
        prop_assert_eq!(d.status, ProjectStatus::Design);
        prop_assert_eq!(d.design_debt(), outstanding);
        prop_assert_eq!(d.related_project_id, Some(execution));
        let e = ledger.get_project(execution).expect("execution");
        prop_assert_eq!(e.related_project_id, Some(design));
        prop_assert_eq!(e.revenue, Money::ZERO);
    }

    /// A second Design to Execution transition is always rejected and
    /// leaves the ledger untouched.
    #[test]
    fn second_transition_rejected(
        budget in 0i64..1_000_000,
        revenue in 0i64..1_000_000,
        contract in 0i64..1_000_000,
    ) {
        let mut ledger = Ledger::new();
        let id = design_with_revenue(&mut ledger, budget, revenue);
        StageTransition::apply(&mut ledger, id, execution_request(contract)).expect("first");

        let before = ledger.snapshot();
        let second = StageTransition::apply(&mut ledger, id, execution_request(contract));

        prop_assert!(
            matches!(second, Err(LedgerError::AlreadyTransitioned { .. })),
            "expected rejection, got {:?}",
            second
        );
        prop_assert_eq!(ledger.snapshot(), before);
    }

    /// Closing with an unpaid balance needs confirmation.
    #[test]
    fn delivery_with_debt_needs_confirmation(
        budget in 1i64..1_000_000,
        unpaid in 1i64..1_000,
    ) {
        let revenue = budget.saturating_sub(unpaid).max(0);
        let mut ledger = Ledger::new();
        let id = design_with_revenue(&mut ledger, budget, revenue);

        let rejected = StageTransition::apply(
            &mut ledger,
            id,
            TransitionRequest::to(ProjectStatus::Delivered),
        );
        prop_assert!(
            matches!(rejected, Err(LedgerError::ConfirmationRequired { .. })),
            "unexpected {:?}",
            rejected
        );

        let closed = StageTransition::apply(
            &mut ledger,
            id,
            TransitionRequest::to(ProjectStatus::Delivered).confirmed(),
        )
        .expect("confirmed");
        prop_assert_eq!(
            closed,
            TransitionOutcome::Closed { project: id, outstanding: Money::new(budget - revenue) }
        );
    }

    /// Sales and Purchases tabs partition the invoice list.
    #[test]
    fn invoice_tabs_partition(kinds in vec(invoice_type(), 0..60)) {
        let invoices: Vec<Invoice> = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                InvoiceDraft {
                    number: format!("N-{}", i),
                    date: date(),
                    project: None,
                    amount: Money::from_major(1),
                    kind: *kind,
                    status: InvoiceStatus::Pending,
                    counterparty: "C".to_string(),
                }
                .into_invoice(InvoiceId(i as u64 + 1))
                .expect("valid")
            })
            .collect();

        let ids = |tab: InvoiceTab| -> BTreeSet<InvoiceId> {
            InvoiceFilter::tab(tab)
                .apply(&invoices)
                .expect("filter")
                .iter()
                .map(|i| i.id)
                .collect()
        };
        let sales = ids(InvoiceTab::Sales);
        let purchases = ids(InvoiceTab::Purchases);
        let all = ids(InvoiceTab::All);

        prop_assert!(sales.is_disjoint(&purchases));
        let union: BTreeSet<InvoiceId> = sales.union(&purchases).copied().collect();
        prop_assert_eq!(&union, &all);
        prop_assert_eq!(all.len(), invoices.len());
        for invoice in &invoices {
            prop_assert_eq!(sales.contains(&invoice.id), invoice.kind == InvoiceType::Sales);
        }
    }

    /// Accumulators always equal opening balance plus completed contributions.
    #[test]
    fn accumulators_track_completed_transactions(
        opening in 0i64..100_000,
        steps in vec(step(), 1..40),
    ) {
        let mut ledger = Ledger::new();
        let project = design_with_revenue(&mut ledger, 1_000_000, opening);
        let mut live: Vec<TransactionId> = Vec::new();

        for step in steps {
            match step {
                Step::Add(kind, status, amount) => {
                    let id = ledger
                        .add_transaction(TransactionDraft {
                            kind,
                            date: date(),
                            amount: Money::new(amount),
                            currency: "USD".to_string(),
                            from_account: "a".to_string(),
                            to_account: "b".to_string(),
                            project: Some(project),
                            status,
                        })
                        .expect("add");
                    live.push(id);
                }
                Step::SetStatus(index, status) => {
                    if !live.is_empty() {
                        let id = live[index % live.len()];
                        ledger.set_transaction_status(id, status).expect("status");
                    }
                }
                Step::Remove(index) => {
                    if !live.is_empty() {
                        let id = live.remove(index % live.len());
                        ledger.remove_transaction(id).expect("remove");
                    }
                }
            }
        }

        let completed = |kind: TransactionType| -> Money {
            ledger
                .transactions()
                .filter(|t| t.kind == kind && t.status == TransactionStatus::Completed)
                .map(|t| t.amount)
                .sum()
        };
        let p = ledger.get_project(project).expect("project");
        prop_assert_eq!(p.revenue, Money::new(opening).saturating_add(completed(TransactionType::Receipt)));
        prop_assert_eq!(p.expenses, completed(TransactionType::Payment));
    }
}
