//! # Ledger Benchmarks
//!
//! Performance benchmarks for filtering, metrics and stage transitions.
//!
//! Run with: `cargo bench -p buildledger-core`

use buildledger_core::{
    ContractTerms, ContractType, DashboardMetrics, InvoiceDraft, InvoiceFilter, InvoiceStatus,
    InvoiceTab, InvoiceType, Ledger, Money, ProjectDraft, ProjectId, ProjectStatus,
    StageTransition, TransactionDraft, TransactionStatus, TransactionType, TransitionRequest,
};
use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Create a ledger with `size` design projects, two invoices and one
/// completed receipt per project.
fn create_ledger(size: usize) -> Ledger {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
    let mut ledger = Ledger::new();

    for i in 0..size {
        let project = ledger
            .add_project(
                ProjectDraft::new(format!("Project {}", i), "Client", Money::from_major(1000))
                    .with_status(ProjectStatus::Design),
            )
            .expect("project");
        for (suffix, kind) in [("S", InvoiceType::Sales), ("P", InvoiceType::Supplier)] {
            ledger
                .add_invoice(InvoiceDraft {
                    number: format!("INV-{}-{}", i, suffix),
                    date,
                    project: Some(project),
                    amount: Money::from_major(100),
                    kind,
                    status: InvoiceStatus::Pending,
                    counterparty: format!("Party {}", i % 17),
                })
                .expect("invoice");
        }
        ledger
            .add_transaction(TransactionDraft {
                kind: TransactionType::Receipt,
                date,
                amount: Money::from_major((i % 3) as i64 * 500 + 100),
                currency: "USD".to_string(),
                from_account: "Client".to_string(),
                to_account: "Bank".to_string(),
                project: Some(project),
                status: TransactionStatus::Completed,
            })
            .expect("receipt");
    }

    ledger
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_invoice_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("invoice_filter");

    for size in [100, 1000, 10000].iter() {
        let ledger = create_ledger(*size);
        let filter = InvoiceFilter {
            search: Some("party 3".to_string()),
            ..InvoiceFilter::tab(InvoiceTab::Sales)
        };

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(filter.apply(ledger.invoices())));
        });
    }

    group.finish();
}

fn bench_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("dashboard_metrics");

    for size in [100, 1000, 10000].iter() {
        let ledger = create_ledger(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(DashboardMetrics::from_ledger(&ledger)));
        });
    }

    group.finish();
}

fn bench_transition(c: &mut Criterion) {
    let mut group = c.benchmark_group("design_to_execution");

    for size in [100, 1000, 5000].iter() {
        let ledger = create_ledger(*size);
        let request = TransitionRequest::to(ProjectStatus::Execution)
            .with_contract(ContractTerms::new(ContractType::LumpSum, Money::from_major(5000)));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut ledger = ledger.clone();
                let target = ProjectId((size / 2) as u64);
                black_box(StageTransition::apply(&mut ledger, target, request.clone()))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_invoice_filter, bench_metrics, bench_transition);
criterion_main!(benches);
