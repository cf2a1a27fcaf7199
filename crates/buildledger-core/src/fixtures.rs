//! # Demo Data
//!
//! Canned records used to seed the dashboard and to stand in for the
//! remote invoice fetch.

use crate::invoice::{InvoiceDraft, InvoiceStatus, InvoiceType};
use crate::project::{ContractTerms, ContractType, ProjectDraft, ProjectKind, ProjectStatus};
use crate::store::Ledger;
use crate::transaction::{TransactionDraft, TransactionStatus, TransactionType};
use crate::{LedgerError, Money, ProjectId};
use chrono::NaiveDate;

fn day(year: i32, month: u32, date: u32) -> Result<NaiveDate, LedgerError> {
    NaiveDate::from_ymd_opt(year, month, date).ok_or_else(|| {
        LedgerError::SerializationError(format!("Invalid date {}-{}-{}", year, month, date))
    })
}

fn invoice(
    number: &str,
    date: NaiveDate,
    project: Option<ProjectId>,
    amount: i64,
    kind: InvoiceType,
    status: InvoiceStatus,
    counterparty: &str,
) -> InvoiceDraft {
    InvoiceDraft {
        number: number.to_string(),
        date,
        project,
        amount: Money::from_major(amount),
        kind,
        status,
        counterparty: counterparty.to_string(),
    }
}

/// Invoices returned by the mocked remote fetch.
///
/// Project references point at the demo ledger's first projects; a ledger
/// that does not know them keeps the invoice unlinked.
pub fn fetch_invoices() -> Result<Vec<InvoiceDraft>, LedgerError> {
    Ok(vec![
        invoice(
            "INV-2024-101",
            day(2024, 4, 2)?,
            Some(ProjectId(1)),
            12_500,
            InvoiceType::Sales,
            InvoiceStatus::Pending,
            "Nour Developments",
        ),
        invoice(
            "INV-2024-102",
            day(2024, 4, 9)?,
            Some(ProjectId(2)),
            4_800,
            InvoiceType::Supplier,
            InvoiceStatus::Pending,
            "Delta Ceramics",
        ),
        invoice(
            "INV-2024-103",
            day(2024, 4, 15)?,
            None,
            960,
            InvoiceType::Purchase,
            InvoiceStatus::Paid,
            "Office Depot",
        ),
        invoice(
            "INV-2024-104",
            day(2024, 3, 28)?,
            Some(ProjectId(3)),
            22_000,
            InvoiceType::Sales,
            InvoiceStatus::Overdue,
            "Sahel Resorts",
        ),
    ])
}

fn receipt(
    project: ProjectId,
    date: NaiveDate,
    amount: i64,
    from: &str,
) -> TransactionDraft {
    TransactionDraft {
        kind: TransactionType::Receipt,
        date,
        amount: Money::from_major(amount),
        currency: "USD".to_string(),
        from_account: from.to_string(),
        to_account: "Operating Account".to_string(),
        project: Some(project),
        status: TransactionStatus::Completed,
    }
}

/// A ledger with projects in every stage, invoices of every type and
/// status, and a mix of transactions.
pub fn demo_ledger() -> Result<Ledger, LedgerError> {
    let mut ledger = Ledger::new();

    let villa = ledger.add_project(ProjectDraft {
        category: "Residential".to_string(),
        ..ProjectDraft::new("Villa Nour", "Nour Developments", Money::from_major(40_000))
            .with_status(ProjectStatus::Design)
    })?;
    let clinic = ledger.add_project(ProjectDraft {
        category: "Healthcare".to_string(),
        ..ProjectDraft::new("Maadi Clinic", "Care Group", Money::from_major(18_000))
            .with_status(ProjectStatus::Design)
    })?;
    let resort = ledger.add_project(ProjectDraft {
        category: "Hospitality".to_string(),
        kind: ProjectKind::Execution,
        contract: Some(ContractTerms {
            start_date: Some(day(2023, 11, 1)?),
            ..ContractTerms::new(ContractType::CostPlus, Money::from_major(250_000))
        }),
        expenses: Money::from_major(61_000),
        ..ProjectDraft::new("Sahel Resort", "Sahel Resorts", Money::from_major(250_000))
            .with_status(ProjectStatus::Execution)
            .with_revenue(Money::from_major(90_000))
    })?;
    let office = ledger.add_project(ProjectDraft {
        category: "Commercial".to_string(),
        kind: ProjectKind::Execution,
        contract: Some(ContractTerms::new(ContractType::LumpSum, Money::from_major(75_000))),
        ..ProjectDraft::new("Zamalek Office Fitout", "Apex Consulting", Money::from_major(75_000))
            .with_status(ProjectStatus::Delivered)
            .with_revenue(Money::from_major(75_000))
    })?;
    ledger.add_project(ProjectDraft {
        category: "Residential".to_string(),
        ..ProjectDraft::new("Garden Annex", "Mona Said", Money::from_major(9_000))
    })?;
    ledger.add_project(ProjectDraft {
        category: "Retail".to_string(),
        ..ProjectDraft::new("Mall Kiosk", "Citystars", Money::from_major(6_500))
            .with_status(ProjectStatus::Stopped)
            .with_revenue(Money::from_major(2_000))
    })?;
    ledger.add_project(ProjectDraft {
        category: "Industrial".to_string(),
        kind: ProjectKind::Execution,
        contract: Some(ContractTerms::new(ContractType::FixedFee, Money::from_major(120_000))),
        ..ProjectDraft::new("Warehouse 6", "Delta Logistics", Money::from_major(120_000))
            .with_status(ProjectStatus::Delayed)
            .with_revenue(Money::from_major(30_000))
    })?;

    // Villa design is fully paid by receipts; the clinic is still owed money.
    ledger.add_transaction(receipt(villa, day(2024, 2, 10)?, 25_000, "Nour Developments"))?;
    ledger.add_transaction(receipt(villa, day(2024, 3, 12)?, 15_000, "Nour Developments"))?;
    ledger.add_transaction(receipt(clinic, day(2024, 3, 20)?, 6_000, "Care Group"))?;
    ledger.add_transaction(TransactionDraft {
        kind: TransactionType::Payment,
        date: day(2024, 3, 22)?,
        amount: Money::from_major(4_200),
        currency: "USD".to_string(),
        from_account: "Operating Account".to_string(),
        to_account: "Delta Ceramics".to_string(),
        project: Some(resort),
        status: TransactionStatus::Completed,
    })?;
    ledger.add_transaction(TransactionDraft {
        kind: TransactionType::Transfer,
        date: day(2024, 3, 25)?,
        amount: Money::from_major(10_000),
        currency: "USD".to_string(),
        from_account: "Operating Account".to_string(),
        to_account: "Payroll Account".to_string(),
        project: None,
        status: TransactionStatus::Completed,
    })?;
    ledger.add_transaction(TransactionDraft {
        kind: TransactionType::Receipt,
        date: day(2024, 4, 1)?,
        amount: Money::from_major(350_000),
        currency: "EGP".to_string(),
        from_account: "Citystars".to_string(),
        to_account: "EGP Account".to_string(),
        project: None,
        status: TransactionStatus::Pending,
    })?;
    ledger.add_transaction(TransactionDraft {
        kind: TransactionType::Payment,
        date: day(2024, 4, 3)?,
        amount: Money::from_major(1_500),
        currency: "USD".to_string(),
        from_account: "Operating Account".to_string(),
        to_account: "Cairo Steel".to_string(),
        project: Some(office),
        status: TransactionStatus::Cancelled,
    })?;

    for draft in [
        invoice(
            "INV-2024-001",
            day(2024, 2, 1)?,
            Some(villa),
            25_000,
            InvoiceType::Sales,
            InvoiceStatus::Paid,
            "Nour Developments",
        ),
        invoice(
            "INV-2024-002",
            day(2024, 3, 1)?,
            Some(clinic),
            12_000,
            InvoiceType::Sales,
            InvoiceStatus::Overdue,
            "Care Group",
        ),
        invoice(
            "INV-2024-003",
            day(2024, 3, 5)?,
            Some(resort),
            4_200,
            InvoiceType::Supplier,
            InvoiceStatus::Paid,
            "Delta Ceramics",
        ),
        invoice(
            "INV-2024-004",
            day(2024, 3, 18)?,
            Some(resort),
            8_750,
            InvoiceType::Purchase,
            InvoiceStatus::Pending,
            "Cairo Steel",
        ),
        invoice(
            "INV-2024-005",
            day(2024, 3, 30)?,
            None,
            640,
            InvoiceType::Purchase,
            InvoiceStatus::Overdue,
            "Print Hub",
        ),
    ] {
        ledger.add_invoice(draft)?;
    }

    Ok(ledger)
}
