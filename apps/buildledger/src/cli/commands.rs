//! # CLI Command Implementations

use crate::api;
use crate::config::Config;
use buildledger_core::{
    ContractTerms, ContractType, DashboardMetrics, InvoiceFilter, InvoiceStatus, InvoiceTab,
    LedgerError, LedgerStore, Money, ProjectFilter, ProjectId, ProjectStatus, StageTransition,
    TransactionFilter, TransactionStatus, TransactionType, TransitionOutcome,
    TransitionRequest,
};
use serde::Serialize;

/// Pretty-print a value as JSON.
fn print_json<T: Serialize>(value: &T) -> Result<(), LedgerError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| LedgerError::SerializationError(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

pub async fn cmd_server(config: Config) -> Result<(), LedgerError> {
    let ledger = config.seed_ledger()?;

    println!("buildledger Dashboard Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.server.host);
    println!("  Port:       {}", config.server.port);
    println!(
        "  Rate limit: {}",
        match config.server.rate_limit {
            0 => "disabled".to_string(),
            n => format!("{} req/s", n),
        }
    );
    println!(
        "  Ledger:     {} projects, {} invoices, {} transactions",
        ledger.project_count(),
        ledger.invoice_count(),
        ledger.transaction_count()
    );
    println!();
    println!("Endpoints:");
    println!("  GET  /summary                   - Dashboard metrics");
    println!("  GET  /projects                  - List projects");
    println!("  POST /projects/{{id}}/transition  - Stage transition");
    println!("  GET  /invoices                  - List invoices");
    println!("  POST /invoices/fetch            - Fetch remote invoices");
    println!("  GET  /transactions              - List transactions");
    println!("  GET  /health                    - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(ledger, config.server).await
}

// =============================================================================
// SUMMARY COMMAND
// =============================================================================

pub fn cmd_summary(config: &Config, json_mode: bool) -> Result<(), LedgerError> {
    let ledger = config.seed_ledger()?;
    let metrics = DashboardMetrics::from_ledger(&ledger);

    if json_mode {
        return print_json(&metrics);
    }

    println!("buildledger Summary");
    println!("===================");
    println!();
    println!("Projects:         {}", metrics.project_count);
    for (status, count) in &metrics.projects_by_status {
        println!("  {:<14}  {}", status.name(), count);
    }
    println!("Active:           {}", metrics.active_projects);
    println!("Total budget:     {}", metrics.total_budget);
    println!("Total revenue:    {}", metrics.total_revenue);
    println!("Total expenses:   {}", metrics.total_expenses);
    println!("Outstanding debt: {}", metrics.outstanding_debt);
    println!();
    println!("Invoices:         {}", metrics.invoice_count);
    println!("Receivables:      {}", metrics.receivables);
    println!("Payables:         {}", metrics.payables);
    println!("Overdue:          {}", metrics.overdue_invoices);
    println!();
    println!(
        "Transactions:     {} ({} pending)",
        metrics.transaction_count, metrics.pending_transactions
    );
    for (currency, flow) in &metrics.cash_flow {
        println!(
            "  {}  in {}  out {}  net {}",
            currency,
            flow.cash_in,
            flow.cash_out,
            flow.net()
        );
    }

    Ok(())
}

// =============================================================================
// LIST COMMANDS
// =============================================================================

pub fn cmd_projects(
    config: &Config,
    json_mode: bool,
    status: Option<ProjectStatus>,
    search: Option<String>,
) -> Result<(), LedgerError> {
    let ledger = config.seed_ledger()?;
    let filter = ProjectFilter {
        status,
        kind: None,
        search,
    };
    let projects = filter.apply(ledger.projects())?;

    if json_mode {
        return print_json(&projects);
    }

    println!(
        "{:<6} {:<28} {:<20} {:<10} {:<10} {:>12} {:>12}",
        "ID", "Name", "Client", "Status", "Kind", "Budget", "Debt"
    );
    for p in &projects {
        println!(
            "{:<6} {:<28} {:<20} {:<10} {:<10} {:>12} {:>12}",
            p.id.to_string(),
            p.name,
            p.client,
            p.status.name(),
            p.kind.name(),
            p.budget.to_string(),
            p.design_debt().to_string()
        );
    }
    println!();
    println!("{} project(s)", projects.len());
    Ok(())
}

pub fn cmd_invoices(
    config: &Config,
    json_mode: bool,
    tab: InvoiceTab,
    status: Option<InvoiceStatus>,
    search: Option<String>,
) -> Result<(), LedgerError> {
    let ledger = config.seed_ledger()?;
    let filter = InvoiceFilter {
        tab,
        status,
        search,
        ..InvoiceFilter::default()
    };
    let (invoices, totals) = filter.apply_with_totals(ledger.invoices())?;

    if json_mode {
        return print_json(&serde_json::json!({
            "invoices": invoices,
            "totals": totals,
        }));
    }

    println!(
        "{:<14} {:<11} {:<9} {:<8} {:<22} {:>12}",
        "Number", "Date", "Type", "Status", "Counterparty", "Amount"
    );
    for i in &invoices {
        println!(
            "{:<14} {:<11} {:<9} {:<8} {:<22} {:>12}",
            i.number,
            i.date.to_string(),
            i.kind.name(),
            i.status.name(),
            i.counterparty,
            i.amount.to_string()
        );
    }
    println!();
    println!(
        "{} invoice(s) shown; all {} ({}), sales {} ({}), purchases {} ({})",
        invoices.len(),
        totals.all.count,
        totals.all.amount,
        totals.sales.count,
        totals.sales.amount,
        totals.purchases.count,
        totals.purchases.amount
    );
    Ok(())
}

pub fn cmd_transactions(
    config: &Config,
    json_mode: bool,
    kind: Option<TransactionType>,
    status: Option<TransactionStatus>,
) -> Result<(), LedgerError> {
    let ledger = config.seed_ledger()?;
    let filter = TransactionFilter {
        kind,
        status,
        ..TransactionFilter::default()
    };
    let transactions = filter.apply(ledger.transactions())?;

    if json_mode {
        return print_json(&transactions);
    }

    println!(
        "{:<6} {:<11} {:<9} {:<10} {:<20} {:<20} {:>14}",
        "ID", "Date", "Type", "Status", "From", "To", "Amount"
    );
    for t in &transactions {
        println!(
            "{:<6} {:<11} {:<9} {:<10} {:<20} {:<20} {:>10} {}",
            t.id.to_string(),
            t.date.to_string(),
            t.kind.name(),
            t.status.name(),
            t.from_account,
            t.to_account,
            t.amount.to_string(),
            t.currency
        );
    }
    println!();
    println!("{} transaction(s)", transactions.len());
    Ok(())
}

// =============================================================================
// TRANSITION COMMAND
// =============================================================================

/// Run a stage transition against the seeded ledger and print the result.
pub fn cmd_transition(
    config: &Config,
    json_mode: bool,
    project: u64,
    to: ProjectStatus,
    contract_type: ContractType,
    contract_value: Option<i64>,
    confirm: bool,
) -> Result<(), LedgerError> {
    let mut ledger = config.seed_ledger()?;
    let id = ProjectId(project);

    let mut request = TransitionRequest::to(to);
    if let Some(value) = contract_value {
        request = request.with_contract(ContractTerms::new(
            contract_type,
            Money::from_major(value),
        ));
    }
    if confirm {
        request = request.confirmed();
    }

    let outcome = StageTransition::apply(&mut ledger, id, request)?;
    tracing::info!(project = %id, target = %to, outcome = outcome.label(), "Stage transition applied");

    let projects: Vec<_> = outcome
        .affected()
        .into_iter()
        .filter_map(|p| ledger.get_project(p).cloned())
        .collect();

    if json_mode {
        return print_json(&serde_json::json!({
            "outcome": outcome,
            "projects": projects,
        }));
    }

    match &outcome {
        TransitionOutcome::Unchanged { project, status } => {
            println!("{} is already {}; nothing changed", project, status);
        }
        TransitionOutcome::StatusUpdated { project, from, to } => {
            println!("{}: {} -> {}", project, from, to);
        }
        TransitionOutcome::Converted { execution, archive } => {
            println!("Design work archived as {}", archive);
            println!("{} is now in execution", execution);
        }
        TransitionOutcome::Split {
            design,
            execution,
            outstanding,
        } => {
            println!("{} stays in design with {} outstanding", design, outstanding);
            println!("Execution continues as {}", execution);
        }
        TransitionOutcome::Closed {
            project,
            outstanding,
        } => {
            if outstanding.is_positive() {
                println!("{} delivered with {} unpaid", project, outstanding);
            } else {
                println!("{} delivered", project);
            }
        }
    }
    for p in &projects {
        println!(
            "  {} {:<28} {:<10} {:<10} budget {}",
            p.id,
            p.name,
            p.status.name(),
            p.kind.name(),
            p.budget
        );
    }
    println!();
    println!("(in-memory only; nothing was saved)");
    Ok(())
}
