//! # API Endpoint Handlers
//!
//! Every handler takes the ledger lock for its full duration, so each
//! request sees and leaves a consistent ledger.

use super::{
    AppState,
    types::{
        DeleteResponse, FetchResponse, HealthResponse, InvoiceListResponse, InvoiceResponse,
        ProjectListResponse, ProjectResponse, StatusUpdateRequest, SummaryResponse,
        TransactionListResponse, TransactionResponse, TransitionResponse,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use buildledger_core::{
    DashboardMetrics, Invoice, InvoiceDraft, InvoiceFilter, InvoiceId, InvoicePatch,
    LedgerError, LedgerStore, ProjectDraft, ProjectFilter, ProjectId, ProjectPatch,
    StageTransition, TransactionDraft, TransactionFilter, TransactionId,
    TransitionRequest, fixtures,
};

/// HTTP status for a ledger error.
pub fn error_status(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::ProjectNotFound(_)
        | LedgerError::InvoiceNotFound(_)
        | LedgerError::TransactionNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::AlreadyTransitioned { .. }
        | LedgerError::ConfirmationRequired { .. }
        | LedgerError::ProjectInUse { .. } => StatusCode::CONFLICT,
        LedgerError::MissingField(_)
        | LedgerError::FieldTooLong { .. }
        | LedgerError::InvalidAmount { .. }
        | LedgerError::InvalidCurrency(_)
        | LedgerError::SerializationError(_) => StatusCode::BAD_REQUEST,
        LedgerError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// HEALTH & SUMMARY
// =============================================================================

pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// Dashboard metrics.
pub async fn summary_handler(State(state): State<AppState>) -> impl IntoResponse {
    let ledger = state.ledger.read().await;
    let metrics = DashboardMetrics::from_ledger(&ledger);
    (StatusCode::OK, Json(SummaryResponse::success(metrics)))
}

// =============================================================================
// PROJECT HANDLERS
// =============================================================================

pub async fn list_projects_handler(
    State(state): State<AppState>,
    Query(filter): Query<ProjectFilter>,
) -> impl IntoResponse {
    let ledger = state.ledger.read().await;
    match filter.apply(ledger.projects()) {
        Ok(found) => (
            StatusCode::OK,
            Json(ProjectListResponse::success(
                found.into_iter().cloned().collect(),
            )),
        ),
        Err(e) => (
            error_status(&e),
            Json(ProjectListResponse::error(e.to_string())),
        ),
    }
}

pub async fn create_project_handler(
    State(state): State<AppState>,
    Json(draft): Json<ProjectDraft>,
) -> impl IntoResponse {
    let mut ledger = state.ledger.write().await;
    let created = ledger
        .add_project(draft)
        .and_then(|id| ledger.get_project(id).cloned().ok_or(LedgerError::ProjectNotFound(id)));
    match created {
        Ok(project) => {
            tracing::info!(project = %project.id, name = %project.name, "Project created");
            (StatusCode::CREATED, Json(ProjectResponse::success(project)))
        }
        Err(e) => (error_status(&e), Json(ProjectResponse::error(e.to_string()))),
    }
}

pub async fn get_project_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let ledger = state.ledger.read().await;
    match ledger.get_project(ProjectId(id)) {
        Some(project) => (StatusCode::OK, Json(ProjectResponse::success(project.clone()))),
        None => {
            let e = LedgerError::ProjectNotFound(ProjectId(id));
            (error_status(&e), Json(ProjectResponse::error(e.to_string())))
        }
    }
}

pub async fn update_project_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<ProjectPatch>,
) -> impl IntoResponse {
    let mut ledger = state.ledger.write().await;
    match ledger.update_project(ProjectId(id), patch) {
        Ok(project) => (StatusCode::OK, Json(ProjectResponse::success(project.clone()))),
        Err(e) => (error_status(&e), Json(ProjectResponse::error(e.to_string()))),
    }
}

pub async fn delete_project_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let mut ledger = state.ledger.write().await;
    match ledger.remove_project(ProjectId(id)) {
        Ok(project) => {
            tracing::info!(project = %project.id, "Project deleted");
            (StatusCode::OK, Json(DeleteResponse::success(id)))
        }
        Err(e) => (error_status(&e), Json(DeleteResponse::error(e.to_string()))),
    }
}

/// Move a project to another lifecycle stage.
pub async fn transition_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<TransitionRequest>,
) -> impl IntoResponse {
    let id = ProjectId(id);
    let target = request.target;
    let mut ledger = state.ledger.write().await;

    match StageTransition::apply(&mut *ledger, id, request) {
        Ok(outcome) => {
            tracing::info!(
                project = %id,
                target = %target,
                outcome = outcome.label(),
                "Stage transition applied"
            );
            let projects = outcome
                .affected()
                .into_iter()
                .filter_map(|p| ledger.get_project(p).cloned())
                .collect();
            (
                StatusCode::OK,
                Json(TransitionResponse::success(outcome, projects)),
            )
        }
        Err(e) => {
            tracing::warn!(project = %id, target = %target, error = %e, "Stage transition rejected");
            let outstanding = match &e {
                LedgerError::ConfirmationRequired { outstanding, .. } => Some(*outstanding),
                _ => None,
            };
            (
                error_status(&e),
                Json(TransitionResponse::error(e.to_string(), outstanding)),
            )
        }
    }
}

// =============================================================================
// INVOICE HANDLERS
// =============================================================================

/// List invoices. Tab totals cover every tab under the same non-tab filters.
pub async fn list_invoices_handler(
    State(state): State<AppState>,
    Query(filter): Query<InvoiceFilter>,
) -> impl IntoResponse {
    let ledger = state.ledger.read().await;
    let listed = filter
        .apply_with_totals(ledger.invoices())
        .map(|(found, totals)| (found.into_iter().cloned().collect::<Vec<Invoice>>(), totals));

    match listed {
        Ok((invoices, totals)) => (
            StatusCode::OK,
            Json(InvoiceListResponse::success(invoices, totals)),
        ),
        Err(e) => (
            error_status(&e),
            Json(InvoiceListResponse::error(e.to_string())),
        ),
    }
}

pub async fn create_invoice_handler(
    State(state): State<AppState>,
    Json(draft): Json<InvoiceDraft>,
) -> impl IntoResponse {
    let mut ledger = state.ledger.write().await;
    let created = ledger
        .add_invoice(draft)
        .and_then(|id| ledger.get_invoice(id).cloned().ok_or(LedgerError::InvoiceNotFound(id)));
    match created {
        Ok(invoice) => {
            tracing::info!(invoice = %invoice.id, number = %invoice.number, "Invoice created");
            (StatusCode::CREATED, Json(InvoiceResponse::success(invoice)))
        }
        Err(e) => (error_status(&e), Json(InvoiceResponse::error(e.to_string()))),
    }
}

pub async fn update_invoice_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<InvoicePatch>,
) -> impl IntoResponse {
    let mut ledger = state.ledger.write().await;
    match ledger.update_invoice(InvoiceId(id), patch) {
        Ok(invoice) => (StatusCode::OK, Json(InvoiceResponse::success(invoice.clone()))),
        Err(e) => (error_status(&e), Json(InvoiceResponse::error(e.to_string()))),
    }
}

pub async fn delete_invoice_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let mut ledger = state.ledger.write().await;
    match ledger.remove_invoice(InvoiceId(id)) {
        Ok(_) => (StatusCode::OK, Json(DeleteResponse::success(id))),
        Err(e) => (error_status(&e), Json(DeleteResponse::error(e.to_string()))),
    }
}

/// Merge the canned remote invoices into the ledger.
pub async fn fetch_invoices_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut ledger = state.ledger.write().await;
    match fixtures::fetch_invoices().and_then(|drafts| ledger.merge_invoices(drafts)) {
        Ok(added) => {
            tracing::info!(added = added.len(), "Fetched invoices merged");
            (StatusCode::OK, Json(FetchResponse::success(added)))
        }
        Err(e) => {
            tracing::error!(error = %e, "Invoice fetch failed");
            (error_status(&e), Json(FetchResponse::error(e.to_string())))
        }
    }
}

// =============================================================================
// TRANSACTION HANDLERS
// =============================================================================

pub async fn list_transactions_handler(
    State(state): State<AppState>,
    Query(filter): Query<TransactionFilter>,
) -> impl IntoResponse {
    let ledger = state.ledger.read().await;
    match filter.apply(ledger.transactions()) {
        Ok(found) => (
            StatusCode::OK,
            Json(TransactionListResponse::success(
                found.into_iter().cloned().collect(),
            )),
        ),
        Err(e) => (
            error_status(&e),
            Json(TransactionListResponse::error(e.to_string())),
        ),
    }
}

pub async fn create_transaction_handler(
    State(state): State<AppState>,
    Json(draft): Json<TransactionDraft>,
) -> impl IntoResponse {
    let mut ledger = state.ledger.write().await;
    let created = ledger.add_transaction(draft).and_then(|id| {
        ledger
            .get_transaction(id)
            .cloned()
            .ok_or(LedgerError::TransactionNotFound(id))
    });
    match created {
        Ok(tx) => {
            tracing::info!(transaction = %tx.id, kind = %tx.kind, status = %tx.status, "Transaction recorded");
            (StatusCode::CREATED, Json(TransactionResponse::success(tx)))
        }
        Err(e) => (
            error_status(&e),
            Json(TransactionResponse::error(e.to_string())),
        ),
    }
}

/// Change a transaction's status; project accumulators follow.
pub async fn set_transaction_status_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<StatusUpdateRequest>,
) -> impl IntoResponse {
    let mut ledger = state.ledger.write().await;
    match ledger.set_transaction_status(TransactionId(id), request.status) {
        Ok(tx) => {
            tracing::info!(transaction = %tx.id, status = %tx.status, "Transaction status changed");
            (StatusCode::OK, Json(TransactionResponse::success(tx.clone())))
        }
        Err(e) => (
            error_status(&e),
            Json(TransactionResponse::error(e.to_string())),
        ),
    }
}

pub async fn delete_transaction_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let mut ledger = state.ledger.write().await;
    match ledger.remove_transaction(TransactionId(id)) {
        Ok(_) => (StatusCode::OK, Json(DeleteResponse::success(id))),
        Err(e) => (error_status(&e), Json(DeleteResponse::error(e.to_string()))),
    }
}
