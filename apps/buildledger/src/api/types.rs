//! # API Request/Response Types
//!
//! JSON envelopes for the HTTP API. Every response carries `success` and,
//! on failure, an `error` message.

use buildledger_core::{
    DashboardMetrics, Invoice, InvoiceId, Money, Project, TabTotals, Transaction,
    TransactionStatus, TransitionOutcome,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// SUMMARY RESPONSE
// =============================================================================

/// Dashboard metrics response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub success: bool,
    pub metrics: Option<DashboardMetrics>,
    pub error: Option<String>,
}

impl SummaryResponse {
    pub fn success(metrics: DashboardMetrics) -> Self {
        Self {
            success: true,
            metrics: Some(metrics),
            error: None,
        }
    }
}

// =============================================================================
// PROJECT RESPONSES
// =============================================================================

/// Single project response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub success: bool,
    pub project: Option<Project>,
    pub error: Option<String>,
}

impl ProjectResponse {
    pub fn success(project: Project) -> Self {
        Self {
            success: true,
            project: Some(project),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            project: None,
            error: Some(msg.into()),
        }
    }
}

/// Project list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectListResponse {
    pub success: bool,
    pub projects: Vec<Project>,
    pub count: usize,
    pub error: Option<String>,
}

impl ProjectListResponse {
    pub fn success(projects: Vec<Project>) -> Self {
        Self {
            success: true,
            count: projects.len(),
            projects,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            projects: Vec::new(),
            count: 0,
            error: Some(msg.into()),
        }
    }
}

/// Stage transition response.
///
/// `projects` holds the records written by the transition. When closing
/// needs confirmation, `outstanding` carries the unpaid amount to show the
/// user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionResponse {
    pub success: bool,
    pub outcome: Option<TransitionOutcome>,
    #[serde(default)]
    pub projects: Vec<Project>,
    pub outstanding: Option<Money>,
    pub error: Option<String>,
}

impl TransitionResponse {
    pub fn success(outcome: TransitionOutcome, projects: Vec<Project>) -> Self {
        Self {
            success: true,
            outcome: Some(outcome),
            projects,
            outstanding: None,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>, outstanding: Option<Money>) -> Self {
        Self {
            success: false,
            outcome: None,
            projects: Vec::new(),
            outstanding,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// INVOICE RESPONSES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceResponse {
    pub success: bool,
    pub invoice: Option<Invoice>,
    pub error: Option<String>,
}

impl InvoiceResponse {
    pub fn success(invoice: Invoice) -> Self {
        Self {
            success: true,
            invoice: Some(invoice),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            invoice: None,
            error: Some(msg.into()),
        }
    }
}

/// Invoice list response. `totals` covers every tab for the same non-tab
/// filters, so the tab headers can show counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceListResponse {
    pub success: bool,
    pub invoices: Vec<Invoice>,
    pub totals: TabTotals,
    pub error: Option<String>,
}

impl InvoiceListResponse {
    pub fn success(invoices: Vec<Invoice>, totals: TabTotals) -> Self {
        Self {
            success: true,
            invoices,
            totals,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            invoices: Vec::new(),
            totals: TabTotals::default(),
            error: Some(msg.into()),
        }
    }
}

/// Result of merging the fetched invoices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchResponse {
    pub success: bool,
    pub added: Vec<InvoiceId>,
    pub count: usize,
    pub error: Option<String>,
}

impl FetchResponse {
    pub fn success(added: Vec<InvoiceId>) -> Self {
        Self {
            success: true,
            count: added.len(),
            added,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            added: Vec::new(),
            count: 0,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// TRANSACTION REQUESTS/RESPONSES
// =============================================================================

/// Body of `PUT /transactions/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: TransactionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    pub success: bool,
    pub transaction: Option<Transaction>,
    pub error: Option<String>,
}

impl TransactionResponse {
    pub fn success(transaction: Transaction) -> Self {
        Self {
            success: true,
            transaction: Some(transaction),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            transaction: None,
            error: Some(msg.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub success: bool,
    pub transactions: Vec<Transaction>,
    pub count: usize,
    pub error: Option<String>,
}

impl TransactionListResponse {
    pub fn success(transactions: Vec<Transaction>) -> Self {
        Self {
            success: true,
            count: transactions.len(),
            transactions,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            transactions: Vec::new(),
            count: 0,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// DELETE RESPONSE
// =============================================================================

/// Response for any delete endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub id: Option<u64>,
    pub error: Option<String>,
}

impl DeleteResponse {
    pub fn success(id: u64) -> Self {
        Self {
            success: true,
            id: Some(id),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(msg.into()),
        }
    }
}
