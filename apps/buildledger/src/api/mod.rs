//! # buildledger HTTP API Module
//!
//! The JSON API behind the dashboard, built on axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /summary` - Dashboard metrics
//! - `GET|POST /projects`, `GET|PUT|DELETE /projects/{id}`
//! - `POST /projects/{id}/transition` - Stage transition
//! - `GET|POST /invoices`, `PUT|DELETE /invoices/{id}`
//! - `POST /invoices/fetch` - Merge the canned remote invoices
//! - `GET|POST /transactions`, `DELETE /transactions/{id}`
//! - `PUT /transactions/{id}/status` - Change a transaction's status

mod handlers;
mod middleware;
mod types;

pub use handlers::error_status;
pub use middleware::{GlobalRateLimiter, create_rate_limiter};
pub use types::{
    DeleteResponse, FetchResponse, HealthResponse, InvoiceListResponse, InvoiceResponse,
    ProjectListResponse, ProjectResponse, StatusUpdateRequest, SummaryResponse,
    TransactionListResponse, TransactionResponse, TransitionResponse,
};

use crate::config::ServerConfig;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post, put},
};
use buildledger_core::{Ledger, LedgerError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum request body size (1 MB).
const MAX_BODY_SIZE: usize = 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<RwLock<Ledger>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// State with default server settings.
    #[must_use]
    pub fn new(ledger: Ledger) -> Self {
        Self::with_config(ledger, ServerConfig::default())
    }

    #[must_use]
    pub fn with_config(ledger: Ledger, config: ServerConfig) -> Self {
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from the configured origins.
///
/// - `["*"]`: allow all origins
/// - empty: localhost only
/// - otherwise: the listed origins; invalid entries are skipped
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS: Allowing ALL origins. Do not use this in production.");
        return CorsLayer::permissive();
    }
    if origins.is_empty() {
        tracing::info!("CORS: No origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(hv) => {
                tracing::info!("CORS: Allowing origin: {}", origin);
                Some(hv)
            }
            Err(e) => {
                tracing::warn!("CORS: Invalid origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        tracing::warn!("CORS: No valid origins configured, defaulting to localhost only");
        return build_localhost_cors();
    }
    cors_for(allowed)
}

fn build_localhost_cors() -> CorsLayer {
    let origins = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();
    cors_for(origins)
}

fn cors_for(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate limiting (if enabled)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.cors_origins);

    let rate_limit = state.config.rate_limit;
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/summary", get(handlers::summary_handler))
        .route(
            "/projects",
            get(handlers::list_projects_handler).post(handlers::create_project_handler),
        )
        .route(
            "/projects/{id}",
            get(handlers::get_project_handler)
                .put(handlers::update_project_handler)
                .delete(handlers::delete_project_handler),
        )
        .route(
            "/projects/{id}/transition",
            post(handlers::transition_handler),
        )
        .route(
            "/invoices",
            get(handlers::list_invoices_handler).post(handlers::create_invoice_handler),
        )
        .route("/invoices/fetch", post(handlers::fetch_invoices_handler))
        .route(
            "/invoices/{id}",
            put(handlers::update_invoice_handler).delete(handlers::delete_invoice_handler),
        )
        .route(
            "/transactions",
            get(handlers::list_transactions_handler).post(handlers::create_transaction_handler),
        )
        .route(
            "/transactions/{id}",
            axum::routing::delete(handlers::delete_transaction_handler),
        )
        .route(
            "/transactions/{id}/status",
            put(handlers::set_transaction_status_handler),
        );

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server and run until the process is stopped.
pub async fn run_server(ledger: Ledger, config: ServerConfig) -> Result<(), LedgerError> {
    let addr = config.addr();
    let router = create_router(AppState::with_config(ledger, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LedgerError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("buildledger HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LedgerError::IoError(format!("Server error: {}", e)))
}

/// Resolves on Ctrl+C. If the handler cannot be installed the server runs
/// until killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
