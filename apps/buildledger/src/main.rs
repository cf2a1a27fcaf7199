//! # buildledger - Dashboard Server
//!
//! The main binary for the buildledger project, invoice and cash dashboard.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │              apps/buildledger (THE BINARY)           │
//! │                                                      │
//! │  ┌──────────┐    ┌──────────┐    ┌───────────────┐   │
//! │  │   CLI    │    │ HTTP API │    │    Config     │   │
//! │  │  (clap)  │    │  (axum)  │    │ (toml + env)  │   │
//! │  └────┬─────┘    └────┬─────┘    └───────┬───────┘   │
//! │       └───────────────┼──────────────────┘           │
//! │                       ▼                              │
//! │              ┌──────────────────┐                    │
//! │              │ buildledger-core │                    │
//! │              │   (THE LEDGER)   │                    │
//! │              └──────────────────┘                    │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server on the demo ledger
//! buildledger server --port 8080
//!
//! # CLI views
//! buildledger summary
//! buildledger invoices --tab sales --status overdue
//! buildledger transition --project 2 --to execution --contract-value 90000
//! ```

use buildledger::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // BUILDLEDGER_LOG_FORMAT=json switches to machine-parseable output.
    let log_format =
        std::env::var("BUILDLEDGER_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "buildledger=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
  ┳┓  ┓ ┓ ┓     ┓
  ┣┫┓┏┓┏┫ ┃ ┏┓┏┫┏┓┏┓┏┓
  ┻┛┗┻┗┗┻ ┗┛┗ ┗┻┗┫┗ ┛
                 ┛
  buildledger v{}

  Projects • Invoices • Cash
"#,
        env!("CARGO_PKG_VERSION")
    );
}
