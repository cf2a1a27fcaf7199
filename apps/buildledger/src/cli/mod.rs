//! # buildledger CLI Module
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `summary` - Show dashboard metrics
//! - `projects` - List projects
//! - `invoices` - List invoices
//! - `transactions` - List transactions
//! - `transition` - Try a stage transition against the seeded ledger
//!
//! Every command runs against the ledger seeded from the configuration;
//! nothing is written back.

mod commands;

use crate::config::Config;
use buildledger_core::{
    ContractType, InvoiceStatus, InvoiceTab, LedgerError, ProjectStatus, TransactionStatus,
    TransactionType,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// buildledger - project, invoice and cash dashboard for design/construction firms
#[derive(Parser, Debug)]
#[command(name = "buildledger")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML config file (default: ./buildledger.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// JSON ledger snapshot to start from (overrides the config file)
    #[arg(short, long, global = true)]
    pub seed: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides config)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show dashboard metrics
    Summary,

    /// List projects
    Projects {
        /// Only projects in this stage
        #[arg(long)]
        status: Option<ProjectStatus>,

        /// Case-insensitive text search
        #[arg(long)]
        search: Option<String>,
    },

    /// List invoices
    Invoices {
        /// all, sales or purchases
        #[arg(long, default_value = "all")]
        tab: InvoiceTab,

        #[arg(long)]
        status: Option<InvoiceStatus>,

        #[arg(long)]
        search: Option<String>,
    },

    /// List transactions
    Transactions {
        #[arg(long)]
        kind: Option<TransactionType>,

        #[arg(long)]
        status: Option<TransactionStatus>,
    },

    /// Move a project to another stage and print the outcome
    Transition {
        /// Project id
        #[arg(long)]
        project: u64,

        /// Target stage
        #[arg(long)]
        to: ProjectStatus,

        /// Contract type for the execution phase
        #[arg(long, default_value = "lump_sum")]
        contract_type: ContractType,

        /// Contract value in major currency units
        #[arg(long)]
        contract_value: Option<i64>,

        /// Accept closing with an unpaid balance
        #[arg(long)]
        confirm: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), LedgerError> {
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_env();
    if let Some(seed) = cli.seed {
        config.data.seed_file = Some(seed);
    }
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_server(config).await
        }
        Some(Commands::Summary) | None => cmd_summary(&config, json_mode),
        Some(Commands::Projects { status, search }) => {
            cmd_projects(&config, json_mode, status, search)
        }
        Some(Commands::Invoices {
            tab,
            status,
            search,
        }) => cmd_invoices(&config, json_mode, tab, status, search),
        Some(Commands::Transactions { kind, status }) => {
            cmd_transactions(&config, json_mode, kind, status)
        }
        Some(Commands::Transition {
            project,
            to,
            contract_type,
            contract_value,
            confirm,
        }) => cmd_transition(
            &config,
            json_mode,
            project,
            to,
            contract_type,
            contract_value,
            confirm,
        ),
    }
}
