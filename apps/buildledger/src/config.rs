//! # Configuration
//!
//! Server and data settings, read from an optional TOML file and then
//! overridden by environment variables.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//! rate_limit = 100
//! cors_origins = ["http://localhost:3000"]
//!
//! [data]
//! seed_demo = true
//! seed_file = "seed.json"
//! ```
//!
//! ## Environment Variables
//!
//! - `BUILDLEDGER_HOST`, `BUILDLEDGER_PORT`
//! - `BUILDLEDGER_RATE_LIMIT`: requests per second, 0 disables
//! - `BUILDLEDGER_CORS_ORIGINS`: comma-separated origins, or "*" for all

use buildledger_core::{Ledger, LedgerError, LedgerSnapshot, fixtures};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "buildledger.toml";

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Maximum seed file size (50 MB).
const MAX_SEED_FILE_SIZE: u64 = 50 * 1024 * 1024;

// =============================================================================
// SETTINGS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second across all clients. 0 disables limiting.
    pub rate_limit: u32,
    /// Allowed CORS origins. Empty means localhost only, `["*"]` allows all.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: 100,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Start from the built-in demo ledger.
    pub seed_demo: bool,
    /// JSON snapshot to start from. Takes precedence over `seed_demo`.
    pub seed_file: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            seed_demo: true,
            seed_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub data: DataConfig,
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, LedgerError> {
        toml::from_str(source)
            .map_err(|e| LedgerError::SerializationError(format!("Invalid config: {}", e)))
    }

    /// Load the config file.
    ///
    /// An explicit path must exist. Without one, `buildledger.toml` in the
    /// working directory is used when present, otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, LedgerError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    return Ok(Self::default());
                }
                default
            }
        };

        let canonical = validate_file_path(&path)?;
        validate_file_size(&canonical, MAX_CONFIG_FILE_SIZE)?;
        let source = std::fs::read_to_string(&canonical)
            .map_err(|e| LedgerError::IoError(format!("Cannot read config: {}", e)))?;
        tracing::info!(path = %canonical.display(), "Loaded config file");
        Self::from_toml_str(&source)
    }

    /// Apply `BUILDLEDGER_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup. Unparseable values are logged
    /// and ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(host) = lookup("BUILDLEDGER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("BUILDLEDGER_PORT") {
            match port.trim().parse() {
                Ok(p) => self.server.port = p,
                Err(e) => tracing::warn!("Ignoring BUILDLEDGER_PORT='{}': {}", port, e),
            }
        }
        if let Some(limit) = lookup("BUILDLEDGER_RATE_LIMIT") {
            match limit.trim().parse() {
                Ok(l) => self.server.rate_limit = l,
                Err(e) => tracing::warn!("Ignoring BUILDLEDGER_RATE_LIMIT='{}': {}", limit, e),
            }
        }
        if let Some(origins) = lookup("BUILDLEDGER_CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
    }

    /// Build the starting ledger from the data settings.
    pub fn seed_ledger(&self) -> Result<Ledger, LedgerError> {
        if let Some(path) = &self.data.seed_file {
            return load_seed_file(path);
        }
        if self.data.seed_demo {
            return fixtures::demo_ledger();
        }
        Ok(Ledger::new())
    }
}

// =============================================================================
// FILE HELPERS
// =============================================================================

/// Read a JSON `LedgerSnapshot` and rebuild the ledger from it.
pub fn load_seed_file(path: &Path) -> Result<Ledger, LedgerError> {
    let canonical = validate_file_path(path)?;
    validate_file_size(&canonical, MAX_SEED_FILE_SIZE)?;
    let content = std::fs::read_to_string(&canonical)
        .map_err(|e| LedgerError::IoError(format!("Cannot read seed file: {}", e)))?;
    let snapshot: LedgerSnapshot = serde_json::from_str(&content)
        .map_err(|e| LedgerError::SerializationError(format!("Invalid seed file: {}", e)))?;
    let ledger = Ledger::from_snapshot(snapshot)?;
    tracing::info!(
        path = %canonical.display(),
        projects = ledger.project_count(),
        invoices = ledger.invoice_count(),
        transactions = ledger.transaction_count(),
        "Loaded seed file"
    );
    Ok(ledger)
}

/// Resolve a path to an existing regular file.
fn validate_file_path(path: &Path) -> Result<PathBuf, LedgerError> {
    let canonical = path.canonicalize().map_err(|e| {
        LedgerError::IoError(format!("Invalid file path '{}': {}", path.display(), e))
    })?;

    if !canonical.is_file() {
        return Err(LedgerError::IoError(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }

    Ok(canonical)
}

fn validate_file_size(path: &Path, max_size: u64) -> Result<(), LedgerError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| LedgerError::IoError(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(LedgerError::SerializationError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
