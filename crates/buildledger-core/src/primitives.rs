//! # Ledger Primitives
//!
//! Fixed constants for the ledger: naming rules applied by stage
//! transitions and the input validation limits.

/// Suffix appended to the name of the archived design record when a fully
/// paid design project converts to execution.
pub const ARCHIVE_NAME_SUFFIX: &str = " (Design)";

/// Suffix appended to the name of the execution project created when a
/// design project still carries debt.
pub const EXECUTION_NAME_SUFFIX: &str = " (Execution)";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for names (projects, clients, counterparties, accounts).
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for invoice numbers.
pub const MAX_NUMBER_LENGTH: usize = 64;

/// Maximum length for free-text notes.
pub const MAX_NOTES_LENGTH: usize = 4096;

/// Maximum length of a search string.
pub const MAX_SEARCH_LENGTH: usize = 256;

/// Maximum number of records of one kind accepted from a seed snapshot.
pub const MAX_SNAPSHOT_RECORDS: usize = 100_000;
