//! Error types for word ledger operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to exit codes and user-facing messages.

use thiserror::Error;

/// Result type alias for word ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Core error type for word ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The input file is already listed in the ledger
    #[error("File has already been processed: {0}")]
    AlreadyProcessed(String),

    /// An input line could not be decoded into a record
    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// Required parameters are missing or contradict each other
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input object or file does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Blob store or filesystem failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// The persisted ledger document could not be decoded
    #[error("Invalid ledger: {0}")]
    InvalidLedger(String),
}

impl LedgerError {
    /// Build a `MalformedRecord` error for a 1-based line number.
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        LedgerError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::InvalidLedger(err.to_string())
    }
}

impl From<object_store::Error> for LedgerError {
    fn from(err: object_store::Error) -> Self {
        LedgerError::Storage(err.to_string())
    }
}
