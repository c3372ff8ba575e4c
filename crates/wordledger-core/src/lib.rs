//! # Word Ledger Core
//!
//! Core library for Word Ledger - incremental unique-word accounting over
//! newline-delimited JSON files uploaded to object storage.
//!
//! This crate provides the ledger model, the merge algorithm, and the storage
//! collaborators, independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **ledger**: The cumulative ledger and the idempotent per-file merge
//! - **record**: Lazy line-by-line record decoding
//! - **storage**: Blob store trait, local and cloud backends
//! - **updater**: Load, guard, merge, persist
//! - **trigger**: Storage-event entry point

pub mod error;
pub mod fs;
pub mod ledger;
pub mod record;
pub mod storage;
pub mod trigger;
pub mod updater;

pub use error::{LedgerError, Result};
pub use ledger::{file_date, process_file, FileRecord, Ledger};
pub use record::{Record, RecordReader, WORD_FIELD};
pub use storage::{BlobLocation, BlobStore};
pub use updater::{LedgerUpdater, MissingLedgerPolicy, UpdateOutcome, UpdateRequest};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
