//! Ledger update orchestration.
//!
//! Both entry points (manual CLI run and storage-event trigger) build an
//! [`UpdateRequest`] and hand it to [`LedgerUpdater::run`], which performs the
//! full read-merge-write cycle against a [`BlobStore`].

use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::error::{LedgerError, Result};
use crate::ledger::{FileRecord, Ledger};
use crate::record::RecordReader;
use crate::storage::{load_ledger, store_ledger, BlobLocation, BlobStore};

/// Default object name of the ledger document.
pub const DEFAULT_LEDGER_OBJECT: &str = "unique_words.json";

/// Where to read the input file and where the ledger lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub input: BlobLocation,
    pub ledger: BlobLocation,
}

impl UpdateRequest {
    /// Validate and build a request.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Configuration` if any part is empty or the input
    /// and ledger share a bucket.
    pub fn new(input: BlobLocation, ledger: BlobLocation) -> Result<Self> {
        let parts = [
            ("Bucket name", &input.bucket),
            ("jsonl file", &input.name),
            ("output bucket name", &ledger.bucket),
            ("unique words file", &ledger.name),
        ];
        for (what, value) in parts {
            if value.trim().is_empty() {
                return Err(LedgerError::Configuration(format!("{} is required", what)));
            }
        }
        if input.bucket == ledger.bucket {
            return Err(LedgerError::Configuration(
                "Bucket and output bucket cannot be the same".to_string(),
            ));
        }
        Ok(Self { input, ledger })
    }
}

/// What to do when no ledger document exists yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingLedgerPolicy {
    /// Treat the ledger as empty and create it on write
    #[default]
    StartEmpty,
    /// Stop without reading the input or writing anything
    Abort,
}

/// Result of a single update run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The file was merged and the ledger rewritten
    Updated {
        record: FileRecord,
        total_words: usize,
    },
    /// The file is already listed; nothing was read or written
    AlreadyProcessed { filename: String },
    /// No ledger exists and the policy is `Abort`
    LedgerMissing { ledger: BlobLocation },
}

/// Runs the read-merge-write cycle against a blob store.
#[derive(Debug)]
pub struct LedgerUpdater<S> {
    store: S,
    missing_ledger: MissingLedgerPolicy,
}

impl<S: BlobStore> LedgerUpdater<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            missing_ledger: MissingLedgerPolicy::default(),
        }
    }

    pub fn with_missing_ledger(mut self, policy: MissingLedgerPolicy) -> Self {
        self.missing_ledger = policy;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Merge `request.input` into the ledger at `request.ledger`.
    ///
    /// The ledger is only written after the whole input has been merged, so a
    /// malformed record or failed read leaves the stored ledger untouched.
    pub fn run(&self, request: &UpdateRequest) -> Result<UpdateOutcome> {
        let span = info_span!("update", input = %request.input, ledger = %request.ledger);
        let _enter = span.enter();

        let mut ledger = match load_ledger(&self.store, &request.ledger)? {
            Some(ledger) => ledger,
            None => match self.missing_ledger {
                MissingLedgerPolicy::StartEmpty => {
                    info!("No ledger found, starting with an empty one");
                    Ledger::default()
                }
                MissingLedgerPolicy::Abort => {
                    warn!("No ledger found, skipping update");
                    return Ok(UpdateOutcome::LedgerMissing {
                        ledger: request.ledger.clone(),
                    });
                }
            },
        };

        let filename = request.input.name.as_str();
        if ledger.contains_file(filename) {
            info!("File has already been processed");
            return Ok(UpdateOutcome::AlreadyProcessed {
                filename: filename.to_string(),
            });
        }

        let bytes = self.store.read(&request.input)?;
        let record = ledger.merge_file(filename, RecordReader::from_bytes(bytes.as_slice()))?;
        store_ledger(&self.store, &request.ledger, &ledger)?;

        info!(
            new_words = record.new_words,
            total_words = ledger.word_count(),
            "Ledger updated"
        );
        Ok(UpdateOutcome::Updated {
            record,
            total_words: ledger.word_count(),
        })
    }
}
