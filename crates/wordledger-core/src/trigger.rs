//! Storage-event entry point.
//!
//! Accepts a CloudEvent-shaped notification about an uploaded object and,
//! when it announces a completed upload of an input file, runs the updater
//! with the ledger kept in a separate output bucket.

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{LedgerError, Result};
use crate::storage::{BlobLocation, BlobStore};
use crate::updater::{
    LedgerUpdater, MissingLedgerPolicy, UpdateOutcome, UpdateRequest, DEFAULT_LEDGER_OBJECT,
};

/// Marker an object name must contain to count as an input file.
pub const INPUT_MARKER: &str = "jsonl";

/// Marker an event type must contain to count as a completed upload.
pub const FINALIZE_MARKER: &str = "finalize";

/// A storage notification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageEvent {
    /// Event type, e.g. `google.cloud.storage.object.v1.finalized`
    #[serde(rename = "type")]
    pub kind: String,

    pub data: ObjectData,
}

/// The object an event refers to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObjectData {
    pub bucket: String,
    pub name: String,
}

impl StorageEvent {
    /// Decode an event document.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| LedgerError::Configuration(format!("Invalid storage event: {}", e)))
    }

    pub fn is_finalize(&self) -> bool {
        self.kind.contains(FINALIZE_MARKER)
    }

    pub fn is_input_object(&self) -> bool {
        self.data.name.contains(INPUT_MARKER)
    }
}

/// Settings for the event entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerConfig {
    /// Bucket holding the ledger; must differ from the event's bucket
    pub output_bucket: Option<String>,

    /// Object name of the ledger inside `output_bucket`
    pub ledger_object: String,

    pub missing_ledger: MissingLedgerPolicy,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            output_bucket: None,
            ledger_object: DEFAULT_LEDGER_OBJECT.to_string(),
            missing_ledger: MissingLedgerPolicy::StartEmpty,
        }
    }
}

/// Why an event was not acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotFinalized,
    NotInputFile,
}

/// Result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    Ignored(IgnoreReason),
    Completed(UpdateOutcome),
}

/// Handle one storage event.
///
/// # Errors
///
/// Returns `LedgerError::Configuration` before any I/O if the output bucket
/// is unset or equals the event's bucket; otherwise errors from the update.
pub fn handle_event<S: BlobStore>(
    store: S,
    event: &StorageEvent,
    config: &TriggerConfig,
) -> Result<TriggerOutcome> {
    if !event.is_finalize() {
        debug!(kind = %event.kind, "Ignoring event that is not a finalized upload");
        return Ok(TriggerOutcome::Ignored(IgnoreReason::NotFinalized));
    }
    if !event.is_input_object() {
        debug!(name = %event.data.name, "Ignoring object that is not an input file");
        return Ok(TriggerOutcome::Ignored(IgnoreReason::NotInputFile));
    }

    let output_bucket = config
        .output_bucket
        .as_deref()
        .filter(|bucket| !bucket.trim().is_empty())
        .ok_or_else(|| LedgerError::Configuration("output bucket name is required".to_string()))?;
    let request = UpdateRequest::new(
        BlobLocation::new(event.data.bucket.as_str(), event.data.name.as_str()),
        BlobLocation::new(output_bucket, config.ledger_object.as_str()),
    )?;

    info!(bucket = %event.data.bucket, name = %event.data.name, "Handling upload event");
    let outcome = LedgerUpdater::new(store)
        .with_missing_ledger(config.missing_ledger)
        .run(&request)?;
    Ok(TriggerOutcome::Completed(outcome))
}
