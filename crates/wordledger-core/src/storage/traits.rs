//! Blob store trait definition.
//!
//! The `BlobStore` trait is the only view the updater has of cloud storage.
//! Backends live in sibling modules; the merge logic never touches them.

use tracing::{debug, info};

use super::types::BlobLocation;
use crate::error::Result;
use crate::ledger::Ledger;

/// Bucket-addressed object storage.
///
/// All calls are synchronous. Writes replace the whole object; there is no
/// conditional write, so concurrent writers follow last-writer-wins.
pub trait BlobStore {
    /// Whether an object exists at `location`.
    fn exists(&self, location: &BlobLocation) -> Result<bool>;

    /// Read the full contents of an object.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the object is missing or unreadable.
    fn read(&self, location: &BlobLocation) -> Result<Vec<u8>>;

    /// Create or overwrite an object.
    fn write(&self, location: &BlobLocation, bytes: &[u8]) -> Result<()>;
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn exists(&self, location: &BlobLocation) -> Result<bool> {
        (**self).exists(location)
    }

    fn read(&self, location: &BlobLocation) -> Result<Vec<u8>> {
        (**self).read(location)
    }

    fn write(&self, location: &BlobLocation, bytes: &[u8]) -> Result<()> {
        (**self).write(location, bytes)
    }
}

impl<S: BlobStore + ?Sized> BlobStore for Box<S> {
    fn exists(&self, location: &BlobLocation) -> Result<bool> {
        (**self).exists(location)
    }

    fn read(&self, location: &BlobLocation) -> Result<Vec<u8>> {
        (**self).read(location)
    }

    fn write(&self, location: &BlobLocation, bytes: &[u8]) -> Result<()> {
        (**self).write(location, bytes)
    }
}

/// Load the ledger stored at `location`.
///
/// Returns `Ok(None)` when no ledger has been written yet.
pub fn load_ledger<S: BlobStore + ?Sized>(store: &S, location: &BlobLocation) -> Result<Option<Ledger>> {
    if !store.exists(location)? {
        debug!(ledger = %location, "No ledger stored yet");
        return Ok(None);
    }
    let bytes = store.read(location)?;
    let ledger = Ledger::from_json(&bytes)?;
    debug!(
        ledger = %location,
        files = ledger.files.len(),
        words = ledger.word_count(),
        "Loaded ledger"
    );
    Ok(Some(ledger))
}

/// Overwrite the ledger stored at `location`.
pub fn store_ledger<S: BlobStore + ?Sized>(
    store: &S,
    location: &BlobLocation,
    ledger: &Ledger,
) -> Result<()> {
    let bytes = ledger.to_json()?;
    store.write(location, &bytes)?;
    info!(ledger = %location, bytes = bytes.len(), "Stored ledger");
    Ok(())
}
