//! Local filesystem blob store.
//!
//! Each bucket is a directory under a root; object names map to relative
//! paths inside it. Useful for development and for tests.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::traits::BlobStore;
use super::types::BlobLocation;
use crate::error::{LedgerError, Result};
use crate::fs::write_atomic;

/// Blob store rooted at a local directory.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
}

impl LocalBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Filesystem path for a location.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Storage` if the bucket or object name would
    /// escape the root (absolute paths, `..`).
    pub fn path_for(&self, location: &BlobLocation) -> Result<PathBuf> {
        let mut path = self.root.clone();
        for part in [location.bucket.as_str(), location.name.as_str()] {
            let relative = Path::new(part);
            let clean = !part.is_empty()
                && relative
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)));
            if !clean {
                return Err(LedgerError::Storage(format!(
                    "Invalid location '{}'",
                    location
                )));
            }
            path.push(relative);
        }
        Ok(path)
    }
}

impl BlobStore for LocalBlobStore {
    fn exists(&self, location: &BlobLocation) -> Result<bool> {
        Ok(self.path_for(location)?.is_file())
    }

    fn read(&self, location: &BlobLocation) -> Result<Vec<u8>> {
        let path = self.path_for(location)?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LedgerError::NotFound(location.to_string()),
            _ => LedgerError::Storage(format!("Failed to read {}: {}", location, e)),
        })
    }

    fn write(&self, location: &BlobLocation, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(location)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LedgerError::Storage(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        write_atomic(&path, bytes)
            .map_err(|e| LedgerError::Storage(format!("Failed to write {}: {}", location, e)))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote local object");
        Ok(())
    }
}
