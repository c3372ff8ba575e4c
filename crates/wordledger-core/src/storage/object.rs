//! Cloud object storage backend.
//!
//! Wraps [`object_store::ObjectStore`] behind the synchronous [`BlobStore`]
//! trait. Each bucket gets its own client, created on first use and cached.
//! Calls run to completion on a private current-thread runtime, so this type
//! must not be used from inside another tokio runtime.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{ObjectStore, PutPayload};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use super::traits::BlobStore;
use super::types::BlobLocation;
use crate::error::{LedgerError, Result};

type Connector = Box<dyn Fn(&str) -> Result<Arc<dyn ObjectStore>> + Send + Sync>;

/// Blob store backed by `object_store` clients, one per bucket.
pub struct ObjectBlobStore {
    scheme: &'static str,
    runtime: Runtime,
    connect: Connector,
    buckets: Mutex<HashMap<String, Arc<dyn ObjectStore>>>,
}

impl fmt::Debug for ObjectBlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectBlobStore<{}>", self.scheme)
    }
}

impl ObjectBlobStore {
    /// Google Cloud Storage, configured from the `GOOGLE_*` environment
    /// (application default credentials or `GOOGLE_SERVICE_ACCOUNT_KEY`).
    pub fn gcs() -> Result<Self> {
        Self::with_connector("gs", |bucket| {
            let store = GoogleCloudStorageBuilder::from_env()
                .with_bucket_name(bucket)
                .build()
                .map_err(|e| {
                    LedgerError::Configuration(format!("GCS client for bucket '{}': {}", bucket, e))
                })?;
            Ok(Arc::new(store) as Arc<dyn ObjectStore>)
        })
    }

    /// Process-local in-memory buckets.
    pub fn in_memory() -> Result<Self> {
        Self::with_connector("memory", |_bucket| {
            Ok(Arc::new(InMemory::new()) as Arc<dyn ObjectStore>)
        })
    }

    /// Build a store that creates per-bucket clients with `connect`.
    pub fn with_connector<F>(scheme: &'static str, connect: F) -> Result<Self>
    where
        F: Fn(&str) -> Result<Arc<dyn ObjectStore>> + Send + Sync + 'static,
    {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LedgerError::Storage(format!("Failed to start I/O runtime: {}", e)))?;
        Ok(Self {
            scheme,
            runtime,
            connect: Box::new(connect),
            buckets: Mutex::new(HashMap::new()),
        })
    }

    fn bucket(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        let mut buckets = self
            .buckets
            .lock()
            .map_err(|_| LedgerError::Storage("Bucket cache lock poisoned".to_string()))?;
        if let Some(store) = buckets.get(bucket) {
            return Ok(Arc::clone(store));
        }
        debug!(scheme = self.scheme, bucket, "Connecting to bucket");
        let store = (self.connect)(bucket)?;
        buckets.insert(bucket.to_string(), Arc::clone(&store));
        Ok(store)
    }

    fn resolve(&self, location: &BlobLocation) -> Result<(Arc<dyn ObjectStore>, Path)> {
        let path = Path::parse(&location.name).map_err(|e| {
            LedgerError::Storage(format!("Invalid object name '{}': {}", location.name, e))
        })?;
        Ok((self.bucket(&location.bucket)?, path))
    }
}

impl BlobStore for ObjectBlobStore {
    fn exists(&self, location: &BlobLocation) -> Result<bool> {
        let (store, path) = self.resolve(location)?;
        match self.runtime.block_on(store.head(&path)) {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn read(&self, location: &BlobLocation) -> Result<Vec<u8>> {
        let (store, path) = self.resolve(location)?;
        let bytes = self
            .runtime
            .block_on(async { store.get(&path).await?.bytes().await })
            .map_err(|e| match e {
                object_store::Error::NotFound { .. } => LedgerError::NotFound(location.to_string()),
                e => LedgerError::Storage(format!("Failed to read {}: {}", location, e)),
            })?;
        debug!(object = %location, bytes = bytes.len(), "Read object");
        Ok(bytes.to_vec())
    }

    fn write(&self, location: &BlobLocation, bytes: &[u8]) -> Result<()> {
        let (store, path) = self.resolve(location)?;
        let payload = PutPayload::from(bytes.to_vec());
        self.runtime
            .block_on(store.put(&path, payload))
            .map_err(|e| LedgerError::Storage(format!("Failed to write {}: {}", location, e)))?;
        debug!(object = %location, bytes = bytes.len(), "Wrote object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_round_trip() {
        let store = ObjectBlobStore::in_memory().unwrap();
        let loc = BlobLocation::new("out", "unique_words.json");

        assert!(!store.exists(&loc).unwrap());
        store.write(&loc, b"{}").unwrap();
        assert!(store.exists(&loc).unwrap());
        assert_eq!(store.read(&loc).unwrap(), b"{}");
    }

    #[test]
    fn test_buckets_are_isolated() {
        let store = ObjectBlobStore::in_memory().unwrap();
        store
            .write(&BlobLocation::new("a", "1.jsonl"), b"x")
            .unwrap();

        assert!(!store.exists(&BlobLocation::new("b", "1.jsonl")).unwrap());
    }

    #[test]
    fn test_read_missing_object_fails() {
        let store = ObjectBlobStore::in_memory().unwrap();
        let err = store
            .read(&BlobLocation::new("a", "missing.jsonl"))
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[test]
    fn test_invalid_object_name() {
        let store = ObjectBlobStore::in_memory().unwrap();
        assert!(store.exists(&BlobLocation::new("a", "a//b")).is_err());
    }
}
