//! Blob storage collaborators.
//!
//! The updater reads input files and the ledger document through the
//! [`BlobStore`] trait. Two backends are provided:
//!
//! - [`LocalBlobStore`]: buckets as directories under a local root
//! - [`ObjectBlobStore`]: Google Cloud Storage (or in-memory) via `object_store`

mod local;
mod object;
mod traits;
mod types;

pub use local::LocalBlobStore;
pub use object::ObjectBlobStore;
pub use traits::{load_ledger, store_ledger, BlobStore};
pub use types::BlobLocation;
