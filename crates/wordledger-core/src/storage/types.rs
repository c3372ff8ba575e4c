//! Addressing types for the blob store layer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An object inside a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobLocation {
    /// Bucket name
    pub bucket: String,

    /// Object name within the bucket (may contain `/`)
    pub name: String,
}

impl BlobLocation {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for BlobLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.name)
    }
}
