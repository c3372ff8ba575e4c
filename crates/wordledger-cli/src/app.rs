//! Application context for the Word Ledger CLI.
//!
//! Bundles CLI arguments with the loaded config file and builds the blob
//! store the commands run against.

use std::path::PathBuf;

use tracing::debug;
use wordledger_core::storage::{BlobStore, LocalBlobStore, ObjectBlobStore};
use wordledger_core::LedgerError;

use crate::cli::Cli;
use crate::config::{default_config_path, read_config, StorageBackend, WordLedgerConfig};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: WordLedgerConfig,
}

impl<'a> AppContext<'a> {
    /// Load the config file and build a context.
    ///
    /// An explicit `--config` path must exist; the default path is optional.
    pub fn load(cli: &'a Cli) -> anyhow::Result<Self> {
        let config = match &cli.config {
            Some(path) => read_config(path)?,
            None => {
                let path = default_config_path()?;
                if path.exists() {
                    read_config(&path)?
                } else {
                    debug!(path = %path.display(), "No config file, using defaults");
                    WordLedgerConfig::default()
                }
            }
        };
        Ok(Self { cli, config })
    }

    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn config(&self) -> &WordLedgerConfig {
        &self.config
    }

    /// Build the blob store selected by `--local-root` or the config file.
    pub fn open_store(&self) -> anyhow::Result<Box<dyn BlobStore>> {
        if let Some(root) = &self.cli.local_root {
            return Ok(local_store(root.clone()));
        }
        match self.config.storage.backend {
            StorageBackend::Local => {
                let root = self.config.storage.root.as_deref().ok_or_else(|| {
                    LedgerError::Configuration(
                        "storage.root is required for the local backend".to_string(),
                    )
                })?;
                Ok(local_store(PathBuf::from(root)))
            }
            StorageBackend::Gcs => {
                debug!("Using Google Cloud Storage");
                Ok(Box::new(ObjectBlobStore::gcs()?))
            }
        }
    }
}

fn local_store(root: PathBuf) -> Box<dyn BlobStore> {
    debug!(root = %root.display(), "Using local blob storage");
    Box::new(LocalBlobStore::new(root))
}
