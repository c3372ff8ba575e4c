use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wordledger_core::LedgerError;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WordLedgerConfig {
    pub storage: StorageSection,
    pub buckets: BucketsSection,
    pub ledger: LedgerSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    pub backend: StorageBackend,
    /// Root directory for the local backend
    pub root: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketsSection {
    pub source: Option<String>,
    pub output: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerSection {
    /// Object name of the ledger in the output bucket
    pub object: Option<String>,
    /// Event handling skips the update when no ledger exists yet
    pub require_existing: bool,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Gcs,
    Local,
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<WordLedgerConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        LedgerError::Configuration(format!("Failed to read config {}: {}", path.display(), e))
    })?;
    let config = toml::from_str(&contents).map_err(|e| {
        LedgerError::Configuration(format!("Failed to parse config {}: {}", path.display(), e))
    })?;
    Ok(config)
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("wordledger"));
        }
    }
    Ok(home_dir()?.join(".config").join("wordledger"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
