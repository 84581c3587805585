//! Common types used throughout snapchain
//!
//! This module contains the backup record, the target selector, listing
//! objects as returned by a remote, and the configuration structure.

use crate::error::{Result, SnapchainError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Object suffix marking a full backup index
pub const FULL_SUFFIX: &str = ".index.full";

/// Object suffix marking an incremental backup index
pub const INCREMENTAL_SUFFIX: &str = ".index.incr";

/// Selector keyword for the most recently created backup
pub const LATEST: &str = "latest";

/// Kind of a stored backup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupKind {
    /// Self-contained snapshot
    Full,
    /// Snapshot relative to the preceding backup
    Incremental,
}

impl BackupKind {
    /// Object name suffix used for this kind on the remote
    pub fn suffix(self) -> &'static str {
        match self {
            BackupKind::Full => FULL_SUFFIX,
            BackupKind::Incremental => INCREMENTAL_SUFFIX,
        }
    }

    /// Short label for display
    pub fn label(self) -> &'static str {
        match self {
            BackupKind::Full => "full",
            BackupKind::Incremental => "incr",
        }
    }
}

impl fmt::Display for BackupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single backup known to the remote
///
/// Backups carry no payload. They are created once while parsing a listing
/// and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backup {
    /// Backup name with the index suffix removed
    pub name: String,
    /// Full or incremental
    pub kind: BackupKind,
    /// Modification time reported by the remote, when it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

impl Backup {
    /// Create a backup record without listing metadata
    pub fn new(name: impl Into<String>, kind: BackupKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modified: None,
        }
    }

    /// Create a full backup record
    pub fn full(name: impl Into<String>) -> Self {
        Self::new(name, BackupKind::Full)
    }

    /// Create an incremental backup record
    pub fn incremental(name: impl Into<String>) -> Self {
        Self::new(name, BackupKind::Incremental)
    }

    /// Whether this is a full backup
    pub fn is_full(&self) -> bool {
        self.kind == BackupKind::Full
    }

    /// Whether this is an incremental backup
    pub fn is_incremental(&self) -> bool {
        self.kind == BackupKind::Incremental
    }

    /// Name of the index object this backup is stored under
    pub fn object_name(&self) -> String {
        format!("{}{}", self.name, self.kind.suffix())
    }
}

impl fmt::Display for Backup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

/// Which backup a resolution targets
///
/// Parsed from user input: the literal `latest` selects the last backup in
/// the catalog, anything else is an exact backup name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Most recently created backup
    Latest,
    /// Backup with exactly this name
    Named(String),
}

impl Selector {
    /// Select a backup by name
    pub fn named(name: impl Into<String>) -> Self {
        Selector::Named(name.into())
    }

    /// Whether the backup at `index` in a catalog of `len` entries matches
    ///
    /// `Latest` also matches a backup literally named `latest`, so a catalog
    /// holding one resolves to it before reaching the final entry.
    pub fn matches(&self, backup: &Backup, index: usize, len: usize) -> bool {
        match self {
            Selector::Named(name) => backup.name == *name,
            Selector::Latest => backup.name == LATEST || index + 1 == len,
        }
    }
}

impl FromStr for Selector {
    type Err = SnapchainError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Err(SnapchainError::InvalidSelector("empty backup name".to_string())),
            LATEST => Ok(Selector::Latest),
            name => Ok(Selector::Named(name.to_string())),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Latest => f.write_str(LATEST),
            Selector::Named(name) => f.write_str(name),
        }
    }
}

/// One entry of a remote listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    /// Object name as stored on the remote
    pub name: String,
    /// Modification time, if the remote reports one
    pub modified: Option<DateTime<Utc>>,
}

impl RemoteObject {
    /// Listing entry without metadata
    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modified: None,
        }
    }
}

/// How the catalog orders backups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogOrder {
    /// Trust the order the remote listed objects in
    #[default]
    Listing,
    /// Sort by the modification time the remote reports
    Modified,
}

impl FromStr for CatalogOrder {
    type Err = SnapchainError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "listing" => Ok(CatalogOrder::Listing),
            "modified" => Ok(CatalogOrder::Modified),
            other => Err(SnapchainError::invalid_configuration(format!(
                "unknown catalog order '{}' (expected 'listing' or 'modified')",
                other
            ))),
        }
    }
}

/// Configuration for a snapchain resolver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapchainConfig {
    /// Directory holding the backup index objects
    pub remote_path: PathBuf,
    /// Catalog ordering mode
    #[serde(default)]
    pub order: CatalogOrder,
    /// snapchain version that wrote this config
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl SnapchainConfig {
    /// Create a config for a directory remote
    pub fn new(remote_path: impl Into<PathBuf>) -> Self {
        Self {
            remote_path: remote_path.into(),
            order: CatalogOrder::default(),
            version: default_version(),
        }
    }

    /// Load a config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SnapchainConfig = serde_json::from_str(&content)?;
        if config.remote_path.as_os_str().is_empty() {
            return Err(SnapchainError::invalid_configuration("remote_path must not be empty"));
        }
        Ok(config)
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
