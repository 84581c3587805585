//! Backup catalog built from a remote listing
//!
//! The catalog is the time-ordered view of every backup on the remote. It is
//! rebuilt from a fresh listing for each operation and never cached.
//!
//! ## Object names
//!
//! Each backup is stored under an index object whose suffix encodes its kind:
//!
//! ```text
//! 20240101-0300.index.full    full backup "20240101-0300"
//! 20240102-0300.index.incr    incremental backup "20240102-0300"
//! 20240102-0300.data.0001     ignored
//! ```
//!
//! [`parse_object_name`] is the only place suffixes are inspected. Everything
//! downstream works on [`BackupKind`].
//!
//! ## Examples
//!
//! ```rust
//! use snapchain::catalog::Catalog;
//!
//! let catalog = Catalog::from_names(["a.index.full", "b.index.incr", "notes.txt"]);
//! assert_eq!(catalog.names(), vec!["a", "b"]);
//! ```

use crate::error::{Result, SnapchainError};
use crate::remote::RemoteLister;
use crate::resolver::Chain;
use crate::types::{Backup, BackupKind, CatalogOrder, RemoteObject, Selector};
use tracing::{debug, trace, warn};

/// Split an object name into backup name and kind
///
/// Returns `None` for names without a recognized index suffix, and for
/// names that are nothing but the suffix.
pub fn parse_object_name(name: &str) -> Option<(&str, BackupKind)> {
    [BackupKind::Full, BackupKind::Incremental]
        .into_iter()
        .find_map(|kind| {
            name.strip_suffix(kind.suffix())
                .filter(|base| !base.is_empty())
                .map(|base| (base, kind))
        })
}

/// Ordered sequence of backups, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    backups: Vec<Backup>,
}

impl Catalog {
    /// Parse a listing of object names, keeping their order
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let backups = names
            .into_iter()
            .filter_map(|name| parse_backup(name.as_ref(), None))
            .collect::<Vec<_>>();

        debug!("Catalog built with {} backups", backups.len());
        Self { backups }
    }

    /// Parse listing objects and order them as requested
    ///
    /// # Errors
    ///
    /// With [`CatalogOrder::Modified`], fails if any backup index object has
    /// no modification time, since its position cannot be known.
    pub fn from_objects(objects: Vec<RemoteObject>, order: CatalogOrder) -> Result<Self> {
        let mut backups = objects
            .iter()
            .filter_map(|object| parse_backup(&object.name, object.modified))
            .collect::<Vec<_>>();

        if order == CatalogOrder::Modified {
            if let Some(undated) = backups.iter().find(|b| b.modified.is_none()) {
                return Err(SnapchainError::invalid_configuration(format!(
                    "modified ordering requested but remote reported no modification time for {}",
                    undated.object_name()
                )));
            }
            backups.sort_by_key(|b| b.modified);
        }

        debug!("Catalog built with {} backups ({:?} order)", backups.len(), order);
        Ok(Self { backups })
    }

    /// List the remote and build a catalog from the result
    ///
    /// Modification times reported by the remote are kept on every backup,
    /// whichever order is used.
    ///
    /// # Errors
    ///
    /// Returns [`SnapchainError::Listing`] wrapping the remote's error if the
    /// listing call fails.
    pub fn fetch<R: RemoteLister + ?Sized>(remote: &R, order: CatalogOrder) -> Result<Self> {
        let objects = remote
            .list_objects()
            .map_err(|e| SnapchainError::listing("listing remote", e))?;
        Self::from_objects(objects, order)
    }

    /// Number of backups
    pub fn len(&self) -> usize {
        self.backups.len()
    }

    /// Whether the catalog holds no backups
    pub fn is_empty(&self) -> bool {
        self.backups.is_empty()
    }

    /// Backup at `index`
    pub fn get(&self, index: usize) -> Option<&Backup> {
        self.backups.get(index)
    }

    /// Most recently created backup
    pub fn latest(&self) -> Option<&Backup> {
        self.backups.last()
    }

    /// Iterate backups oldest first
    pub fn iter(&self) -> std::slice::Iter<'_, Backup> {
        self.backups.iter()
    }

    /// Backup names in catalog order
    pub fn names(&self) -> Vec<&str> {
        self.backups.iter().map(|b| b.name.as_str()).collect()
    }

    /// All backups as a slice
    pub fn backups(&self) -> &[Backup] {
        &self.backups
    }

    /// First backup named `name`
    pub fn find(&self, name: &str) -> Result<&Backup> {
        self.backups
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| SnapchainError::BackupNotFound(name.to_string()))
    }

    /// Resolve the restore chain for `selector`
    ///
    /// Scans oldest first, remembering the position of the most recent full
    /// backup. At the first match the chain is the contiguous run from the
    /// match back to that full backup, newest first.
    ///
    /// # Errors
    ///
    /// - [`SnapchainError::BackupNotFound`] if nothing matches
    /// - [`SnapchainError::InvalidChain`] if the match has no full backup at
    ///   or before it
    pub fn resolve_chain(&self, selector: &Selector) -> Result<Chain> {
        let len = self.backups.len();
        let mut last_full: Option<usize> = None;

        for (index, backup) in self.backups.iter().enumerate() {
            if backup.is_full() {
                last_full = Some(index);
            }

            if !selector.matches(backup, index, len) {
                continue;
            }

            let Some(base) = last_full else {
                warn!("Backup {} has no preceding full backup", backup.name);
                return Err(SnapchainError::invalid_chain(
                    &backup.name,
                    "no full backup precedes it",
                ));
            };

            let backups = self.backups[base..=index].iter().rev().cloned().collect();
            return Ok(Chain::new(backups, base, index));
        }

        Err(SnapchainError::BackupNotFound(selector.to_string()))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Backup;
    type IntoIter = std::slice::Iter<'a, Backup>;

    fn into_iter(self) -> Self::IntoIter {
        self.backups.iter()
    }
}

fn parse_backup(name: &str, modified: Option<chrono::DateTime<chrono::Utc>>) -> Option<Backup> {
    match parse_object_name(name) {
        Some((base, kind)) => Some(Backup {
            name: base.to_string(),
            kind,
            modified,
        }),
        None => {
            trace!("Ignoring unrecognized object {}", name);
            None
        }
    }
}
