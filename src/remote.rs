//! Remote listing collaborators
//!
//! The catalog never talks to storage directly. It asks a [`RemoteLister`]
//! for the names of stored objects and works from that listing alone.
//!
//! ## Ordering contract
//!
//! Implementations must return objects in creation-time order, oldest first.
//! The catalog trusts this order unless it is built with
//! [`CatalogOrder::Modified`](crate::types::CatalogOrder::Modified), in which
//! case the modification times from [`RemoteLister::list_objects`] are used
//! instead.
//!
//! Two implementations ship with the crate:
//!
//! - [`DirectoryRemote`]: a local directory used as the object store
//! - [`MemoryRemote`]: a fixed in-memory listing

use crate::error::{Result, SnapchainError};
use crate::types::RemoteObject;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::{trace, warn};
use walkdir::WalkDir;

/// Source of remote object names
///
/// A single blocking call that either returns the full listing or fails.
/// Retries, timeouts and authentication are the implementation's concern.
pub trait RemoteLister {
    /// List object names, oldest first
    fn list(&self) -> Result<Vec<String>>;

    /// List objects with whatever metadata the remote can provide
    ///
    /// The default implementation wraps [`list`](RemoteLister::list) and
    /// reports no modification times.
    fn list_objects(&self) -> Result<Vec<RemoteObject>> {
        Ok(self.list()?.into_iter().map(RemoteObject::from_name).collect())
    }
}

impl<R: RemoteLister + ?Sized> RemoteLister for &R {
    fn list(&self) -> Result<Vec<String>> {
        (**self).list()
    }

    fn list_objects(&self) -> Result<Vec<RemoteObject>> {
        (**self).list_objects()
    }
}

/// A local directory acting as the remote object store
///
/// Regular files directly inside the directory are the stored objects.
/// They are listed sorted by file name, which matches creation order when
/// backups are named by timestamp.
#[derive(Debug, Clone)]
pub struct DirectoryRemote {
    root: PathBuf,
}

impl DirectoryRemote {
    /// Use `root` as the object store
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn walk(&self) -> Result<Vec<RemoteObject>> {
        let mut objects = Vec::new();

        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                SnapchainError::remote(format!("reading {}: {}", self.root.display(), e))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str() else {
                warn!("Skipping non UTF-8 object name {:?}", entry.file_name());
                continue;
            };

            let modified = entry
                .metadata()
                .map_err(|e| SnapchainError::remote(format!("stat {}: {}", name, e)))?
                .modified()
                .ok()
                .map(DateTime::<Utc>::from);

            trace!("Listed object {}", name);
            objects.push(RemoteObject {
                name: name.to_string(),
                modified,
            });
        }

        Ok(objects)
    }
}

impl RemoteLister for DirectoryRemote {
    fn list(&self) -> Result<Vec<String>> {
        Ok(self.walk()?.into_iter().map(|o| o.name).collect())
    }

    fn list_objects(&self) -> Result<Vec<RemoteObject>> {
        self.walk()
    }
}

/// Fixed in-memory listing
#[derive(Debug, Clone, Default)]
pub struct MemoryRemote {
    objects: Vec<RemoteObject>,
}

impl MemoryRemote {
    /// Listing made of `names`, in the given order
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            objects: names.into_iter().map(RemoteObject::from_name).collect(),
        }
    }

    /// Listing made of objects carrying metadata
    pub fn with_objects(objects: Vec<RemoteObject>) -> Self {
        Self { objects }
    }

    /// Append an object to the end of the listing
    pub fn push(&mut self, object: RemoteObject) {
        self.objects.push(object);
    }
}

impl RemoteLister for MemoryRemote {
    fn list(&self) -> Result<Vec<String>> {
        Ok(self.objects.iter().map(|o| o.name.clone()).collect())
    }

    fn list_objects(&self) -> Result<Vec<RemoteObject>> {
        Ok(self.objects.clone())
    }
}
