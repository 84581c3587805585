//! Restore chain resolution
//!
//! A [`ChainResolver`] answers two questions against a remote: "which backup
//! is this?" and "what must be restored to reproduce it?". Every call lists
//! the remote again, so results always reflect the current remote state.
//!
//! ## Chain order
//!
//! A [`Chain`] is newest first: the requested backup, then each older
//! incremental, ending with the full backup the run starts from.
//!
//! ```text
//! catalog:  a(full)  b(incr)  c(incr)  d(full)  e(incr)
//! chain(c): c -> b -> a
//! chain(e): e -> d
//! ```
//!
//! Restore executors apply backups oldest first; use
//! [`Chain::restore_order`] for that.
//!
//! ## Examples
//!
//! ```rust
//! use snapchain::remote::MemoryRemote;
//! use snapchain::resolver::ChainResolver;
//! use snapchain::types::Selector;
//!
//! let remote = MemoryRemote::new(["a.index.full", "b.index.incr", "c.index.incr"]);
//! let resolver = ChainResolver::new(remote);
//!
//! let chain = resolver.find_chain(&Selector::Latest)?;
//! assert_eq!(chain.names(), vec!["c", "b", "a"]);
//! # Ok::<(), snapchain::SnapchainError>(())
//! ```

use crate::catalog::Catalog;
use crate::error::Result;
use crate::remote::RemoteLister;
use crate::types::{Backup, CatalogOrder, Selector, SnapchainConfig};
use serde::Serialize;
use tracing::debug;

/// Backups needed to restore a target, newest first
///
/// Always holds at least one backup and always ends with a full backup.
/// Only the resolver constructs chains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chain {
    backups: Vec<Backup>,
    /// Catalog position of the full backup the chain starts from
    base_index: usize,
    /// Catalog position of the requested backup
    target_index: usize,
}

impl Chain {
    pub(crate) fn new(backups: Vec<Backup>, base_index: usize, target_index: usize) -> Self {
        debug_assert!(!backups.is_empty());
        debug_assert!(backups.last().is_some_and(Backup::is_full));
        debug_assert_eq!(backups.len(), target_index - base_index + 1);
        Self {
            backups,
            base_index,
            target_index,
        }
    }

    /// The requested backup
    pub fn target(&self) -> &Backup {
        &self.backups[0]
    }

    /// The full backup the chain starts from
    pub fn base(&self) -> &Backup {
        &self.backups[self.backups.len() - 1]
    }

    /// Catalog position of the requested backup
    pub fn target_index(&self) -> usize {
        self.target_index
    }

    /// Catalog position of the base full backup
    pub fn base_index(&self) -> usize {
        self.base_index
    }

    /// Backups newest first
    pub fn backups(&self) -> &[Backup] {
        &self.backups
    }

    /// Number of backups in the chain
    pub fn len(&self) -> usize {
        self.backups.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.backups.is_empty()
    }

    /// Iterate newest first
    pub fn iter(&self) -> std::slice::Iter<'_, Backup> {
        self.backups.iter()
    }

    /// Names newest first
    pub fn names(&self) -> Vec<&str> {
        self.backups.iter().map(|b| b.name.as_str()).collect()
    }

    /// Iterate oldest first, the order a restore applies backups in
    pub fn restore_order(&self) -> impl Iterator<Item = &Backup> {
        self.backups.iter().rev()
    }

    /// Consume into oldest-first order
    pub fn into_restore_order(self) -> Vec<Backup> {
        let mut backups = self.backups;
        backups.reverse();
        backups
    }

    /// Counts for display
    pub fn summary(&self) -> ChainSummary {
        ChainSummary {
            target: self.target().name.clone(),
            base: self.base().name.clone(),
            incrementals: self.backups.iter().filter(|b| b.is_incremental()).count(),
            total: self.backups.len(),
        }
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a Backup;
    type IntoIter = std::slice::Iter<'a, Backup>;

    fn into_iter(self) -> Self::IntoIter {
        self.backups.iter()
    }
}

/// Short description of a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainSummary {
    /// Requested backup name
    pub target: String,
    /// Base full backup name
    pub base: String,
    /// Number of incrementals applied on top of the base
    pub incrementals: usize,
    /// Total backups in the chain
    pub total: usize,
}

/// Resolves backups and restore chains against a remote
///
/// Holds no catalog between calls. It is `Send + Sync` whenever the remote
/// is, and concurrent calls are as safe as the remote's listing.
#[derive(Debug, Clone)]
pub struct ChainResolver<R> {
    remote: R,
    order: CatalogOrder,
}

impl<R: RemoteLister> ChainResolver<R> {
    /// Resolver trusting the remote's listing order
    pub fn new(remote: R) -> Self {
        Self {
            remote,
            order: CatalogOrder::default(),
        }
    }

    /// The remote being listed
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Catalog ordering mode
    pub fn order(&self) -> CatalogOrder {
        self.order
    }

    /// List the remote and build a fresh catalog
    pub fn catalog(&self) -> Result<Catalog> {
        Catalog::fetch(&self.remote, self.order)
    }

    /// Find a single backup by exact name
    ///
    /// Returns the record only; use [`find_chain`](Self::find_chain) for
    /// everything needed to restore it.
    ///
    /// # Errors
    ///
    /// - [`SnapchainError::Listing`](crate::SnapchainError::Listing) if the
    ///   remote cannot be listed
    /// - [`SnapchainError::BackupNotFound`](crate::SnapchainError::BackupNotFound)
    ///   if no backup has that name
    pub fn find_backup(&self, name: &str) -> Result<Backup> {
        let catalog = self.catalog()?;
        let backup = catalog.find(name)?.clone();
        debug!("Found backup {}", backup);
        Ok(backup)
    }

    /// Find a backup and every predecessor down to its full base
    ///
    /// # Errors
    ///
    /// - [`SnapchainError::Listing`](crate::SnapchainError::Listing) if the
    ///   remote cannot be listed
    /// - [`SnapchainError::BackupNotFound`](crate::SnapchainError::BackupNotFound)
    ///   if nothing matches the selector
    /// - [`SnapchainError::InvalidChain`](crate::SnapchainError::InvalidChain)
    ///   if the match has no full backup before it
    pub fn find_chain(&self, selector: &Selector) -> Result<Chain> {
        let catalog = self.catalog()?;
        let chain = catalog.resolve_chain(selector)?;

        debug!(
            "Resolved {} to {} backups ({} .. {})",
            selector,
            chain.len(),
            chain.target().name,
            chain.base().name
        );
        Ok(chain)
    }
}

/// Builder for [`ChainResolver`]
///
/// # Examples
///
/// ```rust
/// use snapchain::remote::MemoryRemote;
/// use snapchain::resolver::ResolverBuilder;
/// use snapchain::types::CatalogOrder;
///
/// let resolver = ResolverBuilder::new()
///     .order(CatalogOrder::Listing)
///     .build(MemoryRemote::new(["a.index.full"]));
/// assert_eq!(resolver.find_backup("a")?.name, "a");
/// # Ok::<(), snapchain::SnapchainError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResolverBuilder {
    order: CatalogOrder,
}

impl ResolverBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the builder from a config file's settings
    pub fn from_config(config: &SnapchainConfig) -> Self {
        Self {
            order: config.order,
        }
    }

    /// Set how the catalog orders backups
    pub fn order(mut self, order: CatalogOrder) -> Self {
        self.order = order;
        self
    }

    /// Build a resolver over `remote`
    pub fn build<R: RemoteLister>(self, remote: R) -> ChainResolver<R> {
        ChainResolver {
            remote,
            order: self.order,
        }
    }
}
