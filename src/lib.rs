//! # snapchain - Restore chains for incremental backups
//!
//! Resolves which stored backups must be restored together to reproduce a
//! given backup, from nothing more than a listing of object names on the
//! remote store.
//!
//! ## Overview
//!
//! Backups are stored as index objects named `<name>.index.full` or
//! `<name>.index.incr`. An incremental backup depends on every backup back to
//! the nearest full backup before it. snapchain:
//!
//! - Parses a remote listing into a time-ordered [`Catalog`]
//! - Finds a single backup by name
//! - Resolves the [`Chain`] for a name or for `latest`
//!
//! Moving bytes, encryption and retention are left to the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use snapchain::{ChainResolver, DirectoryRemote, Selector};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = ChainResolver::new(DirectoryRemote::new("/srv/backups"));
//!
//! for backup in resolver.catalog()?.iter() {
//!     println!("{}", backup.name);
//! }
//!
//! let chain = resolver.find_chain(&Selector::Latest)?;
//! for backup in chain.restore_order() {
//!     println!("apply {}", backup);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, SnapchainError>`. A missing target
//! ([`SnapchainError::BackupNotFound`]), a target with no full backup before
//! it ([`SnapchainError::InvalidChain`]) and a failed listing
//! ([`SnapchainError::Listing`]) are distinct variants.
//!
//! ## Module Organization
//!
//! - [`catalog`]: Listing parser and chain walk
//! - [`resolver`]: Resolver, chain type and builder
//! - [`remote`]: Remote listing trait and implementations
//! - [`types`]: Backup records, selectors and configuration
//! - [`error`]: Error types and handling

pub mod catalog;
pub mod error;
pub mod remote;
pub mod resolver;
pub mod types;

pub use catalog::{parse_object_name, Catalog};
pub use error::{Result, SnapchainError};
pub use remote::{DirectoryRemote, MemoryRemote, RemoteLister};
pub use resolver::{Chain, ChainResolver, ChainSummary, ResolverBuilder};
pub use types::*;
