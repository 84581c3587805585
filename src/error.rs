//! Error types for snapchain
//!
//! Every fallible operation in the crate returns [`SnapchainError`]. Three
//! kinds matter to callers deciding what to do with a failed resolution:
//!
//! - [`SnapchainError::Listing`]: the remote could not be listed
//! - [`SnapchainError::BackupNotFound`]: the target is absent from the catalog
//! - [`SnapchainError::InvalidChain`]: the target exists but no full backup
//!   precedes it
//!
//! None of them carry a partial result.

use thiserror::Error;

/// Type alias for Results in snapchain
pub type Result<T> = std::result::Result<T, SnapchainError>;

/// Main error type for all snapchain operations
#[derive(Debug, Error)]
pub enum SnapchainError {
    /// I/O errors while talking to a directory-backed remote or config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error raised by a remote listing implementation
    #[error("Remote error: {0}")]
    Remote(String),

    /// Listing the remote failed; wraps the remote's own error
    #[error("{context}: {source}")]
    Listing {
        /// What was being listed when the failure happened
        context: String,
        /// Underlying failure
        #[source]
        source: Box<SnapchainError>,
    },

    /// No backup matched the requested target
    #[error("Backup not found: {0}")]
    BackupNotFound(String),

    /// The target matched but its chain has no full backup to start from
    #[error("Invalid chain for {target}: {reason}")]
    InvalidChain {
        /// Name of the matched backup
        target: String,
        /// Why the chain could not be built
        reason: String,
    },

    /// Target selector could not be parsed
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl SnapchainError {
    /// Create a remote error with a custom message
    pub fn remote(msg: impl Into<String>) -> Self {
        SnapchainError::Remote(msg.into())
    }

    /// Wrap a listing failure with context
    pub fn listing(context: impl Into<String>, source: SnapchainError) -> Self {
        SnapchainError::Listing {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Create an invalid chain error for `target`
    pub fn invalid_chain(target: impl Into<String>, reason: impl Into<String>) -> Self {
        SnapchainError::InvalidChain {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error with a custom message
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        SnapchainError::InvalidConfiguration(msg.into())
    }

    /// Check if this error means the target is simply absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, SnapchainError::BackupNotFound(_))
    }

    /// Check if this error came from the remote listing call
    pub fn is_listing_failure(&self) -> bool {
        matches!(self, SnapchainError::Listing { .. })
    }

    /// Check if this error means the stored chain is unusable for restore
    pub fn is_invalid_chain(&self) -> bool {
        matches!(self, SnapchainError::InvalidChain { .. })
    }

    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            SnapchainError::BackupNotFound(target) => {
                format!("Backup '{}' not found. Use 'snapchain list' to see available backups.", target)
            }
            SnapchainError::InvalidChain { target, .. } => {
                format!(
                    "Backup '{}' cannot be restored: no full backup precedes it in the catalog. \
                     The remote may be missing its base backup.",
                    target
                )
            }
            SnapchainError::Listing { .. } => {
                format!("{}. Check that the remote is reachable and try again.", self)
            }
            _ => self.to_string(),
        }
    }
}
