//! Error types for ledgit.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for ledgit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A repository already exists at the specified path.
    #[error("repository already initialized: {}", .0.display())]
    AlreadyInitialized(PathBuf),

    /// The specified path is not inside a ledgit repository.
    #[error("not a ledgit repository: {}", .0.display())]
    NotARepository(PathBuf),

    /// The requested object was not found.
    #[error("object not found: {0}")]
    ObjectNotFound(String),

    /// Stored bytes could not be decoded into the expected shape.
    #[error("corrupt object {digest}: {reason}")]
    CorruptData {
        /// The digest (or file name) of the offending data.
        digest: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The specified path was not found.
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// A path cannot be recorded in the index.
    #[error("invalid path {}: {reason}", .path.display())]
    InvalidPath {
        /// The offending path.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// The provided string is not a usable digest.
    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    /// A configuration value could not be interpreted.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Another process holds the repository lock.
    #[error("repository is locked: {}", .0.display())]
    Locked(PathBuf),
}

impl Error {
    /// Builds a `CorruptData` error.
    pub(crate) fn corrupt(digest: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::CorruptData {
            digest: digest.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error means "the thing asked for does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ObjectNotFound(_) | Error::PathNotFound(_))
    }
}

/// Result type alias for ledgit operations.
pub type Result<T> = std::result::Result<T, Error>;
