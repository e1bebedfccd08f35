//! Error types for reference operations.

use folio_types::ObjectId;
use thiserror::Error;

/// Errors that can occur during reference operations.
#[derive(Debug, Error)]
pub enum RefError {
    /// Head moved since the caller observed it.
    #[error("stale head: expected {expected:?}, found {actual:?}")]
    StaleHead {
        expected: Option<ObjectId>,
        actual: Option<ObjectId>,
    },

    /// The stored ref could not be parsed.
    #[error("corrupt ref {name}: {reason}")]
    Corrupt { name: String, reason: String },

    /// I/O error during file-based ref operations.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for ref operations.
pub type Result<T> = std::result::Result<T, RefError>;
