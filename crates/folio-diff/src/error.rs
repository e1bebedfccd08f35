//! Error types for the diff crate.

/// Errors that can occur during diff operations.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Content is not UTF-8 text and cannot be diffed line by line.
    #[error("binary content cannot be diffed ({len} bytes)")]
    BinaryContent { len: usize },

    /// A hunk's context did not match the content it was applied to.
    #[error("patch conflict: hunk {hunk} does not apply (expected {expected:?} near line {line})")]
    PatchConflict {
        /// 1-based index of the failing hunk.
        hunk: usize,
        /// 1-based line where the hunk was expected to start.
        line: usize,
        /// First line the hunk expected to find there.
        expected: String,
    },

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] folio_store::StoreError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
