//! Error types for wiki operations.

use folio_refs::RefError;
use folio_types::ObjectId;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by [`Wiki`](crate::Wiki) and the components behind it.
#[derive(Debug, Error)]
pub enum WikiError {
    /// The page does not exist at the requested revision.
    #[error("page {title:?} not found at revision {revision}")]
    PageNotFound { title: String, revision: ObjectId },

    /// No revision with this id exists.
    #[error("revision not found: {0}")]
    RevisionNotFound(ObjectId),

    /// The repository has no head yet.
    #[error("repository is not initialized")]
    NotInitialized,

    /// Head content diverged from what the reverted revision expects.
    #[error("cannot revert {revision} on {title:?}: hunk {hunk} does not apply near line {line} (expected {expected:?})")]
    PatchConflict {
        title: String,
        revision: ObjectId,
        hunk: usize,
        line: usize,
        expected: String,
    },

    /// Reverting would not change the page.
    #[error("reverting {revision} would not change {title:?}")]
    NoOpRevert { title: String, revision: ObjectId },

    /// An edit must change the page.
    #[error("no changes to {0:?}")]
    NoChanges(String),

    /// The renderer rejected the page.
    #[error("render failure: {0}")]
    RenderFailure(#[from] folio_render::RenderError),

    /// The revision is not a single-page content edit.
    #[error("cannot revert {revision}: {reason}")]
    UnsupportedRevert { revision: ObjectId, reason: String },

    /// Head moved between reading it and committing against it.
    #[error("head moved concurrently (expected {expected:?}, found {actual:?}); retry")]
    ConcurrentUpdate {
        expected: Option<ObjectId>,
        actual: Option<ObjectId>,
    },

    #[error("page {0:?} already exists")]
    PageExists(String),

    #[error("invalid title {title:?}: {reason}")]
    InvalidTitle { title: String, reason: String },

    #[error("invalid revision id {0:?}")]
    InvalidRevision(String),

    #[error("store error: {0}")]
    Store(#[from] folio_store::StoreError),

    #[error("ref error: {0}")]
    Ref(RefError),

    #[error("diff error: {0}")]
    Diff(#[from] folio_diff::DiffError),

    #[error(transparent)]
    Type(#[from] folio_types::TypeError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<RefError> for WikiError {
    fn from(e: RefError) -> Self {
        match e {
            RefError::StaleHead { expected, actual } => Self::ConcurrentUpdate { expected, actual },
            other => Self::Ref(other),
        }
    }
}

/// Convenience alias for wiki results.
pub type WikiResult<T> = Result<T, WikiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_head_becomes_concurrent_update() {
        let id = ObjectId::from_bytes(b"x");
        let err: WikiError = RefError::StaleHead {
            expected: None,
            actual: Some(id),
        }
        .into();
        assert!(matches!(
            err,
            WikiError::ConcurrentUpdate { expected: None, actual: Some(a) } if a == id
        ));
    }

    #[test]
    fn other_ref_errors_are_wrapped() {
        let err: WikiError = RefError::Corrupt {
            name: "HEAD".into(),
            reason: "bad".into(),
        }
        .into();
        assert!(matches!(err, WikiError::Ref(RefError::Corrupt { .. })));
    }
}
