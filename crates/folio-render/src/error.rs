//! Error types for rendering and render storage.

use thiserror::Error;

/// Errors produced by renderers and render stores.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The renderer rejected the page source.
    #[error("failed to render {title:?}: {reason}")]
    Failed { title: String, reason: String },

    /// I/O error in a file-backed store.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub fn failed(title: &str, reason: impl Into<String>) -> Self {
        Self::Failed {
            title: title.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for render results.
pub type RenderResult<T> = Result<T, RenderError>;
