use folio_types::ObjectId;

use crate::error::{RenderError, RenderResult};
use crate::key::{Flavor, RenderKey};

/// Converts page markup into HTML.
///
/// Implementations must be pure: the same `(title, source, flavor)` always
/// yields the same output. The cache relies on this to tolerate duplicate
/// renders of one key.
pub trait MarkupRenderer: Send + Sync {
    fn render(&self, title: &str, source: &[u8], flavor: Flavor) -> Result<String, RenderError>;
}

/// Append-only storage for rendered pages.
pub trait RenderStore: Send + Sync {
    /// Look up a rendered page.
    fn get(&self, key: &RenderKey) -> RenderResult<Option<Vec<u8>>>;

    /// Store `html` under `key` unless an entry already exists.
    ///
    /// Returns `true` if this call wrote the entry. An existing entry is never
    /// replaced.
    fn insert_if_absent(&self, key: &RenderKey, html: &[u8]) -> RenderResult<bool>;
}

/// Supplies the source bytes of a page at a revision.
pub trait SourceResolver {
    type Error;

    fn resolve(&self, title: &str, revision: &ObjectId) -> Result<Vec<u8>, Self::Error>;
}

impl<F, E> SourceResolver for F
where
    F: Fn(&str, &ObjectId) -> Result<Vec<u8>, E>,
{
    type Error = E;

    fn resolve(&self, title: &str, revision: &ObjectId) -> Result<Vec<u8>, E> {
        self(title, revision)
    }
}
