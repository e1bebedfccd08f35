//! The [`RefStore`] trait defining the head storage interface.

use folio_types::ObjectId;

use crate::error::Result;

/// Storage backend for the head pointer.
///
/// Implementations must be thread-safe (`Send + Sync`) and make
/// `update_head` atomic: readers see either the old or the new head, never a
/// torn value, and two updates against the same expected head cannot both
/// succeed.
pub trait RefStore: Send + Sync {
    /// Read the current head. `Ok(None)` means the repository is not
    /// initialized.
    fn head(&self) -> Result<Option<ObjectId>>;

    /// Move head from `expected` to `new`.
    ///
    /// Fails with [`RefError::StaleHead`](crate::RefError::StaleHead) and
    /// leaves head untouched if the current head is not `expected`. The
    /// revision named by `new` must already be durable in the object store.
    fn update_head(&self, expected: Option<ObjectId>, new: ObjectId) -> Result<()>;
}
