//! In-memory head store for testing and ephemeral use.

use std::sync::{PoisonError, RwLock};

use folio_types::ObjectId;
use tracing::debug;

use crate::error::{RefError, Result};
use crate::traits::RefStore;

/// An in-memory implementation of [`RefStore`].
///
/// Head lives behind a `RwLock`; data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryRefStore {
    head: RwLock<Option<ObjectId>>,
}

impl InMemoryRefStore {
    /// Create a store with no head.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RefStore for InMemoryRefStore {
    fn head(&self) -> Result<Option<ObjectId>> {
        Ok(*self.head.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn update_head(&self, expected: Option<ObjectId>, new: ObjectId) -> Result<()> {
        let mut head = self.head.write().unwrap_or_else(PoisonError::into_inner);
        if *head != expected {
            return Err(RefError::StaleHead {
                expected,
                actual: *head,
            });
        }
        debug!(from = ?expected, to = %new.short_hex(), "advanced head");
        *head = Some(new);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rev(b: u8) -> ObjectId {
        ObjectId::from_hash([b; 32])
    }

    #[test]
    fn new_store_has_no_head() {
        assert_eq!(InMemoryRefStore::new().head().unwrap(), None);
    }

    #[test]
    fn update_from_expected_head() {
        let store = InMemoryRefStore::new();
        store.update_head(None, rev(1)).unwrap();
        store.update_head(Some(rev(1)), rev(2)).unwrap();
        assert_eq!(store.head().unwrap(), Some(rev(2)));
    }

    #[test]
    fn stale_update_is_rejected() {
        let store = InMemoryRefStore::new();
        store.update_head(None, rev(1)).unwrap();
        store.update_head(Some(rev(1)), rev(2)).unwrap();

        let err = store.update_head(Some(rev(1)), rev(3)).unwrap_err();
        assert!(matches!(
            err,
            RefError::StaleHead { expected: Some(e), actual: Some(a) } if e == rev(1) && a == rev(2)
        ));
        assert_eq!(store.head().unwrap(), Some(rev(2)));
    }

    #[test]
    fn racing_updates_from_same_head_only_one_wins() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryRefStore::new());
        store.update_head(None, rev(0)).unwrap();

        let handles: Vec<_> = (1..=8u8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.update_head(Some(rev(0)), rev(i)).is_ok())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(wins, 1);
    }
}
