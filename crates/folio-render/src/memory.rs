//! In-memory render store for tests and single-process use.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{PoisonError, RwLock};

use crate::error::RenderResult;
use crate::key::RenderKey;
use crate::traits::RenderStore;

/// A [`RenderStore`] backed by a `HashMap` behind a `RwLock`.
///
/// Entries live as long as the store.
#[derive(Debug, Default)]
pub struct InMemoryRenderStore {
    entries: RwLock<HashMap<RenderKey, Vec<u8>>>,
}

impl InMemoryRenderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached renders.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RenderStore for InMemoryRenderStore {
    fn get(&self, key: &RenderKey) -> RenderResult<Option<Vec<u8>>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn insert_if_absent(&self, key: &RenderKey, html: &[u8]) -> RenderResult<bool> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.entry(key.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(html.to_vec());
                Ok(true)
            }
        }
    }
}
