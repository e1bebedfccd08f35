use std::collections::BTreeMap;

use folio_types::ObjectId;

use crate::object::{Tree, TreeEntry};

/// Incrementally derive a new tree from an existing one.
///
/// The source tree is never touched; `build` produces a fresh snapshot.
#[derive(Clone, Debug, Default)]
pub struct TreeBuilder {
    entries: BTreeMap<String, ObjectId>,
}

impl TreeBuilder {
    /// Start from an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the entries of an existing tree.
    pub fn from_tree(tree: &Tree) -> Self {
        Self {
            entries: tree
                .entries
                .iter()
                .map(|e| (e.path.clone(), e.object_id))
                .collect(),
        }
    }

    /// Bind `path` to `object_id`, replacing any previous binding.
    pub fn insert(&mut self, path: impl Into<String>, object_id: ObjectId) -> &mut Self {
        self.entries.insert(path.into(), object_id);
        self
    }

    /// Remove `path`, returning the blob id it was bound to.
    pub fn remove(&mut self, path: &str) -> Option<ObjectId> {
        self.entries.remove(path)
    }

    /// The blob id currently bound to `path`.
    pub fn get(&self, path: &str) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    /// Produce the new tree.
    pub fn build(&self) -> Tree {
        Tree {
            entries: self
                .entries
                .iter()
                .map(|(path, id)| TreeEntry::new(path.clone(), *id))
                .collect(),
        }
    }
}
