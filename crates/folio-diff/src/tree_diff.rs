//! Tree-level diff: compare two snapshots and classify each changed path.
//!
//! Paths present in both trees with different blob ids are `Modified`. Paths
//! present on one side only are `Added` or `Deleted`, except for the single
//! rename case: when the whole diff is exactly one deleted path and one added
//! path bound to the same blob, it is reported as one `Renamed` change.

use std::collections::BTreeMap;

use folio_store::{ObjectStore, Tree};
use folio_types::ObjectId;

use crate::error::DiffResult;

/// The result of comparing two trees. Changes are ordered by path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeDiff {
    pub changes: Vec<TreeChange>,
}

impl TreeDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns `true` if any change involves `path` (either side of a rename).
    pub fn touches(&self, path: &str) -> bool {
        self.changes.iter().any(|c| c.touches(path))
    }

    /// The single change, if the diff has exactly one.
    pub fn single(&self) -> Option<&TreeChange> {
        match self.changes.as_slice() {
            [change] => Some(change),
            _ => None,
        }
    }
}

/// A single change between two trees.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeChange {
    Added {
        path: String,
        new_id: ObjectId,
    },
    Deleted {
        path: String,
        old_id: ObjectId,
    },
    Modified {
        path: String,
        old_id: ObjectId,
        new_id: ObjectId,
    },
    /// The same blob moved from `old_path` to `new_path`.
    Renamed {
        old_path: String,
        new_path: String,
        id: ObjectId,
    },
}

impl TreeChange {
    /// The path this change leaves behind in the new tree (or removed from it).
    pub fn path(&self) -> &str {
        match self {
            Self::Added { path, .. } | Self::Deleted { path, .. } | Self::Modified { path, .. } => {
                path
            }
            Self::Renamed { new_path, .. } => new_path,
        }
    }

    pub fn touches(&self, path: &str) -> bool {
        match self {
            Self::Renamed {
                old_path, new_path, ..
            } => old_path == path || new_path == path,
            other => other.path() == path,
        }
    }

    /// Blob id on the old side, if any.
    pub fn old_id(&self) -> Option<ObjectId> {
        match self {
            Self::Added { .. } => None,
            Self::Deleted { old_id, .. } | Self::Modified { old_id, .. } => Some(*old_id),
            Self::Renamed { id, .. } => Some(*id),
        }
    }

    /// Blob id on the new side, if any.
    pub fn new_id(&self) -> Option<ObjectId> {
        match self {
            Self::Deleted { .. } => None,
            Self::Added { new_id, .. } | Self::Modified { new_id, .. } => Some(*new_id),
            Self::Renamed { id, .. } => Some(*id),
        }
    }
}

/// Compare two trees read from the store.
///
/// `old_tree` of `None` is treated as the empty tree.
pub fn diff_trees(
    store: &dyn ObjectStore,
    old_tree: Option<&ObjectId>,
    new_tree: &ObjectId,
) -> DiffResult<TreeDiff> {
    let old = match old_tree {
        Some(id) => store.read_tree(id)?,
        None => Tree::empty(),
    };
    let new = store.read_tree(new_tree)?;
    Ok(diff_tree_objects(&old, &new))
}

/// Compare two trees given directly as `Tree` objects.
pub fn diff_tree_objects(old: &Tree, new: &Tree) -> TreeDiff {
    let old_map = to_map(old);
    let new_map = to_map(new);
    let mut changes = Vec::new();

    for (path, old_id) in &old_map {
        match new_map.get(path) {
            Some(new_id) if new_id != old_id => changes.push(TreeChange::Modified {
                path: (*path).to_string(),
                old_id: **old_id,
                new_id: **new_id,
            }),
            Some(_) => {}
            None => changes.push(TreeChange::Deleted {
                path: (*path).to_string(),
                old_id: **old_id,
            }),
        }
    }
    for (path, new_id) in &new_map {
        if !old_map.contains_key(path) {
            changes.push(TreeChange::Added {
                path: (*path).to_string(),
                new_id: **new_id,
            });
        }
    }
    changes.sort_by(|a, b| a.path().cmp(b.path()));

    TreeDiff {
        changes: detect_rename(changes),
    }
}

fn to_map(tree: &Tree) -> BTreeMap<&str, &ObjectId> {
    tree.entries
        .iter()
        .map(|e| (e.path.as_str(), &e.object_id))
        .collect()
}

fn detect_rename(changes: Vec<TreeChange>) -> Vec<TreeChange> {
    let renamed = match changes.as_slice() {
        [TreeChange::Deleted { path: old_path, old_id }, TreeChange::Added { path: new_path, new_id }]
        | [TreeChange::Added { path: new_path, new_id }, TreeChange::Deleted { path: old_path, old_id }]
            if old_id == new_id =>
        {
            Some(TreeChange::Renamed {
                old_path: old_path.clone(),
                new_path: new_path.clone(),
                id: *new_id,
            })
        }
        _ => None,
    };
    match renamed {
        Some(rename) => vec![rename],
        None => changes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_store::{InMemoryObjectStore, TreeEntry};

    fn oid(b: u8) -> ObjectId {
        ObjectId::from_hash([b; 32])
    }

    fn tree(entries: &[(&str, u8)]) -> Tree {
        Tree::new(
            entries
                .iter()
                .map(|(path, b)| TreeEntry::new(*path, oid(*b)))
                .collect(),
        )
    }

    #[test]
    fn identical_trees_no_changes() {
        let t = tree(&[("intro.rst", 1)]);
        assert!(diff_tree_objects(&t, &t).is_empty());
    }

    #[test]
    fn empty_to_populated_all_additions() {
        let diff = diff_tree_objects(&Tree::empty(), &tree(&[("a.rst", 1), ("b.rst", 2)]));
        assert_eq!(diff.len(), 2);
        assert!(diff
            .changes
            .iter()
            .all(|c| matches!(c, TreeChange::Added { .. })));
    }

    #[test]
    fn single_modification() {
        let diff = diff_tree_objects(&tree(&[("intro.rst", 1)]), &tree(&[("intro.rst", 2)]));
        assert_eq!(
            diff.single(),
            Some(&TreeChange::Modified {
                path: "intro.rst".into(),
                old_id: oid(1),
                new_id: oid(2),
            })
        );
    }

    #[test]
    fn rename_with_same_blob() {
        let diff = diff_tree_objects(&tree(&[("old.rst", 1)]), &tree(&[("new.rst", 1)]));
        assert_eq!(
            diff.single(),
            Some(&TreeChange::Renamed {
                old_path: "old.rst".into(),
                new_path: "new.rst".into(),
                id: oid(1),
            })
        );
        assert!(diff.touches("old.rst"));
        assert!(diff.touches("new.rst"));
    }

    #[test]
    fn rename_detected_regardless_of_path_order() {
        // added path sorts before the deleted one
        let diff = diff_tree_objects(&tree(&[("zeta.rst", 4)]), &tree(&[("alpha.rst", 4)]));
        assert!(matches!(
            diff.single(),
            Some(TreeChange::Renamed { old_path, new_path, .. })
                if old_path == "zeta.rst" && new_path == "alpha.rst"
        ));
    }

    #[test]
    fn add_and_delete_with_different_blobs_is_not_a_rename() {
        let diff = diff_tree_objects(&tree(&[("old.rst", 1)]), &tree(&[("new.rst", 2)]));
        assert_eq!(diff.len(), 2);
        assert!(diff
            .changes
            .iter()
            .any(|c| matches!(c, TreeChange::Deleted { path, .. } if path == "old.rst")));
        assert!(diff
            .changes
            .iter()
            .any(|c| matches!(c, TreeChange::Added { path, .. } if path == "new.rst")));
    }

    #[test]
    fn rename_alongside_other_change_is_not_classified() {
        let old = tree(&[("keep.rst", 9), ("old.rst", 1)]);
        let new = tree(&[("keep.rst", 8), ("new.rst", 1)]);
        let diff = diff_tree_objects(&old, &new);
        assert_eq!(diff.len(), 3);
        assert!(!diff
            .changes
            .iter()
            .any(|c| matches!(c, TreeChange::Renamed { .. })));
    }

    #[test]
    fn changes_are_sorted_by_path() {
        let old = tree(&[("b.rst", 1), ("c.rst", 2)]);
        let new = tree(&[("a.rst", 3), ("b.rst", 4)]);
        let diff = diff_tree_objects(&old, &new);
        let paths: Vec<_> = diff.changes.iter().map(TreeChange::path).collect();
        assert_eq!(paths, ["a.rst", "b.rst", "c.rst"]);
    }

    #[test]
    fn change_side_ids() {
        let added = TreeChange::Added {
            path: "a.rst".into(),
            new_id: oid(1),
        };
        assert_eq!(added.old_id(), None);
        assert_eq!(added.new_id(), Some(oid(1)));
    }

    #[test]
    fn diff_trees_from_store() {
        let store = InMemoryObjectStore::new();
        let old_id = store.write_tree(&tree(&[("intro.rst", 1)])).unwrap();
        let new_id = store.write_tree(&tree(&[("intro.rst", 2)])).unwrap();

        let diff = diff_trees(&store, Some(&old_id), &new_id).unwrap();
        assert!(matches!(diff.single(), Some(TreeChange::Modified { .. })));

        let from_nothing = diff_trees(&store, None, &new_id).unwrap();
        assert!(matches!(from_nothing.single(), Some(TreeChange::Added { .. })));
    }
}
