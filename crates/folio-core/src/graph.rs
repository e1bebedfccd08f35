//! The revision graph: immutable commits over trees of page blobs, and the
//! single head pointer that names the latest one.
//!
//! Every commit is written (tree first, then commit) before head is moved to
//! it, and head only moves by compare-and-swap from the parent the commit was
//! computed against. A crash therefore never leaves head naming a missing
//! object, and two racing writers can never silently drop one another.

use std::fmt;
use std::sync::Arc;

use folio_diff::{diff_trees, TreeDiff};
use folio_refs::{InMemoryRefStore, RefError, RefStore};
use folio_store::{Commit, InMemoryObjectStore, ObjectKind, ObjectStore, Tree, TreeBuilder};
use folio_types::{Author, ObjectId, Timestamp};
use tracing::{debug, info, warn};

use crate::error::{WikiError, WikiResult};

/// Message of the root revision.
pub const ROOT_MESSAGE: &str = "initialize repository";

/// One path-level mutation applied by a commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathChange {
    /// Bind `path` to a blob holding `content`.
    Write { path: String, content: Vec<u8> },
    /// Drop `path` from the tree.
    Remove { path: String },
    /// Rebind the blob at `from` to `to`. The blob is not rewritten.
    Move { from: String, to: String },
}

/// A revision id together with its commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Revision {
    pub id: ObjectId,
    pub commit: Commit,
}

/// Object store plus head ref, viewed as a chain of revisions.
#[derive(Clone)]
pub struct RevisionGraph {
    objects: Arc<dyn ObjectStore>,
    refs: Arc<dyn RefStore>,
}

impl RevisionGraph {
    pub fn new(objects: Arc<dyn ObjectStore>, refs: Arc<dyn RefStore>) -> Self {
        Self { objects, refs }
    }

    /// An uninitialized graph over in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryObjectStore::new()),
            Arc::new(InMemoryRefStore::new()),
        )
    }

    pub fn objects(&self) -> &dyn ObjectStore {
        self.objects.as_ref()
    }

    /// Create the root revision if the repository has none. Returns head.
    ///
    /// The root has an empty tree, no parent, and fixed metadata, so every
    /// repository starts from the same root id.
    pub fn init(&self) -> WikiResult<ObjectId> {
        if let Some(head) = self.refs.head()? {
            return Ok(head);
        }
        let tree = self.objects.write_tree(&Tree::empty())?;
        let root = Commit {
            tree,
            parent: None,
            author: Author::system(),
            timestamp: Timestamp::epoch(),
            message: ROOT_MESSAGE.into(),
        };
        let id = self.objects.write_commit(&root)?;
        match self.refs.update_head(None, id) {
            Ok(()) => {
                info!(root = %id.short_hex(), "initialized repository");
                Ok(id)
            }
            // Someone else initialized first; their root is identical.
            Err(RefError::StaleHead {
                actual: Some(head), ..
            }) => Ok(head),
            Err(e) => Err(e.into()),
        }
    }

    /// The current head revision.
    pub fn head(&self) -> WikiResult<ObjectId> {
        self.refs.head()?.ok_or(WikiError::NotInitialized)
    }

    /// Read a commit, failing with `RevisionNotFound` if `id` names no commit.
    pub fn read_commit(&self, id: &ObjectId) -> WikiResult<Commit> {
        match self.objects.read(id)? {
            Some(obj) if obj.kind == ObjectKind::Commit => Ok(Commit::from_stored_object(&obj)?),
            _ => Err(WikiError::RevisionNotFound(*id)),
        }
    }

    pub fn read_tree(&self, id: &ObjectId) -> WikiResult<Tree> {
        Ok(self.objects.read_tree(id)?)
    }

    /// The tree snapshot of `revision`.
    pub fn tree_at(&self, revision: &ObjectId) -> WikiResult<Tree> {
        let commit = self.read_commit(revision)?;
        self.read_tree(&commit.tree)
    }

    /// Parent of `revision`; `None` for the root.
    pub fn parent_of(&self, revision: &ObjectId) -> WikiResult<Option<ObjectId>> {
        Ok(self.read_commit(revision)?.parent)
    }

    /// Tree diff of `commit` against its parent (the empty tree for the root).
    pub fn diff_against_parent(&self, commit: &Commit) -> WikiResult<TreeDiff> {
        let parent_tree = match commit.parent {
            Some(parent) => Some(self.read_commit(&parent)?.tree),
            None => None,
        };
        Ok(diff_trees(self.objects(), parent_tree.as_ref(), &commit.tree)?)
    }

    /// Content at `path` in `revision`, or `None` if the path is absent.
    pub fn read_path(&self, path: &str, revision: &ObjectId) -> WikiResult<Option<Vec<u8>>> {
        let tree = self.tree_at(revision)?;
        match tree.get(path) {
            Some(entry) => Ok(Some(self.objects.read_blob(&entry.object_id)?.data)),
            None => Ok(None),
        }
    }

    /// Content at `path` in `revision`.
    pub fn resolve(&self, path: &str, revision: &ObjectId) -> WikiResult<Vec<u8>> {
        self.read_path(path, revision)?
            .ok_or_else(|| WikiError::PageNotFound {
                title: path.to_string(),
                revision: *revision,
            })
    }

    /// Commit `changes` on top of the current head.
    pub fn commit(
        &self,
        changes: &[PathChange],
        author: Author,
        message: impl Into<String>,
    ) -> WikiResult<ObjectId> {
        let parent = self.head()?;
        self.commit_on(parent, changes, author, message)
    }

    /// Commit `changes` on top of `parent`.
    ///
    /// Head advances only if it still equals `parent`; otherwise the new
    /// objects stay unreferenced and `ConcurrentUpdate` is returned.
    pub fn commit_on(
        &self,
        parent: ObjectId,
        changes: &[PathChange],
        author: Author,
        message: impl Into<String>,
    ) -> WikiResult<ObjectId> {
        let base = self.tree_at(&parent)?;
        let mut builder = TreeBuilder::from_tree(&base);

        for change in changes {
            match change {
                PathChange::Write { path, content } => {
                    let blob = self.objects.write_blob(content)?;
                    builder.insert(path.clone(), blob);
                }
                PathChange::Remove { path } => {
                    builder.remove(path).ok_or_else(|| WikiError::PageNotFound {
                        title: path.clone(),
                        revision: parent,
                    })?;
                }
                PathChange::Move { from, to } => {
                    if builder.get(to).is_some() {
                        return Err(WikiError::PageExists(to.clone()));
                    }
                    let blob = builder.remove(from).ok_or_else(|| WikiError::PageNotFound {
                        title: from.clone(),
                        revision: parent,
                    })?;
                    builder.insert(to.clone(), blob);
                }
            }
        }

        let tree = self.objects.write_tree(&builder.build())?;
        let commit = Commit {
            tree,
            parent: Some(parent),
            author,
            timestamp: Timestamp::now(),
            message: message.into(),
        };
        let id = self.objects.write_commit(&commit)?;
        debug!(revision = %id.short_hex(), tree = %tree.short_hex(), "wrote revision objects");

        if let Err(e) = self.refs.update_head(Some(parent), id) {
            warn!(revision = %id.short_hex(), parent = %parent.short_hex(), error = %e, "head update rejected");
            return Err(e.into());
        }
        info!(
            revision = %id.short_hex(),
            parent = %parent.short_hex(),
            subject = commit.subject(),
            "advanced head"
        );
        Ok(id)
    }

    /// Revisions from head back to (not including) the root, newest first.
    pub fn history(&self) -> WikiResult<History<'_>> {
        Ok(self.history_from(self.head()?))
    }

    /// Revisions from `start` back to (not including) the root.
    pub fn history_from(&self, start: ObjectId) -> History<'_> {
        History {
            graph: self,
            next: Some(start),
        }
    }
}

impl fmt::Debug for RevisionGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevisionGraph").finish_non_exhaustive()
    }
}

/// Lazy walk along parent links. Each step reads one commit.
pub struct History<'a> {
    graph: &'a RevisionGraph,
    next: Option<ObjectId>,
}

impl Iterator for History<'_> {
    type Item = WikiResult<Revision>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        match self.graph.read_commit(&id) {
            Ok(commit) if commit.is_root() => None,
            Ok(commit) => {
                self.next = commit.parent;
                Some(Ok(Revision { id, commit }))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
