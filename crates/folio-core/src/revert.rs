//! Revert: undo one revision's edit on top of the current head.
//!
//! The target revision must change exactly one page's content. Its text diff
//! against its parent is applied inversely to the page as it stands at head.
//! Edits made since then survive as long as they don't overlap the reverted
//! hunks; an overlapping edit is a conflict, never an overwrite.

use folio_diff::{apply_patch, text_diff, DiffError, Direction, TreeChange};
use folio_types::{Author, ObjectId};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{WikiError, WikiResult};
use crate::graph::{PathChange, RevisionGraph};
use crate::paths::PageResolver;

/// A successful revert.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RevertOutcome {
    /// The new revision.
    pub revision: ObjectId,
    /// The page it restored.
    pub title: String,
}

/// Revert `target` on top of the current head.
pub fn revert(
    graph: &RevisionGraph,
    resolver: &PageResolver,
    target: &ObjectId,
    author: Author,
) -> WikiResult<RevertOutcome> {
    let head = graph.head()?;
    let commit = graph.read_commit(target)?;
    let unsupported = |reason: &str| WikiError::UnsupportedRevert {
        revision: *target,
        reason: reason.to_string(),
    };

    if commit.is_root() {
        return Err(unsupported("the root revision cannot be reverted"));
    }
    let diff = graph.diff_against_parent(&commit)?;

    let change = match diff.changes.as_slice() {
        [change] => change,
        [] => return Err(unsupported("revision changes no pages")),
        changes => {
            return Err(unsupported(
                format!("revision changes {} pages", changes.len()).as_str(),
            ))
        }
    };
    if let TreeChange::Renamed { .. } = change {
        return Err(unsupported("renames cannot be reverted"));
    }

    let path = change.path().to_string();
    let title = resolver.title_for(&path).unwrap_or(&path).to_string();
    let objects = graph.objects();
    let read = |id: Option<ObjectId>| -> WikiResult<Vec<u8>> {
        match id {
            Some(id) => Ok(objects.read_blob(&id)?.data),
            None => Ok(Vec::new()),
        }
    };
    let before = read(change.old_id())?;
    let after = read(change.new_id())?;

    let current = graph.read_path(&path, &head)?;
    let page_exists = current.is_some();
    let current = current.unwrap_or_default();

    let conflict = |hunk: usize, line: usize, expected: String| {
        warn!(revision = %target.short_hex(), title = %title, hunk, "revert conflicts with head");
        WikiError::PatchConflict {
            title: title.clone(),
            revision: *target,
            hunk,
            line,
            expected,
        }
    };

    // A re-created page is not the absence the deletion left behind.
    if matches!(change, TreeChange::Deleted { .. }) && page_exists && !current.is_empty() {
        return Err(conflict(1, 1, String::new()));
    }

    let patch = text_diff(&before, &after)?;
    let restored = match apply_patch(&current, &patch, Direction::Inverse) {
        Ok(restored) => restored,
        Err(DiffError::PatchConflict {
            hunk,
            line,
            expected,
        }) => return Err(conflict(hunk, line, expected)),
        Err(e) => return Err(e.into()),
    };

    if restored == current {
        return Err(WikiError::NoOpRevert {
            title,
            revision: *target,
        });
    }

    let undo = if restored.is_empty() && matches!(change, TreeChange::Added { .. }) {
        PathChange::Remove { path }
    } else {
        PathChange::Write {
            path,
            content: restored,
        }
    };
    let message = format!("Revert \"{}\"", commit.subject());
    let revision = graph.commit_on(head, &[undo], author, message)?;

    info!(
        reverted = %target.short_hex(),
        revision = %revision.short_hex(),
        title = %title,
        "reverted revision"
    );
    Ok(RevertOutcome { revision, title })
}
