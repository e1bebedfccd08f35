//! Unified-diff view of a whole revision.

use std::fmt::Write as _;

use folio_diff::{text_diff, DiffError, TreeChange};
use folio_types::ObjectId;

use crate::error::WikiResult;
use crate::graph::RevisionGraph;

const NULL_LABEL: &str = "/dev/null";

/// Every page change in `revision` against its parent, as unified diffs.
///
/// Added and deleted pages diff against `/dev/null`. A rename is shown as
/// `rename from` / `rename to` lines with no hunks, since the content did not
/// change. Non-text content is summarized in one line.
pub fn revision_patch(graph: &RevisionGraph, revision: &ObjectId) -> WikiResult<String> {
    let commit = graph.read_commit(revision)?;
    let diff = graph.diff_against_parent(&commit)?;
    let objects = graph.objects();
    let read = |id: Option<ObjectId>| -> WikiResult<Vec<u8>> {
        match id {
            Some(id) => Ok(objects.read_blob(&id)?.data),
            None => Ok(Vec::new()),
        }
    };

    let mut out = String::new();
    for change in &diff.changes {
        let (old_label, new_label) = match change {
            TreeChange::Renamed {
                old_path, new_path, ..
            } => {
                let _ = writeln!(out, "rename from {old_path}");
                let _ = writeln!(out, "rename to {new_path}");
                continue;
            }
            TreeChange::Added { path, .. } => (NULL_LABEL.to_string(), format!("b/{path}")),
            TreeChange::Deleted { path, .. } => (format!("a/{path}"), NULL_LABEL.to_string()),
            TreeChange::Modified { path, .. } => (format!("a/{path}"), format!("b/{path}")),
        };

        let before = read(change.old_id())?;
        let after = read(change.new_id())?;
        match text_diff(&before, &after) {
            Ok(patch) => out.push_str(&patch.to_unified(&old_label, &new_label)),
            Err(DiffError::BinaryContent { .. }) => {
                let _ = writeln!(out, "Binary content {old_label} and {new_label} differ");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(out)
}
