//! Page history.

use folio_diff::TreeChange;
use folio_types::{Author, ObjectId};
use serde::Serialize;

use crate::error::WikiResult;
use crate::graph::{Revision, RevisionGraph};
use crate::paths::PageResolver;

/// One revision as shown in a page log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub revision: ObjectId,
    pub message: String,
    pub author: Author,
    /// Commit time, RFC 3339 in UTC.
    pub time: String,
    /// The page this revision changed: the requested title for a filtered
    /// log, or the first changed page (the new title of a rename) for the
    /// full log.
    pub title: Option<String>,
}

/// Revisions that changed `title`, or all revisions when `title` is `None`,
/// newest first and excluding the root.
///
/// A revision counts as changing a page when the diff against its parent
/// touches the page's path. A rename is followed only within the commit that
/// performs it: asking for the new title does not pull in the history of the
/// old one. A page deleted and later re-created under the same title shows
/// as one continuous history.
pub fn page_log(
    graph: &RevisionGraph,
    resolver: &PageResolver,
    title: Option<&str>,
) -> WikiResult<Vec<LogEntry>> {
    let path = title.map(|t| resolver.path_for(t)).transpose()?;
    let mut entries = Vec::new();

    for revision in graph.history()? {
        let Revision { id, commit } = revision?;
        let diff = graph.diff_against_parent(&commit)?;

        let shown = match (title, &path) {
            (Some(title), Some(path)) => {
                if !diff.touches(path) {
                    continue;
                }
                Some(title.to_string())
            }
            _ => diff.changes.first().map(|c| display_title(resolver, c)),
        };

        entries.push(LogEntry {
            revision: id,
            time: commit.timestamp.to_rfc3339(),
            title: shown,
            message: commit.message,
            author: commit.author,
        });
    }
    Ok(entries)
}

fn display_title(resolver: &PageResolver, change: &TreeChange) -> String {
    let path = change.path();
    resolver.title_for(path).unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PathChange;

    fn author() -> Author {
        Author::new("Ada", "ada@example.org").unwrap()
    }

    fn write(path: &str, content: &str) -> PathChange {
        PathChange::Write {
            path: path.into(),
            content: content.as_bytes().to_vec(),
        }
    }

    fn setup() -> (RevisionGraph, PageResolver) {
        let g = RevisionGraph::in_memory();
        g.init().unwrap();
        (g, PageResolver::default())
    }

    #[test]
    fn filtered_log_keeps_only_touching_revisions() {
        let (g, r) = setup();
        let r1 = g.commit(&[write("intro.rst", "a")], author(), "intro 1").unwrap();
        g.commit(&[write("other.rst", "x")], author(), "other").unwrap();
        let r3 = g.commit(&[write("intro.rst", "b")], author(), "intro 2").unwrap();

        let log = page_log(&g, &r, Some("intro")).unwrap();
        let ids: Vec<_> = log.iter().map(|e| e.revision).collect();
        assert_eq!(ids, [r3, r1]);
        assert_eq!(log[0].message, "intro 2");
        assert_eq!(log[0].title.as_deref(), Some("intro"));
        assert!(log[0].time.ends_with('Z'));
    }

    #[test]
    fn unfiltered_log_names_first_changed_page() {
        let (g, r) = setup();
        g.commit(&[write("b.rst", "1"), write("a.rst", "1")], author(), "two pages")
            .unwrap();
        let log = page_log(&g, &r, None).unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].title.as_deref(), Some("a"));
    }

    #[test]
    fn rename_appears_under_both_titles_as_requested() {
        let (g, r) = setup();
        g.commit(&[write("old.rst", "body")], author(), "create").unwrap();
        let moved = g
            .commit(&[r.rename("old", "new").unwrap()], author(), "move")
            .unwrap();

        let old_log = page_log(&g, &r, Some("old")).unwrap();
        assert_eq!(old_log.len(), 2);
        assert_eq!(old_log[0].revision, moved);
        assert_eq!(old_log[0].title.as_deref(), Some("old"));

        // history before the rename is not carried over
        let new_log = page_log(&g, &r, Some("new")).unwrap();
        assert_eq!(new_log.len(), 1);
        assert_eq!(new_log[0].revision, moved);
        assert_eq!(new_log[0].title.as_deref(), Some("new"));

        let full_log = page_log(&g, &r, None).unwrap();
        assert_eq!(full_log[0].title.as_deref(), Some("new"));
    }

    #[test]
    fn empty_commit_has_no_title() {
        let (g, r) = setup();
        g.commit(&[], author(), "nothing").unwrap();
        let log = page_log(&g, &r, None).unwrap();
        assert_eq!(log[0].title, None);
    }

    #[test]
    fn entries_serialize_as_json() {
        let (g, r) = setup();
        g.commit(&[write("intro.rst", "a")], author(), "create").unwrap();
        let log = page_log(&g, &r, None).unwrap();
        let json = serde_json::to_value(&log[0]).unwrap();
        assert_eq!(json["title"], "intro");
        assert_eq!(json["author"]["name"], "Ada");
        assert_eq!(json["revision"].as_str().map(str::len), Some(64));
    }
}
