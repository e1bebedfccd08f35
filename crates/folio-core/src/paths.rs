//! Mapping between page titles and storage paths.

use std::collections::BTreeSet;

use folio_store::Tree;

use crate::error::{WikiError, WikiResult};
use crate::graph::PathChange;

/// Maps a title to `<title><extension>` and back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageResolver {
    extension: String,
}

impl PageResolver {
    /// A resolver using `extension` (a leading `.` is added if missing).
    pub fn new(extension: &str) -> Self {
        let extension = match extension {
            "" => String::new(),
            ext if ext.starts_with('.') => ext.to_string(),
            ext => format!(".{ext}"),
        };
        Self { extension }
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Reject titles that cannot be stored as a single flat path.
    pub fn validate_title(&self, title: &str) -> WikiResult<()> {
        let reason = if title.trim().is_empty() {
            "title is empty"
        } else if title.contains('/') {
            "title contains '/'"
        } else if title.contains('\0') {
            "title contains a NUL byte"
        } else if title.starts_with('.') {
            "title starts with '.'"
        } else {
            return Ok(());
        };
        Err(WikiError::InvalidTitle {
            title: title.to_string(),
            reason: reason.into(),
        })
    }

    /// Storage path of `title`.
    pub fn path_for(&self, title: &str) -> WikiResult<String> {
        self.validate_title(title)?;
        Ok(format!("{title}{}", self.extension))
    }

    /// Title stored at `path`, or `None` if the path is not a page.
    pub fn title_for<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_suffix(self.extension.as_str())
            .filter(|title| !title.is_empty())
    }

    /// Titles of every page in `tree`, sorted.
    pub fn list_titles(&self, tree: &Tree) -> Vec<String> {
        tree.paths()
            .filter_map(|path| self.title_for(path))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The tree mutation that moves `old` to `new`, keeping its blob.
    pub fn rename(&self, old: &str, new: &str) -> WikiResult<PathChange> {
        Ok(PathChange::Move {
            from: self.path_for(old)?,
            to: self.path_for(new)?,
        })
    }
}

impl Default for PageResolver {
    fn default() -> Self {
        Self::new(".rst")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_store::TreeEntry;
    use folio_types::ObjectId;

    #[test]
    fn title_to_path_and_back() {
        let r = PageResolver::default();
        assert_eq!(r.path_for("intro").unwrap(), "intro.rst");
        assert_eq!(r.title_for("intro.rst"), Some("intro"));
        assert_eq!(r.title_for("intro.md"), None);
        assert_eq!(r.title_for(".rst"), None);
    }

    #[test]
    fn extension_is_normalized() {
        assert_eq!(PageResolver::new("md").extension(), ".md");
        assert_eq!(PageResolver::new(".md").extension(), ".md");
        assert_eq!(PageResolver::new("").path_for("raw").unwrap(), "raw");
    }

    #[test]
    fn invalid_titles_are_rejected() {
        let r = PageResolver::default();
        for title in ["", "  ", "a/b", "nul\0", ".hidden"] {
            assert!(
                matches!(r.path_for(title), Err(WikiError::InvalidTitle { .. })),
                "{title:?} should be rejected"
            );
        }
        assert!(r.validate_title("Front Page").is_ok());
    }

    #[test]
    fn list_titles_skips_foreign_paths_and_sorts() {
        let id = ObjectId::from_bytes(b"x");
        let tree = Tree::new(vec![
            TreeEntry::new("a.rst", id),
            TreeEntry::new("a b.rst", id),
            TreeEntry::new("notes.txt", id),
        ]);
        assert_eq!(PageResolver::default().list_titles(&tree), ["a", "a b"]);
    }

    #[test]
    fn rename_is_a_move() {
        let change = PageResolver::default().rename("old", "new").unwrap();
        assert_eq!(
            change,
            PathChange::Move {
                from: "old.rst".into(),
                to: "new.rst".into(),
            }
        );
    }
}
