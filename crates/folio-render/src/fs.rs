//! File-backed render store.
//!
//! Each entry is one file holding the rendered HTML:
//!
//! ```text
//! {root}/
//! +-- plain/
//! |   +-- 3f9a0c.../          # full revision id
//! |       +-- 696e74726f.html # hex-encoded title
//! +-- navigation/
//!     +-- ...
//! ```
//!
//! Titles are hex-encoded so any title maps to a safe file name. Entries are
//! written to a temporary file and linked into place without replacing an
//! existing file, which makes concurrent writers of one key first-writer-wins.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::RenderResult;
use crate::key::RenderKey;
use crate::traits::RenderStore;

/// A [`RenderStore`] rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FileRenderStore {
    root: PathBuf,
}

impl FileRenderStore {
    /// Open (creating if needed) a render store at `root`.
    pub fn open(root: impl AsRef<Path>) -> RenderResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, key: &RenderKey) -> PathBuf {
        self.root
            .join(key.flavor.as_str())
            .join(key.revision.to_hex())
            .join(format!("{}.html", hex::encode(key.title.as_bytes())))
    }
}

impl RenderStore for FileRenderStore {
    fn get(&self, key: &RenderKey) -> RenderResult<Option<Vec<u8>>> {
        match fs::read(self.entry_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn insert_if_absent(&self, key: &RenderKey, html: &[u8]) -> RenderResult<bool> {
        let path = self.entry_path(key);
        if path.exists() {
            return Ok(false);
        }
        let Some(dir) = path.parent() else {
            return Ok(false);
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(html)?;
        tmp.as_file().sync_all()?;
        match tmp.persist_noclobber(&path) {
            Ok(_) => {
                debug!(key = %key, bytes = html.len(), "wrote render file");
                Ok(true)
            }
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Flavor;
    use folio_types::ObjectId;

    fn key(title: &str) -> RenderKey {
        RenderKey::new(title, ObjectId::from_bytes(b"rev-1"), Flavor::Navigation)
    }

    #[test]
    fn insert_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRenderStore::open(dir.path()).unwrap();
        let k = key("intro");

        assert_eq!(store.get(&k).unwrap(), None);
        assert!(store.insert_if_absent(&k, b"<pre>Hello</pre>").unwrap());
        assert_eq!(store.get(&k).unwrap(), Some(b"<pre>Hello</pre>".to_vec()));
    }

    #[test]
    fn existing_entry_is_not_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRenderStore::open(dir.path()).unwrap();
        let k = key("intro");

        assert!(store.insert_if_absent(&k, b"first").unwrap());
        assert!(!store.insert_if_absent(&k, b"second").unwrap());
        assert_eq!(store.get(&k).unwrap(), Some(b"first".to_vec()));
    }

    #[test]
    fn entries_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        FileRenderStore::open(dir.path())
            .unwrap()
            .insert_if_absent(&key("intro"), b"kept")
            .unwrap();

        let reopened = FileRenderStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get(&key("intro")).unwrap(), Some(b"kept".to_vec()));
    }

    #[test]
    fn awkward_titles_map_to_safe_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRenderStore::open(dir.path()).unwrap();
        let k = key("../escape attempt");
        store.insert_if_absent(&k, b"x").unwrap();

        let path = store.entry_path(&k);
        assert!(path.starts_with(dir.path()));
        assert_eq!(store.get(&k).unwrap(), Some(b"x".to_vec()));
    }
}
