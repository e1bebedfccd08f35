//! File-backed head store.
//!
//! Head is a single `HEAD` file holding the revision id in hex. Updates write
//! a temporary file next to it, sync it, rename it over `HEAD`, then sync the
//! directory, so a crash leaves either the old or the new head on disk and an
//! update is durable once it returns.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use folio_types::ObjectId;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{RefError, Result};
use crate::traits::RefStore;

const HEAD_FILE: &str = "HEAD";

/// A [`RefStore`] persisted as `{root}/HEAD`.
///
/// Compare-and-swap is serialized by an in-process lock. Two processes
/// sharing one repository directory are not coordinated.
#[derive(Debug)]
pub struct FsRefStore {
    root: PathBuf,
    update_lock: Mutex<()>,
}

impl FsRefStore {
    /// Open (creating the directory if needed) a ref store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            update_lock: Mutex::new(()),
        })
    }

    fn head_path(&self) -> PathBuf {
        self.root.join(HEAD_FILE)
    }

    fn read_head_file(&self) -> Result<Option<ObjectId>> {
        match fs::read_to_string(self.head_path()) {
            Ok(text) => ObjectId::from_hex(&text)
                .map(Some)
                .map_err(|e| RefError::Corrupt {
                    name: HEAD_FILE.into(),
                    reason: e.to_string(),
                }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl RefStore for FsRefStore {
    fn head(&self) -> Result<Option<ObjectId>> {
        self.read_head_file()
    }

    fn update_head(&self, expected: Option<ObjectId>, new: ObjectId) -> Result<()> {
        let _guard = self
            .update_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let actual = self.read_head_file()?;
        if actual != expected {
            return Err(RefError::StaleHead { expected, actual });
        }

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        writeln!(tmp, "{new}")?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.head_path()).map_err(|e| e.error)?;
        sync_dir(&self.root)?;

        debug!(from = ?expected, to = %new.short_hex(), "advanced head file");
        Ok(())
    }
}

fn sync_dir(dir: &Path) -> io::Result<()> {
    #[cfg(unix)]
    fs::File::open(dir)?.sync_all()?;
    #[cfg(not(unix))]
    let _ = dir;
    Ok(())
}
