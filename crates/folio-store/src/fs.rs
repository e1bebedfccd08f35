//! Filesystem object store.
//!
//! Layout, analogous to git's loose objects:
//!
//! ```text
//! {root}/objects/
//! +-- 3f/
//! |   +-- 9a0c...    # "<kind>\n" header followed by the object data
//! +-- ...
//! ```
//!
//! Writes go to a temporary file in the target directory, are synced, then
//! renamed into place, so a reader never observes a partial object. The
//! directory holding the new entry is synced after the rename, so an object
//! is durable before `write` returns.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use folio_types::ObjectId;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::{ObjectKind, StoredObject};
use crate::traits::ObjectStore;

/// One-file-per-object store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    objects_dir: PathBuf,
}

impl FsObjectStore {
    /// Open (creating if needed) the store under `{root}/objects`.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let objects_dir = root.as_ref().join("objects");
        fs::create_dir_all(&objects_dir)?;
        Ok(Self { objects_dir })
    }

    fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        let (fanout, rest) = hex.split_at(2);
        self.objects_dir.join(fanout).join(rest)
    }

    fn decode(id: &ObjectId, raw: Vec<u8>) -> StoreResult<StoredObject> {
        let split = raw
            .iter()
            .position(|b| *b == b'\n')
            .ok_or_else(|| StoreError::CorruptObject {
                id: *id,
                reason: "missing header".into(),
            })?;
        let tag = std::str::from_utf8(&raw[..split]).unwrap_or("");
        let kind = ObjectKind::parse(tag).ok_or_else(|| StoreError::CorruptObject {
            id: *id,
            reason: format!("unknown object kind {tag:?}"),
        })?;
        let object = StoredObject::new(kind, raw[split + 1..].to_vec());

        let computed = object.compute_id();
        if computed != *id {
            return Err(StoreError::HashMismatch { id: *id, computed });
        }
        Ok(object)
    }
}

impl ObjectStore for FsObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        match fs::read(self.object_path(id)) {
            Ok(raw) => Self::decode(id, raw).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        if id.is_null() {
            return Err(StoreError::NullObjectId);
        }
        let path = self.object_path(&id);
        if path.exists() {
            return Ok(id);
        }
        let dir = path
            .parent()
            .ok_or_else(|| StoreError::Serialization(format!("bad object path {path:?}")))?;
        if !dir.is_dir() {
            fs::create_dir_all(dir)?;
            sync_dir(&self.objects_dir)?;
        }

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(object.kind.as_str().as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.write_all(&object.data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        sync_dir(dir)?;

        debug!(id = %id.short_hex(), kind = %object.kind, size = object.size(), "wrote object file");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).is_file())
    }
}

/// Flush a directory's entries so a rename into it survives a crash.
fn sync_dir(dir: &Path) -> io::Result<()> {
    #[cfg(unix)]
    fs::File::open(dir)?.sync_all()?;
    #[cfg(not(unix))]
    let _ = dir;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Tree, TreeEntry};

    #[test]
    fn write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path()).unwrap();

        let blob = store.write_blob(b"= Title =\n\nbody\n").unwrap();
        let tree_id = store
            .write_tree(&Tree::new(vec![TreeEntry::new("intro.rst", blob)]))
            .unwrap();

        assert!(store.exists(&blob).unwrap());
        assert_eq!(store.read_blob(&blob).unwrap().data, b"= Title =\n\nbody\n");
        assert!(store.read_tree(&tree_id).unwrap().contains("intro.rst"));
    }

    #[test]
    fn objects_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id = FsObjectStore::open(dir.path())
            .unwrap()
            .write_blob(b"persistent")
            .unwrap();

        let reopened = FsObjectStore::open(dir.path()).unwrap();
        assert_eq!(reopened.read_blob(&id).unwrap().data, b"persistent");
    }

    #[test]
    fn first_object_in_fanout_creates_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path()).unwrap();
        let id = store.write_blob(b"fresh").unwrap();

        let fanout = store.object_path(&id).parent().unwrap().to_path_buf();
        assert!(fanout.is_dir());
        sync_dir(&fanout).unwrap();
        sync_dir(&store.objects_dir).unwrap();
    }

    #[test]
    fn write_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path()).unwrap();
        let id1 = store.write_blob(b"same").unwrap();
        let id2 = store.write_blob(b"same").unwrap();
        assert_eq!(id1, id2);
    }

    #[test]
    fn missing_object_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path()).unwrap();
        let id = ObjectId::from_bytes(b"nothing");
        assert!(store.read(&id).unwrap().is_none());
        assert!(!store.exists(&id).unwrap());
    }

    #[test]
    fn corrupted_object_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path()).unwrap();
        let id = store.write_blob(b"original").unwrap();

        fs::write(store.object_path(&id), b"blob\ntampered").unwrap();
        assert!(matches!(
            store.read(&id),
            Err(StoreError::HashMismatch { id: bad, .. }) if bad == id
        ));
    }

    #[test]
    fn missing_header_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::open(dir.path()).unwrap();
        let id = store.write_blob(b"x").unwrap();

        fs::write(store.object_path(&id), b"no header here").unwrap();
        assert!(matches!(
            store.read(&id),
            Err(StoreError::CorruptObject { .. })
        ));
    }
}
