use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{validate_key, KvStore};

/// Directory-backed storage namespace.
///
/// Each key is a file named after the key inside the root directory.
/// Writes go to a temporary file in the same directory which is then
/// renamed over the target, so a crash mid-write leaves either the old or
/// the new value, never a torn one. Temporary files start with `.` and are
/// therefore never reported as keys.
pub struct FileKvStore {
    root: PathBuf,
}

impl FileKvStore {
    /// Open (or create) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// The directory holding the stored values.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => Err(StoreError::InvalidUtf8 {
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value.as_bytes())?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
        debug!(key, len = value.len(), path = %path.display(), "file store set");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if validate_key(name).is_ok() {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.path_for(key)?.is_file())
    }
}

impl std::fmt::Debug for FileKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileKvStore")
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileKvStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::open(dir.path().join("storage")).unwrap();
        (dir, store)
    }

    #[test]
    fn open_creates_directory() {
        let (dir, store) = temp_store();
        assert!(dir.path().join("storage").is_dir());
        assert_eq!(store.root(), dir.path().join("storage").as_path());
    }

    #[test]
    fn set_then_get() {
        let (_dir, store) = temp_store();
        store.set("site_content_v1", "{\"cn\":{}}").unwrap();
        assert_eq!(
            store.get("site_content_v1").unwrap().as_deref(),
            Some("{\"cn\":{}}")
        );
        assert!(store.contains("site_content_v1").unwrap());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileKvStore::open(dir.path()).unwrap();
            store.set("cookieConsent", "false").unwrap();
        }
        let reopened = FileKvStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get("cookieConsent").unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn unicode_values_roundtrip() {
        let (_dir, store) = temp_store();
        store.set("k", "智慧投资，共创未来").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("智慧投资，共创未来"));
    }

    #[test]
    fn missing_key_is_none() {
        let (_dir, store) = temp_store();
        assert!(store.get("absent").unwrap().is_none());
        assert!(!store.remove("absent").unwrap());
    }

    #[test]
    fn remove_deletes_file() {
        let (_dir, store) = temp_store();
        store.set("k", "v").unwrap();
        assert!(store.remove("k").unwrap());
        assert!(!store.root().join("k").exists());
    }

    #[test]
    fn keys_ignore_foreign_files() {
        let (_dir, store) = temp_store();
        store.set("b", "2").unwrap();
        store.set("a", "1").unwrap();
        fs::write(store.root().join(".tmp123"), "x").unwrap();
        fs::create_dir(store.root().join("subdir")).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn path_traversal_rejected() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.set("../outside", "v"),
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn invalid_utf8_reported() {
        let (_dir, store) = temp_store();
        fs::write(store.root().join("bin"), [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            store.get("bin"),
            Err(StoreError::InvalidUtf8 { .. })
        ));
    }
}
