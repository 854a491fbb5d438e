//! A [`SessionStore`] backed by a directory of files.
//!
//! Each key maps to one file named after the key. Writes go to a temporary
//! sibling first and are renamed into place, so a crash mid-write leaves
//! either the old value or the new one, never a torn file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::{SessionStore, StoreError};

/// File-backed store rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            key: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }

    /// The directory this store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let suffix: u32 = rand::rng().random();
        let tmp = self.root.join(format!(".{key}.{suffix:08x}.tmp"));

        let io_err = |source: std::io::Error| StoreError::Io {
            key: key.to_string(),
            source,
        };
        fs::write(&tmp, value).map_err(io_err)?;
        if let Err(source) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_err(source));
        }

        tracing::trace!(key, bytes = value.len(), "store entry written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}

/// Keys become file names, so only a conservative character set is allowed
/// and a leading dot (reserved for temp files) is rejected.
fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("didsession-0xabc", b"opaque").unwrap();

        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("didsession-0xabc").unwrap(),
            Some(b"opaque".to_vec())
        );
    }

    #[test]
    fn test_file_store_get_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("connectedWallets").unwrap(), None);
    }

    #[test]
    fn test_file_store_remove_deletes_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("k", b"v").unwrap();

        store.remove("k").unwrap();
        store.remove("k").unwrap();

        assert!(!store.contains("k").unwrap());
    }

    #[test]
    fn test_file_store_overwrite_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("k", b"one").unwrap();
        store.set("k", b"two").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["k".to_string()]);
        assert_eq!(store.get("k").unwrap(), Some(b"two".to_vec()));
    }

    #[test]
    fn test_validate_key_rejects_path_tricks() {
        for bad in ["", "../escape", "a/b", "a\\b", ".hidden", "sp ace"] {
            assert!(
                matches!(validate_key(bad), Err(StoreError::InvalidKey(_))),
                "{bad:?} should be rejected"
            );
        }
        assert!(validate_key("dbcache-token-0xabc").is_ok());
    }
}
