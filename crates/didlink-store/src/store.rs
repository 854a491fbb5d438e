//! The [`SessionStore`] trait and its in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Serialize, de::DeserializeOwned};

use crate::{Codec, JsonCodec, StoreError};

/// A string-keyed byte store that survives process restarts.
///
/// This is the only persistence didlink uses. Operations are synchronous:
/// the stores it models (`localStorage`, a small directory of files) answer
/// immediately, and keeping them sync means no await point ever sits between
/// a read and the write that depends on it.
///
/// There is no locking across calls. Two writers for the same key simply
/// race; callers serialize access themselves.
pub trait SessionStore: Send + Sync + 'static {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Deletes `key`. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Returns `true` if a value is stored under `key`.
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Typed JSON access on top of any [`SessionStore`].
///
/// Implemented for every store (including `dyn SessionStore`) through the
/// blanket impl below.
pub trait SessionStoreExt: SessionStore {
    /// Reads and decodes a JSON value. Absent keys yield `Ok(None)`.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get(key)? {
            Some(bytes) => JsonCodec.decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Encodes `value` as JSON and stores it.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = JsonCodec.encode(value)?;
        self.set(key, &bytes)
    }
}

impl<S: SessionStore + ?Sized> SessionStoreExt for S {}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// A [`SessionStore`] that keeps everything in a `HashMap`.
///
/// Nothing survives the process. Useful in tests and for hosts that only
/// want per-run sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all stored keys, sorted. Handy for asserting on the whole
    /// store in tests.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        self.entries.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().remove(key);
        Ok(())
    }
}
