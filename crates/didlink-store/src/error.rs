//! Error types for the storage layer.

/// Errors that can occur while reading or writing the session store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Serializing a value before storing it failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// A stored value could not be decoded into the expected type.
    ///
    /// Usually a value written by an older version, or edited by hand.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The key cannot be used with this store (empty, or contains
    /// characters a file-backed store can't represent safely).
    #[error("invalid store key: {0:?}")]
    InvalidKey(String),

    /// The underlying storage medium failed.
    #[error("store I/O failed for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
}
