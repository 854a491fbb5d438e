//! Codec trait and the JSON implementation used for structured values.
//!
//! The store itself only deals in bytes. Structured values (the
//! connected-wallet hint list, the platform flag map) go through a
//! [`Codec`] on the way in and out, so the byte format is decided in one
//! place.

use serde::{Serialize, de::DeserializeOwned};

use crate::StoreError;

/// Encodes values to bytes and decodes them back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns [`StoreError::Encode`] if the value can't be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns [`StoreError::Decode`] if the bytes are malformed or don't
    /// match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, StoreError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// JSON keeps stored values readable and matches what a browser-side
/// `localStorage` holds under the same keys.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(value).map_err(StoreError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, StoreError> {
        serde_json::from_slice(data).map_err(StoreError::Decode)
    }
}
