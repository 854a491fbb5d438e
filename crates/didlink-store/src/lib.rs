//! Persistent session storage for didlink.
//!
//! - **Store** ([`SessionStore`] trait, [`MemoryStore`], [`FileStore`]):
//!   a string-keyed byte store that outlives the process.
//! - **Keys** ([`session_key`], [`token_key`], …): how per-account state
//!   is laid out in the store.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how structured values are
//!   turned into bytes.
//! - **Errors** ([`StoreError`]).
//!
//! ```text
//! Controller (above)  ← persists sessions and tokens per address
//!     ↕
//! Store (this crate)  ← bytes under address-derived keys
//! ```

mod codec;
mod error;
mod file;
mod keys;
mod store;

pub use codec::{Codec, JsonCodec};
pub use error::StoreError;
pub use file::FileStore;
pub use keys::{
    CONNECTED_WALLETS_KEY, UPDATED_PLATFORMS_KEY, load_connected_wallets, load_platform_flags,
    save_connected_wallets, session_key, set_platform_flag, token_key,
};
pub use store::{MemoryStore, SessionStore, SessionStoreExt};
