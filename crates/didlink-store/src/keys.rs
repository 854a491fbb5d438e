//! Storage keys and the small structured values kept next to sessions.
//!
//! Every per-account key is derived from the account's [`Address`], so
//! state for different accounts never collides.

use std::collections::BTreeMap;

use didlink_wallet::Address;

use crate::{SessionStore, SessionStoreExt, StoreError};

/// Key holding the JSON array of wallet labels to reconnect on startup.
pub const CONNECTED_WALLETS_KEY: &str = "connectedWallets";

/// Key holding a JSON object of boolean per-platform flags.
pub const UPDATED_PLATFORMS_KEY: &str = "updatedPlatforms";

/// Key for the serialized identity session of `address`.
pub fn session_key(address: &Address) -> String {
    format!("didsession-{address}")
}

/// Key for the cached backend access token of `address`.
pub fn token_key(address: &Address) -> String {
    format!("dbcache-token-{address}")
}

// ---------------------------------------------------------------------------
// Connected-wallet hint
// ---------------------------------------------------------------------------

/// Reads the labels of previously connected wallets.
///
/// A missing key means "nothing to reconnect". A value that fails to decode
/// is treated the same way; the hint is advisory and a corrupt one should
/// not block connecting.
pub fn load_connected_wallets(store: &dyn SessionStore) -> Result<Vec<String>, StoreError> {
    match store.get_json::<Vec<String>>(CONNECTED_WALLETS_KEY) {
        Ok(labels) => Ok(labels.unwrap_or_default()),
        Err(StoreError::Decode(e)) => {
            tracing::debug!(error = %e, "ignoring undecodable connected-wallets hint");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Replaces the connected-wallet hint.
pub fn save_connected_wallets(store: &dyn SessionStore, labels: &[String]) -> Result<(), StoreError> {
    store.set_json(CONNECTED_WALLETS_KEY, &labels)
}

// ---------------------------------------------------------------------------
// Platform flags
// ---------------------------------------------------------------------------

/// Reads the `updatedPlatforms` flag map (empty if absent).
pub fn load_platform_flags(store: &dyn SessionStore) -> Result<BTreeMap<String, bool>, StoreError> {
    Ok(store.get_json(UPDATED_PLATFORMS_KEY)?.unwrap_or_default())
}

/// Sets one flag in the `updatedPlatforms` map, keeping the others.
pub fn set_platform_flag(store: &dyn SessionStore, platform: &str, value: bool) -> Result<(), StoreError> {
    let mut flags = load_platform_flags(store)?;
    flags.insert(platform.to_string(), value);
    store.set_json(UPDATED_PLATFORMS_KEY, &flags)
}
