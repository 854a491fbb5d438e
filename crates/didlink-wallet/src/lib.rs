//! Wallet connector abstraction for didlink.
//!
//! Provides the [`WalletConnector`] and [`WalletProvider`] traits that
//! abstract over whatever wallet widget the host application embeds
//! (injected browser wallets, WalletConnect, hardware wallets), plus the
//! identifier types the rest of the stack keys its state on.
//!
//! didlink never talks to a wallet directly: it asks the connector for a
//! [`WalletHandle`] and drives the handle's provider.

#![allow(async_fn_in_trait)]

mod error;
mod event;
mod types;

pub use error::WalletError;
pub use event::WalletEvent;
pub use types::{AccountId, Address, ChainId};

use std::sync::Arc;

/// A connected wallet: who it is, how to talk to it, and which connector
/// produced it.
///
/// The provider is behind an `Arc` so the handle can be cloned into
/// long-lived state while the connector keeps its own reference.
#[derive(Debug)]
pub struct WalletHandle<P> {
    /// The account currently selected in the wallet.
    pub address: Address,
    /// Request-capable provider for chain queries and signing.
    pub provider: Arc<P>,
    /// Connector identifier (e.g. `"MetaMask"`), used as an auto-reconnect hint.
    pub label: String,
}

impl<P> WalletHandle<P> {
    pub fn new(address: Address, provider: P, label: impl Into<String>) -> Self {
        Self {
            address,
            provider: Arc::new(provider),
            label: label.into(),
        }
    }
}

// Manual impl: `derive(Clone)` would require `P: Clone`, but only the
// `Arc` is cloned.
impl<P> Clone for WalletHandle<P> {
    fn clone(&self) -> Self {
        Self {
            address: self.address.clone(),
            provider: Arc::clone(&self.provider),
            label: self.label.clone(),
        }
    }
}

/// The request surface of a connected wallet.
pub trait WalletProvider: Send + Sync + 'static {
    /// Returns the chain the wallet is currently on.
    async fn chain_id(&self) -> Result<ChainId, WalletError>;

    /// Asks the wallet to switch to `chain`.
    ///
    /// Returns `Ok(false)` when the user closes or declines the prompt.
    /// That is a normal answer, not an error.
    async fn switch_chain(&self, chain: ChainId) -> Result<bool, WalletError>;

    /// Signs an arbitrary message with the wallet's key (`personal_sign`).
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, WalletError>;
}

/// Connects and disconnects wallets.
pub trait WalletConnector: Send + Sync + 'static {
    /// The provider type handed out with each connected wallet.
    type Provider: WalletProvider;

    /// Prompts for (or silently restores) a wallet connection.
    ///
    /// `preferred` names a previously used connector label; connectors
    /// use it to reconnect without showing a picker.
    ///
    /// Returns `Ok(None)` when the user closes the picker.
    async fn connect(
        &self,
        preferred: Option<&str>,
    ) -> Result<Option<WalletHandle<Self::Provider>>, WalletError>;

    /// Disconnects the wallet with the given label.
    async fn disconnect(&self, label: &str) -> Result<(), WalletError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticProvider;

    impl WalletProvider for StaticProvider {
        async fn chain_id(&self) -> Result<ChainId, WalletError> {
            Ok(ChainId::MAINNET)
        }

        async fn switch_chain(&self, _chain: ChainId) -> Result<bool, WalletError> {
            Ok(true)
        }

        async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, WalletError> {
            Ok(message.iter().rev().copied().collect())
        }
    }

    #[test]
    fn test_wallet_handle_clone_shares_provider() {
        let handle = WalletHandle::new(Address::new("0xA"), StaticProvider, "Injected");
        let copy = handle.clone();

        assert!(Arc::ptr_eq(&handle.provider, &copy.provider));
        assert_eq!(copy.label, "Injected");
        assert_eq!(copy.address.as_str(), "0xa");
    }

    #[tokio::test]
    async fn test_provider_through_handle() {
        let handle = WalletHandle::new(Address::new("0xA"), StaticProvider, "Injected");

        assert!(handle.provider.chain_id().await.unwrap().is_mainnet());
        assert_eq!(handle.provider.sign_message(b"ab").await.unwrap(), b"ba");
    }
}
