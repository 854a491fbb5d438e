//! Reacting to what the wallet reports on its own.
//!
//! Wallets push events (account switched, network switched, disconnected)
//! outside of any controller call. The host forwards them into an mpsc
//! channel and runs [`SessionLifecycleController::drive`] on the receiving
//! end, or calls [`handle_wallet_event`](SessionLifecycleController::handle_wallet_event)
//! directly from its own event loop.

use didlink_session::AuthSigner;
use didlink_token::AccessTokenClient;
use didlink_wallet::{WalletConnector, WalletEvent};
use tokio::sync::mpsc;

use crate::SessionLifecycleController;

impl<W, S, T> SessionLifecycleController<W, S, T>
where
    W: WalletConnector,
    S: AuthSigner,
    T: AccessTokenClient,
{
    /// Applies one wallet event. Returns `true` if it caused a disconnect.
    ///
    /// - `AccountsChanged`: disconnects if the address differs from the
    ///   recorded one.
    /// - `ChainChanged`: disconnects if the new chain isn't mainnet and
    ///   multichain is off.
    /// - `Disconnected`: disconnects if an account is recorded.
    pub async fn handle_wallet_event(&self, event: WalletEvent) -> bool {
        match event {
            WalletEvent::AccountsChanged(address) => self.reconcile_address(&address).await,
            WalletEvent::ChainChanged(chain) => {
                if self.multichain || chain.is_mainnet() {
                    tracing::debug!(%chain, "wallet chain changed");
                    return false;
                }
                if self.address().await.is_none() {
                    return false;
                }
                tracing::warn!(%chain, "wallet left mainnet, disconnecting");
                self.disconnect().await;
                true
            }
            WalletEvent::Disconnected => {
                if self.address().await.is_none() {
                    return false;
                }
                tracing::info!("wallet reported disconnect");
                self.disconnect().await;
                true
            }
        }
    }

    /// Handles events one at a time until every sender is dropped.
    pub async fn drive(&self, mut events: mpsc::Receiver<WalletEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_wallet_event(event).await;
        }
        tracing::debug!("wallet event stream closed");
    }
}
