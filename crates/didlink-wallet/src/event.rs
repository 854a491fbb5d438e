//! State-change notifications published by a wallet connector.

use crate::{Address, ChainId};

/// Something changed on the wallet side.
///
/// Connectors push these into a channel; the controller consumes them one
/// at a time, so handlers never run concurrently with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// The wallet's active account changed (or was re-reported).
    AccountsChanged(Address),

    /// The wallet moved to another chain.
    ChainChanged(ChainId),

    /// The wallet was disconnected from the wallet side.
    Disconnected,
}
