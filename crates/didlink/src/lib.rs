//! # didlink
//!
//! Wallet-backed identity sessions and backend access tokens.
//!
//! A user connects a wallet; didlink makes sure there is a usable
//! identity session for that wallet (resuming the stored one or asking the
//! wallet to authorize a new one), then trades a signed nonce for a backend
//! access token. When the wallet switches accounts or disconnects, all of
//! it is torn down.
//!
//! The host plugs in three things:
//! - a [`WalletConnector`] for the wallet widget it embeds,
//! - an [`AuthSigner`] for the DID session library it uses,
//! - optionally an [`AccessTokenClient`] (the default speaks HTTP).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use didlink::prelude::*;
//!
//! didlink::init_tracing();
//!
//! let controller = ControllerBuilder::new()
//!     .config(ControllerConfig::from_env()?)
//!     .build_http(my_connector, my_signer)?;
//!
//! match controller.connect(None).await? {
//!     ConnectReport::Connected { token, .. } => use_token(token),
//!     ConnectReport::WrongChain => ask_user_to_switch(),
//!     ConnectReport::Cancelled | ConnectReport::Busy => {}
//! }
//! ```

#![allow(async_fn_in_trait)]

mod builder;
mod clock;
mod config;
mod controller;
mod error;
mod events;
mod telemetry;

pub use builder::ControllerBuilder;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ControllerConfig, ENV_BACKEND_URL, ENV_FEATURE_MULTICHAIN, ENV_RENEWAL_WINDOW_SECS};
pub use controller::{ConnectReport, ControllerState, LoginOutcome, SessionLifecycleController};
pub use error::DidlinkError;
pub use telemetry::{Telemetry, TracingTelemetry};

// Re-export sub-crates for advanced usage.
pub use didlink_session as session;
pub use didlink_store as store;
pub use didlink_token as token;
pub use didlink_wallet as wallet;

pub use didlink_session::AuthSigner;
pub use didlink_token::AccessTokenClient;
pub use didlink_wallet::WalletConnector;

/// Convenient imports for hosts wiring up a controller.
pub mod prelude {
    pub use crate::{
        ConnectReport, ControllerBuilder, ControllerConfig, DidlinkError, LoginOutcome,
        SessionLifecycleController, Telemetry,
    };
    pub use didlink_session::{AuthSigner, DidSession, IdentitySession, JwsArtifact};
    pub use didlink_store::{FileStore, MemoryStore, SessionStore};
    pub use didlink_token::{AccessToken, AccessTokenClient, TokenStatus};
    pub use didlink_wallet::{
        AccountId, Address, ChainId, WalletConnector, WalletEvent, WalletHandle, WalletProvider,
    };
}

/// Installs a `tracing` fmt subscriber filtered by `RUST_LOG`
/// (default `didlink=info`).
///
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("didlink=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_does_not_panic() {
        init_tracing();
        init_tracing();
    }
}
