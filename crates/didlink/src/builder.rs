//! Assembling a controller from its collaborators.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use didlink_session::{AuthSigner, SessionManager};
use didlink_store::{MemoryStore, SessionStore};
use didlink_token::{AccessTokenClient, HttpAccessTokenClient};
use didlink_wallet::WalletConnector;
use tokio::sync::Mutex;

use crate::{
    Clock, ControllerConfig, ControllerState, DidlinkError, SessionLifecycleController,
    SystemClock, Telemetry, TracingTelemetry,
};

/// Builder for a [`SessionLifecycleController`].
///
/// Anything not set falls back to an in-memory store, tracing-based
/// telemetry, and the system clock.
///
/// # Example
///
/// ```rust,ignore
/// use didlink::prelude::*;
///
/// let controller = ControllerBuilder::new()
///     .config(ControllerConfig::from_env()?)
///     .store(FileStore::open("./sessions")?)
///     .build_http(my_connector, my_signer)?;
///
/// controller.restore().await?;
/// ```
pub struct ControllerBuilder {
    config: ControllerConfig,
    store: Option<Arc<dyn SessionStore>>,
    telemetry: Option<Arc<dyn Telemetry>>,
    clock: Option<Arc<dyn Clock>>,
}

impl ControllerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ControllerConfig::default(),
            store: None,
            telemetry: None,
            clock: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ControllerConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides [`ControllerConfig::multichain`].
    pub fn multichain(mut self, enabled: bool) -> Self {
        self.config.multichain = enabled;
        self
    }

    /// Sets where sessions, tokens, and hints are persisted.
    pub fn store(mut self, store: impl SessionStore) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Sets the error reporter.
    pub fn telemetry(mut self, telemetry: impl Telemetry) -> Self {
        self.telemetry = Some(Arc::new(telemetry));
        self
    }

    /// Sets the time source for expiry checks.
    pub fn clock(mut self, clock: impl Clock) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Builds a controller around the given collaborators.
    pub fn build<W, S, T>(self, wallet: W, signer: S, tokens: T) -> SessionLifecycleController<W, S, T>
    where
        W: WalletConnector,
        S: AuthSigner,
        T: AccessTokenClient,
    {
        tracing::debug!(
            multichain = self.config.multichain,
            renewal_window_secs = self.config.session.renewal_window_secs,
            "building session lifecycle controller"
        );

        SessionLifecycleController {
            wallet,
            sessions: SessionManager::new(signer, self.config.session),
            tokens,
            store: self.store.unwrap_or_else(|| Arc::new(MemoryStore::new())),
            telemetry: self.telemetry.unwrap_or_else(|| Arc::new(TracingTelemetry)),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            multichain: self.config.multichain,
            state: Mutex::new(ControllerState::default()),
            login_latch: AtomicBool::new(false),
        }
    }

    /// Builds a controller that talks to the backend at
    /// [`ControllerConfig::backend_url`] over HTTP.
    ///
    /// # Errors
    /// [`DidlinkError::Token`] if the backend URL is unusable.
    pub fn build_http<W, S>(
        self,
        wallet: W,
        signer: S,
    ) -> Result<SessionLifecycleController<W, S, HttpAccessTokenClient>, DidlinkError>
    where
        W: WalletConnector,
        S: AuthSigner,
    {
        let tokens =
            HttpAccessTokenClient::new(&self.config.backend_url, self.config.request_timeout)?;
        Ok(self.build(wallet, signer, tokens))
    }
}

impl Default for ControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
