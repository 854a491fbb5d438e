//! The session lifecycle controller.
//!
//! Ties the layers together: wallet → identity session → access token.
//!
//! ```text
//! connect() ──→ WalletConnector::connect ──→ login() ──→ obtain_access_token()
//!                                              │                 │
//!                                    resume-or-renew      nonce → sign → authenticate
//!                                              │                 │
//!                                   failure: teardown     failure: status Failed
//! ```
//!
//! # Concurrency
//!
//! Operations take `&self` and may interleave at await points:
//! - a login latch: a second `login` while one is running returns
//!   [`LoginOutcome::Busy`] without touching anything;
//! - a disconnect epoch: a login that was waiting when `disconnect` ran
//!   throws its session away with [`DidlinkError::SessionChanged`]. The
//!   token exchange re-checks its binding the same way before storing;
//! - the in-memory state sits behind a mutex that is never held across an
//!   await on a collaborator.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use didlink_session::{AuthSigner, DidSession, SessionError, SessionManager};
use didlink_store::{SessionStore, load_connected_wallets, save_connected_wallets, session_key, token_key};
use didlink_token::{AccessToken, AccessTokenClient, AccessTokenState, AuthenticatePayload, TokenError, TokenStatus};
use didlink_wallet::{AccountId, Address, ChainId, WalletConnector, WalletHandle, WalletProvider};
use tokio::sync::Mutex;

use crate::{Clock, DidlinkError, Telemetry};

/// Message shown to the user when establishing a session fails.
const WALLET_CONNECTION_MESSAGE: &str = "Unable to connect wallet. Please try again.";

// ---------------------------------------------------------------------------
// State and outcomes
// ---------------------------------------------------------------------------

/// Everything the controller knows about the current connection.
///
/// Cleared as a whole on disconnect and teardown. Callers get copies
/// through [`SessionLifecycleController::snapshot`].
#[derive(Debug, Clone, Default)]
pub struct ControllerState {
    /// Address of the logged-in wallet.
    pub address: Option<Address>,
    /// Connector label of the logged-in wallet.
    pub wallet_label: Option<String>,
    /// The established identity session.
    pub session: Option<DidSession>,
    /// Access-token exchange state, bound to `session`.
    pub token: AccessTokenState,
    /// Labels of wallets to reconnect on startup (mirrors the store hint).
    pub connected_wallets: Vec<String>,
    /// User-facing message from the last failed login.
    pub wallet_error: Option<String>,
    /// Bumped by every [`disconnect`](SessionLifecycleController::disconnect).
    /// A login that started under an older epoch does not commit.
    pub epoch: u64,
}

/// Result of [`SessionLifecycleController::login`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A usable session is persisted and bound to the wallet.
    Connected(DidSession),
    /// The wallet is not on mainnet and did not switch. Nothing changed.
    WrongChain,
    /// Another login is still running. Nothing changed.
    Busy,
}

/// Result of [`SessionLifecycleController::connect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectReport {
    /// Session established and access token obtained.
    Connected { session: DidSession, token: AccessToken },
    /// The user closed the wallet picker.
    Cancelled,
    /// See [`LoginOutcome::WrongChain`].
    WrongChain,
    /// See [`LoginOutcome::Busy`].
    Busy,
}

/// Drop guard that releases the login latch on every exit path.
struct LoginLatch<'a>(&'a AtomicBool);

impl<'a> LoginLatch<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoginLatch<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Decides whether a stored identity session is usable, renews it when it
/// isn't, and obtains the backend access token bound to it.
///
/// Build one with [`ControllerBuilder`](crate::ControllerBuilder).
pub struct SessionLifecycleController<W, S, T>
where
    W: WalletConnector,
    S: AuthSigner,
    T: AccessTokenClient,
{
    pub(crate) wallet: W,
    pub(crate) sessions: SessionManager<S>,
    pub(crate) tokens: T,
    pub(crate) store: Arc<dyn SessionStore>,
    pub(crate) telemetry: Arc<dyn Telemetry>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) multichain: bool,
    pub(crate) state: Mutex<ControllerState>,
    pub(crate) login_latch: AtomicBool,
}

impl<W, S, T> SessionLifecycleController<W, S, T>
where
    W: WalletConnector,
    S: AuthSigner,
    T: AccessTokenClient,
{
    // -- Accessors --------------------------------------------------------

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn signer(&self) -> &S {
        self.sessions.signer()
    }

    pub fn token_client(&self) -> &T {
        &self.tokens
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// A copy of the current state.
    pub async fn snapshot(&self) -> ControllerState {
        self.state.lock().await.clone()
    }

    pub async fn status(&self) -> TokenStatus {
        self.state.lock().await.token.status()
    }

    /// The cached access token. Not revalidated: it stays until the session
    /// changes or the wallet disconnects.
    pub async fn access_token(&self) -> Option<AccessToken> {
        self.state.lock().await.token.token().cloned()
    }

    pub async fn address(&self) -> Option<Address> {
        self.state.lock().await.address.clone()
    }

    pub async fn wallet_error(&self) -> Option<String> {
        self.state.lock().await.wallet_error.clone()
    }

    pub fn is_login_pending(&self) -> bool {
        self.login_latch.load(Ordering::Acquire)
    }

    // -- connect / restore ------------------------------------------------

    /// Connects a wallet, logs in, and obtains an access token.
    ///
    /// `preferred` is passed to the connector to reconnect a known wallet.
    ///
    /// # Errors
    /// - [`DidlinkError::Wallet`] if the connector fails
    /// - [`DidlinkError::WalletConnection`] if the session can't be established
    /// - [`DidlinkError::Token`] if the token exchange fails (the session stays)
    /// - [`DidlinkError::SessionChanged`] if a disconnect interleaved
    pub async fn connect(&self, preferred: Option<&str>) -> Result<ConnectReport, DidlinkError> {
        let Some(handle) = self.wallet.connect(preferred).await? else {
            tracing::debug!("wallet selection cancelled");
            return Ok(ConnectReport::Cancelled);
        };

        match self.login(&handle).await? {
            LoginOutcome::Connected(session) => {
                self.update_wallet_hint(&handle.label, true).await;
                let token = self.obtain_access_token(&session).await?;
                Ok(ConnectReport::Connected { session, token })
            }
            LoginOutcome::WrongChain => Ok(ConnectReport::WrongChain),
            LoginOutcome::Busy => Ok(ConnectReport::Busy),
        }
    }

    /// Reconnects the most recently used wallet, if the store remembers one.
    pub async fn restore(&self) -> Result<Option<ConnectReport>, DidlinkError> {
        let labels = load_connected_wallets(self.store.as_ref())?;
        let Some(label) = labels.first() else {
            return Ok(None);
        };
        tracing::info!(wallet = %label, "restoring previous wallet connection");
        self.connect(Some(label)).await.map(Some)
    }

    /// Puts `label` at the front of the reconnect hint, or drops it so
    /// `restore` won't retry it. The hint is advisory, so a store failure
    /// is logged and ignored.
    async fn update_wallet_hint(&self, label: &str, remember: bool) {
        let mut state = self.state.lock().await;
        let mut labels = match load_connected_wallets(self.store.as_ref()) {
            Ok(labels) => labels,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read connected wallets hint");
                state.connected_wallets.clone()
            }
        };
        labels.retain(|l| l != label);
        if remember {
            labels.insert(0, label.to_string());
        }
        if let Err(e) = save_connected_wallets(self.store.as_ref(), &labels) {
            tracing::warn!(error = %e, "failed to save connected wallets hint");
        }
        state.connected_wallets = labels;
    }

    // -- login ------------------------------------------------------------

    /// Produces a usable identity session for `handle`.
    ///
    /// Resumes the stored session when it is valid, renews it otherwise.
    /// On any failure while loading, resuming, or renewing, all state for
    /// the wallet is torn down and [`DidlinkError::WalletConnection`] is
    /// returned. If [`disconnect`](Self::disconnect) runs while the login is
    /// waiting on the wallet or signer, the new session is discarded and
    /// [`DidlinkError::SessionChanged`] is returned.
    pub async fn login(
        &self,
        handle: &WalletHandle<W::Provider>,
    ) -> Result<LoginOutcome, DidlinkError> {
        let Some(_latch) = LoginLatch::acquire(&self.login_latch) else {
            tracing::debug!(address = %handle.address, "login already in progress");
            return Ok(LoginOutcome::Busy);
        };

        let epoch = self.state.lock().await.epoch;
        let address = handle.address.clone();
        let chain = match self.target_chain(handle.provider.as_ref()).await {
            Ok(Some(chain)) => chain,
            Ok(None) => {
                tracing::warn!(%address, "wallet is not on mainnet, login aborted");
                return Ok(LoginOutcome::WrongChain);
            }
            Err(e) => return Err(self.fail_login(handle, e).await),
        };

        self.forget_previous_account(&address).await;

        let account = AccountId::new(address.clone(), chain);
        let established = self
            .sessions
            .establish(
                self.store.as_ref(),
                handle.provider.as_ref(),
                &account,
                self.clock.now(),
            )
            .await;

        let (session, how) = match established {
            Ok(ok) => ok,
            Err(e) => return Err(self.fail_login(handle, e).await),
        };

        {
            let mut state = self.state.lock().await;
            if state.epoch == epoch {
                // A token on disk belongs to the previous session.
                if let Err(e) = self.store.remove(&token_key(&address)) {
                    tracing::warn!(%address, error = %e, "failed to remove stale access token");
                }
                state.address = Some(address.clone());
                state.wallet_label = Some(handle.label.clone());
                state.session = Some(session.clone());
                state.token.rebind(address.clone());
                state.wallet_error = None;
            } else {
                drop(state);
                tracing::warn!(%address, "disconnected during login, discarding session");
                if let Err(e) = self.wallet.disconnect(&handle.label).await {
                    tracing::warn!(wallet = %handle.label, error = %e, "wallet disconnect failed");
                }
                self.remove_account_keys(&address);
                return Err(DidlinkError::SessionChanged);
            }
        }

        tracing::info!(%account, establishment = ?how, "logged in");
        Ok(LoginOutcome::Connected(session))
    }

    /// Picks the chain to authorize on. `Ok(None)` means wrong chain.
    ///
    /// With multichain on, the wallet's current chain is used as-is and a
    /// failure to read it is a login failure. Otherwise the wallet must be
    /// on (or switch to) mainnet; any failure along the way counts as
    /// "wrong chain".
    async fn target_chain(
        &self,
        provider: &W::Provider,
    ) -> Result<Option<ChainId>, SessionError> {
        if self.multichain {
            return Ok(Some(provider.chain_id().await?));
        }

        match provider.chain_id().await {
            Ok(chain) if chain.is_mainnet() => return Ok(Some(chain)),
            Ok(chain) => tracing::info!(%chain, "requesting switch to mainnet"),
            Err(e) => tracing::warn!(error = %e, "could not read wallet chain"),
        }

        match provider.switch_chain(ChainId::MAINNET).await {
            Ok(true) => Ok(Some(ChainId::MAINNET)),
            Ok(false) => Ok(None),
            Err(e) => {
                tracing::warn!(error = %e, "chain switch failed");
                Ok(None)
            }
        }
    }

    /// Tears down after a failed login and builds the user-facing error.
    async fn fail_login(
        &self,
        handle: &WalletHandle<W::Provider>,
        error: SessionError,
    ) -> DidlinkError {
        self.telemetry.report(&error, "login");
        tracing::warn!(address = %handle.address, error = %error, "login failed, tearing down");

        if let Err(e) = self.wallet.disconnect(&handle.label).await {
            tracing::warn!(wallet = %handle.label, error = %e, "wallet disconnect failed");
        }
        self.remove_account_keys(&handle.address);
        self.update_wallet_hint(&handle.label, false).await;

        let mut state = self.state.lock().await;
        clear_account(&mut state);
        state.wallet_error = Some(WALLET_CONNECTION_MESSAGE.to_string());

        DidlinkError::WalletConnection {
            message: WALLET_CONNECTION_MESSAGE.to_string(),
            source: error,
        }
    }

    /// If a different account is still recorded, drop its state before the
    /// new login touches anything.
    async fn forget_previous_account(&self, next: &Address) {
        let previous = {
            let mut state = self.state.lock().await;
            match state.address.clone() {
                Some(previous) if &previous != next => {
                    clear_account(&mut state);
                    previous
                }
                _ => return,
            }
        };
        tracing::info!(%previous, %next, "account changed, clearing previous session");
        self.remove_account_keys(&previous);
    }

    // -- access token -----------------------------------------------------

    /// Exchanges a signed nonce for an access token bound to `session`.
    ///
    /// Single attempt. On failure the status becomes
    /// [`TokenStatus::Failed`], the error is reported to telemetry and then
    /// returned.
    ///
    /// # Errors
    /// - [`TokenError::InvalidTransition`] if an attempt already ran for this session
    /// - [`TokenError::NonceUnavailable`], [`TokenError::SigningFailed`],
    ///   [`TokenError::AuthenticationRejected`] from the exchange itself
    /// - [`DidlinkError::SessionChanged`] if the account went away meanwhile
    pub async fn obtain_access_token(&self, session: &DidSession) -> Result<AccessToken, DidlinkError> {
        {
            let mut state = self.state.lock().await;
            if state.token.subject() != Some(&session.subject) {
                state.token.rebind(session.subject.clone());
            }
            state.token.begin()?;
        }

        let exchanged = self.exchange(session).await;

        let mut state = self.state.lock().await;
        let still_bound = state.address.as_ref() == Some(&session.subject)
            && state.token.subject() == Some(&session.subject)
            && state.token.status() == TokenStatus::Connecting;

        let result = match exchanged {
            Ok(_) if !still_bound => {
                tracing::warn!(subject = %session.subject, "discarding access token for a replaced session");
                return Err(DidlinkError::SessionChanged);
            }
            Ok(token) => self
                .store
                .set(&token_key(&session.subject), token.as_str().as_bytes())
                .map(|()| token)
                .map_err(DidlinkError::from),
            Err(e) => Err(e),
        };

        match result {
            Ok(token) => {
                state.token.complete(token.clone())?;
                tracing::info!(subject = %session.subject, "access token obtained");
                Ok(token)
            }
            Err(e) => {
                if still_bound {
                    state.token.fail()?;
                }
                drop(state);
                self.telemetry.report(&e, "access_token");
                tracing::warn!(subject = %session.subject, error = %e, "access token exchange failed");
                Err(e)
            }
        }
    }

    /// nonce → sign → authenticate. No state changes.
    async fn exchange(&self, session: &DidSession) -> Result<AccessToken, DidlinkError> {
        let nonce = self.tokens.fetch_nonce().await?;

        let artifact = self
            .sessions
            .signer()
            .sign(session, &serde_json::json!({ "nonce": nonce }))
            .await
            .map_err(|e| TokenError::SigningFailed(e.to_string()))?;
        let payload = AuthenticatePayload::from_artifact(artifact, nonce)?;

        Ok(self.tokens.authenticate(&payload).await?)
    }

    // -- disconnect / reconcile -------------------------------------------

    /// Disconnects the wallet and the identity network and clears all
    /// state for the recorded account, including its stored session and
    /// token and the reconnect hint.
    ///
    /// Never fails: each step is attempted and failures are logged.
    /// Calling it again is harmless.
    pub async fn disconnect(&self) {
        let (address, label) = {
            let mut state = self.state.lock().await;
            let recorded = (state.address.clone(), state.wallet_label.clone());
            *state = ControllerState {
                epoch: state.epoch.wrapping_add(1),
                ..ControllerState::default()
            };
            recorded
        };

        if let Some(label) = &label {
            if let Err(e) = self.wallet.disconnect(label).await {
                tracing::warn!(wallet = %label, error = %e, "wallet disconnect failed");
            }
        }
        if let Err(e) = self.sessions.signer().close().await {
            tracing::warn!(error = %e, "identity network disconnect failed");
        }
        if let Some(address) = &address {
            self.remove_account_keys(address);
        }
        if let Err(e) = save_connected_wallets(self.store.as_ref(), &[]) {
            tracing::warn!(error = %e, "failed to reset connected wallets hint");
        }

        match address {
            Some(address) => tracing::info!(%address, "disconnected"),
            None => tracing::debug!("disconnect with no active account"),
        }
    }

    /// Handles a wallet reporting `reported` as its active address.
    ///
    /// Returns `true` if it differed from the recorded address and
    /// everything was disconnected.
    pub async fn reconcile_address(&self, reported: &Address) -> bool {
        let recorded = self.state.lock().await.address.clone();
        match recorded {
            Some(current) if &current != reported => {
                tracing::info!(%current, %reported, "wallet address changed");
                self.disconnect().await;
                true
            }
            _ => false,
        }
    }

    // -- helpers ----------------------------------------------------------

    fn remove_account_keys(&self, address: &Address) {
        for key in [session_key(address), token_key(address)] {
            if let Err(e) = self.store.remove(&key) {
                tracing::warn!(%key, error = %e, "failed to remove stored key");
            }
        }
    }
}

/// Resets the account-derived part of the state. The reconnect hint, the
/// last error message and the epoch are left alone.
fn clear_account(state: &mut ControllerState) {
    state.address = None;
    state.wallet_label = None;
    state.session = None;
    state.token.reset();
}
