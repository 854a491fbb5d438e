//! The session manager: loads, validates, and renews identity sessions.
//!
//! This is the decision point for "can we keep using what's stored, or do we
//! need the wallet to sign a new authorization?"
//!
//! ```text
//! load() ──→ IdentitySession ──→ into_usable()
//!                                   │
//!                     ┌─────────────┴─────────────┐
//!                     ▼                           ▼
//!              Ok → [Resumed]        SessionInvalid → renew() → [Renewed]
//! ```
//!
//! Any other error propagates unchanged; the caller decides how to tear down.

use chrono::{DateTime, Utc};
use didlink_store::{SessionStore, session_key};
use didlink_wallet::{AccountId, Address, WalletProvider};

use crate::{AuthSigner, DidSession, IdentitySession, SessionConfig, SessionError};

/// How a usable session was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Establishment {
    /// The stored session was still good.
    Resumed,
    /// A new session was authorized and persisted.
    Renewed,
}

/// Owns the signer and the renewal policy.
///
/// Stateless apart from those two: the persisted session lives in the
/// [`SessionStore`] passed to each call.
pub struct SessionManager<S: AuthSigner> {
    signer: S,
    config: SessionConfig,
}

impl<S: AuthSigner> SessionManager<S> {
    pub fn new(signer: S, config: SessionConfig) -> Self {
        Self { signer, config }
    }

    pub fn signer(&self) -> &S {
        &self.signer
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Reads and resumes the session stored for `address`.
    ///
    /// Returns [`IdentitySession::Unresumed`] when nothing is stored.
    pub async fn load(
        &self,
        store: &dyn SessionStore,
        address: &Address,
    ) -> Result<IdentitySession, SessionError> {
        match store.get(&session_key(address))? {
            Some(bytes) => self.signer.resume(&bytes).await,
            None => Ok(IdentitySession::Unresumed),
        }
    }

    /// Authorizes a new session for `account` and persists it.
    ///
    /// # Errors
    /// - [`SessionError::AuthorizationFailed`] if the signer returns a
    ///   session for a different address
    /// - whatever the signer or store report
    pub async fn renew<P: WalletProvider>(
        &self,
        store: &dyn SessionStore,
        provider: &P,
        account: &AccountId,
    ) -> Result<DidSession, SessionError> {
        let session = self
            .signer
            .authorize(provider, account, &self.config.resources)
            .await?;

        if session.subject != account.address {
            return Err(SessionError::AuthorizationFailed(format!(
                "authorization issued for {} instead of {}",
                session.subject, account.address
            )));
        }

        store.set(&session_key(&account.address), session.serialized.as_bytes())?;

        tracing::info!(
            account = %account,
            expiry = %session.expiry,
            "identity session renewed"
        );
        Ok(session)
    }

    /// Returns a usable session for `account`, resuming the stored one when
    /// it's valid at `now` and renewing otherwise.
    ///
    /// [`SessionError::SessionInvalid`] never escapes this method: an
    /// invalid session is what triggers renewal.
    pub async fn establish<P: WalletProvider>(
        &self,
        store: &dyn SessionStore,
        provider: &P,
        account: &AccountId,
        now: DateTime<Utc>,
    ) -> Result<(DidSession, Establishment), SessionError> {
        let loaded = self.load(store, &account.address).await?;

        match loaded.into_usable(&account.address, now, self.config.renewal_window()) {
            Ok(session) => {
                tracing::info!(account = %account, "identity session resumed");
                Ok((session, Establishment::Resumed))
            }
            Err(SessionError::SessionInvalid(reason)) => {
                tracing::debug!(account = %account, %reason, "stored session unusable, renewing");
                let session = self.renew(store, provider, account).await?;
                Ok((session, Establishment::Renewed))
            }
            Err(e) => Err(e),
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
