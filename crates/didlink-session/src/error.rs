//! Error types for the session layer.

use didlink_store::StoreError;
use didlink_wallet::WalletError;

/// Errors that can occur while establishing or using an identity session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The stored session can't be used (absent, unreadable, expired, or
    /// about to expire). Recovered locally by renewing.
    #[error("session invalid: {0}")]
    SessionInvalid(String),

    /// The signer failed to decode or restore a stored session for a reason
    /// other than the bytes being unreadable.
    #[error("session resume failed: {0}")]
    ResumeFailed(String),

    /// The wallet did not produce a new session authorization.
    #[error("session authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Signing with the session key failed, or produced no capability
    /// authorization.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// Closing the identity network connection failed.
    #[error("identity network error: {0}")]
    Network(String),

    /// Reading or writing the persisted session failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The wallet provider failed while authorizing.
    #[error(transparent)]
    Wallet(#[from] WalletError),
}
