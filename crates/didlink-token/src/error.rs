//! Error types for the access-token layer.

use crate::TokenStatus;

/// Errors that can occur while exchanging a signed nonce for an access token.
///
/// The first three variants are the terminal failures of an exchange; there
/// is no retry, a new attempt needs a new login.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The backend did not hand out a nonce.
    #[error("nonce unavailable: {0}")]
    NonceUnavailable(String),

    /// The nonce could not be signed, or the signature carried no
    /// capability authorization.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// The backend refused the signed payload or answered without a token.
    #[error("authentication rejected: {0}")]
    AuthenticationRejected(String),

    /// An exchange step was attempted out of order.
    #[error("invalid token status transition from {from} to {to}")]
    InvalidTransition { from: TokenStatus, to: TokenStatus },

    /// The configured backend URL can't be used.
    #[error("invalid backend url {0:?}")]
    InvalidBackendUrl(String),

    /// The HTTP client could not be constructed.
    #[error("http client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}
