//! Unified error type for didlink.

use didlink_session::SessionError;
use didlink_store::StoreError;
use didlink_token::TokenError;
use didlink_wallet::WalletError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attributes let `?` convert layer errors automatically.
/// [`WalletConnection`](Self::WalletConnection) is the one variant built
/// by hand: it carries the message shown to the user after a failed login
/// has been torn down.
#[derive(Debug, thiserror::Error)]
pub enum DidlinkError {
    /// A wallet connector or provider error.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// A session store error.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An identity session error outside of login.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// An access-token exchange error (nonce, signing, authentication).
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Establishing the identity session failed; all session state for the
    /// wallet has been cleared.
    #[error("{message}")]
    WalletConnection {
        message: String,
        #[source]
        source: SessionError,
    },

    /// The account was disconnected or replaced while an access-token
    /// exchange was in flight; its result was discarded.
    #[error("session changed during access token exchange")]
    SessionChanged,

    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DidlinkError {
    /// The message to show the user, if this error has one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::WalletConnection { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wallet_error() {
        let err: DidlinkError = WalletError::Rejected("closed".into()).into();
        assert!(matches!(err, DidlinkError::Wallet(_)));
        assert!(err.to_string().contains("closed"));
    }

    #[test]
    fn test_from_token_error() {
        let err: DidlinkError = TokenError::NonceUnavailable("503".into()).into();
        assert!(matches!(err, DidlinkError::Token(TokenError::NonceUnavailable(_))));
    }

    #[test]
    fn test_from_session_error() {
        let err: DidlinkError = SessionError::Network("down".into()).into();
        assert!(matches!(err, DidlinkError::Session(_)));
    }

    #[test]
    fn test_wallet_connection_displays_message_and_keeps_source() {
        let err = DidlinkError::WalletConnection {
            message: "Unable to connect wallet".into(),
            source: SessionError::AuthorizationFailed("denied".into()),
        };

        assert_eq!(err.to_string(), "Unable to connect wallet");
        assert_eq!(err.user_message(), Some("Unable to connect wallet"));
        let source = std::error::Error::source(&err).expect("has source");
        assert!(source.to_string().contains("denied"));
    }

    #[test]
    fn test_user_message_absent_for_other_variants() {
        assert_eq!(DidlinkError::SessionChanged.user_message(), None);
    }
}
