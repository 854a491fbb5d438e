//! Access-token status machine.

use std::fmt;

use didlink_wallet::Address;

use crate::TokenError;

// ---------------------------------------------------------------------------
// AccessToken
// ---------------------------------------------------------------------------

/// A bearer credential issued by the backend.
///
/// `Debug` is redacted so tokens don't end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

// ---------------------------------------------------------------------------
// TokenStatus
// ---------------------------------------------------------------------------

/// Where the access-token exchange stands for the current session.
///
/// Within one attempt, transitions only move forward:
///
/// ```text
/// Idle → Connecting → Connected
///                   ↘ Failed
/// ```
///
/// Getting back to `Idle` takes a new session (see
/// [`AccessTokenState::rebind`]) or a disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenStatus {
    #[default]
    Idle,
    Connecting,
    Connected,
    Failed,
}

impl TokenStatus {
    /// Returns `true` if moving to `target` is a legal step within an attempt.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::Connecting)
                | (Self::Connecting, Self::Connected)
                | (Self::Connecting, Self::Failed)
        )
    }}

impl fmt::Display for TokenStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// AccessTokenState
// ---------------------------------------------------------------------------

/// The token exchange state bound to one session subject.
#[derive(Debug, Clone, Default)]
pub struct AccessTokenState {
    status: TokenStatus,
    token: Option<AccessToken>,
    subject: Option<Address>,
}

impl AccessTokenState {
    pub fn status(&self) -> TokenStatus {
        self.status
    }

    /// The cached token, if the last attempt succeeded.
    ///
    /// Returned as-is: the token is never checked against its own expiry.
    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    /// The address whose session this state is bound to.
    pub fn subject(&self) -> Option<&Address> {
        self.subject.as_ref()
    }

    /// Binds to a newly established session, starting over from `Idle`.
    pub fn rebind(&mut self, subject: Address) {
        *self = Self {
            status: TokenStatus::Idle,
            token: None,
            subject: Some(subject),
        };
    }

    /// Forgets everything (disconnect).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Starts an attempt: `Idle → Connecting`.
    pub fn begin(&mut self) -> Result<(), TokenError> {
        self.advance(TokenStatus::Connecting)
    }

    /// Ends an attempt successfully: `Connecting → Connected`.
    pub fn complete(&mut self, token: AccessToken) -> Result<(), TokenError> {
        self.advance(TokenStatus::Connected)?;
        self.token = Some(token);
        Ok(())
    }

    /// Ends an attempt with a failure: `Connecting → Failed`.
    pub fn fail(&mut self) -> Result<(), TokenError> {
        self.advance(TokenStatus::Failed)
    }

    fn advance(&mut self, target: TokenStatus) -> Result<(), TokenError> {
        if !self.status.can_transition_to(target) {
            return Err(TokenError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        tracing::debug!(from = %self.status, to = %target, "access token status changed");
        self.status = target;
        Ok(())
    }
}
