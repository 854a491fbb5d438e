//! Session types: the identity session and the rules for when it's usable.
//!
//! An identity session is a time-bounded proof that the holder controls an
//! address, issued by the wallet and used to act on the identity network.
//! It tracks:
//! - WHO it speaks for (`subject`)
//! - WHERE it was issued (`chain`)
//! - WHEN it stops being accepted (`expiry`)
//! - HOW to bring it back after a restart (`serialized`)

use chrono::{DateTime, Duration, Utc};
use didlink_wallet::{Address, ChainId};
use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Resource scope granting unrestricted access on the identity network.
pub const UNRESTRICTED_RESOURCES: &str = "ceramic://*";

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session validity and renewal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// A session expiring within this many seconds is renewed instead of
    /// resumed, so it can't lapse in the middle of a signing flow.
    ///
    /// Default: 3600 (one hour).
    pub renewal_window_secs: u64,

    /// Resources requested when a new session is authorized.
    ///
    /// Default: `["ceramic://*"]`.
    pub resources: Vec<String>,
}

impl SessionConfig {
    /// The renewal window as a `chrono` duration.
    pub fn renewal_window(&self) -> Duration {
        i64::try_from(self.renewal_window_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            renewal_window_secs: 3600,
            resources: vec![UNRESTRICTED_RESOURCES.to_string()],
        }
    }
}

// ---------------------------------------------------------------------------
// DidSession
// ---------------------------------------------------------------------------

/// A live identity session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidSession {
    /// The address that authorized this session.
    pub subject: Address,

    /// The chain the authorization was signed for.
    pub chain: ChainId,

    /// Absolute time after which the identity network rejects the session.
    pub expiry: DateTime<Utc>,

    /// Opaque serialized form produced by the signer. This is what gets
    /// persisted and handed back to [`AuthSigner::resume`](crate::AuthSigner::resume).
    pub serialized: String,
}

impl DidSession {
    /// Time left before `expiry`, negative if already expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.expiry - now
    }

    /// Returns `true` if the session is expired, or expires within `window`.
    pub fn needs_renewal(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now >= self.expiry || self.remaining(now) < window
    }
}

// ---------------------------------------------------------------------------
// IdentitySession
// ---------------------------------------------------------------------------

/// What came out of trying to bring a stored session back.
///
/// ```text
///   (store empty) ──→ Unresumed ─┐
///   (bytes ok)    ──→ Resumed ───┼──→ into_usable() ──→ Ok(DidSession) | Err(SessionInvalid)
///   (bytes bad)   ──→ Invalid ───┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySession {
    /// Nothing was stored for this address.
    Unresumed,

    /// A stored session was decoded.
    Resumed(DidSession),

    /// Something was stored but it could not be decoded.
    Invalid,
}

impl IdentitySession {
    /// Decides whether this session can be used for `subject` at `now`.
    ///
    /// # Errors
    /// Returns [`SessionError::SessionInvalid`] when the session is absent,
    /// undecodable, bound to a different address, expired, or expires in
    /// less than `window`.
    pub fn into_usable(
        self,
        subject: &Address,
        now: DateTime<Utc>,
        window: Duration,
    ) -> Result<DidSession, SessionError> {
        let session = match self {
            Self::Unresumed => {
                return Err(SessionError::SessionInvalid("no stored session".into()));
            }
            Self::Invalid => {
                return Err(SessionError::SessionInvalid("stored session is unreadable".into()));
            }
            Self::Resumed(session) => session,
        };

        if &session.subject != subject {
            return Err(SessionError::SessionInvalid(format!(
                "stored session belongs to {}",
                session.subject
            )));
        }
        if now >= session.expiry {
            return Err(SessionError::SessionInvalid("session expired".into()));
        }
        if session.needs_renewal(now, window) {
            return Err(SessionError::SessionInvalid(format!(
                "session expires in {}s",
                session.remaining(now).num_seconds()
            )));
        }
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn session_expiring_in(secs: i64) -> DidSession {
        DidSession {
            subject: Address::new("0xabc"),
            chain: ChainId::MAINNET,
            expiry: now() + Duration::seconds(secs),
            serialized: "s".into(),
        }
    }

    fn usable(secs: i64) -> Result<DidSession, SessionError> {
        IdentitySession::Resumed(session_expiring_in(secs)).into_usable(
            &Address::new("0xabc"),
            now(),
            SessionConfig::default().renewal_window(),
        )
    }

    #[test]
    fn test_config_default_window_is_one_hour() {
        let config = SessionConfig::default();
        assert_eq!(config.renewal_window(), Duration::seconds(3600));
        assert_eq!(config.resources, vec!["ceramic://*"]);
    }

    #[test]
    fn test_into_usable_far_expiry_is_ok() {
        assert!(usable(7 * 24 * 3600).is_ok());
    }

    #[test]
    fn test_into_usable_exactly_window_is_ok() {
        assert!(usable(3600).is_ok());
    }

    #[test]
    fn test_into_usable_inside_window_is_invalid() {
        assert!(matches!(usable(3599), Err(SessionError::SessionInvalid(_))));
        assert!(matches!(usable(100), Err(SessionError::SessionInvalid(_))));
    }

    #[test]
    fn test_into_usable_expired_is_invalid() {
        assert!(matches!(usable(0), Err(SessionError::SessionInvalid(_))));
        assert!(matches!(usable(-10), Err(SessionError::SessionInvalid(_))));
    }

    #[test]
    fn test_into_usable_unresumed_and_invalid_are_invalid() {
        let window = Duration::seconds(3600);
        let subject = Address::new("0xabc");
        assert!(matches!(
            IdentitySession::Unresumed.into_usable(&subject, now(), window),
            Err(SessionError::SessionInvalid(_))
        ));
        assert!(matches!(
            IdentitySession::Invalid.into_usable(&subject, now(), window),
            Err(SessionError::SessionInvalid(_))
        ));
    }

    #[test]
    fn test_into_usable_other_subject_is_invalid() {
        let result = IdentitySession::Resumed(session_expiring_in(86_400)).into_usable(
            &Address::new("0xdef"),
            now(),
            Duration::seconds(3600),
        );
        assert!(matches!(result, Err(SessionError::SessionInvalid(_))));
    }
}
