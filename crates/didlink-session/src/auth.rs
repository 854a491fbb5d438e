//! The signing hook: everything didlink needs from a DID session library.
//!
//! didlink doesn't implement the identity network's session format or its
//! cryptography. It defines the [`AuthSigner`] trait and the host plugs in
//! whatever library speaks the network's protocol. Tests plug in a mock.

use didlink_wallet::{AccountId, WalletProvider};
use serde::{Deserialize, Serialize};

use crate::{DidSession, IdentitySession, SessionError};

/// One signature of a general-serialization JWS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwsSignature {
    /// Base64url protected header.
    pub protected: String,
    /// Base64url signature bytes.
    pub signature: String,
}

/// A capability authorization (CACAO): a signed statement that `issuer`
/// delegated a set of resources to the session key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cacao {
    /// The issuing account, usually a `did:pkh:` identifier.
    pub issuer: String,
    /// The encoded authorization block.
    pub bytes: Vec<u8>,
}

/// A detached JWS over a payload, as produced by a session key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwsArtifact {
    /// Base64url payload that was signed.
    pub payload: String,
    /// The signatures over `payload`.
    pub signatures: Vec<JwsSignature>,
    /// Content identifier of the payload, as raw bytes.
    pub link: Vec<u8>,
    /// The authorization embedded in the protected header. A session-key
    /// signature without one proves nothing about the wallet.
    pub cacao: Option<Cacao>,
}

/// Creates, restores, and signs with identity sessions.
///
/// # Contract
///
/// - [`resume`](Self::resume) returns [`IdentitySession::Invalid`] for bytes
///   it cannot decode. `Err` is reserved for failures that aren't the
///   stored value's fault.
/// - [`authorize`](Self::authorize) asks the wallet behind `provider` to
///   sign a fresh authorization for `account` over `resources`.
pub trait AuthSigner: Send + Sync + 'static {
    /// Restores a session from its serialized form.
    async fn resume(&self, serialized: &[u8]) -> Result<IdentitySession, SessionError>;

    /// Authorizes a brand-new session through the wallet.
    async fn authorize<P: WalletProvider>(
        &self,
        provider: &P,
        account: &AccountId,
        resources: &[String],
    ) -> Result<DidSession, SessionError>;

    /// Signs `payload` with the session key.
    async fn sign(
        &self,
        session: &DidSession,
        payload: &serde_json::Value,
    ) -> Result<JwsArtifact, SessionError>;

    /// Drops any connection to the identity network.
    async fn close(&self) -> Result<(), SessionError> {
        Ok(())
    }
}
