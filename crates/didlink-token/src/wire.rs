//! Request and response bodies of the authentication backend.
//!
//! ```text
//! GET  /account/nonce  → { "nonce": "…" }
//! POST /authenticate   { signatures, payload, cid: [u8…], cacao: [u8…], issuer, nonce }
//!                      → { "access": "…" }
//! ```
//!
//! `Vec<u8>` fields serialize as JSON arrays of numbers, which is what the
//! backend expects for `cid` and `cacao`.

use didlink_session::{JwsArtifact, JwsSignature};
use serde::{Deserialize, Serialize};

use crate::TokenError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonceResponse {
    pub nonce: String,
}

/// The signed nonce challenge posted to `/authenticate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatePayload {
    pub signatures: Vec<JwsSignature>,
    pub payload: String,
    pub cid: Vec<u8>,
    pub cacao: Vec<u8>,
    pub issuer: String,
    pub nonce: String,
}

impl AuthenticatePayload {
    /// Assembles the payload from a signed `{ "nonce": … }` artifact.
    ///
    /// # Errors
    /// Returns [`TokenError::SigningFailed`] if the artifact carries no
    /// capability authorization; the backend can't tie the signature to a
    /// wallet without one.
    pub fn from_artifact(artifact: JwsArtifact, nonce: String) -> Result<Self, TokenError> {
        let cacao = artifact.cacao.ok_or_else(|| {
            TokenError::SigningFailed("signature has no capability authorization".into())
        })?;
        Ok(Self {
            signatures: artifact.signatures,
            payload: artifact.payload,
            cid: artifact.link,
            cacao: cacao.bytes,
            issuer: cacao.issuer,
            nonce,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    pub access: String,
}
