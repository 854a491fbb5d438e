//! Identity session management for didlink.
//!
//! This crate owns the question "does this wallet already have a usable
//! identity session, and if not, how do we get one?":
//!
//! 1. **Signing hook**: what a DID session library must provide
//!    ([`AuthSigner`] trait)
//! 2. **Validity**: when a stored session may be resumed
//!    ([`IdentitySession::into_usable`], [`SessionConfig`])
//! 3. **Renewal**: authorizing and persisting a fresh session
//!    ([`SessionManager`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Controller (above)  ← decides when to log in, tears down on failure
//!     ↕
//! Session (this crate)  ← resume-or-renew against the store
//!     ↕
//! Wallet / Store (below)  ← provider for authorization, bytes on disk
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod manager;
mod session;

pub use auth::{AuthSigner, Cacao, JwsArtifact, JwsSignature};
pub use error::SessionError;
pub use manager::{Establishment, SessionManager};
pub use session::{DidSession, IdentitySession, SessionConfig, UNRESTRICTED_RESOURCES};
