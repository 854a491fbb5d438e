//! Backend access tokens for didlink.
//!
//! Once an identity session is established, the backend wants proof of it
//! before handing out an access token: the session key signs a nonce the
//! backend issued, and the backend answers with a bearer token.
//!
//! # Key types
//!
//! - [`AccessTokenClient`]: the backend calls ([`HttpAccessTokenClient`] over reqwest)
//! - [`AuthenticatePayload`]: the signed challenge on the wire
//! - [`AccessTokenState`] / [`TokenStatus`]: where the exchange stands
//! - [`TokenError`]: how it can fail

#![allow(async_fn_in_trait)]

mod client;
mod error;
mod status;
mod wire;

pub use client::{AccessTokenClient, HttpAccessTokenClient};
pub use error::TokenError;
pub use status::{AccessToken, AccessTokenState, TokenStatus};
pub use wire::{AuthenticatePayload, AuthenticateResponse, NonceResponse};
