//! The backend side of the exchange: nonce in, signed payload out, token back.

use std::time::Duration;

use reqwest::Url;

use crate::{AccessToken, AuthenticatePayload, AuthenticateResponse, NonceResponse, TokenError};

/// Talks to the authentication backend.
///
/// Each call is a single attempt. Implementations map every failure of
/// [`fetch_nonce`](Self::fetch_nonce) to [`TokenError::NonceUnavailable`]
/// and every failure of [`authenticate`](Self::authenticate) to
/// [`TokenError::AuthenticationRejected`].
pub trait AccessTokenClient: Send + Sync + 'static {
    /// Requests a fresh challenge nonce.
    async fn fetch_nonce(&self) -> Result<String, TokenError>;

    /// Exchanges a signed nonce for an access token.
    async fn authenticate(&self, payload: &AuthenticatePayload) -> Result<AccessToken, TokenError>;
}

/// [`AccessTokenClient`] over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpAccessTokenClient {
    base: Url,
    client: reqwest::Client,
}

impl HttpAccessTokenClient {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a client for the backend at `base_url`.
    ///
    /// Endpoint paths are resolved relative to `base_url`, so a base with a
    /// path prefix (`https://api.example.com/ceramic-cache`) keeps it.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TokenError> {
        let mut base =
            Url::parse(base_url).map_err(|_| TokenError::InvalidBackendUrl(base_url.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(TokenError::InvalidBackendUrl(base_url.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TokenError::Client)?;

        Ok(Self { base, client })
    }

    /// The normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, TokenError> {
        self.base
            .join(path)
            .map_err(|_| TokenError::InvalidBackendUrl(format!("{}{path}", self.base)))
    }
}

impl AccessTokenClient for HttpAccessTokenClient {
    async fn fetch_nonce(&self) -> Result<String, TokenError> {
        let url = self.endpoint("account/nonce")?;
        let unavailable = |e: reqwest::Error| TokenError::NonceUnavailable(e.to_string());

        let resp = self.client.get(url).send().await.map_err(unavailable)?;
        if !resp.status().is_success() {
            return Err(TokenError::NonceUnavailable(format!("HTTP {}", resp.status())));
        }
        let body: NonceResponse = resp.json().await.map_err(unavailable)?;

        tracing::debug!("nonce received");
        Ok(body.nonce)
    }

    async fn authenticate(&self, payload: &AuthenticatePayload) -> Result<AccessToken, TokenError> {
        let url = self.endpoint("authenticate")?;
        let rejected = |e: reqwest::Error| TokenError::AuthenticationRejected(e.to_string());

        let resp = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(rejected)?;
        if !resp.status().is_success() {
            return Err(TokenError::AuthenticationRejected(format!(
                "HTTP {}",
                resp.status()
            )));
        }
        let body: AuthenticateResponse = resp.json().await.map_err(rejected)?;
        if body.access.is_empty() {
            return Err(TokenError::AuthenticationRejected("empty access token".into()));
        }

        tracing::debug!(issuer = %payload.issuer, "access token issued");
        Ok(AccessToken::new(body.access))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_appends_trailing_slash_to_path() {
        let client =
            HttpAccessTokenClient::new("https://api.example.com/cache", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.example.com/cache/");
        assert_eq!(
            client.endpoint("account/nonce").unwrap().as_str(),
            "https://api.example.com/cache/account/nonce"
        );
    }

    #[test]
    fn test_new_bare_host_resolves_from_root() {
        let client = HttpAccessTokenClient::new("http://localhost:8000", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.endpoint("authenticate").unwrap().as_str(),
            "http://localhost:8000/authenticate"
        );
    }

    #[test]
    fn test_new_rejects_unparseable_url() {
        assert!(matches!(
            HttpAccessTokenClient::new("not a url", Duration::from_secs(1)),
            Err(TokenError::InvalidBackendUrl(_))
        ));
        assert!(matches!(
            HttpAccessTokenClient::new("mailto:someone@example.com", Duration::from_secs(1)),
            Err(TokenError::InvalidBackendUrl(_))
        ));
    }
}
