//! Controller configuration.

use std::time::Duration;

use didlink_session::SessionConfig;

use crate::DidlinkError;

/// Environment variable holding the authentication backend base URL.
pub const ENV_BACKEND_URL: &str = "DIDLINK_BACKEND_URL";
/// Environment toggle that lifts the mainnet-only restriction.
pub const ENV_FEATURE_MULTICHAIN: &str = "DIDLINK_FEATURE_MULTICHAIN";
/// Environment override for [`SessionConfig::renewal_window_secs`].
pub const ENV_RENEWAL_WINDOW_SECS: &str = "DIDLINK_RENEWAL_WINDOW_SECS";

/// Settings for a [`SessionLifecycleController`](crate::SessionLifecycleController).
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Base URL of the authentication backend (`/account/nonce` and
    /// `/authenticate` are resolved against it).
    pub backend_url: String,

    /// When `true`, sessions are issued for whatever chain the wallet is on
    /// instead of forcing a switch to mainnet.
    pub multichain: bool,

    /// Session validity and renewal policy.
    pub session: SessionConfig,

    /// Per-request timeout of the HTTP token client.
    pub request_timeout: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8002/ceramic-cache".to_string(),
            multichain: false,
            session: SessionConfig::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ControllerConfig {
    /// Reads overrides from the process environment on top of the defaults.
    pub fn from_env() -> Result<Self, DidlinkError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DidlinkError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BACKEND_URL) {
            config.backend_url = url;
        }
        if let Some(flag) = lookup(ENV_FEATURE_MULTICHAIN) {
            config.multichain = parse_flag(ENV_FEATURE_MULTICHAIN, &flag)?;
        }
        if let Some(secs) = lookup(ENV_RENEWAL_WINDOW_SECS) {
            config.session.renewal_window_secs = secs.trim().parse().map_err(|_| {
                DidlinkError::Config(format!("{ENV_RENEWAL_WINDOW_SECS}={secs:?} is not a number"))
            })?;
        }

        Ok(config)
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool, DidlinkError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" => Ok(true),
        "off" | "false" | "0" | "no" | "" => Ok(false),
        _ => Err(DidlinkError::Config(format!("{name}={raw:?} is not a boolean flag"))),
    }
}
