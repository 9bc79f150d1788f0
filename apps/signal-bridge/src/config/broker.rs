//! Broker configuration for Angel One SmartAPI.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::ports::Credentials;
use crate::application::services::DEFAULT_SESSION_TTL;
use crate::infrastructure::broker::smartapi::{DEFAULT_BASE_URL, DEFAULT_INSTRUMENTS_URL};

use super::serde_helpers::empty_as_none;

/// SmartAPI broker configuration.
///
/// Credentials may be empty at startup; the webhook reports them as missing.
#[derive(Clone, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// API key.
    #[serde(default)]
    pub api_key: String,
    /// Client code.
    #[serde(default)]
    pub client_id: String,
    /// Password or MPIN.
    #[serde(default)]
    pub password: String,
    /// Base32 TOTP seed.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub totp_secret: Option<String>,
    /// REST base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Scrip master URL.
    #[serde(default = "default_instruments_url")]
    pub instruments_url: String,
    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum age of a cached session in seconds.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// `X-ClientLocalIP` header.
    #[serde(default = "default_ip")]
    pub client_local_ip: String,
    /// `X-ClientPublicIP` header.
    #[serde(default = "default_ip")]
    pub client_public_ip: String,
    /// `X-MACAddress` header.
    #[serde(default = "default_mac_address")]
    pub mac_address: String,
}

impl BrokerConfig {
    /// Login credentials.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials {
            api_key: self.api_key.trim().to_string(),
            client_id: self.client_id.trim().to_string(),
            password: self.password.clone(),
            totp_secret: self.totp_secret.clone(),
        }
    }

    /// HTTP request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Maximum age of a cached session.
    #[must_use]
    pub const fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            client_id: String::new(),
            password: String::new(),
            totp_secret: None,
            base_url: default_base_url(),
            instruments_url: default_instruments_url(),
            timeout_secs: default_timeout_secs(),
            session_ttl_secs: default_session_ttl_secs(),
            client_local_ip: default_ip(),
            client_public_ip: default_ip(),
            mac_address: default_mac_address(),
        }
    }
}

impl std::fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |s: &str| if s.is_empty() { "<unset>" } else { "[REDACTED]" };
        f.debug_struct("BrokerConfig")
            .field("api_key", &redact(&self.api_key))
            .field("client_id", &self.client_id)
            .field("password", &redact(&self.password))
            .field(
                "totp_secret",
                &self.totp_secret.as_deref().map(|_| "[REDACTED]"),
            )
            .field("base_url", &self.base_url)
            .field("instruments_url", &self.instruments_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .finish_non_exhaustive()
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_instruments_url() -> String {
    DEFAULT_INSTRUMENTS_URL.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL.as_secs()
}

fn default_ip() -> String {
    "127.0.0.1".to_string()
}

fn default_mac_address() -> String {
    "00:00:00:00:00:00".to_string()
}
