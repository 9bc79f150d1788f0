//! SmartAPI adapter configuration.

use std::time::Duration;

/// Production REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://apiconnect.angelone.in";

/// Published scrip master (instrument list).
pub const DEFAULT_INSTRUMENTS_URL: &str =
    "https://margincalculator.angelbroking.com/OpenAPI_File/files/OpenAPIScripMaster.json";

/// Configuration for the SmartAPI broker adapter.
#[derive(Clone)]
pub struct SmartApiConfig {
    /// API key sent as `X-PrivateKey`.
    pub api_key: String,
    /// REST base URL.
    pub base_url: String,
    /// Scrip master URL.
    pub instruments_url: String,
    /// Exchange segment kept from the scrip master.
    pub exchange: String,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// `X-ClientLocalIP` header value.
    pub client_local_ip: String,
    /// `X-ClientPublicIP` header value.
    pub client_public_ip: String,
    /// `X-MACAddress` header value.
    pub mac_address: String,
}

impl SmartApiConfig {
    /// Create a new configuration with production endpoints.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            instruments_url: DEFAULT_INSTRUMENTS_URL.to_string(),
            exchange: "NFO".to_string(),
            timeout: Duration::from_secs(30),
            client_local_ip: "127.0.0.1".to_string(),
            client_public_ip: "127.0.0.1".to_string(),
            mac_address: "00:00:00:00:00:00".to_string(),
        }
    }

    /// Set the REST base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the scrip master URL.
    #[must_use]
    pub fn with_instruments_url(mut self, url: impl Into<String>) -> Self {
        self.instruments_url = url.into();
        self
    }

    /// Set the exchange segment.
    #[must_use]
    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = exchange.into();
        self
    }

    /// Set the HTTP timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the client identification headers.
    #[must_use]
    pub fn with_client_identity(
        mut self,
        local_ip: impl Into<String>,
        public_ip: impl Into<String>,
        mac_address: impl Into<String>,
    ) -> Self {
        self.client_local_ip = local_ip.into();
        self.client_public_ip = public_ip.into();
        self.mac_address = mac_address.into();
        self
    }
}

impl std::fmt::Debug for SmartApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartApiConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("instruments_url", &self.instruments_url)
            .field("exchange", &self.exchange)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
