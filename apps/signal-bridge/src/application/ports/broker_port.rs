//! Broker Port (Driven Port)
//!
//! Interface for logging in to a brokerage, listing its instruments and
//! placing orders.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::instrument::Instrument;
use crate::domain::order_execution::OrderRequest;

/// Broker login credentials.
#[derive(Clone, Default)]
pub struct Credentials {
    /// API key issued by the broker.
    pub api_key: String,
    /// Client code.
    pub client_id: String,
    /// Password or PIN.
    pub password: String,
    /// Base32 seed for time-based one-time passwords.
    pub totp_secret: Option<String>,
}

impl Credentials {
    /// Names of required credentials that are empty.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.api_key.trim().is_empty() {
            missing.push("api_key");
        }
        if self.client_id.trim().is_empty() {
            missing.push("client_id");
        }
        if self.password.is_empty() {
            missing.push("password");
        }
        missing
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field("client_id", &self.client_id)
            .field("password", &redact(&self.password))
            .field(
                "totp_secret",
                &self.totp_secret.as_deref().map(redact),
            )
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "<empty>" } else { "<redacted>" }
}

/// An authenticated broker session.
#[derive(Clone)]
pub struct SessionToken {
    jwt: String,
    refresh_token: Option<String>,
    feed_token: Option<String>,
    obtained_at: Instant,
}

impl SessionToken {
    /// Create a session token obtained now.
    #[must_use]
    pub fn new(jwt: impl Into<String>) -> Self {
        Self {
            jwt: jwt.into(),
            refresh_token: None,
            feed_token: None,
            obtained_at: Instant::now(),
        }
    }

    /// Attach refresh and feed tokens.
    #[must_use]
    pub fn with_tokens(mut self, refresh_token: Option<String>, feed_token: Option<String>) -> Self {
        self.refresh_token = refresh_token;
        self.feed_token = feed_token;
        self
    }

    /// Access token for authenticated calls.
    #[must_use]
    pub fn jwt(&self) -> &str {
        &self.jwt
    }

    /// Refresh token, if the broker issued one.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Market-data feed token, if the broker issued one.
    #[must_use]
    pub fn feed_token(&self) -> Option<&str> {
        self.feed_token.as_deref()
    }

    /// Time since login.
    #[must_use]
    pub fn age(&self) -> Duration {
        self.obtained_at.elapsed()
    }

    /// Whether the token is older than `ttl`.
    #[must_use]
    pub fn is_older_than(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("jwt", &"<redacted>")
            .field("age", &self.age())
            .finish_non_exhaustive()
    }
}

/// Acknowledgment from broker after order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAck {
    /// Broker-assigned order ID.
    pub order_id: String,
    /// Broker unique order ID, if returned.
    pub unique_order_id: Option<String>,
    /// Broker message.
    pub message: String,
}

/// Broker port error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    /// Transport failure.
    #[error("Broker connection error: {message}")]
    Connection {
        /// Error details.
        message: String,
    },

    /// Login was refused.
    #[error("Broker login refused: {message}")]
    AuthenticationFailed {
        /// Error details.
        message: String,
    },

    /// The session token is no longer accepted.
    #[error("Broker session expired: {message}")]
    SessionExpired {
        /// Error details.
        message: String,
    },

    /// The broker refused the request.
    #[error("Broker rejected request: {reason}")]
    Rejected {
        /// Rejection reason.
        reason: String,
    },

    /// The broker response could not be decoded.
    #[error("Broker response could not be decoded: {message}")]
    Decode {
        /// Error details.
        message: String,
    },
}

impl BrokerError {
    /// Whether the failure means the session must be re-established.
    #[must_use]
    pub const fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }
}

/// Port for broker interactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrokerPort: Send + Sync {
    /// Log in and obtain a session.
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, BrokerError>;

    /// Fetch the tradable instrument list.
    async fn list_instruments(&self, session: &SessionToken)
    -> Result<Vec<Instrument>, BrokerError>;

    /// The order in the broker's wire form, exactly as `place_order` submits it.
    fn order_payload(&self, order: &OrderRequest) -> Result<serde_json::Value, BrokerError>;

    /// Submit an order.
    async fn place_order(
        &self,
        session: &SessionToken,
        order: &OrderRequest,
    ) -> Result<OrderAck, BrokerError>;
}
