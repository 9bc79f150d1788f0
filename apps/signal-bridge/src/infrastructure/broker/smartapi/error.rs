//! SmartAPI-specific error types.

use thiserror::Error;

use crate::application::ports::BrokerError;

/// Envelope error codes meaning the JWT is no longer accepted.
const SESSION_ERROR_CODES: [&str; 4] = ["AG8001", "AG8002", "AG8003", "AB1010"];

/// Errors from the SmartAPI adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmartApiError {
    /// Transport failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// HTTP 401/403.
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized {
        /// HTTP status code.
        status: u16,
        /// Response body or message.
        message: String,
    },

    /// The envelope reported a failure.
    #[error("API error: {code} - {message}")]
    Api {
        /// Broker error code (may be empty).
        code: String,
        /// Broker message.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// The TOTP seed could not be used.
    #[error("TOTP error: {0}")]
    Totp(String),
}

impl SmartApiError {
    /// Whether this error means the session token was rejected.
    #[must_use]
    pub fn is_session_error(&self) -> bool {
        match self {
            Self::Unauthorized { .. } => true,
            Self::Api { code, .. } => SESSION_ERROR_CODES.contains(&code.as_str()),
            _ => false,
        }
    }

    /// Convert a failure of the login call.
    ///
    /// Any refusal at login is an authentication failure, not an expired session.
    #[must_use]
    pub fn into_login_error(self) -> BrokerError {
        match self {
            Self::Http(message) => BrokerError::Connection { message },
            Self::JsonParse(message) => BrokerError::Decode { message },
            other => BrokerError::AuthenticationFailed {
                message: other.to_string(),
            },
        }
    }
}

impl From<SmartApiError> for BrokerError {
    fn from(err: SmartApiError) -> Self {
        if err.is_session_error() {
            return Self::SessionExpired {
                message: err.to_string(),
            };
        }
        match err {
            SmartApiError::Http(message) => Self::Connection { message },
            SmartApiError::JsonParse(message) => Self::Decode { message },
            SmartApiError::Totp(message) => Self::AuthenticationFailed { message },
            SmartApiError::Api { code, message } if code.is_empty() => {
                Self::Rejected { reason: message }
            }
            SmartApiError::Api { code, message } => Self::Rejected {
                reason: format!("{code}: {message}"),
            },
            SmartApiError::Unauthorized { status, message } => Self::SessionExpired {
                message: format!("{status}: {message}"),
            },
        }
    }
}
