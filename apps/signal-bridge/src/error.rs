//! Relay error handling.
//!
//! Every failure on the webhook path is one of a small set of error kinds.
//! Each kind carries a stable reason code and maps to an HTTP status so the
//! webhook can always answer with a well-formed JSON body.
//!
//! # HTTP Status Codes
//!
//! | Code | Status | Usage |
//! |------|--------|-------|
//! | `INVALID_PAYLOAD` | 400 | Body is not a JSON object |
//! | `MISSING_CREDENTIALS` | 500 | API key, client id or password not configured |
//! | `AUTHENTICATION_FAILED` | 500 | Broker login refused or unreachable |
//! | `INSTRUMENT_NOT_FOUND` | 500 | No contract matched, or the list fetch failed |
//! | `ORDER_PLACEMENT_FAILED` | 500 | Broker refused or never received the order |

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed webhook body.
    InvalidPayload,
    /// Broker credentials not configured.
    MissingCredentials,
    /// Broker login failed.
    AuthenticationFailed,
    /// Instrument resolution failed.
    InstrumentNotFound,
    /// Order submission failed.
    OrderPlacementFailed,
}

impl ErrorCode {
    /// HTTP status returned for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidPayload => StatusCode::BAD_REQUEST,
            Self::MissingCredentials
            | Self::AuthenticationFailed
            | Self::InstrumentNotFound
            | Self::OrderPlacementFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidPayload => "INVALID_PAYLOAD",
            Self::MissingCredentials => "MISSING_CREDENTIALS",
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",
            Self::InstrumentNotFound => "INSTRUMENT_NOT_FOUND",
            Self::OrderPlacementFailed => "ORDER_PLACEMENT_FAILED",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Errors on the webhook-to-order path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    /// Webhook body could not be interpreted.
    #[error("Invalid payload: {reason}")]
    InvalidPayload {
        /// What was wrong with the body.
        reason: String,
    },

    /// One or more broker credentials are empty.
    #[error("Missing API credentials: {}", .missing.join(", "))]
    MissingCredentials {
        /// Names of the missing settings.
        missing: Vec<&'static str>,
    },

    /// Broker login failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// Broker or transport error message.
        reason: String,
    },

    /// No instrument matched the configured filter.
    #[error("Instrument not found: {underlying} {series_marker} ({reason})")]
    InstrumentNotFound {
        /// Configured underlying name.
        underlying: String,
        /// Configured series marker.
        series_marker: String,
        /// Why resolution failed.
        reason: String,
    },

    /// The broker did not accept the order.
    #[error("Order placement failed: {reason}")]
    OrderPlacementFailed {
        /// Broker or transport error message.
        reason: String,
    },
}

impl RelayError {
    /// Error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidPayload { .. } => ErrorCode::InvalidPayload,
            Self::MissingCredentials { .. } => ErrorCode::MissingCredentials,
            Self::AuthenticationFailed { .. } => ErrorCode::AuthenticationFailed,
            Self::InstrumentNotFound { .. } => ErrorCode::InstrumentNotFound,
            Self::OrderPlacementFailed { .. } => ErrorCode::OrderPlacementFailed,
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code().http_status()
    }

    /// Invalid payload.
    #[must_use]
    pub fn invalid_payload(reason: impl Into<String>) -> Self {
        Self::InvalidPayload {
            reason: reason.into(),
        }
    }
}
