//! HTTP response DTOs.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::order_execution::{OrderOutcome, OrderSide};
use crate::error::{ErrorCode, RelayError};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok".
    pub status: String,
    /// Current UTC time.
    pub time: DateTime<Utc>,
    /// Application version.
    pub version: String,
}

impl HealthResponse {
    /// Snapshot for the current instant.
    #[must_use]
    pub fn now(version: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            time: Utc::now(),
            version: version.into(),
        }
    }
}

/// Webhook response, tagged by `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WebhookResponse {
    /// The signal was relayed (placed or dry-run).
    Ok {
        /// Relayed side.
        signal: OrderSide,
        /// Session adapter result.
        response: OrderOutcome,
    },
    /// No valid signal; nothing was done.
    Ignored,
    /// The request failed.
    Error {
        /// Stable error code.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<ErrorCode>,
        /// Human-readable reason.
        reason: String,
        /// Relayed side, when the failure happened at the broker.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        signal: Option<OrderSide>,
        /// Captured broker result, when the failure happened at the broker.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response: Option<OrderOutcome>,
    },
}

impl WebhookResponse {
    /// Map a relay failure to a status code and body.
    #[must_use]
    pub fn from_error(error: &RelayError) -> (StatusCode, Self) {
        (
            error.http_status(),
            Self::Error {
                code: Some(error.code()),
                reason: error.to_string(),
                signal: None,
                response: None,
            },
        )
    }

    /// Map a relayed signal to a status code and body.
    ///
    /// An error-tagged broker outcome is a server error that still carries the
    /// captured result.
    #[must_use]
    pub fn from_outcome(signal: OrderSide, outcome: OrderOutcome) -> (StatusCode, Self) {
        match &outcome {
            OrderOutcome::Error { error } => {
                let failure = RelayError::OrderPlacementFailed {
                    reason: error.clone(),
                };
                (
                    failure.http_status(),
                    Self::Error {
                        code: Some(failure.code()),
                        reason: failure.to_string(),
                        signal: Some(signal),
                        response: Some(outcome),
                    },
                )
            }
            _ => (
                StatusCode::OK,
                Self::Ok {
                    signal,
                    response: outcome,
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ignored_is_status_only() {
        let json = serde_json::to_value(WebhookResponse::Ignored).unwrap();
        assert_eq!(json, json!({"status": "ignored"}));
    }

    #[test]
    fn missing_credentials_maps_to_500() {
        let (status, body) = WebhookResponse::from_error(&RelayError::MissingCredentials {
            missing: vec!["api_key"],
        });

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "MISSING_CREDENTIALS");
        assert_eq!(json["reason"], "Missing API credentials: api_key");
        assert!(json.get("response").is_none());
    }

    #[test]
    fn broker_error_outcome_keeps_tagged_result() {
        let (status, body) = WebhookResponse::from_outcome(
            OrderSide::Buy,
            OrderOutcome::Error {
                error: "AB4008: insufficient margin".to_string(),
            },
        );

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["signal"], "BUY");
        assert_eq!(json["code"], "ORDER_PLACEMENT_FAILED");
        assert_eq!(json["response"]["status"], "error");
        assert_eq!(json["response"]["error"], "AB4008: insufficient margin");
    }

    #[test]
    fn placed_outcome_is_ok() {
        let (status, body) = WebhookResponse::from_outcome(
            OrderSide::Sell,
            OrderOutcome::Placed {
                order_id: "2511".to_string(),
                unique_order_id: None,
                message: "SUCCESS".to_string(),
            },
        );

        assert_eq!(status, StatusCode::OK);
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["response"]["status"], "placed");
        assert_eq!(json["response"]["order_id"], "2511");
    }
}
