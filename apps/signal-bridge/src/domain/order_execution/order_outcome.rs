//! Result of handing an order to the session adapter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What happened to an order.
///
/// Broker-side failures are captured as [`OrderOutcome::Error`] instead of
/// being raised, so the webhook can always answer with a tagged result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrderOutcome {
    /// Dry-run: the order was built and logged but not submitted.
    DryRun {
        /// The broker request body that would have been submitted.
        payload: Value,
    },
    /// The broker accepted the order.
    Placed {
        /// Broker order ID.
        order_id: String,
        /// Broker unique order ID, if returned.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unique_order_id: Option<String>,
        /// Broker message.
        message: String,
    },
    /// The broker refused the order or could not be reached.
    Error {
        /// Captured error message.
        error: String,
    },
}

impl OrderOutcome {
    /// Whether this outcome is the error-tagged variant.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_outcome_is_tagged() {
        let outcome = OrderOutcome::Error {
            error: "RMS: margin exceeds".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();

        assert!(outcome.is_error());
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "RMS: margin exceeds");
    }

    #[test]
    fn placed_outcome_skips_missing_unique_id() {
        let outcome = OrderOutcome::Placed {
            order_id: "251117000123".to_string(),
            unique_order_id: None,
            message: "SUCCESS".to_string(),
        };
        let json = serde_json::to_string(&outcome).unwrap();

        assert!(!outcome.is_error());
        assert!(json.contains(r#""status":"placed""#));
        assert!(!json.contains("unique_order_id"));
    }
}
