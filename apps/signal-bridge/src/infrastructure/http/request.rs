//! HTTP request DTOs.

use serde::Serialize;
use serde_json::Value;

use crate::domain::order_execution::OrderSide;
use crate::domain::shared::Quantity;
use crate::error::RelayError;

/// Webhook body: `{ "signal": "BUY" | "SELL", "qty"?: integer }`.
///
/// Parsed leniently from a JSON value: only a non-object body is an error.
/// A missing or unusable `signal` is kept as-is so the handler can ignore the
/// request, and an unusable `qty` falls back to the default quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookPayload {
    /// Raw signal string, if one was sent as a string.
    pub signal: Option<String>,
    /// Positive integer quantity override.
    pub qty: Option<Quantity>,
}

impl WebhookPayload {
    /// Parse a raw request body.
    pub fn from_slice(body: &[u8]) -> Result<Self, RelayError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| RelayError::invalid_payload(format!("malformed JSON: {e}")))?;
        Self::from_value(&value)
    }

    /// Interpret a decoded JSON value.
    pub fn from_value(value: &Value) -> Result<Self, RelayError> {
        let Value::Object(map) = value else {
            return Err(RelayError::invalid_payload("body must be a JSON object"));
        };

        Ok(Self {
            signal: map.get("signal").and_then(Value::as_str).map(str::to_string),
            qty: map.get("qty").and_then(parse_quantity),
        })
    }

    /// The order side, if the signal is BUY or SELL.
    #[must_use]
    pub fn side(&self) -> Option<OrderSide> {
        self.signal.as_deref().and_then(OrderSide::from_signal)
    }
}

/// Accept a positive integer, an integral float, or a numeric string.
fn parse_quantity(value: &Value) -> Option<Quantity> {
    let raw = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f > 0.0 && *f <= f64::from(u32::MAX))
                .map(|f| f as u64)
        })?,
        Value::String(s) => s.trim().parse::<u64>().ok()?,
        _ => return None,
    };
    Quantity::new(u32::try_from(raw).ok()?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_case::test_case;

    use super::*;

    #[test_case(json!({"signal": "BUY"}), Some(OrderSide::Buy) ; "buy")]
    #[test_case(json!({"signal": " sell "}), Some(OrderSide::Sell) ; "sell trimmed lowercase")]
    #[test_case(json!({"signal": "HOLD"}), None ; "unknown signal")]
    #[test_case(json!({"signal": 1}), None ; "numeric signal")]
    #[test_case(json!({"signal": null}), None ; "null signal")]
    #[test_case(json!({}), None ; "missing signal")]
    fn signal_parsing(body: Value, expected: Option<OrderSide>) {
        let payload = WebhookPayload::from_value(&body).unwrap();
        assert_eq!(payload.side(), expected);
    }

    #[test_case(json!(50), Some(50) ; "integer")]
    #[test_case(json!("75"), Some(75) ; "numeric string")]
    #[test_case(json!(100.0), Some(100) ; "integral float")]
    #[test_case(json!(0), None ; "zero")]
    #[test_case(json!(-5), None ; "negative")]
    #[test_case(json!(2.5), None ; "fractional")]
    #[test_case(json!("lots"), None ; "non numeric string")]
    #[test_case(json!(5_000_000_000_u64), None ; "beyond u32")]
    #[test_case(json!(true), None ; "boolean")]
    fn quantity_parsing(qty: Value, expected: Option<u32>) {
        let payload = WebhookPayload::from_value(&json!({"signal": "BUY", "qty": qty})).unwrap();
        assert_eq!(payload.qty.map(|q| q.get()), expected);
    }

    #[test]
    fn non_object_body_is_invalid() {
        let err = WebhookPayload::from_value(&json!(["BUY"])).unwrap_err();
        assert!(matches!(err, RelayError::InvalidPayload { .. }));
    }

    #[test]
    fn malformed_json_is_invalid() {
        let err = WebhookPayload::from_slice(b"{signal: BUY").unwrap_err();
        assert!(matches!(err, RelayError::InvalidPayload { .. }));
    }
}
