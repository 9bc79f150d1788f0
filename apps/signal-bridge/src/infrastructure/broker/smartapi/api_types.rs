//! SmartAPI request and response types.
//!
//! These types map directly to the SmartAPI REST format.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::application::ports::{OrderAck, SessionToken};
use crate::domain::instrument::Instrument;
use crate::domain::order_execution::OrderRequest;

use super::error::SmartApiError;

// ============================================================================
// Envelope
// ============================================================================

/// Response envelope shared by every SmartAPI endpoint.
///
/// Failures come back either as `{status:false, errorcode}` or, on token
/// errors, as `{success:false, errorCode, data:""}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    /// Whether the call succeeded.
    #[serde(default, alias = "success")]
    pub status: bool,
    /// Broker message.
    #[serde(default)]
    pub message: String,
    /// Broker error code (empty on success).
    #[serde(default, alias = "errorCode")]
    pub errorcode: String,
    /// Payload; null or an empty string when absent.
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ApiEnvelope {
    /// Extract the typed payload, or the envelope error.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<T, SmartApiError> {
        let has_data = match &self.data {
            serde_json::Value::Null => false,
            serde_json::Value::String(s) => !s.is_empty(),
            _ => true,
        };

        if !self.status {
            return Err(SmartApiError::Api {
                code: self.errorcode,
                message: self.message,
            });
        }
        if !has_data {
            return Err(SmartApiError::JsonParse(format!(
                "response has no data (message: {})",
                self.message
            )));
        }

        serde_json::from_value(self.data).map_err(|e| SmartApiError::JsonParse(e.to_string()))
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Client code.
    pub clientcode: String,
    /// Password or MPIN.
    pub password: String,
    /// Current one-time password; empty when no seed is configured.
    pub totp: String,
}

/// Login response payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    /// Session JWT.
    pub jwt_token: String,
    /// Refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Market-data feed token.
    #[serde(default)]
    pub feed_token: Option<String>,
}

impl LoginData {
    /// Convert to a session token, dropping any `Bearer ` prefix.
    #[must_use]
    pub fn into_session_token(self) -> SessionToken {
        let jwt = self
            .jwt_token
            .strip_prefix("Bearer ")
            .unwrap_or(&self.jwt_token)
            .to_string();
        SessionToken::new(jwt).with_tokens(self.refresh_token, self.feed_token)
    }
}

// ============================================================================
// Orders
// ============================================================================

/// Place-order request body.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceOrderRequest {
    /// Variety.
    pub variety: String,
    /// Trading symbol.
    pub tradingsymbol: String,
    /// Instrument token.
    pub symboltoken: String,
    /// BUY or SELL.
    pub transactiontype: String,
    /// Exchange segment.
    pub exchange: String,
    /// Order type.
    pub ordertype: String,
    /// Product type.
    pub producttype: String,
    /// Validity.
    pub duration: String,
    /// Price.
    pub price: String,
    /// Quantity.
    pub quantity: String,
}

impl From<&OrderRequest> for PlaceOrderRequest {
    fn from(order: &OrderRequest) -> Self {
        Self {
            variety: order.variety.as_str().to_string(),
            tradingsymbol: order.trading_symbol.as_str().to_string(),
            symboltoken: order.symbol_token.clone(),
            transactiontype: order.transaction_type.as_str().to_string(),
            exchange: order.exchange.clone(),
            ordertype: order.order_type.as_str().to_string(),
            producttype: order.product_type.as_str().to_string(),
            duration: order.duration.as_str().to_string(),
            price: order.price.to_string(),
            quantity: order.quantity.get().to_string(),
        }
    }
}

/// Place-order response payload.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderData {
    /// Broker order ID.
    pub orderid: String,
    /// Unique order ID.
    #[serde(default)]
    pub uniqueorderid: Option<String>,
}

impl PlaceOrderData {
    /// Convert to the port acknowledgement.
    #[must_use]
    pub fn into_ack(self, message: String) -> OrderAck {
        OrderAck {
            order_id: self.orderid,
            unique_order_id: self.uniqueorderid.filter(|id| !id.is_empty()),
            message,
        }
    }
}

// ============================================================================
// Scrip master
// ============================================================================

/// One row of the scrip master file.
#[derive(Debug, Clone, Deserialize)]
pub struct ScripMasterEntry {
    /// Instrument token.
    pub token: String,
    /// Trading symbol.
    pub symbol: String,
    /// Underlying name.
    #[serde(default)]
    pub name: String,
    /// Lot size, as a decimal string.
    #[serde(default)]
    pub lotsize: String,
    /// Exchange segment.
    #[serde(default)]
    pub exch_seg: String,
}

impl ScripMasterEntry {
    /// Whether this row belongs to the exchange segment.
    #[must_use]
    pub fn is_on(&self, exchange: &str) -> bool {
        self.exch_seg.eq_ignore_ascii_case(exchange)
    }

    /// Convert to a domain instrument.
    #[must_use]
    pub fn into_instrument(self) -> Instrument {
        let lot_size = self.lotsize.trim().parse::<u32>().ok();
        let mut instrument = Instrument::new(self.symbol, self.token);
        instrument.name = Some(self.name).filter(|n| !n.is_empty());
        instrument.exchange = Some(self.exch_seg).filter(|e| !e.is_empty());
        instrument.lot_size = lot_size;
        instrument
    }
}
