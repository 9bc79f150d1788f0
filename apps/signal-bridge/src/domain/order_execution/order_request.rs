//! The order built from a validated signal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::instrument::Instrument;
use crate::domain::shared::{Quantity, Symbol};

use super::value_objects::{OrderDuration, OrderSide, OrderType, ProductType, Variety};

/// A single market order, constructed fresh per webhook request.
///
/// Only built after the signal has been validated and the instrument resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Order variety.
    pub variety: Variety,
    /// Broker trading symbol.
    pub trading_symbol: Symbol,
    /// Broker instrument token.
    pub symbol_token: String,
    /// Buy or sell.
    pub transaction_type: OrderSide,
    /// Exchange segment (e.g. "NFO").
    pub exchange: String,
    /// Order type.
    pub order_type: OrderType,
    /// Product type.
    pub product_type: ProductType,
    /// Validity.
    pub duration: OrderDuration,
    /// Limit price; always zero for market orders.
    pub price: Decimal,
    /// Quantity.
    pub quantity: Quantity,
}

impl OrderRequest {
    /// Create an intraday market order for an instrument.
    #[must_use]
    pub fn market(
        instrument: &Instrument,
        side: OrderSide,
        quantity: Quantity,
        exchange: impl Into<String>,
    ) -> Self {
        Self {
            variety: Variety::Normal,
            trading_symbol: instrument.trading_symbol.clone(),
            symbol_token: instrument.token.clone(),
            transaction_type: side,
            exchange: exchange.into(),
            order_type: OrderType::Market,
            product_type: ProductType::Intraday,
            duration: OrderDuration::Day,
            price: Decimal::ZERO,
            quantity,
        }
    }
}
