//! Trading configuration: order sizing, dry-run guard and contract selection.

use serde::{Deserialize, Serialize};

use crate::domain::instrument::{Instrument, InstrumentFilter};
use crate::domain::shared::Quantity;

use super::serde_helpers::{empty_as_none, enabled_unless_off};

/// Trading configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// Quantity used when a webhook carries no usable `qty`.
    #[serde(default = "default_qty")]
    pub default_qty: u32,
    /// Echo orders instead of submitting them.
    #[serde(default = "default_true", deserialize_with = "enabled_unless_off")]
    pub dry_run: bool,
    /// Exchange segment.
    #[serde(default = "default_exchange")]
    pub exchange: String,
    /// Underlying name the trading symbol must contain.
    #[serde(default = "default_underlying")]
    pub underlying: String,
    /// Series marker the trading symbol must contain.
    #[serde(default = "default_series_marker")]
    pub series_marker: String,
    /// Fixed trading symbol (requires `instrument_token`).
    #[serde(default, deserialize_with = "empty_as_none")]
    pub instrument_symbol: Option<String>,
    /// Fixed instrument token (requires `instrument_symbol`).
    #[serde(default, deserialize_with = "empty_as_none")]
    pub instrument_token: Option<String>,
}

impl TradingConfig {
    /// Default quantity, if positive.
    #[must_use]
    pub const fn default_quantity(&self) -> Option<Quantity> {
        Quantity::new(self.default_qty)
    }

    /// Filter used to resolve the contract.
    #[must_use]
    pub fn instrument_filter(&self) -> InstrumentFilter {
        InstrumentFilter::new(self.underlying.trim(), self.series_marker.trim())
    }

    /// Configured instrument, when both symbol and token are set.
    #[must_use]
    pub fn instrument_override(&self) -> Option<Instrument> {
        match (&self.instrument_symbol, &self.instrument_token) {
            (Some(symbol), Some(token)) => Some(Instrument::new(symbol.as_str(), token.as_str())),
            _ => None,
        }
    }
}

impl Default for TradingConfig {
    fn default() -> Self {
        Self {
            default_qty: default_qty(),
            dry_run: true,
            exchange: default_exchange(),
            underlying: default_underlying(),
            series_marker: default_series_marker(),
            instrument_symbol: None,
            instrument_token: None,
        }
    }
}

const fn default_qty() -> u32 {
    25
}

const fn default_true() -> bool {
    true
}

fn default_exchange() -> String {
    "NFO".to_string()
}

fn default_underlying() -> String {
    "NIFTY".to_string()
}

fn default_series_marker() -> String {
    "FUT".to_string()
}
