//! Instrument Bounded Context
//!
//! Tradable contracts and the rule for picking one out of a broker list.

use serde::{Deserialize, Serialize};

use crate::domain::shared::Symbol;

/// A tradable contract identified by a symbol and a broker-specific token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Broker trading symbol.
    pub trading_symbol: Symbol,
    /// Broker instrument token.
    pub token: String,
    /// Underlying name, when the broker provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Exchange segment, when the broker provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    /// Lot size, when the broker provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lot_size: Option<u32>,
}

impl Instrument {
    /// Create an instrument from symbol and token only.
    #[must_use]
    pub fn new(trading_symbol: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            trading_symbol: Symbol::new(trading_symbol),
            token: token.into().trim().to_string(),
            name: None,
            exchange: None,
            lot_size: None,
        }
    }
}

/// Substring filter selecting a futures contract by underlying and series marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentFilter {
    underlying: String,
    series_marker: String,
}

impl InstrumentFilter {
    /// Create a filter. Both parts are uppercased to match normalized symbols.
    #[must_use]
    pub fn new(underlying: impl Into<String>, series_marker: impl Into<String>) -> Self {
        Self {
            underlying: underlying.into().trim().to_uppercase(),
            series_marker: series_marker.into().trim().to_uppercase(),
        }
    }

    /// Underlying name (e.g. "NIFTY").
    #[must_use]
    pub fn underlying(&self) -> &str {
        &self.underlying
    }

    /// Series marker (e.g. "FUT").
    #[must_use]
    pub fn series_marker(&self) -> &str {
        &self.series_marker
    }

    /// Whether the instrument's symbol contains both the underlying and the marker.
    #[must_use]
    pub fn matches(&self, instrument: &Instrument) -> bool {
        instrument.trading_symbol.contains(&self.underlying)
            && instrument.trading_symbol.contains(&self.series_marker)
    }

    /// First matching instrument in iteration order.
    ///
    /// No tie-break beyond list order: with several live expiries the broker's
    /// ordering decides.
    #[must_use]
    pub fn resolve<'a>(&self, instruments: &'a [Instrument]) -> Option<&'a Instrument> {
        instruments.iter().find(|i| self.matches(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing() -> Vec<Instrument> {
        vec![
            Instrument::new("BANKNIFTY25NOV25FUT", "35010"),
            Instrument::new("NIFTY25NOV2524000CE", "40001"),
            Instrument::new("NIFTY25NOV25FUT", "35003"),
            Instrument::new("NIFTY30DEC25FUT", "35004"),
        ]
    }

    #[test]
    fn resolves_first_match_in_order() {
        let filter = InstrumentFilter::new("NIFTY", "FUT");
        let instruments = listing();

        // BANKNIFTY also contains both fragments and comes first.
        let found = filter.resolve(&instruments).unwrap();
        assert_eq!(found.token, "35010");
    }

    #[test]
    fn skips_entries_missing_the_marker() {
        let filter = InstrumentFilter::new("NIFTY", "FUT");
        let instruments = vec![
            Instrument::new("NIFTY25NOV2524000CE", "40001"),
            Instrument::new("NIFTY25NOV25FUT", "35003"),
        ];

        let found = filter.resolve(&instruments).unwrap();
        assert_eq!(found.trading_symbol.as_str(), "NIFTY25NOV25FUT");
    }

    #[test]
    fn no_match_returns_none() {
        let filter = InstrumentFilter::new("FINNIFTY", "FUT");
        assert!(filter.resolve(&listing()).is_none());
        assert!(filter.resolve(&[]).is_none());
    }

    #[test]
    fn filter_is_case_normalized() {
        let filter = InstrumentFilter::new("nifty", "fut");
        assert_eq!(filter.underlying(), "NIFTY");
        assert_eq!(filter.series_marker(), "FUT");
        assert!(filter.matches(&Instrument::new("nifty25nov25fut", "1")));
    }
}
