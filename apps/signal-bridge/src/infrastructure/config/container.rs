//! Dependency Injection Container
//!
//! Manages creation and wiring of all application components.

use std::sync::Arc;

use crate::application::ports::BrokerPort;
use crate::application::services::{BrokerSession, BrokerSessionConfig};
use crate::application::use_cases::RelaySignalUseCase;
use crate::config::{Config, ConfigError};
use crate::infrastructure::http::AppState;

/// Dependency injection container.
///
/// Holds the shared broker session and the relay use case built on it.
pub struct Container<B: BrokerPort + 'static> {
    session: Arc<BrokerSession<B>>,
    relay: Arc<RelaySignalUseCase<B>>,
}

impl<B: BrokerPort + 'static> Container<B> {
    /// Wire the application around a broker using loaded configuration.
    pub fn from_config(broker: Arc<B>, config: &Config) -> Result<Self, ConfigError> {
        let default_quantity = config.trading.default_quantity().ok_or_else(|| {
            ConfigError::ValidationError("trading.default_qty must be positive".to_string())
        })?;

        let session_config = BrokerSessionConfig {
            dry_run: config.trading.dry_run,
            exchange: config.trading.exchange.trim().to_uppercase(),
            instrument_filter: config.trading.instrument_filter(),
            instrument_override: config.trading.instrument_override(),
            session_ttl: config.broker.session_ttl(),
        };

        let session = Arc::new(BrokerSession::new(
            broker,
            config.broker.credentials(),
            session_config,
        ));
        let relay = Arc::new(RelaySignalUseCase::new(
            Arc::clone(&session),
            default_quantity,
        ));

        Ok(Self {
            session,
            relay,
        })
    }

    /// Get the shared broker session.
    pub fn session(&self) -> Arc<BrokerSession<B>> {
        Arc::clone(&self.session)
    }

    /// Get the relay use case.
    pub fn relay_signal_use_case(&self) -> Arc<RelaySignalUseCase<B>> {
        Arc::clone(&self.relay)
    }

    /// Build the HTTP application state.
    pub fn app_state(&self, version: impl Into<String>) -> AppState<B> {
        AppState {
            relay: self.relay_signal_use_case(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockBrokerPort;
    use crate::config::load_config_from_string;

    #[test]
    fn wires_configured_values() {
        let config = load_config_from_string(
            "trading:\n  default_qty: 50\n  dry_run: \"false\"\n  exchange: nfo\n",
        )
        .unwrap();

        let container = Container::from_config(Arc::new(MockBrokerPort::new()), &config).unwrap();

        assert!(!container.session().is_dry_run());
        assert_eq!(container.session().exchange(), "NFO");
        assert_eq!(
            container.relay_signal_use_case().default_quantity().get(),
            50
        );
    }

    #[test]
    fn defaults_to_dry_run() {
        let container =
            Container::from_config(Arc::new(MockBrokerPort::new()), &Config::default()).unwrap();

        assert!(container.session().is_dry_run());
        assert_eq!(container.app_state("1.0.0").version, "1.0.0");
    }
}
