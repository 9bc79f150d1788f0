//! Broker Session Service
//!
//! Wraps a `BrokerPort` with everything the relay needs from a broker:
//! a cached login session with re-authentication on expiry, instrument
//! resolution, and order placement behind the dry-run guard.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::application::ports::{BrokerError, BrokerPort, Credentials, SessionToken};
use crate::domain::instrument::{Instrument, InstrumentFilter};
use crate::domain::order_execution::{OrderOutcome, OrderRequest};
use crate::error::RelayError;

/// Default lifetime of a cached session before a fresh login is forced.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Configuration for the broker session.
#[derive(Debug, Clone)]
pub struct BrokerSessionConfig {
    /// Build and log orders without submitting them.
    pub dry_run: bool,
    /// Exchange segment orders are placed on.
    pub exchange: String,
    /// Filter used to resolve the traded contract.
    pub instrument_filter: InstrumentFilter,
    /// Fixed instrument that bypasses resolution.
    pub instrument_override: Option<Instrument>,
    /// Maximum age of a cached session.
    pub session_ttl: Duration,
}

impl Default for BrokerSessionConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            exchange: "NFO".to_string(),
            instrument_filter: InstrumentFilter::new("NIFTY", "FUT"),
            instrument_override: None,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }
}

/// Broker session adapter.
///
/// Owns the only state shared across webhook requests: the cached session
/// token. The lock is held across the login call so concurrent requests never
/// race on refreshing it.
pub struct BrokerSession<B: BrokerPort> {
    broker: Arc<B>,
    credentials: Credentials,
    config: BrokerSessionConfig,
    session: Mutex<Option<SessionToken>>,
}

impl<B: BrokerPort> BrokerSession<B> {
    /// Create a session adapter. No login happens until first use.
    pub fn new(broker: Arc<B>, credentials: Credentials, config: BrokerSessionConfig) -> Self {
        Self {
            broker,
            credentials,
            config,
            session: Mutex::new(None),
        }
    }

    /// Whether orders are echoed instead of submitted.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Exchange segment orders are placed on.
    #[must_use]
    pub fn exchange(&self) -> &str {
        &self.config.exchange
    }

    /// Return a valid session, logging in when none is cached or it has aged out.
    pub async fn authenticate(&self) -> Result<SessionToken, RelayError> {
        let missing = self.credentials.missing();
        if !missing.is_empty() {
            tracing::error!(?missing, "Broker credentials not configured");
            return Err(RelayError::MissingCredentials { missing });
        }

        let mut cached = self.session.lock().await;

        if let Some(token) = cached.as_ref() {
            if !token.is_older_than(self.config.session_ttl) {
                return Ok(token.clone());
            }
            tracing::info!(
                age_secs = token.age().as_secs(),
                "Cached broker session aged out, logging in again"
            );
        }

        tracing::info!(client_id = %self.credentials.client_id, "Logging in to broker");

        match self.broker.login(&self.credentials).await {
            Ok(token) => {
                tracing::info!("Broker login succeeded");
                *cached = Some(token.clone());
                Ok(token)
            }
            Err(e) => {
                *cached = None;
                tracing::error!(error = %e, "Broker login failed");
                Err(RelayError::AuthenticationFailed {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Drop the cached session so the next call logs in again.
    pub async fn invalidate(&self) {
        self.session.lock().await.take();
    }

    /// Drop the cached session only if it is still `stale`.
    ///
    /// A concurrent request may already have replaced the rejected token; that
    /// fresh session is kept.
    async fn invalidate_if_stale(&self, stale: &SessionToken) {
        let mut cached = self.session.lock().await;
        if cached.as_ref().is_some_and(|token| token.jwt() == stale.jwt()) {
            cached.take();
        }
    }

    /// Resolve the contract to trade.
    ///
    /// A configured override wins; otherwise the broker's instrument list is
    /// scanned and the first entry matching the filter is used.
    pub async fn resolve_instrument(&self) -> Result<Instrument, RelayError> {
        if let Some(instrument) = &self.config.instrument_override {
            tracing::info!(
                symbol = %instrument.trading_symbol,
                token = %instrument.token,
                "Using configured instrument"
            );
            return Ok(instrument.clone());
        }

        let filter = &self.config.instrument_filter;
        let not_found = |reason: String| RelayError::InstrumentNotFound {
            underlying: filter.underlying().to_string(),
            series_marker: filter.series_marker().to_string(),
            reason,
        };

        let session = self.authenticate().await?;
        let listing = match self.broker.list_instruments(&session).await {
            Err(e) if e.is_session_expired() => {
                tracing::warn!(error = %e, "Broker session expired, re-authenticating");
                self.invalidate_if_stale(&session).await;
                let session = self.authenticate().await?;
                self.broker.list_instruments(&session).await
            }
            other => other,
        };

        let instruments = listing.map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch instrument list");
            not_found(format!("instrument list unavailable: {e}"))
        })?;

        match filter.resolve(&instruments) {
            Some(instrument) => {
                tracing::info!(
                    symbol = %instrument.trading_symbol,
                    token = %instrument.token,
                    "Instrument selected"
                );
                Ok(instrument.clone())
            }
            None => {
                tracing::error!(
                    underlying = filter.underlying(),
                    series_marker = filter.series_marker(),
                    scanned = instruments.len(),
                    "No instrument matched"
                );
                Err(not_found(format!(
                    "no match among {} instruments",
                    instruments.len()
                )))
            }
        }
    }

    /// Place exactly one order.
    ///
    /// In dry-run mode the broker is never called and the order is echoed
    /// back. In live mode broker failures come back as
    /// [`OrderOutcome::Error`]; only a failed re-login is returned as `Err`.
    pub async fn place_order(&self, order: OrderRequest) -> Result<OrderOutcome, RelayError> {
        tracing::info!(
            symbol = %order.trading_symbol,
            token = %order.symbol_token,
            side = %order.transaction_type,
            quantity = order.quantity.get(),
            exchange = %order.exchange,
            "Order request"
        );

        if self.config.dry_run {
            tracing::info!("DRY-RUN mode: no order submitted");
            return Ok(match self.broker.order_payload(&order) {
                Ok(payload) => OrderOutcome::DryRun { payload },
                Err(e) => {
                    tracing::error!(error = %e, "Could not build order payload");
                    capture_failure(&e)
                }
            });
        }

        tracing::warn!(
            symbol = %order.trading_symbol,
            side = %order.transaction_type,
            "Submitting LIVE order - this will execute real trades"
        );

        let session = self.authenticate().await?;
        let result = match self.broker.place_order(&session, &order).await {
            Err(e) if e.is_session_expired() => {
                tracing::warn!(error = %e, "Broker session expired, re-authenticating");
                self.invalidate_if_stale(&session).await;
                let session = self.authenticate().await?;
                self.broker.place_order(&session, &order).await
            }
            other => other,
        };

        Ok(match result {
            Ok(ack) => {
                tracing::info!(
                    order_id = %ack.order_id,
                    message = %ack.message,
                    "Order placed"
                );
                OrderOutcome::Placed {
                    order_id: ack.order_id,
                    unique_order_id: ack.unique_order_id,
                    message: ack.message,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Order placement failed");
                capture_failure(&e)
            }
        })
    }
}

fn capture_failure(error: &BrokerError) -> OrderOutcome {
    OrderOutcome::Error {
        error: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::application::ports::{MockBrokerPort, OrderAck};
    use crate::domain::order_execution::OrderSide;
    use crate::domain::shared::Quantity;

    fn credentials() -> Credentials {
        Credentials {
            api_key: "key".to_string(),
            client_id: "A123456".to_string(),
            password: "1234".to_string(),
            totp_secret: None,
        }
    }

    fn live() -> BrokerSessionConfig {
        BrokerSessionConfig {
            dry_run: false,
            ..BrokerSessionConfig::default()
        }
    }

    fn listing() -> Vec<Instrument> {
        vec![
            Instrument::new("NIFTY25NOV2524000CE", "40001"),
            Instrument::new("NIFTY25NOV25FUT", "35003"),
        ]
    }

    fn order() -> OrderRequest {
        OrderRequest::market(
            &Instrument::new("NIFTY25NOV25FUT", "35003"),
            OrderSide::Buy,
            Quantity::new(25).unwrap(),
            "NFO",
        )
    }

    fn session(broker: MockBrokerPort, config: BrokerSessionConfig) -> BrokerSession<MockBrokerPort> {
        BrokerSession::new(Arc::new(broker), credentials(), config)
    }

    #[tokio::test]
    async fn missing_credentials_never_log_in() {
        let mut broker = MockBrokerPort::new();
        broker.expect_login().never();

        let session = BrokerSession::new(
            Arc::new(broker),
            Credentials::default(),
            BrokerSessionConfig::default(),
        );

        let err = session.authenticate().await.unwrap_err();
        assert_eq!(
            err,
            RelayError::MissingCredentials {
                missing: vec!["api_key", "client_id", "password"]
            }
        );
    }

    #[tokio::test]
    async fn session_is_cached_between_calls() {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_login()
            .times(1)
            .returning(|_| Ok(SessionToken::new("jwt-1")));

        let session = session(broker, BrokerSessionConfig::default());

        assert_eq!(session.authenticate().await.unwrap().jwt(), "jwt-1");
        assert_eq!(session.authenticate().await.unwrap().jwt(), "jwt-1");
    }

    #[tokio::test]
    async fn aged_session_triggers_new_login() {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_login()
            .times(2)
            .returning(|_| Ok(SessionToken::new("jwt")));

        let config = BrokerSessionConfig {
            session_ttl: Duration::ZERO,
            ..BrokerSessionConfig::default()
        };
        let session = session(broker, config);

        session.authenticate().await.unwrap();
        session.authenticate().await.unwrap();
    }

    #[tokio::test]
    async fn login_failure_is_authentication_failed() {
        let mut broker = MockBrokerPort::new();
        broker.expect_login().times(1).returning(|_| {
            Err(BrokerError::AuthenticationFailed {
                message: "Invalid totp".to_string(),
            })
        });

        let session = session(broker, BrokerSessionConfig::default());
        let err = session.authenticate().await.unwrap_err();

        assert!(matches!(err, RelayError::AuthenticationFailed { .. }));
        assert!(err.to_string().contains("Invalid totp"));
    }

    #[tokio::test]
    async fn override_skips_instrument_lookup() {
        let mut broker = MockBrokerPort::new();
        broker.expect_login().never();
        broker.expect_list_instruments().never();

        let config = BrokerSessionConfig {
            instrument_override: Some(Instrument::new("NIFTY30DEC25FUT", "35004")),
            ..BrokerSessionConfig::default()
        };
        let session = session(broker, config);

        let instrument = session.resolve_instrument().await.unwrap();
        assert_eq!(instrument.token, "35004");
    }

    #[tokio::test]
    async fn resolves_first_matching_future() {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_login()
            .returning(|_| Ok(SessionToken::new("jwt")));
        broker
            .expect_list_instruments()
            .times(1)
            .returning(|_| Ok(listing()));

        let session = session(broker, BrokerSessionConfig::default());
        let instrument = session.resolve_instrument().await.unwrap();

        assert_eq!(instrument.trading_symbol.as_str(), "NIFTY25NOV25FUT");
    }

    #[tokio::test]
    async fn no_match_is_instrument_not_found() {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_login()
            .returning(|_| Ok(SessionToken::new("jwt")));
        broker
            .expect_list_instruments()
            .returning(|_| Ok(vec![Instrument::new("BANKNIFTY25NOV2550000PE", "1")]));

        let session = session(broker, BrokerSessionConfig::default());
        let err = session.resolve_instrument().await.unwrap_err();

        assert!(matches!(err, RelayError::InstrumentNotFound { .. }));
    }

    #[tokio::test]
    async fn list_failure_is_instrument_not_found() {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_login()
            .returning(|_| Ok(SessionToken::new("jwt")));
        broker.expect_list_instruments().returning(|_| {
            Err(BrokerError::Connection {
                message: "timed out".to_string(),
            })
        });

        let session = session(broker, BrokerSessionConfig::default());
        let err = session.resolve_instrument().await.unwrap_err();

        assert!(matches!(err, RelayError::InstrumentNotFound { .. }));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn expired_session_is_renewed_once_for_lookup() {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_login()
            .times(2)
            .returning(|_| Ok(SessionToken::new("jwt")));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        broker
            .expect_list_instruments()
            .times(2)
            .returning(move |_| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(BrokerError::SessionExpired {
                        message: "AG8002".to_string(),
                    })
                } else {
                    Ok(listing())
                }
            });

        let session = session(broker, BrokerSessionConfig::default());
        let instrument = session.resolve_instrument().await.unwrap();

        assert_eq!(instrument.token, "35003");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dry_run_never_submits() {
        let mut broker = MockBrokerPort::new();
        broker.expect_login().never();
        broker.expect_place_order().never();
        broker
            .expect_order_payload()
            .times(1)
            .withf(|order| order.symbol_token == "35003")
            .returning(|_| Ok(serde_json::json!({"symboltoken": "35003", "quantity": "25"})));

        let session = session(broker, BrokerSessionConfig::default());
        let outcome = session.place_order(order()).await.unwrap();

        assert_eq!(
            outcome,
            OrderOutcome::DryRun {
                payload: serde_json::json!({"symboltoken": "35003", "quantity": "25"})
            }
        );
    }

    #[tokio::test]
    async fn dry_run_payload_failure_is_captured() {
        let mut broker = MockBrokerPort::new();
        broker.expect_place_order().never();
        broker.expect_order_payload().returning(|_| {
            Err(BrokerError::Decode {
                message: "unserializable".to_string(),
            })
        });

        let session = session(broker, BrokerSessionConfig::default());
        let outcome = session.place_order(order()).await.unwrap();

        assert!(outcome.is_error());
    }

    #[tokio::test]
    async fn live_order_is_placed() {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_login()
            .returning(|_| Ok(SessionToken::new("jwt")));
        broker
            .expect_place_order()
            .times(1)
            .withf(|_, order| order.quantity.get() == 25)
            .returning(|_, _| {
                Ok(OrderAck {
                    order_id: "251117000123".to_string(),
                    unique_order_id: None,
                    message: "SUCCESS".to_string(),
                })
            });

        let session = session(broker, live());
        let outcome = session.place_order(order()).await.unwrap();

        assert!(matches!(outcome, OrderOutcome::Placed { ref order_id, .. } if order_id == "251117000123"));
    }

    #[tokio::test]
    async fn live_rejection_is_captured_not_raised() {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_login()
            .returning(|_| Ok(SessionToken::new("jwt")));
        broker.expect_place_order().times(1).returning(|_, _| {
            Err(BrokerError::Rejected {
                reason: "AB4008: insufficient margin".to_string(),
            })
        });

        let session = session(broker, live());
        let outcome = session.place_order(order()).await.unwrap();

        assert!(outcome.is_error());
        assert!(matches!(outcome, OrderOutcome::Error { ref error } if error.contains("insufficient margin")));
    }

    #[tokio::test]
    async fn expired_session_is_renewed_once_for_order() {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_login()
            .times(2)
            .returning(|_| Ok(SessionToken::new("jwt")));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        broker
            .expect_place_order()
            .times(2)
            .returning(move |_, _| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(BrokerError::SessionExpired {
                        message: "AG8001".to_string(),
                    })
                } else {
                    Ok(OrderAck {
                        order_id: "1".to_string(),
                        unique_order_id: Some("u-1".to_string()),
                        message: "SUCCESS".to_string(),
                    })
                }
            });

        let session = session(broker, live());
        let outcome = session.place_order(order()).await.unwrap();

        assert!(!outcome.is_error());
    }

    #[tokio::test]
    async fn second_expiry_is_not_retried_again() {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_login()
            .times(2)
            .returning(|_| Ok(SessionToken::new("jwt")));
        broker.expect_place_order().times(2).returning(|_, _| {
            Err(BrokerError::SessionExpired {
                message: "AG8002".to_string(),
            })
        });

        let session = session(broker, live());
        let outcome = session.place_order(order()).await.unwrap();

        assert!(outcome.is_error());
    }

    /// Broker whose calls yield to the scheduler, so concurrent requests
    /// interleave. Sessions are numbered `jwt-1`, `jwt-2`, ... and `jwt-1` is
    /// rejected as expired.
    struct InterleavingBroker {
        logins: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl BrokerPort for InterleavingBroker {
        async fn login(&self, _credentials: &Credentials) -> Result<SessionToken, BrokerError> {
            tokio::task::yield_now().await;
            let n = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(SessionToken::new(format!("jwt-{n}")))
        }

        async fn list_instruments(
            &self,
            session: &SessionToken,
        ) -> Result<Vec<Instrument>, BrokerError> {
            tokio::task::yield_now().await;
            if session.jwt() == "jwt-1" {
                return Err(BrokerError::SessionExpired {
                    message: "AG8001".to_string(),
                });
            }
            Ok(listing())
        }

        fn order_payload(&self, _order: &OrderRequest) -> Result<serde_json::Value, BrokerError> {
            Ok(serde_json::Value::Null)
        }

        async fn place_order(
            &self,
            _session: &SessionToken,
            _order: &OrderRequest,
        ) -> Result<OrderAck, BrokerError> {
            unreachable!("lookups only")
        }
    }

    #[tokio::test]
    async fn concurrent_expiry_refreshes_once() {
        let broker = Arc::new(InterleavingBroker {
            logins: AtomicUsize::new(0),
        });
        let session = BrokerSession::new(
            Arc::clone(&broker),
            credentials(),
            BrokerSessionConfig::default(),
        );

        let (a, b) = tokio::join!(session.resolve_instrument(), session.resolve_instrument());

        assert_eq!(a.unwrap().token, "35003");
        assert_eq!(b.unwrap().token, "35003");
        assert_eq!(broker.logins.load(Ordering::SeqCst), 2);
        assert_eq!(session.authenticate().await.unwrap().jwt(), "jwt-2");
    }

    #[tokio::test]
    async fn invalidate_drops_cached_session() {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_login()
            .times(2)
            .returning(|_| Ok(SessionToken::new("jwt")));

        let session = session(broker, BrokerSessionConfig::default());

        session.authenticate().await.unwrap();
        session.invalidate().await;
        session.authenticate().await.unwrap();
    }
}
