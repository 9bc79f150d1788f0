//! SmartAPI broker adapter implementing BrokerPort.

use async_trait::async_trait;

use crate::application::ports::{BrokerError, BrokerPort, Credentials, OrderAck, SessionToken};
use crate::domain::instrument::Instrument;
use crate::domain::order_execution::OrderRequest;

use super::api_types::{
    LoginData, LoginRequest, PlaceOrderData, PlaceOrderRequest, ScripMasterEntry,
};
use super::config::SmartApiConfig;
use super::error::SmartApiError;
use super::http_client::SmartApiHttpClient;
use super::totp;

const LOGIN_PATH: &str = "/rest/auth/angelbroking/user/v1/loginByPassword";
const PLACE_ORDER_PATH: &str = "/rest/secure/angelbroking/order/v1/placeOrder";

/// Angel One SmartAPI broker adapter.
#[derive(Debug, Clone)]
pub struct SmartApiBrokerAdapter {
    client: SmartApiHttpClient,
    instruments_url: String,
    exchange: String,
}

impl SmartApiBrokerAdapter {
    /// Create a new SmartAPI broker adapter.
    pub fn new(config: SmartApiConfig) -> Result<Self, SmartApiError> {
        let client = SmartApiHttpClient::new(&config)?;
        Ok(Self {
            client,
            instruments_url: config.instruments_url,
            exchange: config.exchange,
        })
    }

    fn login_request(credentials: &Credentials) -> Result<LoginRequest, SmartApiError> {
        let totp = match credentials.totp_secret.as_deref() {
            Some(seed) if !seed.trim().is_empty() => totp::current_code(seed)?,
            _ => String::new(),
        };

        Ok(LoginRequest {
            clientcode: credentials.client_id.clone(),
            password: credentials.password.clone(),
            totp,
        })
    }
}

#[async_trait]
impl BrokerPort for SmartApiBrokerAdapter {
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, BrokerError> {
        let request = Self::login_request(credentials).map_err(SmartApiError::into_login_error)?;

        tracing::debug!(
            client_id = %credentials.client_id,
            with_totp = !request.totp.is_empty(),
            "Sending SmartAPI login"
        );

        let (data, _message): (LoginData, String) = self
            .client
            .post(LOGIN_PATH, &request, None)
            .await
            .map_err(SmartApiError::into_login_error)?;

        Ok(data.into_session_token())
    }

    async fn list_instruments(&self, _session: &SessionToken) -> Result<Vec<Instrument>, BrokerError> {
        tracing::debug!(url = %self.instruments_url, "Downloading scrip master");

        let entries: Vec<ScripMasterEntry> = self
            .client
            .get_json(&self.instruments_url)
            .await
            .map_err(BrokerError::from)?;

        let total = entries.len();
        let instruments: Vec<Instrument> = entries
            .into_iter()
            .filter(|entry| entry.is_on(&self.exchange))
            .map(ScripMasterEntry::into_instrument)
            .collect();

        tracing::debug!(
            total,
            kept = instruments.len(),
            exchange = %self.exchange,
            "Scrip master loaded"
        );

        Ok(instruments)
    }

    fn order_payload(&self, order: &OrderRequest) -> Result<serde_json::Value, BrokerError> {
        serde_json::to_value(PlaceOrderRequest::from(order))
            .map_err(|e| SmartApiError::JsonParse(e.to_string()).into())
    }

    async fn place_order(
        &self,
        session: &SessionToken,
        order: &OrderRequest,
    ) -> Result<OrderAck, BrokerError> {
        let request = PlaceOrderRequest::from(order);

        let (data, message): (PlaceOrderData, String) = self
            .client
            .post(PLACE_ORDER_PATH, &request, Some(session.jwt()))
            .await
            .map_err(BrokerError::from)?;

        Ok(data.into_ack(message))
    }
}
