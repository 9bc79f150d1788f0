//! HTTP Controller (Driver Adapter)
//!
//! Axum-based endpoints that delegate to the relay use case.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::Instrument as _;
use uuid::Uuid;

use crate::application::ports::BrokerPort;
use crate::application::use_cases::{RelaySignalCommand, RelaySignalUseCase};

use super::request::WebhookPayload;
use super::response::{HealthResponse, WebhookResponse};

/// Application state shared across handlers.
pub struct AppState<B: BrokerPort> {
    /// Use case for relaying signals.
    pub relay: Arc<RelaySignalUseCase<B>>,
    /// Application version.
    pub version: String,
}

impl<B: BrokerPort> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            relay: Arc::clone(&self.relay),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
pub fn create_router<B: BrokerPort + 'static>(state: AppState<B>) -> Router {
    Router::new()
        .route("/health", get(health_check::<B>))
        .route("/webhook", post(webhook::<B>))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check<B: BrokerPort>(State(state): State<AppState<B>>) -> impl IntoResponse {
    Json(HealthResponse::now(state.version.clone()))
}

/// Signal webhook endpoint.
///
/// The body is taken as raw bytes so alerts sent as `text/plain` are still
/// interpreted as JSON.
async fn webhook<B: BrokerPort + 'static>(
    State(state): State<AppState<B>>,
    body: Bytes,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("webhook", %request_id);
    let (status, response) = handle_webhook(&state, &body).instrument(span).await;
    (status, Json(response)).into_response()
}

async fn handle_webhook<B: BrokerPort>(
    state: &AppState<B>,
    body: &[u8],
) -> (StatusCode, WebhookResponse) {
    tracing::info!(payload = %String::from_utf8_lossy(body), "Webhook received");

    let payload = match WebhookPayload::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, "Rejecting webhook body");
            return WebhookResponse::from_error(&e);
        }
    };

    let Some(side) = payload.side() else {
        tracing::warn!(signal = ?payload.signal, "Ignoring webhook without a BUY/SELL signal");
        return (StatusCode::OK, WebhookResponse::Ignored);
    };

    let command = RelaySignalCommand {
        side,
        quantity: payload.qty,
    };

    match state.relay.execute(command).await {
        Ok(result) => {
            let (status, response) = WebhookResponse::from_outcome(result.side, result.outcome);
            tracing::info!(status = status.as_u16(), response = ?response, "Webhook handled");
            (status, response)
        }
        Err(e) => {
            tracing::error!(error = %e, code = %e.code(), "Webhook failed");
            WebhookResponse::from_error(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{Credentials, MockBrokerPort, SessionToken};
    use crate::application::services::{BrokerSession, BrokerSessionConfig};
    use crate::domain::instrument::Instrument;
    use crate::domain::shared::Quantity;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_state(broker: MockBrokerPort) -> AppState<MockBrokerPort> {
        let credentials = Credentials {
            api_key: "key".to_string(),
            client_id: "A123456".to_string(),
            password: "1234".to_string(),
            totp_secret: None,
        };
        let session = BrokerSession::new(
            Arc::new(broker),
            credentials,
            BrokerSessionConfig::default(),
        );
        let relay = RelaySignalUseCase::new(Arc::new(session), Quantity::new(25).unwrap());

        AppState {
            relay: Arc::new(relay),
            version: "test".to_string(),
        }
    }

    async fn post_webhook(app: Router, body: &'static str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(create_test_state(MockBrokerPort::new()));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_signal_is_ignored_without_login() {
        let mut broker = MockBrokerPort::new();
        broker.expect_login().never();
        let app = create_router(create_test_state(broker));

        let (status, json) = post_webhook(app, r#"{"signal":"HOLD"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({"status": "ignored"}));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let mut broker = MockBrokerPort::new();
        broker.expect_login().never();
        let app = create_router(create_test_state(broker));

        let (status, json) = post_webhook(app, "BUY now").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "INVALID_PAYLOAD");
    }

    #[tokio::test]
    async fn test_dry_run_order_is_echoed() {
        let mut broker = MockBrokerPort::new();
        broker
            .expect_login()
            .times(1)
            .returning(|_| Ok(SessionToken::new("jwt")));
        broker
            .expect_list_instruments()
            .returning(|_| Ok(vec![Instrument::new("NIFTY25NOV25FUT", "35003")]));
        broker.expect_place_order().never();
        broker.expect_order_payload().times(1).returning(|order| {
            Ok(serde_json::json!({
                "symboltoken": order.symbol_token,
                "quantity": order.quantity.get().to_string(),
            }))
        });
        let app = create_router(create_test_state(broker));

        let (status, json) = post_webhook(app, r#"{"signal":"buy","qty":"50"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["signal"], "BUY");
        assert_eq!(json["response"]["status"], "dry_run");
        assert_eq!(json["response"]["payload"]["quantity"], "50");
        assert_eq!(json["response"]["payload"]["symboltoken"], "35003");
    }
}
