//! Signal Bridge Binary
//!
//! Starts the webhook listener.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin signal-bridge
//! ```
//!
//! # Environment Variables
//!
//! ## Broker
//! - `SMARTAPI_KEY`, `ANGEL_CLIENT_ID`, `ANGEL_PASSWORD`: login credentials
//! - `ANGEL_TOTP_SECRET`: base32 TOTP seed (optional)
//!
//! ## Trading
//! - `DRY_RUN`: echo orders instead of placing them (default: true)
//! - `DEFAULT_QTY`: quantity when a webhook has no `qty` (default: 25)
//! - `INSTRUMENT_SYMBOL` + `INSTRUMENT_TOKEN`: fixed contract
//! - `UNDERLYING` / `SERIES_MARKER` / `EXCHANGE`: contract lookup (default: NIFTY / FUT / NFO)
//!
//! ## Runtime
//! - `HTTP_PORT` / `BIND_ADDRESS`: listener (default: 5000 / 0.0.0.0)
//! - `LOG_DIR` / `LOG_FILE`: append-only log (default: logs / app.log)
//! - `RUST_LOG`: log filter
//! - `SIGNAL_BRIDGE_CONFIG`: YAML config file replacing the built-in template

use std::sync::Arc;

use anyhow::Context;
use signal_bridge::config::{Config, load_config, load_dotenv, resolve_config_source};
use signal_bridge::infrastructure::broker::smartapi::{SmartApiBrokerAdapter, SmartApiConfig};
use signal_bridge::infrastructure::config::Container;
use signal_bridge::infrastructure::http::create_router;
use signal_bridge::telemetry::init_telemetry;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = std::env::current_dir().map_or(Ok(None), |cwd| load_dotenv(&cwd));

    let source = resolve_config_source(None);
    let config = load_config(None).with_context(|| format!("loading configuration from {source}"))?;
    let log_path =
        init_telemetry(&config.observability.logging).context("initializing logging")?;

    tracing::info!(
        config = %source,
        log_file = %log_path.display(),
        "Starting Signal Bridge"
    );
    match &dotenv {
        Ok(Some(path)) => tracing::info!(path = %path.display(), "Loaded .env"),
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load .env; using the process environment");
        }
    }
    log_config(&config);

    let broker = create_broker(&config)?;
    let container = Container::from_config(broker, &config).context("wiring application")?;
    let app = create_router(container.app_state(env!("CARGO_PKG_VERSION")));

    let addr = config.server.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding HTTP listener on {addr}"))?;

    tracing::info!(%addr, "HTTP server listening (/health, /webhook)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Signal Bridge stopped");
    Ok(())
}

fn log_config(config: &Config) {
    let credentials = config.broker.credentials();
    let missing = credentials.missing();

    tracing::info!(
        bind_address = %config.server.bind_address,
        http_port = config.server.http_port,
        dry_run = config.trading.dry_run,
        default_qty = config.trading.default_qty,
        exchange = %config.trading.exchange,
        underlying = %config.trading.underlying,
        series_marker = %config.trading.series_marker,
        instrument_override = config.trading.instrument_override().is_some(),
        totp = credentials.totp_secret.is_some(),
        "Configuration loaded"
    );

    if !missing.is_empty() {
        tracing::warn!(
            ?missing,
            "Broker credentials incomplete; webhooks will fail until they are set"
        );
    }
    if !config.trading.dry_run {
        tracing::warn!("DRY_RUN disabled: webhooks will place LIVE orders");
    }
}

/// Create the SmartAPI broker adapter.
fn create_broker(config: &Config) -> anyhow::Result<Arc<SmartApiBrokerAdapter>> {
    let broker_config = &config.broker;
    let smartapi_config = SmartApiConfig::new(broker_config.api_key.trim())
        .with_base_url(&broker_config.base_url)
        .with_instruments_url(&broker_config.instruments_url)
        .with_exchange(config.trading.exchange.trim().to_uppercase())
        .with_timeout(broker_config.timeout())
        .with_client_identity(
            &broker_config.client_local_ip,
            &broker_config.client_public_ip,
            &broker_config.mac_address,
        );

    let broker =
        SmartApiBrokerAdapter::new(smartapi_config).context("creating SmartAPI client")?;

    tracing::info!(base_url = %broker_config.base_url, "SmartApiBrokerAdapter initialized");

    Ok(Arc::new(broker))
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
