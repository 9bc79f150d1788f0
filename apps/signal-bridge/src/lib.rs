// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Signal Bridge - Webhook to Broker Relay
//!
//! Receives BUY/SELL alerts from a charting platform and places one market
//! order per alert through Angel One SmartAPI.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core types with no I/O
//!   - `order_execution`: Order side, fixed order terms, order request, outcome
//!   - `instrument`: Contracts and first-match resolution
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: Interface to the broker (`BrokerPort`)
//!   - `services`: `BrokerSession` (cached login, dry-run guard)
//!   - `use_cases`: `RelaySignal`
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `broker`: SmartAPI adapter
//!   - `http`: `/health` and `/webhook`
//!   - `config`: Dependency injection container
//!
//! Dry-run is on unless explicitly disabled; nothing reaches the broker's
//! order endpoint in that mode.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Relay error kinds and their HTTP mapping.
pub mod error;

/// Console and file logging setup.
pub mod telemetry;

// =============================================================================
// Re-exports from Clean Architecture
// =============================================================================

// Domain re-exports
pub use domain::instrument::{Instrument, InstrumentFilter};
pub use domain::order_execution::{OrderOutcome, OrderRequest, OrderSide};
pub use domain::shared::{Quantity, Symbol};

// Application re-exports
pub use application::ports::{BrokerError, BrokerPort, Credentials, OrderAck, SessionToken};
pub use application::services::{BrokerSession, BrokerSessionConfig};
pub use application::use_cases::{RelaySignalCommand, RelaySignalResult, RelaySignalUseCase};

// Infrastructure re-exports
pub use infrastructure::broker::smartapi::{SmartApiBrokerAdapter, SmartApiConfig, SmartApiError};
pub use infrastructure::config::Container;
pub use infrastructure::http::{AppState, create_router};

pub use error::{ErrorCode, RelayError};
