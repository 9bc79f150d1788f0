//! Application Layer
//!
//! Orchestrates the domain through a single use case. It defines:
//!
//! - **Ports**: Interfaces for external systems (`BrokerPort`)
//! - **Services**: The broker session adapter (cached login, dry-run guard)
//! - **Use Cases**: `RelaySignal`, the webhook-to-order pipeline

pub mod ports;
pub mod services;
pub mod use_cases;

pub use ports::*;
pub use services::*;
pub use use_cases::*;
