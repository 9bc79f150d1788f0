//! Infrastructure Layer
//!
//! Adapters for the ports defined in the application layer:
//!
//! - **Driven Adapters (Outbound)**
//!   - `broker/`: Broker API adapters (Angel One SmartAPI)
//!
//! - **Driver Adapters (Inbound)**
//!   - `http/`: Webhook and health endpoints
//!
//! - **Wiring**
//!   - `config/`: Dependency injection container

pub mod broker;
pub mod config;
pub mod http;
