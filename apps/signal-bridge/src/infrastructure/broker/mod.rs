//! Broker Adapters
//!
//! Implementations of `BrokerPort`.

pub mod smartapi;

pub use smartapi::{SmartApiBrokerAdapter, SmartApiConfig, SmartApiError};
