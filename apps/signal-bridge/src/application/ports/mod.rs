//! Application Ports (Driven)
//!
//! Ports define interfaces for the external systems the relay depends on.

mod broker_port;

#[cfg(test)]
pub use broker_port::MockBrokerPort;
pub use broker_port::{BrokerError, BrokerPort, Credentials, OrderAck, SessionToken};
