//! Angel One SmartAPI Broker Adapter
//!
//! Implementation of `BrokerPort` for the SmartAPI REST interface:
//! - Password + TOTP login returning a JWT session
//! - Scrip master download for instrument resolution
//! - Market order placement
//!
//! Requests are never retried. A rejected session surfaces as
//! `BrokerError::SessionExpired` and the session service decides what to do.

mod adapter;
mod api_types;
mod config;
mod error;
mod http_client;
mod totp;

pub use adapter::SmartApiBrokerAdapter;
pub use config::{DEFAULT_BASE_URL, DEFAULT_INSTRUMENTS_URL, SmartApiConfig};
pub use error::SmartApiError;
