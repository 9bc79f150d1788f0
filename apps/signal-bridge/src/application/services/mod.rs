//! Application Services
//!
//! Services hold the state shared between webhook requests. The broker
//! session is the only one: it owns the cached login and the dry-run guard.

mod broker_session;

pub use broker_session::{BrokerSession, BrokerSessionConfig, DEFAULT_SESSION_TTL};
