//! HTTP/REST API adapter.
//!
//! Inbound adapter exposing the health probe and the signal webhook.

mod controller;
mod request;
mod response;

pub use controller::{AppState, create_router};
pub use request::*;
pub use response::*;
