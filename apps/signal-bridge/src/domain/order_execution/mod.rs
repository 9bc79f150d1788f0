//! Order Execution Bounded Context
//!
//! A webhook signal becomes exactly one market order. There is no lifecycle
//! beyond construction: no tracking, fills or cancellation.

mod order_outcome;
mod order_request;
pub mod value_objects;

pub use order_outcome::OrderOutcome;
pub use order_request::OrderRequest;
pub use value_objects::{OrderDuration, OrderSide, OrderType, ProductType, Variety};
