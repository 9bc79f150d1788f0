//! Order value objects.

mod order_side;
mod order_terms;

pub use order_side::OrderSide;
pub use order_terms::{OrderDuration, OrderType, ProductType, Variety};
