//! Shared value objects.

mod quantity;
mod symbol;

pub use quantity::Quantity;
pub use symbol::Symbol;
