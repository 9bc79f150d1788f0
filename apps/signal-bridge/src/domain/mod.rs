//! Domain Layer
//!
//! Business types with zero infrastructure dependencies.
//!
//! # Bounded Contexts
//!
//! - [`order_execution`]: Order sides, fixed order terms, the order request and its outcome
//! - [`instrument`]: Tradable contracts and first-match resolution
//! - [`shared`]: Value objects shared across contexts (symbols, quantities)

pub mod instrument;
pub mod order_execution;
pub mod shared;
