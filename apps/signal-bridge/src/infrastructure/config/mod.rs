//! Infrastructure Configuration
//!
//! Dependency injection container wiring the broker into the use case.

mod container;

pub use container::Container;
