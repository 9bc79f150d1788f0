//! Application Use Cases
//!
//! Use cases orchestrate domain logic to fulfill application requirements.

mod relay_signal;

pub use relay_signal::{RelaySignalCommand, RelaySignalResult, RelaySignalUseCase};
