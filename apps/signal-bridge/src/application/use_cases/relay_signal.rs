//! Relay Signal Use Case

use std::sync::Arc;

use crate::application::ports::BrokerPort;
use crate::application::services::BrokerSession;
use crate::domain::order_execution::{OrderOutcome, OrderRequest, OrderSide};
use crate::domain::shared::Quantity;
use crate::error::RelayError;

/// A validated trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaySignalCommand {
    /// Order side from the signal.
    pub side: OrderSide,
    /// Quantity override; `None` uses the configured default.
    pub quantity: Option<Quantity>,
}

/// Result of relaying one signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySignalResult {
    /// Side that was relayed.
    pub side: OrderSide,
    /// What happened to the order.
    pub outcome: OrderOutcome,
}

/// Use case for turning one signal into one market order.
pub struct RelaySignalUseCase<B: BrokerPort> {
    session: Arc<BrokerSession<B>>,
    default_quantity: Quantity,
}

impl<B: BrokerPort> RelaySignalUseCase<B> {
    /// Create a new RelaySignalUseCase.
    pub fn new(session: Arc<BrokerSession<B>>, default_quantity: Quantity) -> Self {
        Self {
            session,
            default_quantity,
        }
    }

    /// Configured default quantity.
    #[must_use]
    pub const fn default_quantity(&self) -> Quantity {
        self.default_quantity
    }

    /// Execute the use case.
    pub async fn execute(&self, command: RelaySignalCommand) -> Result<RelaySignalResult, RelayError> {
        // 1. Make sure a broker session exists (fails fast on missing credentials)
        self.session.authenticate().await?;

        // 2. Resolve the contract
        let instrument = self.session.resolve_instrument().await?;

        // 3. Build the order
        let quantity = command.quantity.unwrap_or(self.default_quantity);
        let order = OrderRequest::market(
            &instrument,
            command.side,
            quantity,
            self.session.exchange(),
        );

        // 4. Place (or echo) it
        let outcome = self.session.place_order(order).await?;

        Ok(RelaySignalResult {
            side: command.side,
            outcome,
        })
    }
}
