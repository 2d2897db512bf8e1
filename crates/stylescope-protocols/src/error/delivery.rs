//! Message delivery errors.

use thiserror::Error;

/// Failure to hand a message to another execution context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Nobody is listening on the other side (agent not injected, popup closed).
    #[error("Could not establish connection. Receiving end does not exist.")]
    NoReceiver,

    /// The receiver went away before replying.
    #[error("The message port closed before a response was received.")]
    PortClosed,

    #[error("Delivery failed: {0}")]
    Failed(String),
}

impl DeliveryError {
    /// True for the "no listener" condition that triggers injection.
    pub fn is_no_receiver(&self) -> bool {
        matches!(self, Self::NoReceiver)
    }
}
