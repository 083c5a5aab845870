use std::time::Duration;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of a single delivery attempt.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The attempt did not complete within its deadline.
    #[error("delivery attempt timed out after {0:?}")]
    Timeout(Duration),

    /// The provider rejected the message, or the transport failed to reach
    /// it at all.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),
}
