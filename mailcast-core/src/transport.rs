use crate::error::DeliveryError;
use crate::message::{Envelope, RenderedEmail};
use async_trait::async_trait;

/// A single-shot delivery channel to the email provider.
///
/// Implementations perform exactly one delivery per call; the caller owns
/// the per-attempt deadline and the retry loop. Implementations must be
/// safe for concurrent use through `&self`, so independent sends can run
/// at the same time over one shared handle.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    async fn send_message(
        &self,
        envelope: &Envelope,
        content: &RenderedEmail,
    ) -> Result<(), DeliveryError>;

    fn name(&self) -> &'static str;
}
