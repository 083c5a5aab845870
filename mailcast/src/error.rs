use mailcast_core::error::DeliveryError;
use mailcast_template::error::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailerError {
    /// Rendering failed. Never retried: retrying a malformed template or an
    /// incomplete context cannot succeed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Every delivery attempt failed. Carries the final attempt's error;
    /// earlier failures are logged but not aggregated.
    #[error("delivery failed after {attempts} attempts")]
    Delivery {
        attempts: u32,
        #[source]
        source: DeliveryError,
    },
}
