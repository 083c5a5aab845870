mod credentials;

pub use credentials::SmtpServerCredentials;

use async_trait::async_trait;
use lettre::address::AddressError;
use lettre::message::{Mailbox, MultiPart};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use mailcast_core::error::DeliveryError;
use mailcast_core::message::{Envelope, RenderedEmail};
use mailcast_core::transport::EmailTransport;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmtpError {
    #[error("invalid credential format")]
    Credentials,

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Message(#[from] lettre::error::Error),

    #[error(transparent)]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Email delivery over SMTP.
///
/// The underlying lettre transport pools connections and is safe for
/// concurrent use, so one `SmtpTransport` serves independent sends.
#[derive(Clone)]
pub struct SmtpTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpTransport {
    pub fn new(credentials: SmtpServerCredentials) -> Result<Self, SmtpError> {
        let inner =
            AsyncSmtpTransport::<Tokio1Executor>::from_url(&credentials.into_url())?.build();
        Ok(Self { inner })
    }
}

#[async_trait]
impl EmailTransport for SmtpTransport {
    async fn send_message(
        &self,
        envelope: &Envelope,
        content: &RenderedEmail,
    ) -> Result<(), DeliveryError> {
        let message =
            assemble(envelope, content).map_err(|err| DeliveryError::Transport(err.into()))?;

        self.inner
            .send(message)
            .await
            .map_err(|err| DeliveryError::Transport(err.into()))?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

// The provider sees bare addresses only; display names stay empty.
fn bare_mailbox(address: &str) -> Result<Mailbox, AddressError> {
    Ok(Mailbox::new(None, address.parse()?))
}

fn assemble(envelope: &Envelope, content: &RenderedEmail) -> Result<Message, SmtpError> {
    Ok(Message::builder()
        .from(bare_mailbox(&envelope.from)?)
        .to(bare_mailbox(&envelope.to)?)
        .subject(content.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            content.plain_body.clone(),
            content.html_body.clone(),
        ))?)
}
