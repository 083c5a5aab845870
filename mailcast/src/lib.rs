pub mod error;

pub use crate::error::MailerError;
pub use mailcast_core::error::DeliveryError;
pub use mailcast_core::message::{Envelope, RenderedEmail};
pub use mailcast_core::retry::RetryPolicy;
pub use mailcast_core::transport::EmailTransport;
pub use mailcast_smtp::{SmtpError, SmtpServerCredentials, SmtpTransport};
pub use mailcast_template::source::TemplateSource;
pub use mailcast_template::Templater;

use serde::Serialize;
use std::sync::Arc;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};
use uuid::Uuid;

/// Renders a named template bundle and delivers the result as a multi-part
/// email, retrying failed delivery attempts up to a fixed bound.
///
/// One `Mailer` is constructed per process and shared freely: it holds the
/// provider handle and the fixed sender address, and keeps no per-call
/// state, so independent sends proceed concurrently.
pub struct Mailer {
    templater: Templater,
    transport: Arc<dyn EmailTransport>,
    sender: String,
    policy: RetryPolicy,
}

impl Mailer {
    /// Creates a mailer delivering over SMTP.
    pub fn new(
        source: Arc<dyn TemplateSource>,
        credentials: SmtpServerCredentials,
        sender: impl Into<String>,
    ) -> Result<Self, SmtpError> {
        let transport = Arc::new(SmtpTransport::new(credentials)?);
        Ok(Self::with_transport(source, transport, sender))
    }

    /// Creates a mailer over any delivery transport.
    pub fn with_transport(
        source: Arc<dyn TemplateSource>,
        transport: Arc<dyn EmailTransport>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            templater: Templater::new(source),
            transport,
            sender: sender.into(),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Renders the named bundle against `context` without sending.
    pub async fn render<C>(
        &self,
        bundle_name: &str,
        context: &C,
    ) -> Result<RenderedEmail, MailerError>
    where
        C: Serialize + ?Sized,
    {
        Ok(self.templater.render(bundle_name, context).await?)
    }

    /// Renders the named bundle and delivers the result to `recipient`.
    ///
    /// Rendering failures surface immediately; delivery failures are
    /// retried per the mailer's [`RetryPolicy`], and only the final
    /// attempt's error is returned.
    pub async fn send<C>(
        &self,
        recipient: &str,
        bundle_name: &str,
        context: &C,
    ) -> Result<(), MailerError>
    where
        C: Serialize + ?Sized,
    {
        let content = self.templater.render(bundle_name, context).await?;
        self.deliver(recipient, &content).await
    }

    /// Delivers an already rendered message to `recipient`.
    ///
    /// Runs up to `max_attempts` delivery attempts strictly in sequence,
    /// each under its own independent deadline, pausing `retry_delay`
    /// between failures. The delay is not charged against the next
    /// attempt's deadline.
    pub async fn deliver(
        &self,
        recipient: &str,
        content: &RenderedEmail,
    ) -> Result<(), MailerError> {
        let message_id = Uuid::now_v7();
        let envelope = Envelope {
            from: self.sender.clone(),
            to: recipient.to_owned(),
        };
        debug!(
            %message_id,
            transport = self.transport.name(),
            to = recipient,
            "delivering message"
        );

        let mut attempt = 1;
        loop {
            let outcome = timeout(
                self.policy.attempt_timeout,
                self.transport.send_message(&envelope, content),
            )
            .await;

            let error = match outcome {
                Ok(Ok(())) => {
                    debug!(%message_id, attempt, "message delivered");
                    return Ok(());
                }
                Ok(Err(error)) => error,
                Err(_) => DeliveryError::Timeout(self.policy.attempt_timeout),
            };

            warn!(%message_id, attempt, %error, "delivery attempt failed");

            if attempt >= self.policy.max_attempts {
                return Err(MailerError::Delivery {
                    attempts: attempt,
                    source: error,
                });
            }

            attempt += 1;
            sleep(self.policy.retry_delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mailcast_template::error::TemplateError;
    use mailcast_template::source::{BundleSource, StaticSource};
    use serde_json::json;
    use std::future::pending;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Fails the first `fail_first` calls with an error naming the call
    /// number, then succeeds.
    struct FlakyTransport {
        calls: AtomicU32,
        fail_first: u32,
    }

    impl FlakyTransport {
        fn new(fail_first: u32) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicU32::new(0),
                fail_first,
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl EmailTransport for FlakyTransport {
        async fn send_message(
            &self,
            _envelope: &Envelope,
            _content: &RenderedEmail,
        ) -> Result<(), DeliveryError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.fail_first {
                return Err(DeliveryError::Transport(
                    format!("provider refused call {call}").into(),
                ));
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    /// Accepts the call, then never returns.
    #[derive(Default)]
    struct HangingTransport {
        calls: AtomicU32,
    }

    #[async_trait]
    impl EmailTransport for HangingTransport {
        async fn send_message(
            &self,
            _envelope: &Envelope,
            _content: &RenderedEmail,
        ) -> Result<(), DeliveryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            pending::<()>().await;
            Ok(())
        }

        fn name(&self) -> &'static str {
            "hanging"
        }
    }

    /// Records every envelope it is asked to deliver.
    #[derive(Default)]
    struct RecordingTransport {
        envelopes: Mutex<Vec<Envelope>>,
    }

    #[async_trait]
    impl EmailTransport for RecordingTransport {
        async fn send_message(
            &self,
            envelope: &Envelope,
            _content: &RenderedEmail,
        ) -> Result<(), DeliveryError> {
            self.envelopes.lock().unwrap().push(envelope.clone());
            Ok(())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    fn mailer_with(transport: Arc<dyn EmailTransport>) -> Mailer {
        let source = StaticSource::new().insert(
            "welcome",
            BundleSource {
                subject: "Welcome, {{ name }}!".into(),
                plain_body: "Hi {{ name }}".into(),
                html_body: "<p>Hi {{ name }}</p>".into(),
            },
        );
        Mailer::with_transport(Arc::new(source), transport, "no-reply@example.com")
    }

    #[tokio::test]
    async fn succeeds_on_the_first_attempt_without_delay() {
        let transport = FlakyTransport::new(0);
        let mailer = mailer_with(transport.clone());

        mailer
            .send("alice@example.com", "welcome", &json!({"name": "Alice"}))
            .await
            .unwrap();

        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_the_transport_recovers() {
        let transport = FlakyTransport::new(2);
        let mailer = mailer_with(transport.clone());

        let started = Instant::now();
        mailer
            .send("alice@example.com", "welcome", &json!({"name": "Alice"}))
            .await
            .unwrap();

        assert_eq!(transport.calls(), 3);
        // Two inter-attempt pauses of 500 ms each.
        assert_eq!(started.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_report_the_final_attempts_error() {
        let transport = FlakyTransport::new(3);
        let mailer = mailer_with(transport.clone());

        let err = mailer
            .send("alice@example.com", "welcome", &json!({"name": "Alice"}))
            .await
            .unwrap_err();

        assert_eq!(transport.calls(), 3);
        match err {
            MailerError::Delivery { attempts, source } => {
                assert_eq!(attempts, 3);
                assert_eq!(
                    source.to_string(),
                    "transport error: provider refused call 3"
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_transport_times_out_every_attempt() {
        let transport = Arc::new(HangingTransport::default());
        let mailer = mailer_with(transport.clone());

        let started = Instant::now();
        let err = mailer
            .send("alice@example.com", "welcome", &json!({"name": "Alice"}))
            .await
            .unwrap_err();

        assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
        // Three 5 s deadlines plus two 500 ms pauses.
        assert_eq!(started.elapsed(), Duration::from_secs(16));
        match err {
            MailerError::Delivery { attempts, source } => {
                assert_eq!(attempts, 3);
                assert!(matches!(
                    source,
                    DeliveryError::Timeout(deadline) if deadline == Duration::from_secs(5)
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_sends_do_not_serialize() {
        let transport = Arc::new(HangingTransport::default());
        let mailer = mailer_with(transport.clone());

        let started = Instant::now();
        let alice_data = json!({"name": "Alice"});
        let bob_data = json!({"name": "Bob"});
        let (a, b) = tokio::join!(
            mailer.send("alice@example.com", "welcome", &alice_data),
            mailer.send("bob@example.com", "welcome", &bob_data),
        );

        assert!(a.is_err());
        assert!(b.is_err());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 6);
        // Both sends run their attempt sequences side by side: the pair
        // finishes in one send's wall time, not two.
        assert_eq!(started.elapsed(), Duration::from_secs(16));
    }

    #[tokio::test(start_paused = true)]
    async fn custom_policy_bounds_the_attempt_count() {
        let transport = FlakyTransport::new(u32::MAX);
        let mailer = mailer_with(transport.clone()).with_retry_policy(RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        });

        let started = Instant::now();
        let err = mailer
            .send("alice@example.com", "welcome", &json!({"name": "Alice"}))
            .await
            .unwrap_err();

        assert_eq!(transport.calls(), 1);
        // The only attempt is final, so no inter-attempt pause happens.
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert!(matches!(err, MailerError::Delivery { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn deliver_sends_a_prerendered_message() {
        let transport = Arc::new(RecordingTransport::default());
        let mailer = mailer_with(transport.clone());
        let content = RenderedEmail {
            subject: "Your invoice".into(),
            plain_body: "Attached below.".into(),
            html_body: "<p>Attached below.</p>".into(),
        };

        mailer.deliver("carol@example.com", &content).await.unwrap();

        let envelopes = transport.envelopes.lock().unwrap();
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].to, "carol@example.com");
    }

    #[tokio::test]
    async fn render_failure_never_reaches_the_transport() {
        let transport = FlakyTransport::new(0);
        let mailer = mailer_with(transport.clone());

        let err = mailer
            .send("alice@example.com", "welcome", &json!({}))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MailerError::Template(TemplateError::Render {
                section: "subject",
                ..
            })
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_bundle_never_reaches_the_transport() {
        let transport = FlakyTransport::new(0);
        let mailer = mailer_with(transport.clone());

        let err = mailer
            .send("alice@example.com", "missing", &json!({}))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MailerError::Template(TemplateError::NotFound(_))
        ));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn envelope_carries_the_fixed_sender_and_the_recipient() {
        let transport = Arc::new(RecordingTransport::default());
        let mailer = mailer_with(transport.clone());

        mailer
            .send("alice@example.com", "welcome", &json!({"name": "Alice"}))
            .await
            .unwrap();

        let envelopes = transport.envelopes.lock().unwrap();
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].from, "no-reply@example.com");
        assert_eq!(envelopes[0].to, "alice@example.com");
    }
}
