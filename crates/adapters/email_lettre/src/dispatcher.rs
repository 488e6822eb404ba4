//! SMTP dispatcher — delivers rendered payloads and records the feed.

use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use coachhub_app::ports::{NotificationDispatcher, NotificationStore};
use coachhub_domain::error::DispatchError;
use coachhub_domain::notification::NotificationRecord;
use coachhub_domain::payload::NotificationPayload;

use crate::config::SmtpConfig;
use crate::template;

/// Sends notification emails over SMTP (STARTTLS) and records one
/// [`NotificationRecord`] per delivered message.
pub struct SmtpNotificationDispatcher<N> {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    config: SmtpConfig,
    store: N,
}

impl<N: NotificationStore> SmtpNotificationDispatcher<N> {
    /// Build the transport from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError`] when the relay configuration is invalid.
    pub fn new(config: SmtpConfig, store: N) -> Result<Self, DispatchError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|err| DispatchError::new(format!("smtp relay: {err}")))?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            config,
            store,
        })
    }
}

impl<N> NotificationDispatcher for SmtpNotificationDispatcher<N>
where
    N: NotificationStore + Sync,
{
    async fn send(
        &self,
        recipient: &str,
        payload: &NotificationPayload,
    ) -> Result<(), DispatchError> {
        let rendered = template::render(payload);

        let from: Mailbox = self
            .config
            .from_mailbox()
            .parse()
            .map_err(|err| DispatchError::new(format!("invalid from address: {err}")))?;
        let to: Mailbox = recipient
            .parse()
            .map_err(|err| DispatchError::new(format!("invalid recipient address: {err}")))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(&rendered.subject)
            .header(ContentType::TEXT_HTML)
            .body(rendered.html.clone())
            .map_err(|err| DispatchError::new(format!("build email: {err}")))?;

        self.mailer
            .send(email)
            .await
            .map_err(|err| DispatchError::new(format!("smtp send: {err}")))?;

        tracing::info!(recipient = %recipient, subject = %rendered.subject, "email sent");

        let mut record = NotificationRecord::new(
            recipient,
            rendered.kind_tag,
            rendered.subject,
            rendered.summary,
            coachhub_domain::time::now(),
        );
        if let (Some(link), Some(text)) = (rendered.link, rendered.link_text) {
            record = record.with_link(link, text);
        }

        // The email is already out; a feed-write failure must not turn a
        // delivered message into a reported dispatch failure.
        if let Err(err) = self.store.save(record).await {
            tracing::error!(
                recipient = %recipient,
                error = %err,
                "failed to record portal notification for delivered email"
            );
        }

        Ok(())
    }
}
