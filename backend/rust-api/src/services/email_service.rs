use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::config::SmtpSettings;
use crate::error::MailError;

/// Outbound channel for the daily puzzle emails.
#[async_trait]
pub trait MailTransport: Send + Sync {
    fn name(&self) -> &'static str;

    async fn send(&self, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Sends one plain-text message from the configured sender to every recipient.
pub struct SmtpMailer {
    from: Mailbox,
    recipients: Vec<Mailbox>,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    sending_disabled: bool,
}

impl SmtpMailer {
    pub fn new(
        settings: &SmtpSettings,
        recipients: &[String],
        sending_disabled: bool,
    ) -> Result<Self, MailError> {
        if recipients.is_empty() {
            return Err(MailError::NoRecipients);
        }

        let from = parse_mailbox(&format!("{} <{}>", settings.from_name, settings.from_email))?;
        let recipients = recipients
            .iter()
            .map(|address| parse_mailbox(address))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            from,
            recipients,
            mailer: build_mailer(settings)?,
            sending_disabled,
        })
    }

    fn build_message(&self, subject: &str, body: &str) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(subject)
            .header(ContentType::TEXT_PLAIN);
        for recipient in &self.recipients {
            builder = builder.to(recipient.clone());
        }

        Ok(builder.body(body.to_string())?)
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    fn name(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, subject: &str, body: &str) -> Result<(), MailError> {
        let email = self.build_message(subject, body)?;

        if self.sending_disabled {
            tracing::info!(
                "Email sending disabled; skipping '{}' to {} recipients",
                subject,
                self.recipients.len()
            );
            tracing::debug!("Suppressed email body:\n{}", body);
            return Ok(());
        }

        self.mailer.send(email).await?;

        tracing::info!(
            "Email '{}' sent to {} recipients",
            subject,
            self.recipients.len()
        );
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse()
        .map_err(|source| MailError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

fn build_mailer(settings: &SmtpSettings) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
    let creds = Credentials::new(settings.login.clone(), settings.password.clone());

    // relay() wraps the connection in TLS from the first byte (SMTPS).
    let builder = if settings.use_tls {
        AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.server)?
    } else {
        AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.server)
    }
    .port(settings.port)
    .credentials(creds);

    Ok(builder.build())
}
