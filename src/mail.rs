use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::error::{AppError, Result};

/// Delivers one plain-text message to one recipient.
#[allow(async_fn_in_trait)]
pub trait MailTransport {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()>;
}

/// Submission endpoint and sender identity.
#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

/// STARTTLS submission with a fixed sender and credential. No retry.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let sender: Mailbox = settings
            .from
            .parse()
            .map_err(|e| AppError::Config(format!("invalid MAIL_FROM '{}': {e}", settings.from)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| AppError::Config(format!("invalid SMTP host '{}': {e}", settings.host)))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        Ok(Self { transport, sender })
    }
}

/// Builds the single-recipient plain-text message.
pub fn build_message(sender: &Mailbox, recipient: &str, subject: &str, body: &str) -> Result<Message> {
    let to: Mailbox = recipient.parse().map_err(AppError::delivery)?;

    Message::builder()
        .from(sender.clone())
        .to(to)
        .subject(subject)
        .header(ContentType::TEXT_PLAIN)
        .body(body.to_string())
        .map_err(AppError::delivery)
}

impl MailTransport for SmtpMailer {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<()> {
        let message = build_message(&self.sender, recipient, subject, body)?;

        self.transport.send(message).await.map_err(|e| {
            tracing::error!(error = %e, recipient, "SMTP submission failed");
            AppError::delivery(e)
        })?;

        tracing::info!(recipient, "Email sent");
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> Mailbox {
        "Leave Desk <desk@school.edu>".parse().expect("sender parsed")
    }

    #[test]
    fn message_is_plain_text_to_one_recipient() {
        let message = build_message(&sender(), "wang@school.edu", "Leave list", "hello\n")
            .expect("message built");

        let raw = String::from_utf8(message.formatted()).expect("utf-8 message");
        assert!(raw.contains("To: wang@school.edu"));
        assert!(raw.contains("Subject: Leave list"));
        assert!(raw.contains("Content-Type: text/plain; charset=utf-8"));
        assert_eq!(message.envelope().to().len(), 1);
    }

    #[test]
    fn bad_recipient_is_a_delivery_error() {
        let err = build_message(&sender(), "not an address", "s", "b").expect_err("rejected");
        assert!(matches!(err, AppError::Delivery(_)));
    }

    #[test]
    fn settings_debug_hides_password() {
        let settings = SmtpSettings {
            host: "smtp.school.edu".into(),
            port: 587,
            username: "desk".into(),
            password: "hunter2".into(),
            from: "desk@school.edu".into(),
        };
        assert!(!format!("{settings:?}").contains("hunter2"));
    }
}
