//! SMTP relay through `lettre`.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpSettings;
use crate::mailer::{EmailError, Mailer, OutgoingEmail, SendReceipt, SenderIdentity};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: SenderIdentity,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings, sender: SenderIdentity) -> Result<Self, EmailError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?.port(settings.port);
        if let (Some(user), Some(pass)) = (settings.user, settings.password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }
        Ok(Self {
            transport: builder.build(),
            sender,
        })
    }
}

/// Build the MIME message for an outgoing email.
pub fn build_message(email: &OutgoingEmail, default_sender: &SenderIdentity) -> Result<Message, EmailError> {
    let sender = email.sender.as_ref().unwrap_or(default_sender);
    let from = Mailbox::new(sender.name.clone(), sender.email.parse()?);
    let to = Mailbox::new(email.to_name.clone(), email.to_email.parse()?);

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject.clone())
        .header(ContentType::TEXT_HTML)
        .body(email.html.clone())
        .map_err(|e| EmailError::Build(e.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    fn provider(&self) -> &'static str {
        "smtp"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<SendReceipt, EmailError> {
        let message = build_message(email, &self.sender)?;
        let response = self.transport.send(message).await?;
        let message_id = response.message().next().map(str::to_string);
        tracing::info!(to = %email.to_email, "Email sent via SMTP");
        Ok(SendReceipt { message_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn sender() -> SenderIdentity {
        SenderIdentity {
            email: "noreply@evently.test".to_string(),
            name: Some("Evently".to_string()),
        }
    }

    fn email(to: &str) -> OutgoingEmail {
        OutgoingEmail {
            to_email: to.to_string(),
            to_name: None,
            subject: "Invitation".to_string(),
            html: "<p>Hello</p>".to_string(),
            sender: None,
        }
    }

    #[test]
    fn builds_html_message() {
        let message = build_message(&email("lea@example.com"), &sender()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("To: lea@example.com"));
        assert!(raw.contains("Subject: Invitation"));
    }

    #[test]
    fn rejects_bad_recipient() {
        assert_matches!(
            build_message(&email("not-an-email"), &sender()),
            Err(EmailError::Address(_))
        );
    }
}
