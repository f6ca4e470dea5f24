//! The sending seam shared by every provider.

use async_trait::async_trait;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Email sending is not configured")]
    NotConfigured,

    /// The provider rejected the message. The text is the provider's own.
    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Email build error: {0}")]
    Build(String),

    #[error("Email template error: {0}")]
    Template(#[from] askama::Error),
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SenderIdentity {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to_email: String,
    pub to_name: Option<String>,
    pub subject: String,
    pub html: String,
    /// Overrides the configured default sender.
    pub sender: Option<SenderIdentity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SendReceipt {
    pub message_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Short provider name for logs.
    fn provider(&self) -> &'static str;

    async fn send(&self, email: &OutgoingEmail) -> Result<SendReceipt, EmailError>;
}

/// Used when no provider is configured.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    fn provider(&self) -> &'static str {
        "disabled"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<SendReceipt, EmailError> {
        tracing::debug!(to = %email.to_email, "Email dropped: no provider configured");
        Err(EmailError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn disabled_mailer_refuses() {
        let email = OutgoingEmail {
            to_email: "lea@example.com".to_string(),
            to_name: None,
            subject: "Hi".to_string(),
            html: "<p>Hi</p>".to_string(),
            sender: None,
        };
        assert_matches!(DisabledMailer.send(&email).await, Err(EmailError::NotConfigured));
    }

    #[test]
    fn provider_message_is_verbatim() {
        let err = EmailError::Provider {
            status: 400,
            message: "sender not valid".to_string(),
        };
        assert_eq!(err.to_string(), "sender not valid");
    }
}
