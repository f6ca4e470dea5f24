//! Transactional email for Evently.
//!
//! - [`Mailer`] is the sending seam; handlers hold an `Arc<dyn Mailer>`.
//! - [`BrevoMailer`] posts to the Brevo transactional API.
//! - [`SmtpMailer`] relays through an SMTP server with `lettre`.
//! - [`DisabledMailer`] answers every send with [`EmailError::NotConfigured`].
//! - [`compose`] renders the built-in inscription and invitation bodies.

pub mod brevo;
pub mod compose;
pub mod config;
pub mod mailer;
pub mod smtp;

use std::sync::Arc;

pub use brevo::BrevoMailer;
pub use config::{MailConfig, MailProvider};
pub use mailer::{DisabledMailer, EmailError, Mailer, OutgoingEmail, SendReceipt, SenderIdentity};
pub use smtp::SmtpMailer;

/// Build the mailer selected by configuration.
///
/// A provider that fails to initialise is logged and replaced by the
/// disabled mailer, so the API still starts.
pub fn build_mailer(config: Option<MailConfig>) -> Arc<dyn Mailer> {
    let Some(config) = config else {
        tracing::warn!("No email provider configured; outgoing email is disabled");
        return Arc::new(DisabledMailer);
    };

    let sender = config.default_sender();
    match config.provider {
        MailProvider::Brevo { api_key, api_url } => {
            match BrevoMailer::new(api_key, api_url, sender) {
                Ok(mailer) => Arc::new(mailer),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to initialise Brevo mailer");
                    Arc::new(DisabledMailer)
                }
            }
        }
        MailProvider::Smtp(smtp) => match SmtpMailer::new(smtp, sender) {
            Ok(mailer) => Arc::new(mailer),
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialise SMTP mailer");
                Arc::new(DisabledMailer)
            }
        },
    }
}
