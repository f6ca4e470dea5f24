//! Email provider configuration.

use crate::mailer::SenderIdentity;

/// Default Brevo API base URL.
pub const DEFAULT_BREVO_API_URL: &str = "https://api.brevo.com/v3";

/// Default SMTP port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

const DEFAULT_FROM_EMAIL: &str = "noreply@evently.local";
const DEFAULT_FROM_NAME: &str = "Evently";

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub enum MailProvider {
    Brevo { api_key: String, api_url: String },
    Smtp(SmtpSettings),
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub provider: MailProvider,
    pub from_email: String,
    pub from_name: String,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Brevo wins when `BREVO_API_KEY` is set, otherwise SMTP is used when
    /// `SMTP_HOST` is set. Returns `None` when neither is present.
    ///
    /// | Variable           | Required | Default                    |
    /// |--------------------|----------|----------------------------|
    /// | `BREVO_API_KEY`    | no       | -                          |
    /// | `BREVO_API_URL`    | no       | `https://api.brevo.com/v3` |
    /// | `BREVO_FROM_EMAIL` | no       | `noreply@evently.local`    |
    /// | `BREVO_FROM_NAME`  | no       | `Evently`                  |
    /// | `SMTP_HOST`        | no       | -                          |
    /// | `SMTP_PORT`        | no       | `587`                      |
    /// | `SMTP_USER`        | no       | -                          |
    /// | `SMTP_PASSWORD`    | no       | -                          |
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`MailConfig::from_env`] over an arbitrary variable source.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let non_empty = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let provider = if let Some(api_key) = non_empty("BREVO_API_KEY") {
            MailProvider::Brevo {
                api_key,
                api_url: non_empty("BREVO_API_URL")
                    .unwrap_or_else(|| DEFAULT_BREVO_API_URL.to_string()),
            }
        } else if let Some(host) = non_empty("SMTP_HOST") {
            MailProvider::Smtp(SmtpSettings {
                host,
                port: non_empty("SMTP_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(DEFAULT_SMTP_PORT),
                user: non_empty("SMTP_USER"),
                password: non_empty("SMTP_PASSWORD"),
            })
        } else {
            return None;
        };

        Some(Self {
            provider,
            from_email: non_empty("BREVO_FROM_EMAIL")
                .unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string()),
            from_name: non_empty("BREVO_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
        })
    }

    pub fn default_sender(&self) -> SenderIdentity {
        SenderIdentity {
            email: self.from_email.clone(),
            name: Some(self.from_name.clone()),
        }
    }
}
