//! Brevo transactional email over HTTP.
//!
//! `POST {api_url}/smtp/email` with an `api-key` header. A 2xx answer carries
//! `{"messageId": ".."}`; anything else carries `{"code": .., "message": ..}`
//! and the message is surfaced as-is.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::mailer::{EmailError, Mailer, OutgoingEmail, SendReceipt, SenderIdentity};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct Contact<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRequest<'a> {
    sender: Contact<'a>,
    to: Vec<Contact<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    message_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct BrevoMailer {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    sender: SenderIdentity,
}

impl BrevoMailer {
    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        sender: SenderIdentity,
    ) -> Result<Self, EmailError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            sender,
        })
    }
}

#[async_trait]
impl Mailer for BrevoMailer {
    fn provider(&self) -> &'static str {
        "brevo"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<SendReceipt, EmailError> {
        let sender = email.sender.as_ref().unwrap_or(&self.sender);
        let body = SendRequest {
            sender: Contact {
                email: &sender.email,
                name: sender.name.as_deref(),
            },
            to: vec![Contact {
                email: &email.to_email,
                name: email.to_name.as_deref(),
            }],
            subject: &email.subject,
            html_content: &email.html,
        };

        let response = self
            .client
            .post(format!("{}/smtp/email", self.api_url))
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or(text);
            tracing::warn!(to = %email.to_email, status = status.as_u16(), %message, "Brevo rejected email");
            return Err(EmailError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: SendResponse = response.json().await?;
        tracing::info!(to = %email.to_email, message_id = ?parsed.message_id, "Email sent via Brevo");
        Ok(SendReceipt {
            message_id: parsed.message_id,
        })
    }
}
