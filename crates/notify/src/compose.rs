//! Email bodies: built-in inscription and invitation layouts, and
//! organizer templates filled from the standard variable set.

use askama::Template;
use evently_core::email_template::{self, StandardVars};

use crate::mailer::{EmailError, OutgoingEmail, SenderIdentity};

/// Public QR image generator used in built-in emails.
pub const QR_IMAGE_ENDPOINT: &str = "https://api.qrserver.com/v1/create-qr-code/";

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedEmail {
    pub subject: String,
    pub html: String,
}

impl ComposedEmail {
    pub fn into_outgoing(
        self,
        to_email: impl Into<String>,
        to_name: Option<String>,
        sender: Option<SenderIdentity>,
    ) -> OutgoingEmail {
        OutgoingEmail {
            to_email: to_email.into(),
            to_name,
            subject: self.subject,
            html: self.html,
            sender,
        }
    }
}

#[derive(Template)]
#[template(path = "email/inscription.html")]
struct InscriptionHtml<'a> {
    title: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    event_name: &'a str,
    event_date: Option<&'a str>,
    event_location: Option<&'a str>,
    qr_url: Option<&'a str>,
    qr_image: Option<String>,
}

#[derive(Template)]
#[template(path = "email/invitation.html")]
struct InvitationHtml<'a> {
    title: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    event_name: &'a str,
    event_date: Option<&'a str>,
    event_location: Option<&'a str>,
    message: Option<&'a str>,
    link: Option<&'a str>,
    qr_image: Option<String>,
}

/// Image URL rendering `data` as a QR code. `None` for empty data.
pub fn qr_image_url(data: &str) -> Option<String> {
    if data.is_empty() {
        return None;
    }
    reqwest::Url::parse_with_params(QR_IMAGE_ENDPOINT, &[("size", "200x200"), ("data", data)])
        .ok()
        .map(String::from)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Registration confirmation with the participant's QR code.
pub fn inscription(vars: &StandardVars<'_>) -> Result<ComposedEmail, EmailError> {
    let subject = format!("Confirmation d'inscription - {}", vars.event_name);
    let qr_url = non_empty(vars.qr_url);
    let html = InscriptionHtml {
        title: &subject,
        first_name: vars.first_name,
        last_name: vars.last_name,
        event_name: vars.event_name,
        event_date: non_empty(vars.event_date),
        event_location: non_empty(vars.event_location),
        qr_url,
        qr_image: qr_url.and_then(qr_image_url),
    }
    .render()?;
    Ok(ComposedEmail { subject, html })
}

/// Invitation with an optional personal message and registration link.
pub fn invitation(vars: &StandardVars<'_>, message: Option<&str>) -> Result<ComposedEmail, EmailError> {
    let subject = format!("Invitation - {}", vars.event_name);
    let html = InvitationHtml {
        title: &subject,
        first_name: vars.first_name,
        last_name: vars.last_name,
        event_name: vars.event_name,
        event_date: non_empty(vars.event_date),
        event_location: non_empty(vars.event_location),
        message: non_empty(message),
        link: non_empty(vars.link),
        qr_image: non_empty(vars.qr_url).and_then(qr_image_url),
    }
    .render()?;
    Ok(ComposedEmail { subject, html })
}

/// Fill an organizer template. Unknown placeholders stay in the output
/// and are logged.
pub fn from_template(
    subject: &str,
    body_html: &str,
    vars: &StandardVars<'_>,
) -> Result<ComposedEmail, EmailError> {
    let rendered = email_template::render(subject, body_html, &vars.to_map())?;
    if !rendered.unknown_variables.is_empty() {
        tracing::warn!(unknown = ?rendered.unknown_variables, "Email template has unresolved variables");
    }
    Ok(ComposedEmail {
        subject: rendered.subject,
        html: rendered.html,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> StandardVars<'static> {
        StandardVars {
            first_name: "Léa",
            last_name: "Durand",
            email: "lea@example.com",
            event_name: "Salon <Tech>",
            event_date: Some("12/06/2025"),
            event_location: Some(""),
            qr_url: Some("https://app.evently.test/verify-qr/abc123"),
            link: None,
        }
    }

    #[test]
    fn inscription_includes_qr_and_escapes() {
        let email = inscription(&vars()).unwrap();
        assert_eq!(email.subject, "Confirmation d'inscription - Salon <Tech>");
        assert!(email.html.contains("Salon &lt;Tech&gt;"));
        assert!(email.html.contains("12/06/2025"));
        assert!(!email.html.contains("Lieu"));
        assert!(email.html.contains("api.qrserver.com"));
        assert!(email.html.contains("verify-qr"));
    }

    #[test]
    fn invitation_without_link_or_message() {
        let mut v = vars();
        v.qr_url = None;
        let email = invitation(&v, Some("  ")).unwrap();
        assert_eq!(email.subject, "Invitation - Salon <Tech>");
        assert!(!email.html.contains("<a href"));
        assert!(!email.html.contains("<img"));
    }

    #[test]
    fn invitation_with_link() {
        let mut v = vars();
        v.link = Some("https://app.evently.test/p/salon/inscription");
        let email = invitation(&v, Some("Au plaisir de vous voir")).unwrap();
        assert!(email.html.contains("https://app.evently.test/p/salon/inscription"));
        assert!(email.html.contains("Au plaisir de vous voir"));
    }

    #[test]
    fn qr_image_url_encodes_data() {
        let url = qr_image_url("https://x.test/verify-qr/a b").unwrap();
        assert!(url.starts_with(QR_IMAGE_ENDPOINT));
        assert!(url.contains("data=https%3A%2F%2Fx.test%2Fverify-qr%2Fa+b"));
        assert!(qr_image_url("").is_none());
    }

    #[test]
    fn organizer_template_is_filled() {
        let email = from_template("Bienvenue {{ prenom }}", "<p>{{ evenement }}</p>", &vars()).unwrap();
        assert_eq!(email.subject, "Bienvenue Léa");
        assert_eq!(email.html, "<p>Salon &lt;Tech&gt;</p>");
    }
}
