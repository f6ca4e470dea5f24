//! Authorized sender addresses for outgoing email.
//!
//! An organizer may only send from an address whose domain has been
//! authorized with the email provider.

use crate::error::CoreError;
use crate::participant::validate_email;

/// Lower-cased domain part of an address.
pub fn email_domain(email: &str) -> Option<String> {
    let (_, domain) = email.trim().rsplit_once('@')?;
    (!domain.is_empty()).then(|| domain.to_lowercase())
}

/// Domains are stored lower-case without a leading `@`.
pub fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_start_matches('@').to_lowercase()
}

pub fn validate_domain(domain: &str) -> Result<(), CoreError> {
    let d = normalize_domain(domain);
    let labels_ok = d.split('.').count() >= 2
        && d.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });
    if labels_ok {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid domain: '{domain}'")))
    }
}

/// The address must be valid and belong to one of `authorized_domains`.
pub fn validate_sender<S: AsRef<str>>(email: &str, authorized_domains: &[S]) -> Result<(), CoreError> {
    validate_email(email)?;
    let domain = email_domain(email)
        .ok_or_else(|| CoreError::Validation(format!("Invalid email address: '{email}'")))?;
    if authorized_domains
        .iter()
        .any(|d| normalize_domain(d.as_ref()) == domain)
    {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "Domain '{domain}' is not authorized for sending"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn domains() {
        assert_eq!(email_domain("Team@Evently.FR").as_deref(), Some("evently.fr"));
        assert_eq!(email_domain("nobody"), None);
        assert_eq!(normalize_domain(" @Example.com "), "example.com");
        assert!(validate_domain("mail.example.com").is_ok());
        assert!(validate_domain("localhost").is_err());
        assert!(validate_domain("bad_domain.com").is_err());
    }

    #[test]
    fn sender_must_match_authorized_domain() {
        let domains = vec!["example.com".to_string()];
        assert!(validate_sender("events@example.com", &domains).is_ok());
        assert!(validate_sender("events@EXAMPLE.com", &domains).is_ok());
        assert_matches!(
            validate_sender("events@other.com", &domains),
            Err(CoreError::Forbidden(_))
        );
        assert_matches!(
            validate_sender("not-an-email", &domains),
            Err(CoreError::Validation(_))
        );
    }
}
