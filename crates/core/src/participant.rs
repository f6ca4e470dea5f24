//! Participant field validation.

use validator::ValidateEmail;

use crate::error::CoreError;

pub const MAX_NAME_LEN: usize = 100;

pub const STATUS_REGISTERED: &str = "registered";
pub const STATUS_INVITED: &str = "invited";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const VALID_STATUSES: &[&str] = &[STATUS_REGISTERED, STATUS_INVITED, STATUS_CANCELLED];

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    if email.trim().validate_email() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!("Invalid email address: '{email}'")))
    }
}

/// Emails are compared case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_name(field: &str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown participant status: '{status}'. Valid statuses: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Validate the identity fields shared by every participant write.
pub fn validate_identity(first_name: &str, last_name: &str, email: &str) -> Result<(), CoreError> {
    validate_name("prenom", first_name)?;
    validate_name("nom", last_name)?;
    validate_email(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails() {
        assert!(validate_email("lea.durand@example.fr").is_ok());
        assert!(validate_email("  lea@example.fr ").is_ok());
        assert!(validate_email("lea@").is_err());
        assert!(validate_email("not an email").is_err());
        assert_eq!(normalize_email(" Lea@Example.FR "), "lea@example.fr");
    }

    #[test]
    fn identity() {
        assert!(validate_identity("Léa", "Durand", "lea@example.fr").is_ok());
        assert!(validate_identity("", "Durand", "lea@example.fr").is_err());
        assert!(validate_identity("Léa", &"x".repeat(101), "lea@example.fr").is_err());
    }

    #[test]
    fn statuses() {
        assert!(validate_status("invited").is_ok());
        assert!(validate_status("present").is_err());
    }
}
