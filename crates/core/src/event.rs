//! Event status constants and field validation.

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";
pub const STATUS_ARCHIVED: &str = "archived";

pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_PUBLISHED, STATUS_ARCHIVED];

pub const MAX_NAME_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Event name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Event name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown event status: '{status}'. Valid statuses: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// The end, when given, may not precede the start.
pub fn validate_schedule(start: Timestamp, end: Option<Timestamp>) -> Result<(), CoreError> {
    match end {
        Some(end) if end < start => Err(CoreError::Validation(
            "Event end date must not be before its start date".into(),
        )),
        _ => Ok(()),
    }
}

pub fn validate_capacity(capacity: Option<i32>) -> Result<(), CoreError> {
    match capacity {
        Some(c) if c < 0 => Err(CoreError::Validation(format!(
            "capacity must not be negative, got {c}"
        ))),
        _ => Ok(()),
    }
}

/// Whether a new participant fits. `None` capacity means unlimited.
pub fn has_room(capacity: Option<i32>, registered: i64) -> bool {
    capacity.map_or(true, |c| registered < i64::from(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    #[test]
    fn names() {
        assert!(validate_name("Salon 2025").is_ok());
        assert_matches!(validate_name("   "), Err(CoreError::Validation(_)));
        assert!(validate_name(&"é".repeat(MAX_NAME_LEN)).is_ok());
        assert!(validate_name(&"a".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn statuses() {
        for s in VALID_STATUSES {
            assert!(validate_status(s).is_ok());
        }
        assert!(validate_status("cancelled").is_err());
    }

    #[test]
    fn schedule() {
        let now = Utc::now();
        assert!(validate_schedule(now, None).is_ok());
        assert!(validate_schedule(now, Some(now)).is_ok());
        assert!(validate_schedule(now, Some(now - Duration::minutes(1))).is_err());
    }

    #[test]
    fn capacity() {
        assert!(validate_capacity(None).is_ok());
        assert!(validate_capacity(Some(0)).is_ok());
        assert!(validate_capacity(Some(-1)).is_err());
        assert!(has_room(None, 10_000));
        assert!(has_room(Some(2), 1));
        assert!(!has_room(Some(2), 2));
    }
}
