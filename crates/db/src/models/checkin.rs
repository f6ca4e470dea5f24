//! Check-in log model.

use serde::Serialize;
use sqlx::FromRow;
use evently_core::types::{DbId, Timestamp};

/// A row from the `checkins` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Checkin {
    pub id: DbId,
    pub participant_id: DbId,
    pub event_id: DbId,
    pub session_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Outcome of recording a scan.
#[derive(Debug, Clone)]
pub enum CheckinOutcome {
    Recorded(Checkin),
    /// The participant was already checked in for this scope.
    AlreadyCheckedIn(Checkin),
}
