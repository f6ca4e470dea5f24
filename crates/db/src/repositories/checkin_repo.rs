//! Repository for the `checkins` table.

use sqlx::PgPool;
use evently_core::types::DbId;

use crate::models::checkin::{Checkin, CheckinOutcome};

const COLUMNS: &str = "id, participant_id, event_id, session_id, created_at, updated_at";

/// Records QR scans. At most one check-in exists per participant and scope
/// (the event itself, or one session).
pub struct CheckinRepo;

impl CheckinRepo {
    /// Record a check-in, or return the existing one for the same scope.
    ///
    /// Event-level check-ins also stamp `participants.checked_in_at`; both
    /// writes share one transaction.
    pub async fn record(
        pool: &PgPool,
        participant_id: DbId,
        event_id: DbId,
        session_id: Option<DbId>,
    ) -> Result<CheckinOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let insert = format!(
            "INSERT INTO checkins (participant_id, event_id, session_id)
             VALUES ($1, $2, $3)
             ON CONFLICT (participant_id, (COALESCE(session_id, 0))) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Checkin>(&insert)
            .bind(participant_id)
            .bind(event_id)
            .bind(session_id)
            .fetch_optional(&mut *tx)
            .await?;

        let outcome = match created {
            Some(checkin) => {
                if session_id.is_none() {
                    sqlx::query(
                        "UPDATE participants SET checked_in_at = $2
                         WHERE id = $1 AND checked_in_at IS NULL",
                    )
                    .bind(participant_id)
                    .bind(checkin.created_at)
                    .execute(&mut *tx)
                    .await?;
                }
                CheckinOutcome::Recorded(checkin)
            }
            None => {
                let select = format!(
                    "SELECT {COLUMNS} FROM checkins
                     WHERE participant_id = $1 AND COALESCE(session_id, 0) = COALESCE($2, 0)"
                );
                let existing = sqlx::query_as::<_, Checkin>(&select)
                    .bind(participant_id)
                    .bind(session_id)
                    .fetch_one(&mut *tx)
                    .await?;
                CheckinOutcome::AlreadyCheckedIn(existing)
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    pub async fn list_by_participant(
        pool: &PgPool,
        participant_id: DbId,
    ) -> Result<Vec<Checkin>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM checkins WHERE participant_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Checkin>(&query)
            .bind(participant_id)
            .fetch_all(pool)
            .await
    }
}
