//! Repository for the `session_participants` join table.

use evently_core::event::has_room;
use evently_core::types::DbId;
use sqlx::PgPool;

use crate::models::participant::Participant;
use crate::models::session::SessionParticipant;

const COLUMNS: &str = "id, session_id, participant_id, created_at, updated_at";

/// Enrolment of participants into individual sessions.
pub struct SessionParticipantRepo;

impl SessionParticipantRepo {
    /// Enrol a participant while the session has room. A participant who
    /// is already enrolled gets the existing row regardless of capacity.
    ///
    /// The session row is locked while counting, so concurrent enrolments
    /// cannot overfill it. Returns `None` when the session is full or gone.
    pub async fn add_within_capacity(
        pool: &PgPool,
        session_id: DbId,
        participant_id: DbId,
    ) -> Result<Option<SessionParticipant>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let capacity: Option<(Option<i32>,)> =
            sqlx::query_as("SELECT capacity FROM sessions WHERE id = $1 FOR UPDATE")
                .bind(session_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((capacity,)) = capacity else {
            tx.rollback().await?;
            return Ok(None);
        };

        let existing = sqlx::query_as::<_, SessionParticipant>(&format!(
            "SELECT {COLUMNS} FROM session_participants
             WHERE session_id = $1 AND participant_id = $2"
        ))
        .bind(session_id)
        .bind(participant_id)
        .fetch_optional(&mut *tx)
        .await?;
        if let Some(link) = existing {
            tx.commit().await?;
            return Ok(Some(link));
        }

        let (enrolled,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM session_participants WHERE session_id = $1")
                .bind(session_id)
                .fetch_one(&mut *tx)
                .await?;
        if !has_room(capacity, enrolled) {
            tx.rollback().await?;
            return Ok(None);
        }

        let link = sqlx::query_as::<_, SessionParticipant>(&format!(
            "INSERT INTO session_participants (session_id, participant_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        ))
        .bind(session_id)
        .bind(participant_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(link))
    }

    pub async fn remove(
        pool: &PgPool,
        session_id: DbId,
        participant_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM session_participants WHERE session_id = $1 AND participant_id = $2",
        )
        .bind(session_id)
        .bind(participant_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Participants enrolled in a session.
    pub async fn list_participants(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<Participant>, sqlx::Error> {
        sqlx::query_as::<_, Participant>(
            "SELECT p.id, p.event_id, p.first_name, p.last_name, p.email, p.phone, p.company,
                    p.status, p.qr_token, p.checked_in_at, p.created_at, p.updated_at
             FROM participants p
             JOIN session_participants sp ON sp.participant_id = p.id
             WHERE sp.session_id = $1
             ORDER BY p.last_name ASC, p.first_name ASC",
        )
        .bind(session_id)
        .fetch_all(pool)
        .await
    }
}
