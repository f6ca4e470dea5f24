//! Repository for the `participants` table.

use evently_core::event::has_room;
use evently_core::types::DbId;
use sqlx::PgPool;

use crate::models::participant::{CreateParticipant, Participant, UpdateParticipant};

const COLUMNS: &str = "id, event_id, first_name, last_name, email, phone, company, \
    status, qr_token, checked_in_at, created_at, updated_at";

/// Provides CRUD operations for participants.
pub struct ParticipantRepo;

impl ParticipantRepo {
    /// Insert a participant. `input.email` must already be normalized.
    pub async fn create(
        pool: &PgPool,
        event_id: DbId,
        input: &CreateParticipant,
        qr_token: &str,
    ) -> Result<Participant, sqlx::Error> {
        let query = format!(
            "INSERT INTO participants
                (event_id, first_name, last_name, email, phone, company, status, qr_token)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'registered'), $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(event_id)
            .bind(input.first_name.trim())
            .bind(input.last_name.trim())
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.status)
            .bind(qr_token)
            .fetch_one(pool)
            .await
    }

    /// Insert a participant only while the event has room.
    ///
    /// The event row is locked for the duration of the count and insert, so
    /// concurrent registrations for the same event are serialized. Returns
    /// `None` when the event is full or does not exist.
    pub async fn create_within_capacity(
        pool: &PgPool,
        event_id: DbId,
        input: &CreateParticipant,
        qr_token: &str,
    ) -> Result<Option<Participant>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let capacity: Option<(Option<i32>,)> =
            sqlx::query_as("SELECT capacity FROM events WHERE id = $1 FOR UPDATE")
                .bind(event_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((capacity,)) = capacity else {
            tx.rollback().await?;
            return Ok(None);
        };

        let (registered,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM participants WHERE event_id = $1 AND status <> 'cancelled'",
        )
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;
        if !has_room(capacity, registered) {
            tx.rollback().await?;
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO participants
                (event_id, first_name, last_name, email, phone, company, status, qr_token)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'registered'), $8)
             RETURNING {COLUMNS}"
        );
        let participant = sqlx::query_as::<_, Participant>(&query)
            .bind(event_id)
            .bind(input.first_name.trim())
            .bind(input.last_name.trim())
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.status)
            .bind(qr_token)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(participant))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM participants WHERE id = $1");
        sqlx::query_as::<_, Participant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_qr_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM participants WHERE qr_token = $1");
        sqlx::query_as::<_, Participant>(&query)
            .bind(token)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_event_and_email(
        pool: &PgPool,
        event_id: DbId,
        email: &str,
    ) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM participants WHERE event_id = $1 AND email = $2");
        sqlx::query_as::<_, Participant>(&query)
            .bind(event_id)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List an event's participants by last name, optionally filtered by status.
    pub async fn list_by_event(
        pool: &PgPool,
        event_id: DbId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Participant>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM participants
             WHERE event_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY last_name ASC, first_name ASC, id ASC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(event_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateParticipant,
    ) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!(
            "UPDATE participants SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                phone = COALESCE($5, phone),
                company = COALESCE($6, company),
                status = COALESCE($7, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(id)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.company)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Set `checked_in_at` if it is not set yet. Returns the current row.
    pub async fn mark_checked_in(pool: &PgPool, id: DbId) -> Result<Option<Participant>, sqlx::Error> {
        let query = format!(
            "UPDATE participants SET checked_in_at = COALESCE(checked_in_at, NOW())
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Participant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM participants WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
