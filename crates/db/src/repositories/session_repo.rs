//! Repository for the `sessions` table.

use sqlx::PgPool;
use evently_core::types::DbId;

use crate::models::session::{CreateSession, Session, UpdateSession};

const COLUMNS: &str = "id, event_id, title, description, speaker, room, \
    starts_at, ends_at, capacity, created_at, updated_at";

/// Provides CRUD operations for event sessions.
pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(
        pool: &PgPool,
        event_id: DbId,
        input: &CreateSession,
    ) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions
                (event_id, title, description, speaker, room, starts_at, ends_at, capacity)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(event_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.speaker)
            .bind(&input.room)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.capacity)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an event's sessions in agenda order (unscheduled last).
    pub async fn list_by_event(pool: &PgPool, event_id: DbId) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE event_id = $1
             ORDER BY starts_at ASC NULLS LAST, id ASC"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSession,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "UPDATE sessions SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                speaker = COALESCE($4, speaker),
                room = COALESCE($5, room),
                starts_at = COALESCE($6, starts_at),
                ends_at = COALESCE($7, ends_at),
                capacity = COALESCE($8, capacity)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.speaker)
            .bind(&input.room)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.capacity)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
