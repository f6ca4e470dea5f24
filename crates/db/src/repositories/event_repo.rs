//! Repository for the `events` table.

use sqlx::PgPool;
use evently_core::types::DbId;

use crate::models::event::{CreateEvent, Event, EventStats, UpdateEvent};

const COLUMNS: &str = "id, owner_id, name, description, location, organizer, image_url, \
    starts_at, ends_at, capacity, status, access_code, created_at, updated_at";

/// Provides CRUD operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event with a pre-generated access code.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateEvent,
        access_code: &str,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events
                (owner_id, name, description, location, organizer, image_url,
                 starts_at, ends_at, capacity, status, access_code)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, 'draft'), $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(owner_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.location)
            .bind(&input.organizer)
            .bind(&input.image_url)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.capacity)
            .bind(&input.status)
            .bind(access_code)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_access_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE access_code = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// List an organizer's events, soonest first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE owner_id = $1
             ORDER BY starts_at ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update an event. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                organizer = COALESCE($5, organizer),
                image_url = COALESCE($6, image_url),
                starts_at = COALESCE($7, starts_at),
                ends_at = COALESCE($8, ends_at),
                capacity = COALESCE($9, capacity),
                status = COALESCE($10, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.location)
            .bind(&input.organizer)
            .bind(&input.image_url)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.capacity)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_access_code(
        pool: &PgPool,
        id: DbId,
        code: &str,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET access_code = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Delete an event and everything hanging off it.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn stats(pool: &PgPool, id: DbId) -> Result<EventStats, sqlx::Error> {
        sqlx::query_as::<_, EventStats>(
            "SELECT
                (SELECT COUNT(*) FROM participants WHERE event_id = $1) AS participants,
                (SELECT COUNT(*) FROM participants WHERE event_id = $1 AND status = 'registered') AS registered,
                (SELECT COUNT(*) FROM participants WHERE event_id = $1 AND status = 'invited') AS invited,
                (SELECT COUNT(*) FROM participants WHERE event_id = $1 AND status = 'cancelled') AS cancelled,
                (SELECT COUNT(*) FROM participants WHERE event_id = $1 AND checked_in_at IS NOT NULL) AS checked_in,
                (SELECT COUNT(*) FROM sessions WHERE event_id = $1) AS sessions,
                (SELECT COUNT(*) FROM orders WHERE event_id = $1 AND status = 'confirmed') AS confirmed_orders,
                (SELECT COALESCE(SUM(total_cents), 0)::BIGINT FROM orders
                  WHERE event_id = $1 AND status = 'confirmed') AS revenue_cents",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}
