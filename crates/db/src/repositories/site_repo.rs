//! Repository for the `builder_sites` table.

use sqlx::PgPool;
use evently_core::types::DbId;

use crate::models::builder::{Site, UpdateSite};

const COLUMNS: &str = "id, owner_id, event_id, name, slug, created_at, updated_at";

/// Provides CRUD operations for builder sites.
pub struct SiteRepo;

impl SiteRepo {
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        name: &str,
        slug: &str,
        event_id: Option<DbId>,
    ) -> Result<Site, sqlx::Error> {
        let query = format!(
            "INSERT INTO builder_sites (owner_id, name, slug, event_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(owner_id)
            .bind(name)
            .bind(slug)
            .bind(event_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Site>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM builder_sites WHERE id = $1");
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Site>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM builder_sites WHERE slug = $1");
        sqlx::query_as::<_, Site>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// The organizer's first site bound to an event, if any.
    pub async fn find_for_event(
        pool: &PgPool,
        owner_id: DbId,
        event_id: DbId,
    ) -> Result<Option<Site>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM builder_sites
             WHERE owner_id = $1 AND event_id = $2
             ORDER BY id ASC LIMIT 1"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(owner_id)
            .bind(event_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Site>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM builder_sites WHERE owner_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSite,
    ) -> Result<Option<Site>, sqlx::Error> {
        let query = format!(
            "UPDATE builder_sites SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                event_id = COALESCE($4, event_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Site>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(input.event_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM builder_sites WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
