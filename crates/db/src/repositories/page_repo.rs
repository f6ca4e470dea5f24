//! Repository for the `builder_pages` table.

use sqlx::PgPool;
use evently_core::types::DbId;

use crate::models::builder::{Page, PageSummary, UpdatePage};

const COLUMNS: &str = "id, site_id, event_id, name, slug, tree, status, page_type, \
    published_at, created_at, updated_at";

const SUMMARY_COLUMNS: &str = "id, site_id, event_id, name, slug, status, page_type, \
    published_at, updated_at";

/// Provides CRUD operations for builder pages.
pub struct PageRepo;

impl PageRepo {
    /// Insert a new page in `draft` status.
    pub async fn create(
        pool: &PgPool,
        site_id: DbId,
        name: &str,
        slug: &str,
        page_type: &str,
        event_id: Option<DbId>,
        tree: &serde_json::Value,
    ) -> Result<Page, sqlx::Error> {
        let query = format!(
            "INSERT INTO builder_pages (site_id, name, slug, page_type, event_id, tree, status)
             VALUES ($1, $2, $3, $4, $5, $6, 'draft')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(site_id)
            .bind(name)
            .bind(slug)
            .bind(page_type)
            .bind(event_id)
            .bind(tree)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM builder_pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A published page addressed by its public URL.
    pub async fn find_published(
        pool: &PgPool,
        site_slug: &str,
        page_slug: &str,
    ) -> Result<Option<Page>, sqlx::Error> {
        sqlx::query_as::<_, Page>(
            "SELECT p.id, p.site_id, p.event_id, p.name, p.slug, p.tree, p.status, p.page_type,
                    p.published_at, p.created_at, p.updated_at
             FROM builder_pages p
             JOIN builder_sites s ON s.id = p.site_id
             WHERE s.slug = $1 AND p.slug = $2 AND p.status = 'published'",
        )
        .bind(site_slug)
        .bind(page_slug)
        .fetch_optional(pool)
        .await
    }

    pub async fn list_by_site(pool: &PgPool, site_id: DbId) -> Result<Vec<PageSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM builder_pages WHERE site_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, PageSummary>(&query)
            .bind(site_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePage,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "UPDATE builder_pages SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                event_id = COALESCE($4, event_id),
                page_type = COALESCE($5, page_type)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(input.event_id)
            .bind(&input.page_type)
            .fetch_optional(pool)
            .await
    }

    /// Replace the stored tree. Last write wins.
    pub async fn save_tree(
        pool: &PgPool,
        id: DbId,
        tree: &serde_json::Value,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("UPDATE builder_pages SET tree = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(tree)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Page>, sqlx::Error> {
        let query = format!(
            "UPDATE builder_pages SET
                status = $2,
                published_at = CASE WHEN $2 = 'published' THEN NOW() ELSE published_at END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM builder_pages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
