//! Repository for the `email_templates` table.

use sqlx::PgPool;
use evently_core::types::DbId;

use crate::models::email_template::{CreateEmailTemplate, EmailTemplate, UpdateEmailTemplate};

const COLUMNS: &str = "id, event_id, kind, name, subject, body_html, is_default, \
    created_at, updated_at";

/// Provides CRUD operations for email templates.
pub struct EmailTemplateRepo;

impl EmailTemplateRepo {
    pub async fn create(
        pool: &PgPool,
        event_id: DbId,
        input: &CreateEmailTemplate,
    ) -> Result<EmailTemplate, sqlx::Error> {
        let query = format!(
            "INSERT INTO email_templates (event_id, kind, name, subject, body_html, is_default)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailTemplate>(&query)
            .bind(event_id)
            .bind(&input.kind)
            .bind(&input.name)
            .bind(&input.subject)
            .bind(&input.body_html)
            .bind(input.is_default)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<EmailTemplate>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM email_templates WHERE id = $1");
        sqlx::query_as::<_, EmailTemplate>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The template used for automatic sends of `kind`: the default one if
    /// flagged, otherwise the most recently edited.
    pub async fn find_for_kind(
        pool: &PgPool,
        event_id: DbId,
        kind: &str,
    ) -> Result<Option<EmailTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM email_templates
             WHERE event_id = $1 AND kind = $2
             ORDER BY is_default DESC, updated_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, EmailTemplate>(&query)
            .bind(event_id)
            .bind(kind)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<EmailTemplate>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM email_templates WHERE event_id = $1 ORDER BY kind ASC, name ASC"
        );
        sqlx::query_as::<_, EmailTemplate>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEmailTemplate,
    ) -> Result<Option<EmailTemplate>, sqlx::Error> {
        let query = format!(
            "UPDATE email_templates SET
                kind = COALESCE($2, kind),
                name = COALESCE($3, name),
                subject = COALESCE($4, subject),
                body_html = COALESCE($5, body_html),
                is_default = COALESCE($6, is_default)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmailTemplate>(&query)
            .bind(id)
            .bind(&input.kind)
            .bind(&input.name)
            .bind(&input.subject)
            .bind(&input.body_html)
            .bind(input.is_default)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM email_templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
