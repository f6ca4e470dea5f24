//! Repository for the `authorized_email_senders` table.

use sqlx::PgPool;
use evently_core::types::DbId;

use crate::models::sender::Sender;

const COLUMNS: &str = "id, owner_id, email, name, created_at, updated_at";

pub struct SenderRepo;

impl SenderRepo {
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        email: &str,
        name: Option<&str>,
    ) -> Result<Sender, sqlx::Error> {
        let query = format!(
            "INSERT INTO authorized_email_senders (owner_id, email, name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Sender>(&query)
            .bind(owner_id)
            .bind(email)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Sender>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM authorized_email_senders WHERE id = $1");
        sqlx::query_as::<_, Sender>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Sender>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM authorized_email_senders WHERE owner_id = $1 ORDER BY email ASC"
        );
        sqlx::query_as::<_, Sender>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM authorized_email_senders WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
