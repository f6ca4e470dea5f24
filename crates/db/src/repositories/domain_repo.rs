//! Repository for the `authorized_domains` table.

use sqlx::PgPool;
use evently_core::types::DbId;

use crate::models::sender::AuthorizedDomain;

const COLUMNS: &str = "id, owner_id, domain, verified, created_at, updated_at";

pub struct DomainRepo;

impl DomainRepo {
    /// Insert a normalized domain.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        domain: &str,
    ) -> Result<AuthorizedDomain, sqlx::Error> {
        let query = format!(
            "INSERT INTO authorized_domains (owner_id, domain)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AuthorizedDomain>(&query)
            .bind(owner_id)
            .bind(domain)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<AuthorizedDomain>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM authorized_domains WHERE owner_id = $1 ORDER BY domain ASC"
        );
        sqlx::query_as::<_, AuthorizedDomain>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Just the domain names, for sender validation.
    pub async fn names_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT domain FROM authorized_domains WHERE owner_id = $1")
                .bind(owner_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(d,)| d).collect())
    }
}
