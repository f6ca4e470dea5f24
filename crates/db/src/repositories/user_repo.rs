//! Organizer accounts in `users`.

use evently_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{NewOrganizer, User};

const COLUMNS: &str = "id, email, password_hash, display_name, is_active, \
                       last_login_at, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Fails with `uq_users_email` when the address is taken.
    pub async fn create(pool: &PgPool, organizer: &NewOrganizer) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, password_hash, display_name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&organizer.email)
            .bind(&organizer.password_hash)
            .bind(&organizer.display_name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// `email` must already be normalized.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map(|_| ())
    }
}
