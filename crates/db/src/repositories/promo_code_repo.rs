//! Repository for the `promo_codes` table.

use sqlx::PgPool;
use evently_core::types::DbId;

use crate::models::ticketing::{CreatePromoCode, PromoCode};

const COLUMNS: &str = "id, event_id, code, kind, value, is_active, valid_from, valid_until, \
    max_uses, uses, created_at, updated_at";

pub struct PromoCodeRepo;

impl PromoCodeRepo {
    /// Insert a promo code. `code` must already be normalized.
    pub async fn create(
        pool: &PgPool,
        event_id: DbId,
        code: &str,
        input: &CreatePromoCode,
    ) -> Result<PromoCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO promo_codes
                (event_id, code, kind, value, is_active, valid_from, valid_until, max_uses)
             VALUES ($1, $2, $3, $4, COALESCE($5, TRUE), $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PromoCode>(&query)
            .bind(event_id)
            .bind(code)
            .bind(&input.kind)
            .bind(input.value)
            .bind(input.is_active)
            .bind(input.valid_from)
            .bind(input.valid_until)
            .bind(input.max_uses)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PromoCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM promo_codes WHERE id = $1");
        sqlx::query_as::<_, PromoCode>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_code(
        pool: &PgPool,
        event_id: DbId,
        code: &str,
    ) -> Result<Option<PromoCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM promo_codes WHERE event_id = $1 AND code = $2");
        sqlx::query_as::<_, PromoCode>(&query)
            .bind(event_id)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_event(pool: &PgPool, event_id: DbId) -> Result<Vec<PromoCode>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM promo_codes WHERE event_id = $1 ORDER BY code ASC");
        sqlx::query_as::<_, PromoCode>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM promo_codes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
