//! Repository for the `ticket_types` table.

use sqlx::PgPool;
use evently_core::types::DbId;

use crate::models::ticketing::{CreateTicketType, TicketType, UpdateTicketType};

const COLUMNS: &str = "id, event_id, name, description, price_cents, tva_applicable, tva_rate, \
    quota, sold, minimum_achat, maximum_achat, sale_start, sale_end, is_active, sort_order, \
    created_at, updated_at";

/// Provides CRUD operations for ticket types.
pub struct TicketTypeRepo;

impl TicketTypeRepo {
    pub async fn create(
        pool: &PgPool,
        event_id: DbId,
        input: &CreateTicketType,
    ) -> Result<TicketType, sqlx::Error> {
        let query = format!(
            "INSERT INTO ticket_types
                (event_id, name, description, price_cents, tva_applicable, tva_rate, quota,
                 minimum_achat, maximum_achat, sale_start, sale_end, is_active, sort_order)
             VALUES ($1, $2, $3, $4, COALESCE($5, TRUE), COALESCE($6, 20), $7,
                     COALESCE($8, 1), $9, $10, $11, COALESCE($12, TRUE), COALESCE($13, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TicketType>(&query)
            .bind(event_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(input.tva_applicable)
            .bind(input.tva_rate)
            .bind(input.quota)
            .bind(input.minimum_achat)
            .bind(input.maximum_achat)
            .bind(input.sale_start)
            .bind(input.sale_end)
            .bind(input.is_active)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TicketType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ticket_types WHERE id = $1");
        sqlx::query_as::<_, TicketType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_event(pool: &PgPool, event_id: DbId) -> Result<Vec<TicketType>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ticket_types
             WHERE event_id = $1
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, TicketType>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Absent fields keep their value; `quota`, `maximum_achat` and the sale
    /// window are cleared by an explicit `null`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTicketType,
    ) -> Result<Option<TicketType>, sqlx::Error> {
        let query = format!(
            "UPDATE ticket_types SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price_cents = COALESCE($4, price_cents),
                tva_applicable = COALESCE($5, tva_applicable),
                tva_rate = COALESCE($6, tva_rate),
                quota = CASE WHEN $7 THEN $8 ELSE quota END,
                minimum_achat = COALESCE($9, minimum_achat),
                maximum_achat = CASE WHEN $10 THEN $11 ELSE maximum_achat END,
                sale_start = CASE WHEN $12 THEN $13 ELSE sale_start END,
                sale_end = CASE WHEN $14 THEN $15 ELSE sale_end END,
                is_active = COALESCE($16, is_active),
                sort_order = COALESCE($17, sort_order)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TicketType>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(input.tva_applicable)
            .bind(input.tva_rate)
            .bind(input.quota.is_some())
            .bind(input.quota.flatten())
            .bind(input.minimum_achat)
            .bind(input.maximum_achat.is_some())
            .bind(input.maximum_achat.flatten())
            .bind(input.sale_start.is_some())
            .bind(input.sale_start.flatten())
            .bind(input.sale_end.is_some())
            .bind(input.sale_end.flatten())
            .bind(input.is_active)
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ticket_types WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
