//! Repository for the `orders` and `order_items` tables.

use sqlx::PgPool;
use evently_core::types::DbId;

use crate::models::order::{CreateOrderOutcome, NewOrder, Order, OrderItem, OrderWithItems};

const COLUMNS: &str = "id, event_id, participant_id, promo_code_id, buyer_email, \
    buyer_first_name, buyer_last_name, status, subtotal_cents, tax_cents, fee_cents, \
    reduction_cents, total_cents, confirmed_at, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, ticket_type_id, quantity, unit_price_cents, tax_cents, \
    created_at, updated_at";

/// Provides order persistence.
pub struct OrderRepo;

impl OrderRepo {
    /// Write an order and its items, reserving stock.
    ///
    /// Runs in a transaction: each item increments `ticket_types.sold` only
    /// while the quota allows it, and the promo code's `uses` only while
    /// under `max_uses`. If either guard fails the transaction is rolled
    /// back and the outcome says why.
    pub async fn create(pool: &PgPool, new: &NewOrder) -> Result<CreateOrderOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for item in &new.items {
            let reserved = sqlx::query(
                "UPDATE ticket_types SET sold = sold + $2
                 WHERE id = $1 AND (quota IS NULL OR sold + $2 <= quota)",
            )
            .bind(item.ticket_type_id)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
            if reserved.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(CreateOrderOutcome::SoldOut {
                    ticket_type_id: item.ticket_type_id,
                });
            }
        }

        if let Some(promo_id) = new.promo_code_id {
            let used = sqlx::query(
                "UPDATE promo_codes SET uses = uses + 1
                 WHERE id = $1 AND (max_uses IS NULL OR uses < max_uses)",
            )
            .bind(promo_id)
            .execute(&mut *tx)
            .await?;
            if used.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(CreateOrderOutcome::PromoExhausted);
            }
        }

        let insert = format!(
            "INSERT INTO orders
                (event_id, promo_code_id, buyer_email, buyer_first_name, buyer_last_name,
                 subtotal_cents, tax_cents, fee_cents, reduction_cents, total_cents)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&insert)
            .bind(new.event_id)
            .bind(new.promo_code_id)
            .bind(&new.buyer_email)
            .bind(&new.buyer_first_name)
            .bind(&new.buyer_last_name)
            .bind(new.subtotal_cents)
            .bind(new.tax_cents)
            .bind(new.fee_cents)
            .bind(new.reduction_cents)
            .bind(new.total_cents)
            .fetch_one(&mut *tx)
            .await?;

        let insert_item = format!(
            "INSERT INTO order_items (order_id, ticket_type_id, quantity, unit_price_cents, tax_cents)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ITEM_COLUMNS}"
        );
        let mut items = Vec::with_capacity(new.items.len());
        for item in &new.items {
            let row = sqlx::query_as::<_, OrderItem>(&insert_item)
                .bind(order.id)
                .bind(item.ticket_type_id)
                .bind(item.quantity)
                .bind(item.unit_price_cents)
                .bind(item.tax_cents)
                .fetch_one(&mut *tx)
                .await?;
            items.push(row);
        }

        tx.commit().await?;
        Ok(CreateOrderOutcome::Created(OrderWithItems { order, items }))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn items(pool: &PgPool, order_id: DbId) -> Result<Vec<OrderItem>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }

    /// Move a pending order to `confirmed` and link its participant.
    /// Returns `None` when the order is missing or no longer pending.
    pub async fn confirm(
        pool: &PgPool,
        id: DbId,
        participant_id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET status = 'confirmed', confirmed_at = NOW(), participant_id = $2
             WHERE id = $1 AND status = 'pending'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(participant_id)
            .fetch_optional(pool)
            .await
    }
}
