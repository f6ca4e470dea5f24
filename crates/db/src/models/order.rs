//! Orders and their line items.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use evently_core::types::{Cents, DbId, Timestamp};

pub const ORDER_STATUS_PENDING: &str = "pending";
pub const ORDER_STATUS_CONFIRMED: &str = "confirmed";
pub const ORDER_STATUS_CANCELLED: &str = "cancelled";

/// A row from the `orders` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: DbId,
    pub event_id: DbId,
    pub participant_id: Option<DbId>,
    pub promo_code_id: Option<DbId>,
    pub buyer_email: String,
    pub buyer_first_name: String,
    pub buyer_last_name: String,
    pub status: String,
    pub subtotal_cents: Cents,
    pub tax_cents: Cents,
    pub fee_cents: Cents,
    pub reduction_cents: Cents,
    pub total_cents: Cents,
    pub confirmed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `order_items` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub id: DbId,
    pub order_id: DbId,
    pub ticket_type_id: DbId,
    pub quantity: i64,
    pub unit_price_cents: Cents,
    pub tax_cents: Cents,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// One requested ticket line.
#[derive(Debug, Clone, Deserialize)]
pub struct CartItemInput {
    pub ticket_type_id: DbId,
    pub quantity: i64,
}

/// Body of the checkout quote and order endpoints.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartItemInput>,
    pub promo_code: Option<String>,
}

/// Body of `POST /events/{id}/orders`.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<CartItemInput>,
    pub promo_code: Option<String>,
    pub email: String,
    #[serde(alias = "prenom")]
    pub first_name: String,
    #[serde(alias = "nom")]
    pub last_name: String,
}

/// Priced order ready to be written.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub event_id: DbId,
    pub promo_code_id: Option<DbId>,
    pub buyer_email: String,
    pub buyer_first_name: String,
    pub buyer_last_name: String,
    pub subtotal_cents: Cents,
    pub tax_cents: Cents,
    pub fee_cents: Cents,
    pub reduction_cents: Cents,
    pub total_cents: Cents,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub ticket_type_id: DbId,
    pub quantity: i64,
    pub unit_price_cents: Cents,
    pub tax_cents: Cents,
}

/// Result of the order-creation transaction.
#[derive(Debug)]
pub enum CreateOrderOutcome {
    Created(OrderWithItems),
    /// Stock ran out between quoting and writing; nothing was persisted.
    SoldOut { ticket_type_id: DbId },
    /// The promo code reached its use limit concurrently.
    PromoExhausted,
}
