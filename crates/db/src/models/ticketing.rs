//! Ticket types and promo codes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use evently_core::checkout::{PromoCode as PromoRules, PromoKind, TicketTypeInfo};
use evently_core::types::{Cents, DbId, Timestamp};

use super::double_option;

// ---------------------------------------------------------------------------
// Ticket types
// ---------------------------------------------------------------------------

/// A row from the `ticket_types` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TicketType {
    pub id: DbId,
    pub event_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: Cents,
    pub tva_applicable: bool,
    pub tva_rate: f64,
    pub quota: Option<i64>,
    pub sold: i64,
    pub minimum_achat: i64,
    pub maximum_achat: Option<i64>,
    pub sale_start: Option<Timestamp>,
    pub sale_end: Option<Timestamp>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TicketType {
    pub fn info(&self) -> TicketTypeInfo {
        TicketTypeInfo {
            id: self.id,
            name: self.name.clone(),
            price_cents: self.price_cents,
            tva_applicable: self.tva_applicable,
            tva_rate: self.tva_rate,
            quota: self.quota,
            sold: self.sold,
            minimum_achat: self.minimum_achat,
            maximum_achat: self.maximum_achat,
            sale_start: self.sale_start,
            sale_end: self.sale_end,
            active: self.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateTicketType {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: Cents,
    pub tva_applicable: Option<bool>,
    pub tva_rate: Option<f64>,
    pub quota: Option<i64>,
    pub minimum_achat: Option<i64>,
    pub maximum_achat: Option<i64>,
    pub sale_start: Option<Timestamp>,
    pub sale_end: Option<Timestamp>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTicketType {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<Cents>,
    pub tva_applicable: Option<bool>,
    pub tva_rate: Option<f64>,
    /// `null` makes the ticket type unlimited again.
    #[serde(default, deserialize_with = "double_option")]
    pub quota: Option<Option<i64>>,
    pub minimum_achat: Option<i64>,
    #[serde(default, deserialize_with = "double_option")]
    pub maximum_achat: Option<Option<i64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub sale_start: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "double_option")]
    pub sale_end: Option<Option<Timestamp>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

// ---------------------------------------------------------------------------
// Promo codes
// ---------------------------------------------------------------------------

/// A row from the `promo_codes` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PromoCode {
    pub id: DbId,
    pub event_id: DbId,
    pub code: String,
    pub kind: String,
    pub value: f64,
    pub is_active: bool,
    pub valid_from: Option<Timestamp>,
    pub valid_until: Option<Timestamp>,
    pub max_uses: Option<i64>,
    pub uses: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PromoCode {
    /// Pricing rules for this code. An unknown kind prices as a zero fixed
    /// discount.
    pub fn rules(&self) -> PromoRules {
        let (kind, value) = match PromoKind::parse(&self.kind) {
            Some(kind) => (kind, self.value),
            None => (PromoKind::Fixed, 0.0),
        };
        PromoRules {
            code: self.code.clone(),
            kind,
            value,
            active: self.is_active,
            valid_from: self.valid_from,
            valid_until: self.valid_until,
            max_uses: self.max_uses,
            uses: self.uses,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePromoCode {
    pub code: String,
    pub kind: String,
    pub value: f64,
    pub is_active: Option<bool>,
    pub valid_from: Option<Timestamp>,
    pub valid_until: Option<Timestamp>,
    pub max_uses: Option<i64>,
}
