//! Ticket types, promo codes and checkout quotes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use evently_core::checkout::{
    normalize_code, Cart, CartLine, CartTotals, FeeSchedule, PromoCode as PromoRules, PromoKind,
    TicketTypeInfo,
};
use evently_core::error::CoreError;
use evently_core::types::{Cents, DbId};
use evently_db::models::order::{CartItemInput, CheckoutRequest};
use evently_db::models::ticketing::{
    CreatePromoCode, CreateTicketType, PromoCode, TicketType, UpdateTicketType,
};
use evently_db::repositories::{PromoCodeRepo, TicketTypeRepo};
use evently_db::DbPool;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::{owned_event, published_event};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_TVA_RATE: f64 = 20.0;
const DEFAULT_MINIMUM_ACHAT: i64 = 1;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Core(CoreError::Validation(message.into()))
}

/// Check a ticket type's fields after defaults or updates are applied.
fn validate_ticket(t: &TicketTypeInfo) -> AppResult<()> {
    if t.name.trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if t.price_cents < 0 {
        return Err(invalid("price_cents must not be negative"));
    }
    if !(0.0..=100.0).contains(&t.tva_rate) {
        return Err(invalid("tva_rate must be between 0 and 100"));
    }
    if t.quota.is_some_and(|q| q < t.sold.max(0)) {
        return Err(invalid(format!("quota cannot be lower than the {} tickets sold", t.sold)));
    }
    if t.minimum_achat < 1 {
        return Err(invalid("minimum_achat must be at least 1"));
    }
    if t.maximum_achat.is_some_and(|max| max < t.minimum_achat) {
        return Err(invalid("maximum_achat must not be lower than minimum_achat"));
    }
    if let (Some(start), Some(end)) = (t.sale_start, t.sale_end) {
        if end <= start {
            return Err(invalid("sale_end must be after sale_start"));
        }
    }
    Ok(())
}

fn info_for_create(input: &CreateTicketType) -> TicketTypeInfo {
    TicketTypeInfo {
        id: 0,
        name: input.name.clone(),
        price_cents: input.price_cents,
        tva_applicable: input.tva_applicable.unwrap_or(true),
        tva_rate: input.tva_rate.unwrap_or(DEFAULT_TVA_RATE),
        quota: input.quota,
        sold: 0,
        minimum_achat: input.minimum_achat.unwrap_or(DEFAULT_MINIMUM_ACHAT),
        maximum_achat: input.maximum_achat,
        sale_start: input.sale_start,
        sale_end: input.sale_end,
        active: input.is_active.unwrap_or(true),
    }
}

fn info_for_update(existing: &TicketType, input: &UpdateTicketType) -> TicketTypeInfo {
    let mut info = existing.info();
    if let Some(name) = &input.name {
        info.name = name.clone();
    }
    info.price_cents = input.price_cents.unwrap_or(info.price_cents);
    info.tva_applicable = input.tva_applicable.unwrap_or(info.tva_applicable);
    info.tva_rate = input.tva_rate.unwrap_or(info.tva_rate);
    if let Some(quota) = input.quota {
        info.quota = quota;
    }
    info.minimum_achat = input.minimum_achat.unwrap_or(info.minimum_achat);
    if let Some(maximum) = input.maximum_achat {
        info.maximum_achat = maximum;
    }
    if let Some(start) = input.sale_start {
        info.sale_start = start;
    }
    if let Some(end) = input.sale_end {
        info.sale_end = end;
    }
    info.active = input.is_active.unwrap_or(info.active);
    info
}

fn validate_promo(kind: &str, value: f64) -> AppResult<PromoKind> {
    let kind = PromoKind::parse(kind)
        .ok_or_else(|| invalid(format!("Unknown promo kind '{kind}': use percentage or fixed")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid("value must be a non-negative number"));
    }
    if kind == PromoKind::Percentage && value > 100.0 {
        return Err(invalid("A percentage reduction cannot exceed 100"));
    }
    Ok(kind)
}

async fn owned_ticket_type(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<TicketType> {
    let ticket = TicketTypeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "TicketType", id }))?;
    owned_event(&state.pool, auth, ticket.event_id)
        .await
        .map_err(|_| AppError::Core(CoreError::NotFound { entity: "TicketType", id }))?;
    Ok(ticket)
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// A cart priced against the event's current stock and promo code.
#[derive(Debug)]
pub struct PricedCart {
    pub cart: Cart,
    pub promo: Option<PromoCode>,
    pub totals: CartTotals,
}

/// Price requested items for an event. Unknown or inactive ticket types,
/// quantity bounds, sale windows and remaining quota are all enforced
/// here; an unknown promo code is a validation error.
pub async fn price_cart(
    pool: &DbPool,
    fees: &FeeSchedule,
    event_id: DbId,
    items: &[CartItemInput],
    promo_code: Option<&str>,
) -> AppResult<PricedCart> {
    let now = Utc::now();
    let tickets: Vec<TicketTypeInfo> = TicketTypeRepo::list_by_event(pool, event_id)
        .await?
        .iter()
        .map(TicketType::info)
        .collect();
    let wanted: Vec<(DbId, i64)> = items.iter().map(|i| (i.ticket_type_id, i.quantity)).collect();
    let cart = Cart::from_items(&tickets, &wanted, now).map_err(CoreError::from)?;

    let promo = match promo_code.map(normalize_code).filter(|c| !c.is_empty()) {
        Some(code) => {
            let promo = PromoCodeRepo::find_by_code(pool, event_id, &code)
                .await?
                .ok_or_else(|| invalid(format!("Unknown promo code '{code}'")))?;
            promo.rules().check(now).map_err(CoreError::from)?;
            Some(promo)
        }
        None => None,
    };

    let rules: Option<PromoRules> = promo.as_ref().map(PromoCode::rules);
    let totals = cart.totals(fees, rules.as_ref());
    Ok(PricedCart { cart, promo, totals })
}

#[derive(Debug, Serialize)]
pub struct QuoteLine {
    pub ticket_type_id: DbId,
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: Cents,
    pub subtotal_cents: Cents,
    pub tax_cents: Cents,
}

impl From<&CartLine> for QuoteLine {
    fn from(line: &CartLine) -> Self {
        Self {
            ticket_type_id: line.ticket.id,
            name: line.ticket.name.clone(),
            quantity: line.quantity,
            unit_price_cents: line.ticket.price_cents,
            subtotal_cents: line.subtotal(),
            tax_cents: line.tax(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Quote {
    pub lines: Vec<QuoteLine>,
    pub promo_code: Option<String>,
    pub totals: CartTotals,
}

// ---------------------------------------------------------------------------
// Ticket types
// ---------------------------------------------------------------------------

/// GET /api/v1/events/{id}/ticket-types
pub async fn list_ticket_types(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    owned_event(&state.pool, &auth, event_id).await?;
    let tickets = TicketTypeRepo::list_by_event(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data: tickets }))
}

/// POST /api/v1/events/{id}/ticket-types
pub async fn create_ticket_type(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<CreateTicketType>,
) -> AppResult<(StatusCode, Json<TicketType>)> {
    owned_event(&state.pool, &auth, event_id).await?;
    validate_ticket(&info_for_create(&input))?;

    let ticket = TicketTypeRepo::create(&state.pool, event_id, &input).await?;
    tracing::info!(id = ticket.id, event_id, "Ticket type created");
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// PUT /api/v1/ticket-types/{id}
pub async fn update_ticket_type(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTicketType>,
) -> AppResult<Json<TicketType>> {
    let existing = owned_ticket_type(&state, &auth, id).await?;
    validate_ticket(&info_for_update(&existing, &input))?;

    let ticket = TicketTypeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "TicketType", id }))?;
    tracing::info!(id, "Ticket type updated");
    Ok(Json(ticket))
}

/// DELETE /api/v1/ticket-types/{id}
///
/// Ticket types already on an order cannot be deleted; deactivate them.
pub async fn delete_ticket_type(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_ticket_type(&state, &auth, id).await?;
    TicketTypeRepo::delete(&state.pool, id).await?;
    tracing::info!(id, "Ticket type deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Promo codes
// ---------------------------------------------------------------------------

/// GET /api/v1/events/{id}/promo-codes
pub async fn list_promo_codes(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    owned_event(&state.pool, &auth, event_id).await?;
    let codes = PromoCodeRepo::list_by_event(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data: codes }))
}

/// POST /api/v1/events/{id}/promo-codes
///
/// Codes are stored upper-case and unique per event.
pub async fn create_promo_code(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<CreatePromoCode>,
) -> AppResult<(StatusCode, Json<PromoCode>)> {
    owned_event(&state.pool, &auth, event_id).await?;
    let code = normalize_code(&input.code);
    if code.is_empty() {
        return Err(invalid("code must not be empty"));
    }
    validate_promo(&input.kind, input.value)?;
    if input.max_uses.is_some_and(|m| m < 0) {
        return Err(invalid("max_uses must not be negative"));
    }
    if let (Some(from), Some(until)) = (input.valid_from, input.valid_until) {
        if until <= from {
            return Err(invalid("valid_until must be after valid_from"));
        }
    }

    let promo = PromoCodeRepo::create(&state.pool, event_id, &code, &input).await?;
    tracing::info!(id = promo.id, event_id, code = %promo.code, "Promo code created");
    Ok((StatusCode::CREATED, Json(promo)))
}

/// DELETE /api/v1/promo-codes/{id}
pub async fn delete_promo_code(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let promo = PromoCodeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "PromoCode", id }))?;
    owned_event(&state.pool, &auth, promo.event_id)
        .await
        .map_err(|_| AppError::Core(CoreError::NotFound { entity: "PromoCode", id }))?;

    PromoCodeRepo::delete(&state.pool, id).await?;
    tracing::info!(id, "Promo code deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

/// POST /api/v1/events/{id}/checkout/quote
///
/// Public. Prices a cart without reserving anything.
pub async fn quote(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<CheckoutRequest>,
) -> AppResult<Json<Quote>> {
    published_event(&state.pool, event_id).await?;
    let priced = price_cart(
        &state.pool,
        &state.config.fees,
        event_id,
        &input.items,
        input.promo_code.as_deref(),
    )
    .await?;

    Ok(Json(Quote {
        lines: priced.cart.lines().iter().map(QuoteLine::from).collect(),
        promo_code: priced.promo.map(|p| p.code),
        totals: priced.totals,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;

    fn create_input() -> CreateTicketType {
        CreateTicketType {
            name: "Standard".into(),
            description: None,
            price_cents: 5000,
            tva_applicable: None,
            tva_rate: None,
            quota: Some(100),
            minimum_achat: None,
            maximum_achat: Some(4),
            sale_start: None,
            sale_end: None,
            is_active: None,
            sort_order: None,
        }
    }

    #[test]
    fn create_defaults_pass_validation() {
        let info = info_for_create(&create_input());
        assert_eq!(info.tva_rate, 20.0);
        assert_eq!(info.minimum_achat, 1);
        assert!(validate_ticket(&info).is_ok());
    }

    #[test]
    fn rejects_inverted_bounds_and_windows() {
        let mut input = create_input();
        input.minimum_achat = Some(5);
        assert_matches!(
            validate_ticket(&info_for_create(&input)),
            Err(AppError::Core(CoreError::Validation(_)))
        );

        let mut input = create_input();
        let now = Utc::now();
        input.sale_start = Some(now);
        input.sale_end = Some(now - Duration::hours(1));
        assert!(validate_ticket(&info_for_create(&input)).is_err());

        let mut input = create_input();
        input.tva_rate = Some(120.0);
        assert!(validate_ticket(&info_for_create(&input)).is_err());
    }

    #[test]
    fn promo_kinds() {
        assert_eq!(validate_promo("percentage", 15.0).unwrap(), PromoKind::Percentage);
        assert_eq!(validate_promo("fixed", 500.0).unwrap(), PromoKind::Fixed);
        assert!(validate_promo("percentage", 150.0).is_err());
        assert!(validate_promo("bogo", 1.0).is_err());
        assert!(validate_promo("fixed", -1.0).is_err());
    }
}
