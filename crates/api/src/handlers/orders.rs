//! Ticket orders: creation from a priced cart and organizer confirmation.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use evently_core::checkout::CartError;
use evently_core::error::CoreError;
use evently_core::participant::{self as rules, STATUS_REGISTERED};
use evently_core::qr;
use evently_core::types::DbId;
use evently_db::models::event::Event;
use evently_db::models::order::{
    CreateOrderOutcome, CreateOrderRequest, NewOrder, NewOrderItem, Order, OrderWithItems,
    ORDER_STATUS_PENDING,
};
use evently_db::models::participant::{CreateParticipant, Participant};
use evently_db::repositories::{OrderRepo, ParticipantRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::email::send_inscription_best_effort;
use crate::handlers::ticketing::price_cart;
use crate::handlers::{owned_event, published_event};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ConfirmedOrder {
    pub order: Order,
    pub participant: Participant,
    pub email_sent: bool,
}

async fn owned_order(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<(Order, Event)> {
    let order = OrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Order", id }))?;
    let event = owned_event(&state.pool, auth, order.event_id)
        .await
        .map_err(|_| AppError::Core(CoreError::NotFound { entity: "Order", id }))?;
    Ok((order, event))
}

/// POST /api/v1/events/{id}/orders
///
/// Public. Re-prices the cart, then reserves stock and the promo code in
/// one transaction. The order starts out pending.
pub async fn create(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderWithItems>)> {
    published_event(&state.pool, event_id).await?;

    let email = rules::normalize_email(&input.email);
    let first_name = input.first_name.trim();
    let last_name = input.last_name.trim();
    rules::validate_identity(first_name, last_name, &email)?;

    let priced = price_cart(
        &state.pool,
        &state.config.fees,
        event_id,
        &input.items,
        input.promo_code.as_deref(),
    )
    .await?;
    if priced.cart.is_empty() {
        return Err(CoreError::from(CartError::EmptyCart).into());
    }

    let new = NewOrder {
        event_id,
        promo_code_id: priced.promo.as_ref().map(|p| p.id),
        buyer_email: email,
        buyer_first_name: first_name.to_string(),
        buyer_last_name: last_name.to_string(),
        subtotal_cents: priced.totals.subtotal,
        tax_cents: priced.totals.tax,
        fee_cents: priced.totals.fee,
        reduction_cents: priced.totals.reduction,
        total_cents: priced.totals.total,
        items: priced
            .cart
            .lines()
            .iter()
            .map(|line| NewOrderItem {
                ticket_type_id: line.ticket.id,
                quantity: line.quantity,
                unit_price_cents: line.ticket.price_cents,
                tax_cents: line.tax(),
            })
            .collect(),
    };

    match OrderRepo::create(&state.pool, &new).await? {
        CreateOrderOutcome::Created(order) => {
            tracing::info!(
                id = order.order.id,
                event_id,
                total_cents = order.order.total_cents,
                "Order created"
            );
            Ok((StatusCode::CREATED, Json(order)))
        }
        CreateOrderOutcome::SoldOut { ticket_type_id } => {
            tracing::info!(event_id, ticket_type_id, "Order refused: sold out");
            Err(AppError::Core(CoreError::Conflict(format!(
                "Ticket type {ticket_type_id} sold out while ordering"
            ))))
        }
        CreateOrderOutcome::PromoExhausted => {
            tracing::info!(event_id, "Order refused: promo code exhausted");
            Err(AppError::Core(CoreError::Conflict(
                "Promo code has been fully used".into(),
            )))
        }
    }
}

/// GET /api/v1/orders/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<OrderWithItems>> {
    let (order, _) = owned_order(&state, &auth, id).await?;
    let items = OrderRepo::items(&state.pool, id).await?;
    Ok(Json(OrderWithItems { order, items }))
}

/// POST /api/v1/orders/{id}/confirm
///
/// Registers the buyer as a participant (reusing an existing registration
/// with the same email) and links it to the order. Only pending orders can
/// be confirmed. The inscription email is best-effort.
pub async fn confirm(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ConfirmedOrder>> {
    let (order, event) = owned_order(&state, &auth, id).await?;
    if order.status != ORDER_STATUS_PENDING {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Order {id} is already {}",
            order.status
        ))));
    }

    let participant =
        match ParticipantRepo::find_by_event_and_email(&state.pool, event.id, &order.buyer_email)
            .await?
        {
            Some(existing) => existing,
            None => {
                let input = CreateParticipant {
                    first_name: order.buyer_first_name.clone(),
                    last_name: order.buyer_last_name.clone(),
                    email: order.buyer_email.clone(),
                    phone: None,
                    company: None,
                    status: Some(STATUS_REGISTERED.to_string()),
                };
                ParticipantRepo::create(&state.pool, event.id, &input, &qr::generate_token())
                    .await?
            }
        };

    let order = OrderRepo::confirm(&state.pool, id, participant.id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!("Order {id} is no longer pending")))
        })?;
    tracing::info!(id, participant_id = participant.id, "Order confirmed");

    let email_sent = send_inscription_best_effort(&state, &event, &participant).await;
    Ok(Json(ConfirmedOrder {
        order,
        participant,
        email_sent,
    }))
}
