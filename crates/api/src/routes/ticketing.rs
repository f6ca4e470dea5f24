use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{orders, ticketing};
use crate::state::AppState;

/// Ticketing routes merged at the `/api/v1` root. Event-scoped listing,
/// quotes and order placement live under `/events`.
///
/// ```text
/// PUT    /ticket-types/{id}     -> ticketing::update_ticket_type
/// DELETE /ticket-types/{id}     -> ticketing::delete_ticket_type
/// DELETE /promo-codes/{id}      -> ticketing::delete_promo_code
/// GET    /orders/{id}           -> orders::get_by_id
/// POST   /orders/{id}/confirm   -> orders::confirm
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/ticket-types/{id}",
            put(ticketing::update_ticket_type).delete(ticketing::delete_ticket_type),
        )
        .route("/promo-codes/{id}", delete(ticketing::delete_promo_code))
        .route("/orders/{id}", get(orders::get_by_id))
        .route("/orders/{id}/confirm", post(orders::confirm))
}
