//! Route definitions for `/events` and its event-scoped sub-resources.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{
    email_templates, events, orders, participants, sessions, ticketing,
};
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// GET    /{id}                     -> get_by_id
/// PUT    /{id}                     -> update
/// DELETE /{id}                     -> delete
/// POST   /{id}/access-code         -> regenerate_access_code
/// GET    /{id}/stats               -> stats
/// GET    /{id}/participants        -> participants::list_by_event
/// POST   /{id}/participants        -> participants::create
/// GET    /{id}/sessions            -> sessions::list_by_event
/// POST   /{id}/sessions            -> sessions::create
/// GET    /{id}/email-templates     -> email_templates::list_by_event
/// POST   /{id}/email-templates     -> email_templates::create
/// GET    /{id}/ticket-types        -> ticketing::list_ticket_types
/// POST   /{id}/ticket-types        -> ticketing::create_ticket_type
/// GET    /{id}/promo-codes         -> ticketing::list_promo_codes
/// POST   /{id}/promo-codes         -> ticketing::create_promo_code
/// POST   /{id}/checkout/quote      -> ticketing::quote (public)
/// POST   /{id}/orders              -> orders::create (public)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list).post(events::create))
        .route(
            "/{id}",
            get(events::get_by_id)
                .put(events::update)
                .delete(events::delete),
        )
        .route("/{id}/access-code", post(events::regenerate_access_code))
        .route("/{id}/stats", get(events::stats))
        .route(
            "/{id}/participants",
            get(participants::list_by_event).post(participants::create),
        )
        .route(
            "/{id}/sessions",
            get(sessions::list_by_event).post(sessions::create),
        )
        .route(
            "/{id}/email-templates",
            get(email_templates::list_by_event).post(email_templates::create),
        )
        .route(
            "/{id}/ticket-types",
            get(ticketing::list_ticket_types).post(ticketing::create_ticket_type),
        )
        .route(
            "/{id}/promo-codes",
            get(ticketing::list_promo_codes).post(ticketing::create_promo_code),
        )
        .route("/{id}/checkout/quote", post(ticketing::quote))
        .route("/{id}/orders", post(orders::create))
}
