pub mod auth;
pub mod builder;
pub mod checkin;
pub mod email;
pub mod events;
pub mod health;
pub mod participants;
pub mod public;
pub mod senders;
pub mod sessions;
pub mod ticketing;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   register (public)
/// /auth/login                                      login (public)
/// /auth/me                                         current user
///
/// /events                                          list, create
/// /events/{id}                                     get, update, delete
/// /events/{id}/access-code                         regenerate (POST)
/// /events/{id}/stats                               attendance stats (GET)
/// /events/{id}/participants                        list, create
/// /events/{id}/sessions                            list, create
/// /events/{id}/email-templates                     list, create
/// /events/{id}/ticket-types                        list, create
/// /events/{id}/promo-codes                         list, create
/// /events/{id}/checkout/quote                      price a cart (public, POST)
/// /events/{id}/orders                              place an order (public, POST)
///
/// /participants/{id}                               get, update, delete
///
/// /sessions/{id}                                   get, update, delete
/// /sessions/{id}/participants                      list enrolled
/// /sessions/{id}/participants/{participant_id}     enroll, unenroll (POST, DELETE)
///
/// /event-access                                    scanner login by code (public, POST)
/// /checkin                                         status (GET ?token), record (POST) (public)
/// /verify-qr/{token}                               verify a QR token (public)
///
/// /public/events/{id}/register                     self-registration (public, JSON or form)
///
/// /send-inscription-email                          relay (POST)
/// /send-invitation-emails                          relay (POST)
/// /email-templates/{id}                            get, update, delete
/// /email-templates/{id}/preview                    render (POST)
///
/// /senders                                         list, create
/// /senders/{id}                                    delete
/// /sender-domains                                  list, create
///
/// /sites                                           list, create
/// /sites/{id}                                      get, update, delete
/// /sites/{id}/pages                                list, create
/// /pages/{id}                                      get, update, delete
/// /pages/{id}/tree                                 save tree (PUT)
/// /pages/{id}/publish                              publish (POST)
/// /pages/{id}/preview                              render HTML (GET)
/// /builder/templates                               list built-in templates
/// /builder/templates/{key}/instantiate             create a page from a template (POST)
///
/// /ticket-types/{id}                               update, delete
/// /promo-codes/{id}                                delete
/// /orders/{id}                                     get
/// /orders/{id}/confirm                             confirm (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        // Events and everything scoped to one event.
        .nest("/events", events::router())
        .nest("/participants", participants::router())
        .nest("/sessions", sessions::router())
        // Scanner endpoints (public).
        .merge(checkin::router())
        // Self-registration (public).
        .nest("/public", public::router())
        // Email relay, templates and sender management.
        .merge(email::router())
        .merge(senders::router())
        // Page builder.
        .merge(builder::router())
        // Ticketing and orders.
        .merge(ticketing::router())
}
