use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::senders;
use crate::state::AppState;

/// Sender routes merged at the `/api/v1` root.
///
/// ```text
/// GET    /senders          -> list
/// POST   /senders          -> create
/// DELETE /senders/{id}     -> delete
/// GET    /sender-domains   -> list_domains
/// POST   /sender-domains   -> create_domain
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/senders", get(senders::list).post(senders::create))
        .route("/senders/{id}", delete(senders::delete))
        .route(
            "/sender-domains",
            get(senders::list_domains).post(senders::create_domain),
        )
}
