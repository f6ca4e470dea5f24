use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{builder, registration};
use crate::state::AppState;

/// Anonymous API routes mounted at `/public`.
///
/// ```text
/// POST /events/{id}/register -> registration::register
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/events/{id}/register", post(registration::register))
}

/// Published builder pages, mounted at the site root next to `/health`.
///
/// ```text
/// GET /public/{site_slug}/{page_slug} -> builder::public_page
/// ```
pub fn pages_router() -> Router<AppState> {
    Router::new().route("/public/{site_slug}/{page_slug}", get(builder::public_page))
}
