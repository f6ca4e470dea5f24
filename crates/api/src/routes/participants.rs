use axum::routing::get;
use axum::Router;

use crate::handlers::participants;
use crate::state::AppState;

/// Routes mounted at `/participants`.
///
/// ```text
/// GET    /{id} -> get_by_id
/// PUT    /{id} -> update
/// DELETE /{id} -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(participants::get_by_id)
            .put(participants::update)
            .delete(participants::delete),
    )
}
