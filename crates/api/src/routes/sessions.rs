use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET    /{id}                                -> get_by_id
/// PUT    /{id}                                -> update
/// DELETE /{id}                                -> delete
/// GET    /{id}/participants                   -> list_participants
/// POST   /{id}/participants/{participant_id}  -> add_participant
/// DELETE /{id}/participants/{participant_id}  -> remove_participant
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(sessions::get_by_id)
                .put(sessions::update)
                .delete(sessions::delete),
        )
        .route("/{id}/participants", get(sessions::list_participants))
        .route(
            "/{id}/participants/{participant_id}",
            post(sessions::add_participant).delete(sessions::remove_participant),
        )
}
