//! Scanner endpoints. None of them require an organizer token: the event
//! access code and the participant's QR token are the credentials.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::checkin;
use crate::state::AppState;

/// Routes merged at the `/api/v1` root.
///
/// ```text
/// POST /event-access        -> event_access
/// GET  /checkin?token=      -> status
/// POST /checkin             -> check_in
/// GET  /verify-qr/{token}   -> verify_qr
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/event-access", post(checkin::event_access))
        .route("/checkin", get(checkin::status).post(checkin::check_in))
        .route("/verify-qr/{token}", get(checkin::verify_qr))
}
