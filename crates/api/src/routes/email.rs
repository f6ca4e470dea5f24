use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{email, email_templates};
use crate::state::AppState;

/// Email relay and template routes merged at the `/api/v1` root.
///
/// ```text
/// POST   /send-inscription-email         -> email::send_inscription_email
/// POST   /send-invitation-emails         -> email::send_invitation_emails
/// GET    /email-templates/{id}           -> email_templates::get_by_id
/// PUT    /email-templates/{id}           -> email_templates::update
/// DELETE /email-templates/{id}           -> email_templates::delete
/// POST   /email-templates/{id}/preview   -> email_templates::preview
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send-inscription-email", post(email::send_inscription_email))
        .route("/send-invitation-emails", post(email::send_invitation_emails))
        .route(
            "/email-templates/{id}",
            get(email_templates::get_by_id)
                .put(email_templates::update)
                .delete(email_templates::delete),
        )
        .route("/email-templates/{id}/preview", post(email_templates::preview))
}
