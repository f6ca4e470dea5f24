//! Public self-registration, the target of rendered registration forms.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use evently_core::error::CoreError;
use evently_core::participant::STATUS_REGISTERED;
use evently_core::qr;
use evently_core::types::DbId;
use evently_db::models::participant::{CreateParticipant, Participant};
use evently_db::repositories::ParticipantRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::JsonOrForm;
use crate::handlers::email::send_inscription_best_effort;
use crate::handlers::participants::prepare_create;
use crate::handlers::published_event;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub participant: Participant,
    pub qr_url: String,
    pub email_sent: bool,
}

/// Path of the registration endpoint for an event, as posted by forms.
pub fn registration_action(event_id: DbId) -> String {
    format!("/api/v1/public/events/{event_id}/register")
}

/// POST /api/v1/public/events/{id}/register
///
/// Accepts JSON or a form post with `prenom`, `nom`, `email` and optional
/// `telephone`/`entreprise`. Only published events with room accept
/// registrations. The confirmation email is best-effort.
pub async fn register(
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    JsonOrForm(input): JsonOrForm<CreateParticipant>,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    let event = published_event(&state.pool, event_id).await?;

    let mut input = prepare_create(&input)?;
    input.status = Some(STATUS_REGISTERED.to_string());

    if ParticipantRepo::find_by_event_and_email(&state.pool, event_id, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(
            "This email is already registered for the event".into(),
        )));
    }

    let participant = ParticipantRepo::create_within_capacity(
        &state.pool,
        event_id,
        &input,
        &qr::generate_token(),
    )
    .await?
    .ok_or_else(|| AppError::Core(CoreError::Conflict("Event is full".into())))?;
    tracing::info!(id = participant.id, event_id, "Public registration");

    let email_sent = send_inscription_best_effort(&state, &event, &participant).await;
    let qr_url = qr::qr_url(&state.config.public_base_url, &participant.qr_token);

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse {
            participant,
            qr_url,
            email_sent,
        }),
    ))
}
