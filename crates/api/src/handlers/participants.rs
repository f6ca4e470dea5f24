//! Handlers for participants (organizer side).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use evently_core::error::CoreError;
use evently_core::participant as rules;
use evently_core::qr;
use evently_core::types::DbId;
use evently_db::models::participant::{CreateParticipant, Participant, UpdateParticipant};
use evently_db::repositories::{CheckinRepo, ParticipantRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::{owned_event, owned_participant};
use crate::middleware::auth::AuthUser;
use crate::query::ParticipantListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Participant with the link encoded in their QR code.
#[derive(Debug, Serialize)]
pub struct ParticipantDetail {
    #[serde(flatten)]
    pub participant: Participant,
    pub qr_url: String,
    pub checkins: Vec<evently_db::models::checkin::Checkin>,
}

/// Validate and normalize a create payload.
pub fn prepare_create(input: &CreateParticipant) -> Result<CreateParticipant, CoreError> {
    let email = rules::normalize_email(&input.email);
    rules::validate_identity(input.first_name.trim(), input.last_name.trim(), &email)?;
    if let Some(status) = &input.status {
        rules::validate_status(status)?;
    }
    Ok(CreateParticipant {
        email,
        ..input.clone()
    })
}

/// GET /api/v1/events/{id}/participants
pub async fn list_by_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Query(params): Query<ParticipantListParams>,
) -> AppResult<impl IntoResponse> {
    owned_event(&state.pool, &auth, event_id).await?;
    if let Some(status) = &params.status {
        rules::validate_status(status)?;
    }
    let page = params.page();
    let participants = ParticipantRepo::list_by_event(
        &state.pool,
        event_id,
        params.status.as_deref(),
        page.limit(),
        page.offset(),
    )
    .await?;
    tracing::debug!(event_id, count = participants.len(), "Listed participants");
    Ok(Json(DataResponse { data: participants }))
}

/// POST /api/v1/events/{id}/participants
///
/// Organizer-side add. Capacity is not enforced here so organizers can
/// overbook deliberately; duplicate emails per event are rejected.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<CreateParticipant>,
) -> AppResult<(StatusCode, Json<Participant>)> {
    owned_event(&state.pool, &auth, event_id).await?;
    let input = prepare_create(&input)?;

    let participant =
        ParticipantRepo::create(&state.pool, event_id, &input, &qr::generate_token()).await?;

    tracing::info!(id = participant.id, event_id, "Participant created");
    Ok((StatusCode::CREATED, Json(participant)))
}

/// GET /api/v1/participants/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ParticipantDetail>> {
    let (participant, _) = owned_participant(&state.pool, &auth, id).await?;
    let checkins = CheckinRepo::list_by_participant(&state.pool, id).await?;
    let qr_url = qr::qr_url(&state.config.public_base_url, &participant.qr_token);
    Ok(Json(ParticipantDetail {
        participant,
        qr_url,
        checkins,
    }))
}

/// PUT /api/v1/participants/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateParticipant>,
) -> AppResult<Json<Participant>> {
    owned_participant(&state.pool, &auth, id).await?;

    if let Some(first) = &input.first_name {
        rules::validate_name("first_name", first.trim())?;
    }
    if let Some(last) = &input.last_name {
        rules::validate_name("last_name", last.trim())?;
    }
    if let Some(email) = input.email.take() {
        let email = rules::normalize_email(&email);
        rules::validate_email(&email)?;
        input.email = Some(email);
    }
    if let Some(status) = &input.status {
        rules::validate_status(status)?;
    }

    let participant = ParticipantRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Participant",
            id,
        }))?;

    tracing::info!(id, "Participant updated");
    Ok(Json(participant))
}

/// DELETE /api/v1/participants/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_participant(&state.pool, &auth, id).await?;
    ParticipantRepo::delete(&state.pool, id).await?;
    tracing::info!(id, "Participant deleted");
    Ok(StatusCode::NO_CONTENT)
}
