//! Handlers for event sessions and session enrolment.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use evently_core::error::CoreError;
use evently_core::types::{DbId, Timestamp};
use evently_db::models::session::{CreateSession, Session, SessionParticipant, UpdateSession};
use evently_db::repositories::{SessionParticipantRepo, SessionRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::{owned_event, owned_participant, owned_session};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_session(
    title: Option<&str>,
    starts_at: Option<Timestamp>,
    ends_at: Option<Timestamp>,
    capacity: Option<i32>,
) -> Result<(), CoreError> {
    if let Some(title) = title {
        if title.trim().is_empty() {
            return Err(CoreError::Validation("Session title must not be empty".into()));
        }
    }
    if let (Some(start), Some(end)) = (starts_at, ends_at) {
        if end < start {
            return Err(CoreError::Validation(
                "Session end must not be before its start".into(),
            ));
        }
    }
    evently_core::event::validate_capacity(capacity)
}

/// GET /api/v1/events/{id}/sessions
pub async fn list_by_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    owned_event(&state.pool, &auth, event_id).await?;
    let sessions = SessionRepo::list_by_event(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/events/{id}/sessions
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<CreateSession>,
) -> AppResult<(StatusCode, Json<Session>)> {
    owned_event(&state.pool, &auth, event_id).await?;
    validate_session(Some(&input.title), input.starts_at, input.ends_at, input.capacity)?;

    let session = SessionRepo::create(&state.pool, event_id, &input).await?;
    tracing::info!(id = session.id, event_id, "Session created");
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/v1/sessions/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Session>> {
    let (session, _) = owned_session(&state.pool, &auth, id).await?;
    Ok(Json(session))
}

/// PUT /api/v1/sessions/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSession>,
) -> AppResult<Json<Session>> {
    let (existing, _) = owned_session(&state.pool, &auth, id).await?;
    validate_session(
        input.title.as_deref(),
        input.starts_at.or(existing.starts_at),
        input.ends_at.or(existing.ends_at),
        input.capacity,
    )?;

    let session = SessionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id,
        }))?;
    tracing::info!(id, "Session updated");
    Ok(Json(session))
}

/// DELETE /api/v1/sessions/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_session(&state.pool, &auth, id).await?;
    SessionRepo::delete(&state.pool, id).await?;
    tracing::info!(id, "Session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sessions/{id}/participants
pub async fn list_participants(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    owned_session(&state.pool, &auth, id).await?;
    let participants = SessionParticipantRepo::list_participants(&state.pool, id).await?;
    Ok(Json(DataResponse { data: participants }))
}

/// POST /api/v1/sessions/{id}/participants/{participant_id}
///
/// Idempotent. The participant must belong to the session's event and the
/// session must have room.
pub async fn add_participant(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, participant_id)): Path<(DbId, DbId)>,
) -> AppResult<(StatusCode, Json<SessionParticipant>)> {
    let (session, _) = owned_session(&state.pool, &auth, id).await?;
    let (participant, _) = owned_participant(&state.pool, &auth, participant_id).await?;

    if participant.event_id != session.event_id {
        return Err(AppError::Core(CoreError::Validation(
            "Participant is not registered for this session's event".into(),
        )));
    }

    let link = SessionParticipantRepo::add_within_capacity(&state.pool, id, participant_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Conflict("Session is full".into())))?;
    tracing::info!(session_id = id, participant_id, "Participant added to session");
    Ok((StatusCode::CREATED, Json(link)))
}

/// DELETE /api/v1/sessions/{id}/participants/{participant_id}
pub async fn remove_participant(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, participant_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    owned_session(&state.pool, &auth, id).await?;
    let removed = SessionParticipantRepo::remove(&state.pool, id, participant_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "SessionParticipant",
            id: participant_id,
        }));
    }
    tracing::info!(session_id = id, participant_id, "Participant removed from session");
    Ok(StatusCode::NO_CONTENT)
}
