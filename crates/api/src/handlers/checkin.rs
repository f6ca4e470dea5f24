//! Public check-in endpoints used by the door scanner.
//!
//! The scanner unlocks an event with its 4-digit access code, then scans
//! participant QR codes. Scans accept the bare token or the full
//! `/verify-qr/<token>` URL.

use axum::extract::{Path, Query, State};
use axum::Json;
use evently_core::error::CoreError;
use evently_core::types::DbId;
use evently_core::{access_code, participant as participant_rules, qr};
use evently_db::models::checkin::{Checkin, CheckinOutcome};
use evently_db::models::event::PublicEvent;
use evently_db::models::participant::Participant;
use evently_db::models::session::Session;
use evently_db::repositories::{CheckinRepo, EventRepo, ParticipantRepo, SessionRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct EventAccessRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct EventAccessResponse {
    pub event: PublicEvent,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct CheckinStatus {
    pub participant: Participant,
    pub event: PublicEvent,
    pub checked_in: bool,
    pub checkins: Vec<Checkin>,
}

#[derive(Debug, Deserialize)]
pub struct CheckinRequest {
    pub token: String,
    pub event_id: DbId,
    pub session_id: Option<DbId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckinResult {
    CheckedIn,
    AlreadyCheckedIn,
}

#[derive(Debug, Serialize)]
pub struct CheckinResponse {
    pub status: CheckinResult,
    pub participant: Participant,
    pub checkin: Checkin,
}

#[derive(Debug, Serialize)]
pub struct VerifyQrResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant: Option<Participant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<PublicEvent>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn scanned_token(raw: &str) -> AppResult<&str> {
    qr::extract_token(raw)
        .ok_or_else(|| AppError::Core(CoreError::Validation("Unreadable QR code".into())))
}

async fn participant_by_token(state: &AppState, token: &str) -> AppResult<Participant> {
    ParticipantRepo::find_by_qr_token(&state.pool, token)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Participant",
                key: token.to_string(),
            })
        })
}

async fn public_event(state: &AppState, id: DbId) -> AppResult<PublicEvent> {
    let event = EventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Event", id }))?;
    Ok(PublicEvent::from(&event))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/event-access
pub async fn event_access(
    State(state): State<AppState>,
    Json(input): Json<EventAccessRequest>,
) -> AppResult<Json<EventAccessResponse>> {
    let code = access_code::normalize(&input.code).ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Access code must be exactly 4 digits".into(),
        ))
    })?;

    let event = EventRepo::find_by_access_code(&state.pool, code)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Event",
                key: code.to_string(),
            })
        })?;
    let sessions = SessionRepo::list_by_event(&state.pool, event.id).await?;

    tracing::info!(event_id = event.id, "Scanner unlocked event");
    Ok(Json(EventAccessResponse {
        event: PublicEvent::from(&event),
        sessions,
    }))
}

/// GET /api/v1/checkin?token=
pub async fn status(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> AppResult<Json<CheckinStatus>> {
    let token = scanned_token(&query.token)?;
    let participant = participant_by_token(&state, token).await?;
    let event = public_event(&state, participant.event_id).await?;
    let checkins = CheckinRepo::list_by_participant(&state.pool, participant.id).await?;

    Ok(Json(CheckinStatus {
        checked_in: participant.checked_in_at.is_some(),
        participant,
        event,
        checkins,
    }))
}

/// POST /api/v1/checkin
///
/// Records a scan for the event, or for one of its sessions. A repeated
/// scan reports `already_checked_in` with the original check-in.
pub async fn check_in(
    State(state): State<AppState>,
    Json(input): Json<CheckinRequest>,
) -> AppResult<Json<CheckinResponse>> {
    let token = scanned_token(&input.token)?;
    let participant = participant_by_token(&state, token).await?;

    if participant.event_id != input.event_id {
        return Err(AppError::Core(CoreError::Validation(
            "Participant is not registered for this event".into(),
        )));
    }
    if participant.status == participant_rules::STATUS_CANCELLED {
        return Err(AppError::Core(CoreError::Conflict(
            "Registration was cancelled".into(),
        )));
    }
    if let Some(session_id) = input.session_id {
        let session = SessionRepo::find_by_id(&state.pool, session_id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "Session",
                id: session_id,
            }))?;
        if session.event_id != input.event_id {
            return Err(AppError::Core(CoreError::Validation(
                "Session does not belong to this event".into(),
            )));
        }
    }

    let outcome =
        CheckinRepo::record(&state.pool, participant.id, input.event_id, input.session_id).await?;

    let (status, checkin) = match outcome {
        CheckinOutcome::Recorded(checkin) => {
            tracing::info!(
                participant_id = participant.id,
                event_id = input.event_id,
                session_id = ?input.session_id,
                "Participant checked in"
            );
            (CheckinResult::CheckedIn, checkin)
        }
        CheckinOutcome::AlreadyCheckedIn(checkin) => {
            tracing::debug!(participant_id = participant.id, "Repeated scan");
            (CheckinResult::AlreadyCheckedIn, checkin)
        }
    };

    // Reload to pick up the checked_in_at stamp.
    let participant = ParticipantRepo::find_by_id(&state.pool, participant.id)
        .await?
        .unwrap_or(participant);

    Ok(Json(CheckinResponse {
        status,
        participant,
        checkin,
    }))
}

/// GET /api/v1/verify-qr/{token}
///
/// Unknown or malformed tokens answer `{ "valid": false }`.
pub async fn verify_qr(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<VerifyQrResponse>> {
    let invalid = VerifyQrResponse {
        valid: false,
        participant: None,
        event: None,
    };

    let Some(token) = qr::extract_token(&token) else {
        return Ok(Json(invalid));
    };
    let Some(participant) = ParticipantRepo::find_by_qr_token(&state.pool, token).await? else {
        return Ok(Json(invalid));
    };

    let event = public_event(&state, participant.event_id).await?;
    let valid = participant.status != participant_rules::STATUS_CANCELLED;
    Ok(Json(VerifyQrResponse {
        valid,
        participant: Some(participant),
        event: Some(event),
    }))
}
