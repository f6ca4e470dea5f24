//! Handlers for the `/events` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use evently_core::error::CoreError;
use evently_core::types::DbId;
use evently_core::{access_code, event as rules};
use evently_db::models::event::{CreateEvent, Event, UpdateEvent};
use evently_db::repositories::EventRepo;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::handlers::owned_event;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Attempts at drawing an unused access code before giving up.
const ACCESS_CODE_ATTEMPTS: usize = 20;

const ACCESS_CODE_CONSTRAINT: &str = "uq_events_access_code";

/// GET /api/v1/events
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let events =
        EventRepo::list_by_owner(&state.pool, auth.user_id, params.limit(), params.offset()).await?;
    tracing::debug!(count = events.len(), user_id = auth.user_id, "Listed events");
    Ok(Json(DataResponse { data: events }))
}

/// POST /api/v1/events
///
/// Creates the event with a fresh 4-digit access code.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateEvent>,
) -> AppResult<(StatusCode, Json<Event>)> {
    rules::validate_name(&input.name)?;
    rules::validate_schedule(input.starts_at, input.ends_at)?;
    rules::validate_capacity(input.capacity)?;
    if let Some(status) = &input.status {
        rules::validate_status(status)?;
    }

    for _ in 0..ACCESS_CODE_ATTEMPTS {
        let code = access_code::generate();
        match EventRepo::create(&state.pool, auth.user_id, &input, &code).await {
            Ok(event) => {
                tracing::info!(id = event.id, user_id = auth.user_id, "Event created");
                return Ok((StatusCode::CREATED, Json(event)));
            }
            Err(e) if is_unique_violation(&e, ACCESS_CODE_CONSTRAINT) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(AppError::InternalError(
        "Could not allocate a unique access code".into(),
    ))
}

/// GET /api/v1/events/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Event>> {
    Ok(Json(owned_event(&state.pool, &auth, id).await?))
}

/// PUT /api/v1/events/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEvent>,
) -> AppResult<Json<Event>> {
    let existing = owned_event(&state.pool, &auth, id).await?;

    if let Some(name) = &input.name {
        rules::validate_name(name)?;
    }
    if let Some(status) = &input.status {
        rules::validate_status(status)?;
    }
    rules::validate_capacity(input.capacity)?;
    rules::validate_schedule(
        input.starts_at.unwrap_or(existing.starts_at),
        input.ends_at.or(existing.ends_at),
    )?;

    let event = EventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id,
        }))?;

    tracing::info!(id, user_id = auth.user_id, "Event updated");
    Ok(Json(event))
}

/// DELETE /api/v1/events/{id}
///
/// Cascades to participants, sessions, templates, tickets and orders.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_event(&state.pool, &auth, id).await?;
    EventRepo::delete(&state.pool, id).await?;
    tracing::info!(id, user_id = auth.user_id, "Event deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/events/{id}/access-code
pub async fn regenerate_access_code(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Event>> {
    let existing = owned_event(&state.pool, &auth, id).await?;

    for _ in 0..ACCESS_CODE_ATTEMPTS {
        let code = access_code::generate();
        if code == existing.access_code {
            continue;
        }
        match EventRepo::set_access_code(&state.pool, id, &code).await {
            Ok(Some(event)) => {
                tracing::info!(id, user_id = auth.user_id, "Access code regenerated");
                return Ok(Json(event));
            }
            Ok(None) => {
                return Err(AppError::Core(CoreError::NotFound {
                    entity: "Event",
                    id,
                }))
            }
            Err(e) if is_unique_violation(&e, ACCESS_CODE_CONSTRAINT) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(AppError::InternalError(
        "Could not allocate a unique access code".into(),
    ))
}

/// GET /api/v1/events/{id}/stats
pub async fn stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    owned_event(&state.pool, &auth, id).await?;
    let stats = EventRepo::stats(&state.pool, id).await?;
    Ok(Json(DataResponse { data: stats }))
}
