//! Authorized sender addresses and domains.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use evently_core::error::CoreError;
use evently_core::sender::{normalize_domain, validate_domain, validate_sender};
use evently_core::types::DbId;
use evently_db::models::sender::{AuthorizedDomain, CreateAuthorizedDomain, CreateSender, Sender};
use evently_db::repositories::{DomainRepo, SenderRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/senders
pub async fn list(auth: AuthUser, State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let senders = SenderRepo::list_by_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: senders }))
}

/// POST /api/v1/senders
///
/// The address's domain must be one of the caller's authorized domains.
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSender>,
) -> AppResult<(StatusCode, Json<Sender>)> {
    let email = input.email.trim().to_lowercase();
    let domains = DomainRepo::names_by_owner(&state.pool, auth.user_id).await?;
    validate_sender(&email, &domains)?;

    let name = input.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let sender = SenderRepo::create(&state.pool, auth.user_id, &email, name).await?;
    tracing::info!(id = sender.id, user_id = auth.user_id, "Sender authorized");
    Ok((StatusCode::CREATED, Json(sender)))
}

/// DELETE /api/v1/senders/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    match SenderRepo::find_by_id(&state.pool, id).await? {
        Some(sender) if sender.owner_id == auth.user_id => {}
        _ => return Err(AppError::Core(CoreError::NotFound { entity: "Sender", id })),
    }
    SenderRepo::delete(&state.pool, id).await?;
    tracing::info!(id, user_id = auth.user_id, "Sender removed");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/sender-domains
pub async fn list_domains(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let domains = DomainRepo::list_by_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: domains }))
}

/// POST /api/v1/sender-domains
pub async fn create_domain(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAuthorizedDomain>,
) -> AppResult<(StatusCode, Json<AuthorizedDomain>)> {
    let domain = normalize_domain(&input.domain);
    validate_domain(&domain)?;
    let created = DomainRepo::create(&state.pool, auth.user_id, &domain).await?;
    tracing::info!(id = created.id, domain = %created.domain, "Sender domain authorized");
    Ok((StatusCode::CREATED, Json(created)))
}
