//! Handlers for organizer email templates.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use evently_core::email_template::{self, RenderedEmail, StandardVars, TemplateKind};
use evently_core::error::CoreError;
use evently_core::types::DbId;
use evently_db::models::email_template::{
    CreateEmailTemplate, EmailTemplate, UpdateEmailTemplate,
};
use evently_db::models::event::Event;
use evently_db::repositories::EmailTemplateRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::email::VarValues;
use crate::handlers::{owned_event, owned_participant};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PreviewRequest {
    /// Fill the template with this participant's data instead of samples.
    pub participant_id: Option<DbId>,
}

fn validate_kind(kind: &str) -> Result<(), CoreError> {
    TemplateKind::parse(kind).map(|_| ()).ok_or_else(|| {
        CoreError::Validation(format!(
            "Unknown template kind '{kind}'; expected inscription, invitation or rappel"
        ))
    })
}

fn validate_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

async fn owned_template(
    state: &AppState,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<(EmailTemplate, Event)> {
    let not_found = || AppError::Core(CoreError::NotFound {
        entity: "EmailTemplate",
        id,
    });
    let template = EmailTemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    let event = owned_event(&state.pool, auth, template.event_id)
        .await
        .map_err(|_| not_found())?;
    Ok((template, event))
}

/// GET /api/v1/events/{id}/email-templates
pub async fn list_by_event(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    owned_event(&state.pool, &auth, event_id).await?;
    let templates = EmailTemplateRepo::list_by_event(&state.pool, event_id).await?;
    Ok(Json(DataResponse { data: templates }))
}

/// POST /api/v1/events/{id}/email-templates
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<CreateEmailTemplate>,
) -> AppResult<(StatusCode, Json<EmailTemplate>)> {
    owned_event(&state.pool, &auth, event_id).await?;
    validate_kind(&input.kind)?;
    validate_text("name", &input.name)?;
    validate_text("subject", &input.subject)?;

    let template = EmailTemplateRepo::create(&state.pool, event_id, &input).await?;
    tracing::info!(id = template.id, event_id, kind = %template.kind, "Email template created");
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/v1/email-templates/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<EmailTemplate>> {
    let (template, _) = owned_template(&state, &auth, id).await?;
    Ok(Json(template))
}

/// PUT /api/v1/email-templates/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEmailTemplate>,
) -> AppResult<Json<EmailTemplate>> {
    owned_template(&state, &auth, id).await?;
    if let Some(kind) = &input.kind {
        validate_kind(kind)?;
    }
    if let Some(name) = &input.name {
        validate_text("name", name)?;
    }
    if let Some(subject) = &input.subject {
        validate_text("subject", subject)?;
    }

    let template = EmailTemplateRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "EmailTemplate",
            id,
        }))?;
    tracing::info!(id, "Email template updated");
    Ok(Json(template))
}

/// DELETE /api/v1/email-templates/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_template(&state, &auth, id).await?;
    EmailTemplateRepo::delete(&state.pool, id).await?;
    tracing::info!(id, "Email template deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/email-templates/{id}/preview
///
/// Renders the template with a participant's data, or with sample values.
/// Unknown placeholders are reported in `unknown_variables`.
pub async fn preview(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<PreviewRequest>>,
) -> AppResult<Json<RenderedEmail>> {
    let (template, event) = owned_template(&state, &auth, id).await?;
    let request = body.map(|Json(b)| b).unwrap_or_default();

    let rendered = match request.participant_id {
        Some(participant_id) => {
            let (participant, _) = owned_participant(&state.pool, &auth, participant_id).await?;
            if participant.event_id != event.id {
                return Err(AppError::Core(CoreError::Validation(
                    "Participant is not registered for this template's event".into(),
                )));
            }
            let values = VarValues::new(&state, &event, &participant, None);
            let vars = values.vars(&event, &participant).to_map();
            email_template::render(&template.subject, &template.body_html, &vars)
        }
        None => {
            let view = event.view();
            let date = view.date_range().unwrap_or_default();
            let vars = StandardVars {
                first_name: "Marie",
                last_name: "Dupont",
                email: "marie.dupont@example.com",
                event_name: &event.name,
                event_date: Some(&date),
                event_location: view.location.as_deref(),
                qr_url: Some("https://example.com/verify-qr/EXEMPLE"),
                link: Some("https://example.com/inscription"),
            }
            .to_map();
            email_template::render(&template.subject, &template.body_html, &vars)
        }
    }
    .map_err(|e| AppError::InternalError(format!("Template rendering error: {e}")))?;

    Ok(Json(rendered))
}
