//! Email relay: inscription confirmations and invitation batches.
//!
//! Both endpoints answer `{ "success": bool, "error"?: string }`. Provider
//! rejections carry the provider's message unchanged.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use evently_core::email_template::{StandardVars, TemplateKind};
use evently_core::error::CoreError;
use evently_core::participant::STATUS_INVITED;
use evently_core::sender::validate_sender;
use evently_core::types::DbId;
use evently_core::qr;
use evently_db::models::event::Event;
use evently_db::models::participant::Participant;
use evently_db::repositories::{DomainRepo, EmailTemplateRepo, ParticipantRepo};
use evently_notify::compose::{self, ComposedEmail};
use evently_notify::{SendReceipt, SenderIdentity};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::{owned_event, owned_participant};
use crate::middleware::auth::AuthUser;
use crate::query::MAX_LIMIT;
use crate::response::RelayResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SenderInput {
    pub email: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SendInscriptionRequest {
    pub participant_id: DbId,
    pub sender: Option<SenderInput>,
}

#[derive(Debug, Deserialize)]
pub struct SendInvitationsRequest {
    pub event_id: DbId,
    /// Defaults to every participant with status `invited`.
    pub participant_ids: Option<Vec<DbId>>,
    pub message: Option<String>,
    /// Registration page link offered in the email.
    pub link: Option<String>,
    pub sender: Option<SenderInput>,
}

#[derive(Debug, Serialize)]
pub struct InscriptionSent {
    pub message_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecipientResult {
    pub participant_id: DbId,
    pub email: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct InvitationBatch {
    pub sent: usize,
    pub failed: usize,
    pub results: Vec<RecipientResult>,
}

// ---------------------------------------------------------------------------
// Composition helpers
// ---------------------------------------------------------------------------

/// Owned values behind a [`StandardVars`].
pub struct VarValues {
    event_date: String,
    event_location: String,
    qr_url: String,
    link: String,
}

impl VarValues {
    pub fn new(state: &AppState, event: &Event, participant: &Participant, link: Option<&str>) -> Self {
        let view = event.view();
        Self {
            event_date: view.date_range().unwrap_or_default(),
            event_location: view.location.unwrap_or_default(),
            qr_url: qr::qr_url(&state.config.public_base_url, &participant.qr_token),
            link: link.unwrap_or_default().to_string(),
        }
    }

    pub fn vars<'a>(&'a self, event: &'a Event, participant: &'a Participant) -> StandardVars<'a> {
        StandardVars {
            first_name: &participant.first_name,
            last_name: &participant.last_name,
            email: &participant.email,
            event_name: &event.name,
            event_date: Some(&self.event_date),
            event_location: Some(&self.event_location),
            qr_url: Some(&self.qr_url),
            link: Some(&self.link),
        }
    }
}

/// Compose an email for `kind`, preferring the event's own template.
async fn compose_for(
    state: &AppState,
    event: &Event,
    participant: &Participant,
    kind: TemplateKind,
    message: Option<&str>,
    link: Option<&str>,
) -> AppResult<ComposedEmail> {
    let values = VarValues::new(state, event, participant, link);
    let vars = values.vars(event, participant);

    if let Some(template) =
        EmailTemplateRepo::find_for_kind(&state.pool, event.id, kind.as_str()).await?
    {
        return Ok(compose::from_template(&template.subject, &template.body_html, &vars)?);
    }

    let composed = match kind {
        TemplateKind::Invitation => compose::invitation(&vars, message)?,
        TemplateKind::Inscription | TemplateKind::Rappel => compose::inscription(&vars)?,
    };
    Ok(composed)
}

/// Check a requested sender against the organizer's authorized domains.
async fn resolve_sender(
    state: &AppState,
    owner_id: DbId,
    sender: Option<&SenderInput>,
) -> AppResult<Option<SenderIdentity>> {
    let Some(sender) = sender else {
        return Ok(None);
    };
    let email = sender.email.trim().to_lowercase();
    let domains = DomainRepo::names_by_owner(&state.pool, owner_id).await?;
    validate_sender(&email, &domains)?;
    Ok(Some(SenderIdentity {
        email,
        name: sender.name.clone().filter(|n| !n.trim().is_empty()),
    }))
}

async fn send_composed(
    state: &AppState,
    participant: &Participant,
    composed: ComposedEmail,
    sender: Option<SenderIdentity>,
) -> AppResult<SendReceipt> {
    let to_name = format!("{} {}", participant.first_name, participant.last_name);
    let email = composed.into_outgoing(&participant.email, Some(to_name), sender);
    Ok(state.mailer.send(&email).await?)
}

/// Send the inscription confirmation for a participant.
pub async fn send_inscription(
    state: &AppState,
    event: &Event,
    participant: &Participant,
    sender: Option<SenderIdentity>,
) -> AppResult<SendReceipt> {
    let composed =
        compose_for(state, event, participant, TemplateKind::Inscription, None, None).await?;
    send_composed(state, participant, composed, sender).await
}

/// Fire-and-report variant for flows where email is a side effect.
pub async fn send_inscription_best_effort(
    state: &AppState,
    event: &Event,
    participant: &Participant,
) -> bool {
    match send_inscription(state, event, participant, None).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(participant_id = participant.id, error = %e, "Inscription email not sent");
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/send-inscription-email
pub async fn send_inscription_email(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SendInscriptionRequest>,
) -> Response {
    let result = async {
        let (participant, event) = owned_participant(&state.pool, &auth, input.participant_id).await?;
        let sender = resolve_sender(&state, event.owner_id, input.sender.as_ref()).await?;
        send_inscription(&state, &event, &participant, sender).await
    }
    .await;

    match result {
        Ok(receipt) => {
            tracing::info!(participant_id = input.participant_id, "Inscription email relayed");
            Json(RelayResponse {
                success: true,
                error: None,
                details: Some(InscriptionSent {
                    message_id: receipt.message_id,
                }),
            })
            .into_response()
        }
        Err(e) => e.into_relay_response(),
    }
}

/// POST /api/v1/send-invitation-emails
///
/// Sends one email per recipient and reports each outcome. `success` is
/// true only when every email went out.
pub async fn send_invitation_emails(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SendInvitationsRequest>,
) -> Response {
    match invite(&auth, &state, &input).await {
        Ok((batch, first_error)) => {
            let success = batch.failed == 0;
            let (status, error) = match first_error {
                None => (StatusCode::OK, None),
                Some(err) if batch.sent == 0 => {
                    let (status, _, message) = err.parts();
                    (status, Some(message))
                }
                Some(_) => (
                    StatusCode::OK,
                    Some(format!(
                        "{} of {} invitations failed",
                        batch.failed,
                        batch.results.len()
                    )),
                ),
            };
            tracing::info!(
                event_id = input.event_id,
                sent = batch.sent,
                failed = batch.failed,
                "Invitation batch relayed"
            );
            (
                status,
                Json(RelayResponse {
                    success,
                    error,
                    details: Some(batch),
                }),
            )
                .into_response()
        }
        Err(e) => e.into_relay_response(),
    }
}

async fn invite(
    auth: &AuthUser,
    state: &AppState,
    input: &SendInvitationsRequest,
) -> AppResult<(InvitationBatch, Option<AppError>)> {
    let event = owned_event(&state.pool, auth, input.event_id).await?;
    let sender = resolve_sender(state, event.owner_id, input.sender.as_ref()).await?;

    let recipients: Vec<Participant> = match &input.participant_ids {
        Some(ids) => {
            let mut found = Vec::with_capacity(ids.len());
            for &id in ids {
                let (participant, _) = owned_participant(&state.pool, auth, id).await?;
                if participant.event_id != event.id {
                    return Err(AppError::Core(CoreError::Validation(format!(
                        "Participant {id} is not registered for this event"
                    ))));
                }
                found.push(participant);
            }
            found
        }
        None => {
            ParticipantRepo::list_by_event(&state.pool, event.id, Some(STATUS_INVITED), MAX_LIMIT, 0)
                .await?
        }
    };

    if recipients.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No recipients to invite".into(),
        )));
    }

    let mut results = Vec::with_capacity(recipients.len());
    let mut first_error = None;
    for participant in &recipients {
        let outcome = async {
            let composed = compose_for(
                state,
                &event,
                participant,
                TemplateKind::Invitation,
                input.message.as_deref(),
                input.link.as_deref(),
            )
            .await?;
            send_composed(state, participant, composed, sender.clone()).await
        }
        .await;

        match outcome {
            Ok(receipt) => results.push(RecipientResult {
                participant_id: participant.id,
                email: participant.email.clone(),
                success: true,
                error: None,
                message_id: receipt.message_id,
            }),
            Err(err) => {
                let (_, _, message) = err.parts();
                results.push(RecipientResult {
                    participant_id: participant.id,
                    email: participant.email.clone(),
                    success: false,
                    error: Some(message),
                    message_id: None,
                });
                first_error.get_or_insert(err);
            }
        }
    }

    let sent = results.iter().filter(|r| r.success).count();
    let batch = InvitationBatch {
        sent,
        failed: results.len() - sent,
        results,
    };
    Ok((batch, first_error))
}
