//! Request handlers, one module per resource.
//!
//! Resources are owned by an organizer, directly (events, sites, senders)
//! or through their event. Lookups for another organizer's rows answer
//! 404 so ids do not leak across tenants.

pub mod auth;
pub mod builder;
pub mod checkin;
pub mod email;
pub mod email_templates;
pub mod events;
pub mod orders;
pub mod participants;
pub mod registration;
pub mod senders;
pub mod sessions;
pub mod ticketing;

use evently_core::error::CoreError;
use evently_core::event::STATUS_PUBLISHED;
use evently_core::types::DbId;
use evently_db::models::builder::{Page, Site};
use evently_db::models::event::Event;
use evently_db::models::participant::Participant;
use evently_db::models::session::Session;
use evently_db::repositories::{EventRepo, PageRepo, ParticipantRepo, SessionRepo, SiteRepo};
use evently_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

/// Load an event owned by the caller.
pub async fn owned_event(pool: &DbPool, auth: &AuthUser, id: DbId) -> AppResult<Event> {
    match EventRepo::find_by_id(pool, id).await? {
        Some(event) if event.owner_id == auth.user_id => Ok(event),
        _ => Err(not_found("Event", id)),
    }
}

/// Load a participant whose event is owned by the caller.
pub async fn owned_participant(
    pool: &DbPool,
    auth: &AuthUser,
    id: DbId,
) -> AppResult<(Participant, Event)> {
    let participant = ParticipantRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found("Participant", id))?;
    let event = owned_event(pool, auth, participant.event_id)
        .await
        .map_err(|_| not_found("Participant", id))?;
    Ok((participant, event))
}

/// Load a session whose event is owned by the caller.
pub async fn owned_session(pool: &DbPool, auth: &AuthUser, id: DbId) -> AppResult<(Session, Event)> {
    let session = SessionRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found("Session", id))?;
    let event = owned_event(pool, auth, session.event_id)
        .await
        .map_err(|_| not_found("Session", id))?;
    Ok((session, event))
}

pub async fn owned_site(pool: &DbPool, auth: &AuthUser, id: DbId) -> AppResult<Site> {
    match SiteRepo::find_by_id(pool, id).await? {
        Some(site) if site.owner_id == auth.user_id => Ok(site),
        _ => Err(not_found("Site", id)),
    }
}

pub async fn owned_page(pool: &DbPool, auth: &AuthUser, id: DbId) -> AppResult<(Page, Site)> {
    let page = PageRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found("Page", id))?;
    let site = owned_site(pool, auth, page.site_id)
        .await
        .map_err(|_| not_found("Page", id))?;
    Ok((page, site))
}

/// Verify an optional event reference points at one of the caller's events.
pub async fn check_event_ref(pool: &DbPool, auth: &AuthUser, event_id: Option<DbId>) -> AppResult<()> {
    if let Some(id) = event_id {
        owned_event(pool, auth, id).await?;
    }
    Ok(())
}

/// Load a published event for an anonymous caller.
pub async fn published_event(pool: &DbPool, id: DbId) -> AppResult<Event> {
    EventRepo::find_by_id(pool, id)
        .await?
        .filter(|e| e.status == STATUS_PUBLISHED)
        .ok_or_else(|| not_found("Event", id))
}
