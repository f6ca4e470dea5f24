//! Page builder: sites, pages, tree saves, templates and rendering.
//!
//! Trees are validated on every write. Rendering binds the page's event
//! (and its sessions) when there is one, otherwise blocks show sample
//! content.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use evently_core::error::CoreError;
use evently_core::page_template::{self, BUILTIN_TEMPLATES};
use evently_core::page_tree::Tree;
use evently_core::render::{render_document, RenderContext};
use evently_core::slug::{slug_with_suffix, slugify, validate_slug};
use evently_core::types::DbId;
use evently_db::models::builder::{
    CreatePage, CreateSite, InstantiateTemplate, Page, SaveTree, Site, UpdatePage, UpdateSite,
    PAGE_STATUS_PUBLISHED, PAGE_TYPE_CUSTOM,
};
use evently_db::repositories::{EventRepo, PageRepo, SessionRepo, SiteRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::registration::registration_action;
use crate::handlers::{check_event_ref, owned_event, owned_page, owned_site};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct InstantiatedPage {
    pub site: Site,
    pub page: Page,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }
    Ok(())
}

/// Explicit slug, or one derived from the name.
fn resolve_slug(slug: Option<&str>, name: &str) -> Result<String, CoreError> {
    let slug = match slug {
        Some(s) => s.trim().to_string(),
        None => slugify(name),
    };
    validate_slug(&slug)?;
    Ok(slug)
}

/// Parse and validate a tree submitted by the editor.
fn checked_tree(value: &serde_json::Value) -> Result<Tree, CoreError> {
    let tree = Tree::from_stored(value)?;
    tree.validate()?;
    Ok(tree)
}

/// Render a page to a full HTML document with live data when bound.
async fn render_page(state: &AppState, page: &Page) -> AppResult<String> {
    let tree = Tree::from_stored(&page.tree).map_err(CoreError::from)?;

    let event = match page.event_id {
        Some(id) => EventRepo::find_by_id(&state.pool, id).await?,
        None => None,
    };
    let ctx = match event {
        Some(event) => {
            let sessions = SessionRepo::list_by_event(&state.pool, event.id).await?;
            RenderContext::live(
                event.view(),
                sessions.iter().map(|s| s.view()).collect(),
                registration_action(event.id),
            )
        }
        None => RenderContext::preview(),
    };

    Ok(render_document(&tree, &ctx, &page.name)?)
}

// ---------------------------------------------------------------------------
// Sites
// ---------------------------------------------------------------------------

/// GET /api/v1/sites
pub async fn list_sites(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let sites = SiteRepo::list_by_owner(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: sites }))
}

/// POST /api/v1/sites
pub async fn create_site(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateSite>,
) -> AppResult<(StatusCode, Json<Site>)> {
    validate_name(&input.name)?;
    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;
    check_event_ref(&state.pool, &auth, input.event_id).await?;

    let site =
        SiteRepo::create(&state.pool, auth.user_id, input.name.trim(), &slug, input.event_id)
            .await?;
    tracing::info!(id = site.id, slug = %site.slug, "Site created");
    Ok((StatusCode::CREATED, Json(site)))
}

/// GET /api/v1/sites/{id}
pub async fn get_site(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Site>> {
    Ok(Json(owned_site(&state.pool, &auth, id).await?))
}

/// PUT /api/v1/sites/{id}
pub async fn update_site(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSite>,
) -> AppResult<Json<Site>> {
    owned_site(&state.pool, &auth, id).await?;
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(slug) = &input.slug {
        validate_slug(slug)?;
    }
    check_event_ref(&state.pool, &auth, input.event_id).await?;

    let site = SiteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Site", id }))?;
    tracing::info!(id, "Site updated");
    Ok(Json(site))
}

/// DELETE /api/v1/sites/{id}
///
/// Removes the site's pages too.
pub async fn delete_site(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_site(&state.pool, &auth, id).await?;
    SiteRepo::delete(&state.pool, id).await?;
    tracing::info!(id, "Site deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

/// GET /api/v1/sites/{id}/pages
pub async fn list_pages(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(site_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    owned_site(&state.pool, &auth, site_id).await?;
    let pages = PageRepo::list_by_site(&state.pool, site_id).await?;
    Ok(Json(DataResponse { data: pages }))
}

/// POST /api/v1/sites/{id}/pages
pub async fn create_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(site_id): Path<DbId>,
    Json(input): Json<CreatePage>,
) -> AppResult<(StatusCode, Json<Page>)> {
    owned_site(&state.pool, &auth, site_id).await?;
    validate_name(&input.name)?;
    let slug = resolve_slug(input.slug.as_deref(), &input.name)?;
    check_event_ref(&state.pool, &auth, input.event_id).await?;

    let tree = match &input.tree {
        Some(value) => checked_tree(value)?,
        None => Tree::empty(),
    };
    let page_type = input.page_type.as_deref().unwrap_or(PAGE_TYPE_CUSTOM);

    let page = PageRepo::create(
        &state.pool,
        site_id,
        input.name.trim(),
        &slug,
        page_type,
        input.event_id,
        &tree.to_value(),
    )
    .await?;
    tracing::info!(id = page.id, site_id, "Page created");
    Ok((StatusCode::CREATED, Json(page)))
}

/// GET /api/v1/pages/{id}
pub async fn get_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Page>> {
    let (page, _) = owned_page(&state.pool, &auth, id).await?;
    Ok(Json(page))
}

/// PUT /api/v1/pages/{id}
pub async fn update_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePage>,
) -> AppResult<Json<Page>> {
    owned_page(&state.pool, &auth, id).await?;
    if let Some(name) = &input.name {
        validate_name(name)?;
    }
    if let Some(slug) = &input.slug {
        validate_slug(slug)?;
    }
    check_event_ref(&state.pool, &auth, input.event_id).await?;

    let page = PageRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Page", id }))?;
    tracing::info!(id, "Page updated");
    Ok(Json(page))
}

/// DELETE /api/v1/pages/{id}
pub async fn delete_page(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    owned_page(&state.pool, &auth, id).await?;
    PageRepo::delete(&state.pool, id).await?;
    tracing::info!(id, "Page deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/pages/{id}/tree
///
/// Replaces the editor document. The tree must pass integrity checks;
/// concurrent saves resolve as last write wins.
pub async fn save_tree(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SaveTree>,
) -> AppResult<Json<Page>> {
    owned_page(&state.pool, &auth, id).await?;
    let tree = checked_tree(&input.tree)?;
    let orphans = tree.orphans();
    if !orphans.is_empty() {
        tracing::debug!(id, orphans = ?orphans, "Saved tree has unreachable nodes");
    }

    let page = PageRepo::save_tree(&state.pool, id, &tree.to_value())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Page", id }))?;
    tracing::info!(id, nodes = tree.len(), "Page tree saved");
    Ok(Json(page))
}

/// PUT /api/v1/pages/{id}/nodes/{node_id}/props
///
/// Settings-panel edit: merges the posted keys into one node's props and
/// saves the tree. Other nodes are left as stored.
pub async fn set_node_props(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, node_id)): Path<(DbId, String)>,
    Json(props): Json<serde_json::Map<String, serde_json::Value>>,
) -> AppResult<Json<Page>> {
    if props.is_empty() {
        return Err(AppError::Core(CoreError::Validation("No props to update".into())));
    }
    let (page, _) = owned_page(&state.pool, &auth, id).await?;
    let mut tree = Tree::from_stored(&page.tree).map_err(CoreError::from)?;
    for (key, value) in props {
        tree.set_prop(&node_id, &key, value).map_err(CoreError::from)?;
    }

    let page = PageRepo::save_tree(&state.pool, id, &tree.to_value())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Page", id }))?;
    tracing::info!(id, node_id = %node_id, "Node props updated");
    Ok(Json(page))
}

/// POST /api/v1/pages/{id}/publish
///
/// The page must render before it goes live.
pub async fn publish(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Page>> {
    let (page, _) = owned_page(&state.pool, &auth, id).await?;
    render_page(&state, &page).await?;

    let page = PageRepo::set_status(&state.pool, id, PAGE_STATUS_PUBLISHED)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Page", id }))?;
    tracing::info!(id, "Page published");
    Ok(Json(page))
}

/// GET /api/v1/pages/{id}/preview
pub async fn preview(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Html<String>> {
    let (page, _) = owned_page(&state.pool, &auth, id).await?;
    Ok(Html(render_page(&state, &page).await?))
}

/// GET /public/{site_slug}/{page_slug}
///
/// Published pages only.
pub async fn public_page(
    State(state): State<AppState>,
    Path((site_slug, page_slug)): Path<(String, String)>,
) -> AppResult<Html<String>> {
    let page = PageRepo::find_published(&state.pool, &site_slug, &page_slug)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Page",
                key: format!("{site_slug}/{page_slug}"),
            })
        })?;
    Ok(Html(render_page(&state, &page).await?))
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// GET /api/v1/builder/templates
pub async fn list_templates(_auth: AuthUser) -> impl IntoResponse {
    Json(DataResponse {
        data: BUILTIN_TEMPLATES,
    })
}

/// POST /api/v1/builder/templates/{key}/instantiate
///
/// Binds the template to the event and stores it as a new draft page. The
/// event's site is reused, or created first when it has none. The two
/// inserts are not atomic: a failed page insert leaves the site in place.
pub async fn instantiate(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<InstantiateTemplate>,
) -> AppResult<(StatusCode, Json<InstantiatedPage>)> {
    let template = page_template::find_template(&key).ok_or_else(|| {
        AppError::Core(CoreError::NotFoundByKey {
            entity: "PageTemplate",
            key: key.clone(),
        })
    })?;
    let event = owned_event(&state.pool, &auth, input.event_id).await?;

    let tree = page_template::instantiate(&template.tree(), &event.id.to_string());
    let unresolved = page_template::unresolved_placeholders(&tree);
    if !unresolved.is_empty() {
        return Err(AppError::InternalError(format!(
            "Template '{key}' left placeholders unresolved: {unresolved:?}"
        )));
    }
    tree.validate().map_err(CoreError::from)?;

    let name = input.name.as_deref().unwrap_or(template.name);
    validate_name(name)?;
    let slug = resolve_slug(input.slug.as_deref().or(Some(template.key)), name)?;

    let site = match input.site_id {
        Some(site_id) => owned_site(&state.pool, &auth, site_id).await?,
        None => match SiteRepo::find_for_event(&state.pool, auth.user_id, event.id).await? {
            Some(site) => site,
            None => {
                let site_slug = slug_with_suffix(&event.name, &event.id.to_string());
                validate_slug(&site_slug)?;
                let site =
                    SiteRepo::create(&state.pool, auth.user_id, &event.name, &site_slug, Some(event.id))
                        .await?;
                tracing::info!(id = site.id, event_id = event.id, "Site created for event");
                site
            }
        },
    };

    let page = PageRepo::create(
        &state.pool,
        site.id,
        name.trim(),
        &slug,
        template.page_type,
        Some(event.id),
        &tree.to_value(),
    )
    .await?;

    tracing::info!(
        id = page.id,
        site_id = site.id,
        event_id = event.id,
        template = %key,
        "Template instantiated"
    );
    Ok((StatusCode::CREATED, Json(InstantiatedPage { site, page })))
}
