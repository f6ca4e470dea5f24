//! Route definitions for the page builder.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::builder;
use crate::state::AppState;

/// Builder routes merged at the `/api/v1` root.
///
/// ```text
/// GET    /sites                                  -> list_sites
/// POST   /sites                                  -> create_site
/// GET    /sites/{id}                             -> get_site
/// PUT    /sites/{id}                             -> update_site
/// DELETE /sites/{id}                             -> delete_site
/// GET    /sites/{id}/pages                       -> list_pages
/// POST   /sites/{id}/pages                       -> create_page
/// GET    /pages/{id}                             -> get_page
/// PUT    /pages/{id}                             -> update_page
/// DELETE /pages/{id}                             -> delete_page
/// PUT    /pages/{id}/tree                        -> save_tree
/// PUT    /pages/{id}/nodes/{node_id}/props       -> set_node_props
/// POST   /pages/{id}/publish                     -> publish
/// GET    /pages/{id}/preview                     -> preview (HTML)
/// GET    /builder/templates                      -> list_templates
/// POST   /builder/templates/{key}/instantiate    -> instantiate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sites", get(builder::list_sites).post(builder::create_site))
        .route(
            "/sites/{id}",
            get(builder::get_site)
                .put(builder::update_site)
                .delete(builder::delete_site),
        )
        .route(
            "/sites/{id}/pages",
            get(builder::list_pages).post(builder::create_page),
        )
        .route(
            "/pages/{id}",
            get(builder::get_page)
                .put(builder::update_page)
                .delete(builder::delete_page),
        )
        .route("/pages/{id}/tree", put(builder::save_tree))
        .route("/pages/{id}/nodes/{node_id}/props", put(builder::set_node_props))
        .route("/pages/{id}/publish", post(builder::publish))
        .route("/pages/{id}/preview", get(builder::preview))
        .route("/builder/templates", get(builder::list_templates))
        .route(
            "/builder/templates/{key}/instantiate",
            post(builder::instantiate),
        )
}
