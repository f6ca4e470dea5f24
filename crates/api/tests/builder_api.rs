//! Integration tests for sites, pages, trees, templates and public pages.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, body_text, create_event, delete_auth, get, get_auth, post_auth, post_json_auth,
    put_json_auth, register_organizer,
};
use serde_json::{json, Value};
use sqlx::PgPool;

fn two_node_tree() -> Value {
    json!({
        "rootNodeId": "ROOT",
        "nodes": {
            "ROOT": {"id": "ROOT", "type": "Container", "children": ["title"], "props": {"padding": 16}},
            "title": {"id": "title", "type": "Heading", "props": {"text": "Bienvenue", "level": 1}}
        }
    })
}

async fn create_site(app: axum::Router, token: &str, body: Value) -> Value {
    let response = post_json_auth(app, "/api/v1/sites", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn site_slug_is_derived_from_name(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;

    let site = create_site(app.clone(), &token, json!({ "name": "Mon Site Été" })).await;
    assert_eq!(site["slug"], "mon-site-ete");

    let response = post_json_auth(
        app.clone(),
        "/api/v1/sites",
        &token,
        json!({ "name": "Other", "slug": "Not A Slug" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        "/api/v1/sites",
        &token,
        json!({ "name": "Copy", "slug": "mon-site-ete" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pages_start_as_empty_drafts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let site = create_site(app.clone(), &token, json!({ "name": "Vitrine" })).await;
    let site_id = site["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/sites/{site_id}/pages"),
        &token,
        json!({ "name": "Accueil" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let page = body_json(response).await;
    assert_eq!(page["slug"], "accueil");
    assert_eq!(page["status"], "draft");
    assert_eq!(page["page_type"], "custom");
    assert_eq!(page["tree"], json!({ "rootNodeId": "", "nodes": {} }));

    let list = body_json(
        get_auth(app, &format!("/api/v1/sites/{site_id}/pages"), &token).await,
    )
    .await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
    assert!(list["data"][0].get("tree").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn tree_saves_are_validated(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let site = create_site(app.clone(), &token, json!({ "name": "Vitrine" })).await;
    let site_id = site["id"].as_i64().unwrap();
    let page = body_json(
        post_json_auth(
            app.clone(),
            &format!("/api/v1/sites/{site_id}/pages"),
            &token,
            json!({ "name": "Accueil" }),
        )
        .await,
    )
    .await;
    let page_id = page["id"].as_i64().unwrap();
    let tree_uri = format!("/api/v1/pages/{page_id}/tree");

    let dangling = json!({
        "rootNodeId": "ROOT",
        "nodes": {"ROOT": {"id": "ROOT", "type": "Container", "children": ["ghost"]}}
    });
    let response = put_json_auth(app.clone(), &tree_uri, &token, json!({ "tree": dangling })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("ghost"));

    let response =
        put_json_auth(app.clone(), &tree_uri, &token, json!({ "tree": two_node_tree() })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    assert_eq!(saved["tree"]["nodes"]["title"]["props"]["text"], "Bienvenue");

    let response = get_auth(app, &format!("/api/v1/pages/{page_id}/preview"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("Bienvenue"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn settings_panel_edits_one_node(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let site = create_site(app.clone(), &token, json!({ "name": "Vitrine" })).await;
    let page = body_json(
        post_json_auth(
            app.clone(),
            &format!("/api/v1/sites/{}/pages", site["id"]),
            &token,
            json!({ "name": "Accueil", "tree": two_node_tree() }),
        )
        .await,
    )
    .await;
    let page_id = page["id"].as_i64().unwrap();
    let props_uri = |node: &str| format!("/api/v1/pages/{page_id}/nodes/{node}/props");

    let response = put_json_auth(
        app.clone(),
        &props_uri("title"),
        &token,
        json!({ "text": "Programme", "align": "center" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    let title = &saved["tree"]["nodes"]["title"]["props"];
    assert_eq!(title["text"], "Programme");
    assert_eq!(title["align"], "center");
    assert_eq!(title["level"], 1);
    assert_eq!(saved["tree"]["nodes"]["ROOT"]["props"]["padding"], 16);

    let response =
        put_json_auth(app.clone(), &props_uri("ghost"), &token, json!({ "text": "x" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(app.clone(), &props_uri("title"), &token, json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let other = register_organizer(app.clone(), "other@example.com").await;
    let response = put_json_auth(app, &props_uri("title"), &other, json!({ "text": "x" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn templates_are_listed(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;

    let json = body_json(get_auth(app, "/api/v1/builder/templates", &token).await).await;
    let keys: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["key"].as_str().unwrap())
        .collect();
    assert_eq!(keys, vec!["registration", "landing", "agenda"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn instantiated_template_publishes_with_live_event_data(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Salon du livre", "published").await;
    let event_id = event["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/builder/templates/registration/instantiate",
        &token,
        json!({ "event_id": event_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let site_slug = created["site"]["slug"].as_str().unwrap().to_string();
    let page_slug = created["page"]["slug"].as_str().unwrap().to_string();
    let page_id = created["page"]["id"].as_i64().unwrap();
    assert_eq!(site_slug, format!("salon-du-livre-{event_id}"));
    assert_eq!(created["site"]["event_id"], event_id);
    assert_eq!(created["page"]["event_id"], event_id);
    assert_eq!(created["page"]["page_type"], "registration");
    assert_eq!(created["page"]["status"], "draft");

    let public_uri = format!("/public/{site_slug}/{page_slug}");
    let response = get(app.clone(), &public_uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_auth(app.clone(), &format!("/api/v1/pages/{page_id}/publish"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let published = body_json(response).await;
    assert_eq!(published["status"], "published");
    assert!(published["published_at"].is_string());

    let response = get(app.clone(), &public_uri).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Salon du livre"));
    assert!(html.contains(&format!("data-event-id=\"{event_id}\"")));
    assert!(html.contains("name=\"email\""));

    // A second page for the same event reuses the event's site.
    let response = post_json_auth(
        app,
        "/api/v1/builder/templates/agenda/instantiate",
        &token,
        json!({ "event_id": event_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let second = body_json(response).await;
    assert_eq!(second["site"]["id"], created["site"]["id"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn long_event_names_still_get_a_valid_site_slug(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let name = "Rencontres internationales ".repeat(6);
    let event = create_event(app.clone(), &token, name.trim(), "published").await;
    let event_id = event["id"].as_i64().unwrap();

    let response = post_json_auth(
        app,
        "/api/v1/builder/templates/landing/instantiate",
        &token,
        json!({ "event_id": event_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let slug = body_json(response).await["site"]["slug"].as_str().unwrap().to_string();
    assert!(slug.len() <= 80, "{slug}");
    assert!(slug.starts_with("rencontres-internationales-"));
    assert!(slug.ends_with(&format!("-{event_id}")));
    assert!(!slug.contains("--"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_template_and_foreign_event_are_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = register_organizer(app.clone(), "owner@example.com").await;
    let other = register_organizer(app.clone(), "other@example.com").await;
    let event = create_event(app.clone(), &owner, "Gala", "draft").await;
    let event_id = event["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        "/api/v1/builder/templates/brochure/instantiate",
        &owner,
        json!({ "event_id": event_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(
        app,
        "/api/v1/builder/templates/landing/instantiate",
        &other,
        json!({ "event_id": event_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pages_of_other_organizers_are_hidden(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = register_organizer(app.clone(), "owner@example.com").await;
    let other = register_organizer(app.clone(), "other@example.com").await;
    let site = create_site(app.clone(), &owner, json!({ "name": "Privé" })).await;
    let site_id = site["id"].as_i64().unwrap();
    let page = body_json(
        post_json_auth(
            app.clone(),
            &format!("/api/v1/sites/{site_id}/pages"),
            &owner,
            json!({ "name": "Accueil", "tree": two_node_tree() }),
        )
        .await,
    )
    .await;
    let page_id = page["id"].as_i64().unwrap();

    let response = get_auth(app.clone(), &format!("/api/v1/pages/{page_id}"), &other).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.clone(), &format!("/api/v1/sites/{site_id}"), &other).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.clone(), &format!("/api/v1/sites/{site_id}"), &owner).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/v1/pages/{page_id}"), &owner).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
