//! Integration tests for the door scanner and public self-registration.

mod common;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use common::{
    body_json, create_event, create_participant, get, post_json, post_json_auth, put_json_auth,
    register_organizer,
};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

async fn post_form(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn access_code_unlocks_event_with_sessions(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Forum", "published").await;
    let event_id = event["id"].as_i64().unwrap();
    let code = event["access_code"].as_str().unwrap().to_string();
    assert_eq!(code.len(), 4);

    post_json_auth(
        app.clone(),
        &format!("/api/v1/events/{event_id}/sessions"),
        &token,
        json!({ "title": "Atelier", "capacity": 10 }),
    )
    .await;

    let response = post_json(
        app.clone(),
        "/api/v1/event-access",
        json!({ "code": format!(" {code} ") }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["event"]["id"], event_id);
    assert_eq!(json["event"]["name"], "Forum");
    assert!(json["event"].get("access_code").is_none());
    assert_eq!(json["sessions"][0]["title"], "Atelier");

    let response = post_json(app, "/api/v1/event-access", json!({ "code": "12a4" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_scans_report_the_first_checkin(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Forum", "published").await;
    let other = create_event(app.clone(), &token, "Autre", "published").await;
    let event_id = event["id"].as_i64().unwrap();
    let participant = create_participant(app.clone(), &token, event_id, "lea@example.com").await;
    let qr_token = participant["qr_token"].as_str().unwrap().to_string();

    let response = post_json(
        app.clone(),
        "/api/v1/checkin",
        json!({ "token": qr_token, "event_id": other["id"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Scanners may send the whole QR URL.
    let scanned = format!("https://evently.test/verify-qr/{qr_token}");
    let first = body_json(
        post_json(
            app.clone(),
            "/api/v1/checkin",
            json!({ "token": scanned, "event_id": event_id }),
        )
        .await,
    )
    .await;
    assert_eq!(first["status"], "checked_in");
    assert!(first["participant"]["checked_in_at"].is_string());

    let second = body_json(
        post_json(
            app.clone(),
            "/api/v1/checkin",
            json!({ "token": qr_token, "event_id": event_id }),
        )
        .await,
    )
    .await;
    assert_eq!(second["status"], "already_checked_in");
    assert_eq!(second["checkin"]["id"], first["checkin"]["id"]);

    let response = get(app, &format!("/api/v1/checkin?token={qr_token}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let status = body_json(response).await;
    assert_eq!(status["checked_in"], true);
    assert_eq!(status["checkins"].as_array().unwrap().len(), 1);
    assert_eq!(status["event"]["id"], event_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn verify_qr_reports_validity(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Forum", "published").await;
    let event_id = event["id"].as_i64().unwrap();
    let participant = create_participant(app.clone(), &token, event_id, "lea@example.com").await;
    let qr_token = participant["qr_token"].as_str().unwrap();

    let json = body_json(get(app.clone(), &format!("/api/v1/verify-qr/{qr_token}")).await).await;
    assert_eq!(json["valid"], true);
    assert_eq!(json["participant"]["email"], "lea@example.com");
    assert_eq!(json["event"]["name"], "Forum");

    let unknown = "A".repeat(32);
    let json = body_json(get(app.clone(), &format!("/api/v1/verify-qr/{unknown}")).await).await;
    assert_eq!(json, json!({ "valid": false }));

    let json = body_json(get(app, "/api/v1/verify-qr/short").await).await;
    assert_eq!(json["valid"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn form_registration_creates_participant(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Forum", "published").await;
    let event_id = event["id"].as_i64().unwrap();
    let uri = format!("/api/v1/public/events/{event_id}/register");

    let response = post_form(
        app.clone(),
        &uri,
        "prenom=L%C3%A9a&nom=Durand&email=Lea%40Example.com",
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["participant"]["first_name"], "Léa");
    assert_eq!(json["participant"]["email"], "lea@example.com");
    assert_eq!(json["participant"]["status"], "registered");
    assert_eq!(json["email_sent"], false);
    let qr_url = json["qr_url"].as_str().unwrap();
    assert!(qr_url.starts_with("https://evently.test/verify-qr/"));

    let response = post_json(
        app,
        &uri,
        json!({ "prenom": "Léa", "nom": "Durand", "email": "lea@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn registration_requires_published_event_with_room(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let draft = create_event(app.clone(), &token, "Brouillon", "draft").await;
    let body = |email: &str| json!({ "prenom": "Jean", "nom": "Martin", "email": email });

    let response = post_json(
        app.clone(),
        &format!("/api/v1/public/events/{}/register", draft["id"]),
        body("jean@example.com"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let event = create_event(app.clone(), &token, "Petit comité", "published").await;
    let event_id = event["id"].as_i64().unwrap();
    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/events/{event_id}"),
        &token,
        json!({ "capacity": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let uri = format!("/api/v1/public/events/{event_id}/register");
    let response = post_json(app.clone(), &uri, body("jean@example.com")).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(app.clone(), &uri, body("paul@example.com")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["error"], "Event is full");

    let response = post_json(
        app,
        &uri,
        json!({ "prenom": "", "nom": "X", "email": "x@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
