//! Integration tests for organizers, events, participants and sessions.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_event, create_participant, delete_auth, get_auth, post_auth, post_json,
    post_json_auth, put_json_auth, register_organizer, TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn register_login_and_me(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_organizer(app.clone(), "Orga@Example.com").await;

    let response = post_json(
        app.clone(),
        "/api/v1/auth/login",
        json!({ "email": "orga@example.com", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let token = json["access_token"].as_str().unwrap().to_string();
    assert_eq!(json["user"]["email"], "orga@example.com");

    let me = body_json(get_auth(app, "/api/v1/auth/me", &token).await).await;
    assert_eq!(me["email"], "orga@example.com");
    assert!(me.get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_wrong_password_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_organizer(app.clone(), "orga@example.com").await;

    let response = post_json(
        app,
        "/api/v1/auth/login",
        json!({ "email": "orga@example.com", "password": "not-the-password" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_registration_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    register_organizer(app.clone(), "orga@example.com").await;

    let response = post_json(
        app,
        "/api/v1/auth/register",
        json!({ "email": "orga@example.com", "password": TEST_PASSWORD }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn event_crud_round_trip(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;

    let event = create_event(app.clone(), &token, "Gala", "draft").await;
    let id = event["id"].as_i64().unwrap();
    let code = event["access_code"].as_str().unwrap();
    assert_eq!(code.len(), 4);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    let list = body_json(get_auth(app.clone(), "/api/v1/events", &token).await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/v1/events/{id}"),
        &token,
        json!({ "name": "Gala 2030", "status": "published" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Gala 2030");
    assert_eq!(updated["status"], "published");

    let response = delete_auth(app.clone(), &format!("/api/v1/events/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/v1/events/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn event_validation(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/events",
        &token,
        json!({ "name": "  ", "starts_at": "2030-06-01T18:00:00Z" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app,
        "/api/v1/events",
        &token,
        json!({
            "name": "Backwards",
            "starts_at": "2030-06-01T18:00:00Z",
            "ends_at": "2030-06-01T08:00:00Z",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_organizers_events_are_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = register_organizer(app.clone(), "owner@example.com").await;
    let other = register_organizer(app.clone(), "other@example.com").await;

    let event = create_event(app.clone(), &owner, "Private", "draft").await;
    let id = event["id"].as_i64().unwrap();

    let response = get_auth(app.clone(), &format!("/api/v1/events/{id}"), &other).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.clone(), &format!("/api/v1/events/{id}"), &other).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let list = body_json(get_auth(app, "/api/v1/events", &other).await).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn regenerating_the_access_code_changes_it(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Gala", "draft").await;
    let id = event["id"].as_i64().unwrap();

    let response = post_auth(app, &format!("/api/v1/events/{id}/access-code"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["access_code"], event["access_code"]);
}

// ---------------------------------------------------------------------------
// Participants
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn participants_are_created_with_qr_tokens(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Gala", "draft").await;
    let event_id = event["id"].as_i64().unwrap();

    let participant = create_participant(app.clone(), &token, event_id, "Lea@Example.com").await;
    assert_eq!(participant["first_name"], "Léa");
    assert_eq!(participant["email"], "lea@example.com");
    assert_eq!(participant["qr_token"].as_str().unwrap().len(), 32);

    let id = participant["id"].as_i64().unwrap();
    let detail = body_json(get_auth(app.clone(), &format!("/api/v1/participants/{id}"), &token).await).await;
    let qr_url = detail["qr_url"].as_str().unwrap();
    assert!(qr_url.starts_with("https://evently.test/"));
    assert!(qr_url.ends_with(participant["qr_token"].as_str().unwrap()));
    assert!(detail["checkins"].as_array().unwrap().is_empty());

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/events/{event_id}/participants"),
        &token,
        json!({ "prenom": "Autre", "nom": "Personne", "email": "lea@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let list = body_json(
        get_auth(app, &format!("/api/v1/events/{event_id}/participants?limit=10"), &token).await,
    )
    .await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_participant_email_is_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Gala", "draft").await;
    let event_id = event["id"].as_i64().unwrap();

    let response = post_json_auth(
        app,
        &format!("/api/v1/events/{event_id}/participants"),
        &token,
        json!({ "prenom": "Léa", "nom": "Durand", "email": "not-an-email" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn session_enrollment_respects_capacity(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Gala", "draft").await;
    let event_id = event["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/events/{event_id}/sessions"),
        &token,
        json!({ "title": "Atelier", "capacity": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let session_id = body_json(response).await["id"].as_i64().unwrap();

    let first = create_participant(app.clone(), &token, event_id, "a@example.com").await;
    let second = create_participant(app.clone(), &token, event_id, "b@example.com").await;
    let first_id = first["id"].as_i64().unwrap();
    let second_id = second["id"].as_i64().unwrap();

    let enroll = |pid: i64| format!("/api/v1/sessions/{session_id}/participants/{pid}");

    let response = post_auth(app.clone(), &enroll(first_id), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Re-enrolling the same participant is allowed even when full.
    let response = post_auth(app.clone(), &enroll(first_id), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_auth(app.clone(), &enroll(second_id), &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let enrolled = body_json(
        get_auth(app.clone(), &format!("/api/v1/sessions/{session_id}/participants"), &token).await,
    )
    .await;
    assert_eq!(enrolled["data"].as_array().unwrap().len(), 1);

    let response = delete_auth(app.clone(), &enroll(first_id), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app, &enroll(first_id), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stats_count_participants_and_sessions(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Gala", "draft").await;
    let event_id = event["id"].as_i64().unwrap();

    create_participant(app.clone(), &token, event_id, "a@example.com").await;
    create_participant(app.clone(), &token, event_id, "b@example.com").await;
    post_json_auth(
        app.clone(),
        &format!("/api/v1/events/{event_id}/sessions"),
        &token,
        json!({ "title": "Keynote" }),
    )
    .await;

    let stats = body_json(get_auth(app, &format!("/api/v1/events/{event_id}/stats"), &token).await).await;
    assert_eq!(stats["data"]["participants"], 2);
    assert_eq!(stats["data"]["sessions"], 1);
    assert_eq!(stats["data"]["checked_in"], 0);
    assert_eq!(stats["data"]["revenue_cents"], 0);
}
