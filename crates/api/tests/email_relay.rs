//! Integration tests for the email relay, templates and sender checks.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{
    body_json, create_event, create_participant, post_json_auth, register_organizer,
    RecordingMailer,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn inscription_email_uses_builtin_layout(pool: PgPool) {
    let mailer = Arc::new(RecordingMailer::default());
    let app = common::build_test_app_with_mailer(pool, mailer.clone());
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Salon du livre", "published").await;
    let participant =
        create_participant(app.clone(), &token, event["id"].as_i64().unwrap(), "lea@example.com")
            .await;

    let response = post_json_auth(
        app,
        "/api/v1/send-inscription-email",
        &token,
        json!({ "participant_id": participant["id"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message_id"], "<test-1@evently.test>");

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to_email, "lea@example.com");
    assert_eq!(sent[0].to_name.as_deref(), Some("Léa Durand"));
    assert_eq!(sent[0].subject, "Confirmation d'inscription - Salon du livre");
    let qr_token = participant["qr_token"].as_str().unwrap();
    assert!(sent[0].html.contains(qr_token));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn disabled_mailer_answers_service_unavailable(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Forum", "published").await;
    let participant =
        create_participant(app.clone(), &token, event["id"].as_i64().unwrap(), "lea@example.com")
            .await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/send-inscription-email",
        &token,
        json!({ "participant_id": participant["id"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());

    let response = post_json_auth(
        app,
        "/api/v1/send-inscription-email",
        &token,
        json!({ "participant_id": 999999 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["success"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn event_template_overrides_builtin_email(pool: PgPool) {
    let mailer = Arc::new(RecordingMailer::default());
    let app = common::build_test_app_with_mailer(pool, mailer.clone());
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Forum", "published").await;
    let event_id = event["id"].as_i64().unwrap();
    let participant = create_participant(app.clone(), &token, event_id, "lea@example.com").await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/events/{event_id}/email-templates"),
        &token,
        json!({
            "kind": "inscription",
            "name": "Accueil",
            "subject": "Bienvenue {{ prenom }}",
            "body_html": "<p>{{ evenement }} à {{ lieu }} {{ oups }}</p>",
            "is_default": true,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let template_id = body_json(response).await["id"].as_i64().unwrap();

    let preview = body_json(
        post_json_auth(
            app.clone(),
            &format!("/api/v1/email-templates/{template_id}/preview"),
            &token,
            json!({ "participant_id": participant["id"] }),
        )
        .await,
    )
    .await;
    assert_eq!(preview["subject"], "Bienvenue Léa");
    assert_eq!(preview["unknown_variables"], json!(["oups"]));

    let response = post_json_auth(
        app,
        "/api/v1/send-inscription-email",
        &token,
        json!({ "participant_id": participant["id"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let sent = mailer.sent();
    assert_eq!(sent[0].subject, "Bienvenue Léa");
    assert_eq!(sent[0].html, "<p>Forum à Lyon {{ oups }}</p>");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invitation_batch_reports_each_recipient(pool: PgPool) {
    let mailer = Arc::new(RecordingMailer::rejecting(&["bad@example.com"]));
    let app = common::build_test_app_with_mailer(pool, mailer.clone());
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Forum", "published").await;
    let event_id = event["id"].as_i64().unwrap();
    let good = create_participant(app.clone(), &token, event_id, "good@example.com").await;
    let bad = create_participant(app.clone(), &token, event_id, "bad@example.com").await;

    let response = post_json_auth(
        app,
        "/api/v1/send-invitation-emails",
        &token,
        json!({
            "event_id": event_id,
            "participant_ids": [good["id"], bad["id"]],
            "message": "Venez nombreux",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["sent"], 1);
    assert_eq!(json["failed"], 1);
    assert_eq!(json["error"], "1 of 2 invitations failed");
    assert_eq!(json["results"][0]["success"], true);
    assert_eq!(json["results"][1]["error"], "Invalid recipient bad@example.com");

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Invitation - Forum");
    assert!(sent[0].html.contains("Venez nombreux"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invitation_batch_fails_when_every_send_fails(pool: PgPool) {
    let mailer = Arc::new(RecordingMailer::rejecting(&["bad@example.com"]));
    let app = common::build_test_app_with_mailer(pool, mailer);
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Forum", "published").await;
    let event_id = event["id"].as_i64().unwrap();
    let bad = create_participant(app.clone(), &token, event_id, "bad@example.com").await;

    let response = post_json_auth(
        app,
        "/api/v1/send-invitation-emails",
        &token,
        json!({ "event_id": event_id, "participant_ids": [bad["id"]] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Invalid recipient bad@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sender_must_use_an_authorized_domain(pool: PgPool) {
    let mailer = Arc::new(RecordingMailer::default());
    let app = common::build_test_app_with_mailer(pool, mailer.clone());
    let token = register_organizer(app.clone(), "orga@example.com").await;
    let event = create_event(app.clone(), &token, "Forum", "published").await;
    let participant =
        create_participant(app.clone(), &token, event["id"].as_i64().unwrap(), "lea@example.com")
            .await;
    let request = json!({
        "participant_id": participant["id"],
        "sender": { "email": "Billetterie@Salon.fr", "name": "Billetterie" },
    });

    let response =
        post_json_auth(app.clone(), "/api/v1/send-inscription-email", &token, request.clone())
            .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["success"], false);
    assert!(mailer.sent().is_empty());

    let response = post_json_auth(
        app.clone(),
        "/api/v1/sender-domains",
        &token,
        json!({ "domain": "@salon.fr" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["domain"], "salon.fr");

    let response =
        post_json_auth(app, "/api/v1/send-inscription-email", &token, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let sent = mailer.sent();
    let sender = sent[0].sender.as_ref().unwrap();
    assert_eq!(sender.email, "billetterie@salon.fr");
    assert_eq!(sender.name.as_deref(), Some("Billetterie"));
}
