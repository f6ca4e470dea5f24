//! Tests for `AppError` to HTTP response mapping.
//!
//! These call `IntoResponse` directly; no server or database is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use evently_api::error::AppError;
use evently_core::checkout::CartError;
use evently_core::error::CoreError;
use evently_core::page_tree::TreeError;
use evently_core::render::RenderError;
use evently_notify::EmailError;
use http_body_util::BodyExt;

async fn to_json(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    to_json(err.into_response()).await
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Event",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Event with id 42 not found");
}

#[tokio::test]
async fn not_found_by_key_returns_404() {
    let err = AppError::Core(CoreError::NotFoundByKey {
        entity: "Page",
        key: "gala/inscription".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Page 'gala/inscription' not found");
}

#[tokio::test]
async fn validation_and_conflict_codes() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Validation("bad slug".into()))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "bad slug");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Conflict("Event is full".into()))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn cart_errors_map_to_conflict_or_validation() {
    let sold_out: CoreError = CartError::QuotaExceeded {
        ticket: "VIP".into(),
        remaining: 1,
    }
    .into();
    let (status, _) = error_to_response(sold_out.into()).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let below: CoreError = CartError::BelowMinimum {
        ticket: "Groupe".into(),
        minimum: 4,
    }
    .into();
    let (status, json) = error_to_response(below.into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "'Groupe' must be bought by at least 4");
}

#[tokio::test]
async fn invalid_trees_are_client_errors() {
    let err = AppError::Render(RenderError::Tree(TreeError::MissingRoot("ROOT".into())));
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Root node 'ROOT' does not exist");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let err = AppError::InternalError("connection string leaked".into());
    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unconfigured_email_is_unavailable() {
    let (status, json) = error_to_response(AppError::Email(EmailError::NotConfigured)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["code"], "EMAIL_NOT_CONFIGURED");
}

#[tokio::test]
async fn relay_body_carries_provider_message_verbatim() {
    let err = AppError::Email(EmailError::Provider {
        status: 400,
        message: "Sender not validated".into(),
    });

    let (status, json) = to_json(err.into_relay_response()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Sender not validated");
}
