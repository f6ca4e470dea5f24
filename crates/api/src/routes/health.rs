use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Whether the database answered a ping.
    pub db_healthy: bool,
    /// Name of the configured email provider, `disabled` when none is.
    pub mailer: &'static str,
}

/// `degraded` when the database does not answer; the process stays up.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = evently_db::health_check(&state.pool).await.is_ok();
    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        mailer: state.mailer.provider(),
    })
}

/// Served at the root, outside `/api/v1` and without auth.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
