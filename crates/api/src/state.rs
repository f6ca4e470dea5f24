use std::sync::Arc;

use evently_notify::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc` or already reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub pool: evently_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Outgoing email. The disabled mailer when no provider is configured.
    pub mailer: Arc<dyn Mailer>,
}
