//! Authorized sender addresses and domains.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use evently_core::types::{DbId, Timestamp};

/// An exact address an organizer may send relay mail from.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Sender {
    pub id: DbId,
    pub owner_id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateSender {
    pub email: String,
    pub name: Option<String>,
}

/// Any address `@domain` is an accepted sender for the owner.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AuthorizedDomain {
    pub id: DbId,
    pub owner_id: DbId,
    pub domain: String,
    pub verified: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateAuthorizedDomain {
    pub domain: String,
}
