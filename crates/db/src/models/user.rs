//! Organizer accounts.

use evently_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A `users` row. Holds the password hash, so it is never serialized;
/// handlers answer with [`OrganizerProfile`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn profile(&self) -> OrganizerProfile {
        OrganizerProfile {
            id: self.id,
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            is_active: self.is_active,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
        }
    }
}

/// What the dashboard sees of an organizer.
#[derive(Debug, Clone, Serialize)]
pub struct OrganizerProfile {
    pub id: DbId,
    pub email: String,
    pub display_name: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Sign-up input; `email` is normalized and `password_hash` already computed.
#[derive(Debug)]
pub struct NewOrganizer {
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
}
