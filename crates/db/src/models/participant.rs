//! Participant model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use evently_core::types::{DbId, Timestamp};

/// A row from the `participants` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Participant {
    pub id: DbId,
    pub event_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: String,
    pub qr_token: String,
    pub checked_in_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a participant. French field names from registration
/// forms are accepted as aliases.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateParticipant {
    #[serde(alias = "prenom")]
    pub first_name: String,
    #[serde(alias = "nom")]
    pub last_name: String,
    pub email: String,
    #[serde(default, alias = "telephone")]
    pub phone: Option<String>,
    #[serde(default, alias = "entreprise")]
    pub company: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Input for updating a participant (all fields optional).
#[derive(Debug, Deserialize)]
pub struct UpdateParticipant {
    #[serde(alias = "prenom")]
    pub first_name: Option<String>,
    #[serde(alias = "nom")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub status: Option<String>,
}
