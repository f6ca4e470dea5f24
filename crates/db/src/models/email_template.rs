//! Organizer-editable email templates.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use evently_core::types::{DbId, Timestamp};

/// A row from the `email_templates` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EmailTemplate {
    pub id: DbId,
    pub event_id: DbId,
    pub kind: String,
    pub name: String,
    pub subject: String,
    pub body_html: String,
    pub is_default: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateEmailTemplate {
    pub kind: String,
    pub name: String,
    pub subject: String,
    pub body_html: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmailTemplate {
    pub kind: Option<String>,
    pub name: Option<String>,
    pub subject: Option<String>,
    pub body_html: Option<String>,
    pub is_default: Option<bool>,
}
