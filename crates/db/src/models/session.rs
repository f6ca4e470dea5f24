//! Event session (agenda slot) model and DTOs.

use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use evently_core::blocks::SessionView;
use evently_core::types::{DbId, Timestamp};

/// A row from the `sessions` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Session {
    pub id: DbId,
    pub event_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub speaker: Option<String>,
    pub room: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub capacity: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Session {
    pub fn view(&self) -> SessionView {
        SessionView::from_json(&json!({
            "title": self.title,
            "description": self.description,
            "date": self.starts_at.map(|s| s.format("%Y-%m-%d").to_string()),
            "start_time": self.starts_at.map(|s| s.format("%H:%M:%S").to_string()),
            "end_time": self.ends_at.map(|e| e.format("%H:%M:%S").to_string()),
            "speaker": self.speaker,
            "room": self.room,
        }))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSession {
    pub title: String,
    pub description: Option<String>,
    pub speaker: Option<String>,
    pub room: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub capacity: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSession {
    pub title: Option<String>,
    pub description: Option<String>,
    pub speaker: Option<String>,
    pub room: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub capacity: Option<i32>,
}

/// A row from the `session_participants` join table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SessionParticipant {
    pub id: DbId,
    pub session_id: DbId,
    pub participant_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
