//! Event model and DTOs.

use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use evently_core::blocks::EventView;
use evently_core::types::{DbId, Timestamp};

/// A row from the `events` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Event {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub image_url: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Option<Timestamp>,
    pub capacity: Option<i32>,
    pub status: String,
    pub access_code: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Event {
    /// Display view used by page blocks and email bodies.
    pub fn view(&self) -> EventView {
        EventView::from_json(&json!({
            "name": self.name,
            "description": self.description,
            "start_date": self.starts_at.to_rfc3339(),
            "end_date": self.ends_at.map(|e| e.to_rfc3339()),
            "location": self.location,
            "capacity": self.capacity,
            "organizer": self.organizer,
            "image_url": self.image_url,
        }))
    }
}

/// Public projection returned to scanners and registration pages.
#[derive(Debug, Clone, Serialize)]
pub struct PublicEvent {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Option<Timestamp>,
    pub status: String,
}

impl From<&Event> for PublicEvent {
    fn from(e: &Event) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            description: e.description.clone(),
            location: e.location.clone(),
            starts_at: e.starts_at,
            ends_at: e.ends_at,
            status: e.status.clone(),
        }
    }
}

/// Input for creating a new event.
#[derive(Debug, Deserialize)]
pub struct CreateEvent {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub image_url: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Option<Timestamp>,
    pub capacity: Option<i32>,
    pub status: Option<String>,
}

/// Input for updating an event (all fields optional).
#[derive(Debug, Deserialize)]
pub struct UpdateEvent {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub organizer: Option<String>,
    pub image_url: Option<String>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub capacity: Option<i32>,
    pub status: Option<String>,
}

/// Aggregate counters for the event dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EventStats {
    pub participants: i64,
    pub registered: i64,
    pub invited: i64,
    pub cancelled: i64,
    pub checked_in: i64,
    pub sessions: i64,
    pub confirmed_orders: i64,
    pub revenue_cents: i64,
}
