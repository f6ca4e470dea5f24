//! Presentational page blocks: EventDetails, Session and ImageHero.
//!
//! Blocks read their settings from node props and their content from either
//! live event data or static mock data (editor preview). Event and session
//! records arrive as loosely-shaped JSON, so every displayed field is looked
//! up through a fallback chain of accepted names; a field that resolves to
//! nothing is simply not rendered.

pub mod event_details;
pub mod image_hero;
pub mod session;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use serde_json::{Map, Value};

pub use event_details::{EventDetailsProps, EventLayout};
pub use image_hero::{HeroAlign, ImageHeroProps};
pub use session::{SessionLayout, SessionProps};

// ---------------------------------------------------------------------------
// Field fallback chains
// ---------------------------------------------------------------------------

pub mod fields {
    pub const EVENT_NAME: &[&str] = &["title", "nom", "name"];
    pub const EVENT_DESCRIPTION: &[&str] = &["description", "desc"];
    pub const EVENT_START: &[&str] = &["date_debut", "start_date", "starts_at", "date"];
    pub const EVENT_END: &[&str] = &["date_fin", "end_date", "ends_at"];
    pub const EVENT_LOCATION: &[&str] = &["lieu", "location", "venue", "adresse"];
    pub const EVENT_CAPACITY: &[&str] = &["capacite", "capacity", "places"];
    pub const EVENT_ORGANIZER: &[&str] = &["organisateur", "organizer"];
    pub const EVENT_IMAGE: &[&str] = &["image_url", "logo_url", "image"];

    pub const SESSION_TITLE: &[&str] = &["title", "nom", "name"];
    pub const SESSION_DESCRIPTION: &[&str] = &["description", "desc"];
    pub const SESSION_DATE: &[&str] = &["date", "jour"];
    pub const SESSION_START: &[&str] = &["heure_debut", "start_time", "debut", "starts_at"];
    pub const SESSION_END: &[&str] = &["heure_fin", "end_time", "fin", "ends_at"];
    pub const SESSION_SPEAKER: &[&str] = &["intervenant", "speaker", "orateur"];
    pub const SESSION_ROOM: &[&str] = &["salle", "room", "lieu", "location"];
}

/// First non-empty string among `keys`. Numbers are accepted and stringified.
pub fn first_str(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// First integer among `keys`; numeric strings are accepted.
pub fn first_int(obj: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| match obj.get(*key) {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

// ---------------------------------------------------------------------------
// Date display
// ---------------------------------------------------------------------------

/// Format a stored date or timestamp for display (`dd/mm/yyyy[ HH:MM]`).
/// Unparseable input is shown as-is.
pub fn display_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d/%m/%Y %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return dt.format("%d/%m/%Y %H:%M").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.format("%d/%m/%Y %H:%M").to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%d/%m/%Y").to_string();
    }
    raw.to_string()
}

/// Format a stored time of day (`HH:MM[:SS]`) as `HH:MM`.
pub fn display_time(raw: &str) -> String {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|_| display_date(raw))
}

// ---------------------------------------------------------------------------
// URL hygiene
// ---------------------------------------------------------------------------

/// Accept only http(s) or site-relative URLs without characters that could
/// break out of an attribute or a CSS `url()`.
pub fn safe_url(raw: &str) -> Option<&str> {
    let url = raw.trim();
    if url.is_empty() {
        return None;
    }
    let scheme_ok = url.starts_with("https://")
        || url.starts_with("http://")
        || url.starts_with('/')
        || !url.contains(':');
    let chars_ok = !url
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '(' | ')' | '\\' | '<' | '>'));
    (scheme_ok && chars_ok).then_some(url)
}

// ---------------------------------------------------------------------------
// Prop reading
// ---------------------------------------------------------------------------

/// Lenient accessor over a node's props. A value of the wrong type counts as
/// absent so one bad prop never prevents a block from rendering.
pub struct PropReader<'a>(pub &'a Map<String, Value>);

impl<'a> PropReader<'a> {
    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) if s == "true" => true,
            Some(Value::String(s)) if s == "false" => false,
            _ => default,
        }
    }

    pub fn text(&self, key: &str) -> Option<&'a str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key) {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().trim_end_matches("px").parse().ok(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Data views
// ---------------------------------------------------------------------------

/// Display-ready event fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventView {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i64>,
    pub organizer: Option<String>,
    pub image_url: Option<String>,
}

impl EventView {
    /// Build from an arbitrary event object using the fallback chains.
    /// Non-objects yield an all-empty view.
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        Self {
            name: first_str(obj, fields::EVENT_NAME),
            description: first_str(obj, fields::EVENT_DESCRIPTION),
            start: first_str(obj, fields::EVENT_START).map(|d| display_date(&d)),
            end: first_str(obj, fields::EVENT_END).map(|d| display_date(&d)),
            location: first_str(obj, fields::EVENT_LOCATION),
            capacity: first_int(obj, fields::EVENT_CAPACITY),
            organizer: first_str(obj, fields::EVENT_ORGANIZER),
            image_url: first_str(obj, fields::EVENT_IMAGE),
        }
    }

    /// Static placeholder content shown in the editor when no event is bound.
    pub fn mock() -> Self {
        Self {
            name: Some("Conférence annuelle".to_string()),
            description: Some(
                "Une journée de rencontres, d'ateliers et de conférences.".to_string(),
            ),
            start: Some("15/06/2025 09:00".to_string()),
            end: Some("15/06/2025 18:00".to_string()),
            location: Some("Palais des Congrès, Paris".to_string()),
            capacity: Some(250),
            organizer: Some("Evently".to_string()),
            image_url: None,
        }
    }

    /// `start - end`, or whichever half exists.
    pub fn date_range(&self) -> Option<String> {
        match (&self.start, &self.end) {
            (Some(s), Some(e)) if s != e => Some(format!("{s} - {e}")),
            (Some(s), _) => Some(s.clone()),
            (None, Some(e)) => Some(e.clone()),
            (None, None) => None,
        }
    }
}

/// Display-ready session fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionView {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub speaker: Option<String>,
    pub room: Option<String>,
}

impl SessionView {
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        Self {
            title: first_str(obj, fields::SESSION_TITLE),
            description: first_str(obj, fields::SESSION_DESCRIPTION),
            date: first_str(obj, fields::SESSION_DATE).map(|d| display_date(&d)),
            start: first_str(obj, fields::SESSION_START).map(|t| display_time(&t)),
            end: first_str(obj, fields::SESSION_END).map(|t| display_time(&t)),
            speaker: first_str(obj, fields::SESSION_SPEAKER),
            room: first_str(obj, fields::SESSION_ROOM),
        }
    }

    pub fn mock_list() -> Vec<Self> {
        vec![
            Self {
                title: Some("Accueil et ouverture".to_string()),
                description: Some("Mot de bienvenue des organisateurs.".to_string()),
                date: None,
                start: Some("09:00".to_string()),
                end: Some("09:30".to_string()),
                speaker: Some("Équipe organisatrice".to_string()),
                room: Some("Auditorium".to_string()),
            },
            Self {
                title: Some("Atelier pratique".to_string()),
                description: None,
                date: None,
                start: Some("10:00".to_string()),
                end: Some("12:00".to_string()),
                speaker: Some("Camille Martin".to_string()),
                room: Some("Salle B".to_string()),
            },
        ]
    }

    /// `start - end`, or whichever half exists.
    pub fn time_range(&self) -> Option<String> {
        match (&self.start, &self.end) {
            (Some(s), Some(e)) => Some(format!("{s} - {e}")),
            (Some(s), None) => Some(s.clone()),
            (None, Some(e)) => Some(e.clone()),
            (None, None) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_name_fallback_chain() {
        assert_eq!(
            EventView::from_json(&json!({"nom": "Gala"})).name.as_deref(),
            Some("Gala")
        );
        assert_eq!(
            EventView::from_json(&json!({"title": "", "name": "Fallback"})).name.as_deref(),
            Some("Fallback")
        );
        assert_eq!(
            EventView::from_json(&json!({"title": "First", "nom": "Second"})).name.as_deref(),
            Some("First")
        );
    }

    #[test]
    fn absent_fields_stay_none() {
        let view = EventView::from_json(&json!({"nom": "Gala"}));
        assert!(view.location.is_none());
        assert!(view.date_range().is_none());
        assert_eq!(EventView::from_json(&json!("not an object")), EventView::default());
    }

    #[test]
    fn capacity_accepts_numeric_strings() {
        assert_eq!(EventView::from_json(&json!({"capacite": "120"})).capacity, Some(120));
        assert_eq!(EventView::from_json(&json!({"capacity": 80})).capacity, Some(80));
        assert_eq!(EventView::from_json(&json!({"capacity": "lots"})).capacity, None);
    }

    #[test]
    fn dates_are_formatted() {
        assert_eq!(display_date("2025-03-12"), "12/03/2025");
        assert_eq!(display_date("2025-03-12T09:30:00Z"), "12/03/2025 09:30");
        assert_eq!(display_date("2025-03-12 09:30:00"), "12/03/2025 09:30");
        assert_eq!(display_date("next week"), "next week");
        assert_eq!(display_time("14:05:00"), "14:05");
    }

    #[test]
    fn session_fallbacks() {
        let view = SessionView::from_json(&json!({
            "nom": "Keynote",
            "speaker": "Ada",
            "lieu": "Hall",
            "heure_debut": "09:00:00",
            "heure_fin": "10:00:00"
        }));
        assert_eq!(view.title.as_deref(), Some("Keynote"));
        assert_eq!(view.speaker.as_deref(), Some("Ada"));
        assert_eq!(view.room.as_deref(), Some("Hall"));
        assert_eq!(view.time_range().as_deref(), Some("09:00 - 10:00"));
    }

    #[test]
    fn url_hygiene() {
        assert_eq!(safe_url("https://cdn.example.com/a.png"), Some("https://cdn.example.com/a.png"));
        assert_eq!(safe_url("/uploads/a.png"), Some("/uploads/a.png"));
        assert_eq!(safe_url("inscription"), Some("inscription"));
        assert_eq!(safe_url("javascript:alert(1)"), None);
        assert_eq!(safe_url("https://x.com/a.png');color:red"), None);
        assert_eq!(safe_url("   "), None);
    }

    #[test]
    fn prop_reader_is_lenient() {
        let props = json!({"showTitle": false, "height": "320px", "title": "  ", "flag": "true"});
        let reader = PropReader(props.as_object().unwrap());
        assert!(!reader.flag("showTitle", true));
        assert!(reader.flag("missing", true));
        assert!(reader.flag("flag", false));
        assert_eq!(reader.number("height"), Some(320.0));
        assert_eq!(reader.text("title"), None);
    }
}
