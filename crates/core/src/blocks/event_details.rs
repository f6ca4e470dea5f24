//! EventDetails block: the event's name, dates, venue and description.

use askama::Template;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{EventView, PropReader};

/// Visual arrangement of the EventDetails block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLayout {
    #[default]
    Card,
    Sidebar,
    Full,
}

impl EventLayout {
    /// Parse a layout name; anything unrecognised falls back to `card`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("sidebar") => Self::Sidebar,
            Some("full") => Self::Full,
            _ => Self::Card,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Sidebar => "sidebar",
            Self::Full => "full",
        }
    }
}

/// Settings edited in the block's settings panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDetailsProps {
    pub show_title: bool,
    pub show_date: bool,
    pub show_location: bool,
    pub show_description: bool,
    pub show_capacity: bool,
    pub layout: EventLayout,
}

impl Default for EventDetailsProps {
    fn default() -> Self {
        Self {
            show_title: true,
            show_date: true,
            show_location: true,
            show_description: true,
            show_capacity: false,
            layout: EventLayout::Card,
        }
    }
}

impl EventDetailsProps {
    pub fn from_props(props: &Map<String, Value>) -> Self {
        let r = PropReader(props);
        let d = Self::default();
        Self {
            show_title: r.flag("showTitle", d.show_title),
            show_date: r.flag("showDate", d.show_date),
            show_location: r.flag("showLocation", d.show_location),
            show_description: r.flag("showDescription", d.show_description),
            show_capacity: r.flag("showCapacity", d.show_capacity),
            layout: EventLayout::parse(r.text("layout")),
        }
    }
}

#[derive(Template)]
#[template(path = "blocks/event_details.html")]
struct EventDetailsHtml<'a> {
    layout: &'a str,
    title: Option<&'a str>,
    dates: Option<String>,
    location: Option<&'a str>,
    description: Option<&'a str>,
    capacity: Option<i64>,
}

/// Render the block. Toggled-off and missing fields are omitted.
pub fn render(props: &EventDetailsProps, event: &EventView) -> Result<String, askama::Error> {
    EventDetailsHtml {
        layout: props.layout.as_str(),
        title: event.name.as_deref().filter(|_| props.show_title),
        dates: event.date_range().filter(|_| props.show_date),
        location: event.location.as_deref().filter(|_| props.show_location),
        description: event
            .description
            .as_deref()
            .filter(|_| props.show_description),
        capacity: event.capacity.filter(|_| props.show_capacity),
    }
    .render()
}
