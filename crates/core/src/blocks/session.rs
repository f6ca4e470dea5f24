//! Session block: the event programme.

use askama::Template;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{PropReader, SessionView};

/// Visual arrangement of the Session block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionLayout {
    #[default]
    Grid,
    List,
    Cards,
}

impl SessionLayout {
    /// Parse a layout name; anything unrecognised falls back to `grid`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("list") => Self::List,
            Some("cards") => Self::Cards,
            _ => Self::Grid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::List => "list",
            Self::Cards => "cards",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionProps {
    pub show_time: bool,
    pub show_speaker: bool,
    pub show_room: bool,
    pub show_description: bool,
    pub layout: SessionLayout,
    pub heading: Option<String>,
}

impl Default for SessionProps {
    fn default() -> Self {
        Self {
            show_time: true,
            show_speaker: true,
            show_room: true,
            show_description: true,
            layout: SessionLayout::Grid,
            heading: None,
        }
    }
}

impl SessionProps {
    pub fn from_props(props: &Map<String, Value>) -> Self {
        let r = PropReader(props);
        let d = Self::default();
        Self {
            show_time: r.flag("showTime", d.show_time),
            show_speaker: r.flag("showSpeaker", d.show_speaker),
            show_room: r.flag("showRoom", d.show_room),
            show_description: r.flag("showDescription", d.show_description),
            layout: SessionLayout::parse(r.text("layout")),
            heading: r.text("heading").map(str::to_string),
        }
    }
}

/// One session after the visibility toggles have been applied.
struct SessionRow<'a> {
    title: Option<&'a str>,
    when: Option<String>,
    speaker: Option<&'a str>,
    room: Option<&'a str>,
    description: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "blocks/session.html")]
struct SessionHtml<'a> {
    layout: &'a str,
    heading: Option<&'a str>,
    rows: Vec<SessionRow<'a>>,
}

fn when(session: &SessionView) -> Option<String> {
    match (&session.date, session.time_range()) {
        (Some(d), Some(t)) => Some(format!("{d} {t}")),
        (Some(d), None) => Some(d.clone()),
        (None, t) => t,
    }
}

pub fn render(props: &SessionProps, sessions: &[SessionView]) -> Result<String, askama::Error> {
    let rows = sessions
        .iter()
        .map(|s| SessionRow {
            title: s.title.as_deref(),
            when: when(s).filter(|_| props.show_time),
            speaker: s.speaker.as_deref().filter(|_| props.show_speaker),
            room: s.room.as_deref().filter(|_| props.show_room),
            description: s.description.as_deref().filter(|_| props.show_description),
        })
        .collect();

    SessionHtml {
        layout: props.layout.as_str(),
        heading: props.heading.as_deref(),
        rows,
    }
    .render()
}
