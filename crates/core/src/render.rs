//! Server-side rendering of page trees to HTML.
//!
//! Public pages are served pre-rendered so they work without the editor
//! bundle. Every node is rendered through an askama template (auto-escaped);
//! a container's children are rendered first and injected as trusted HTML.

use std::sync::LazyLock;

use askama::Template;
use regex::Regex;
use serde_json::Value;

use crate::blocks::{self, EventDetailsProps, EventView, ImageHeroProps, PropReader, SessionProps, SessionView};
use crate::page_tree::{node_types, Node, Tree, TreeError};

/// Nesting deeper than this is not rendered.
pub const MAX_RENDER_DEPTH: usize = 64;

static COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#[0-9a-fA-F]{3,8}|[a-zA-Z]{3,20}|rgba?\([0-9., ]{5,40}\))$").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),

    #[error("Page nesting exceeds {MAX_RENDER_DEPTH} levels")]
    TooDeep,
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Live data available to blocks while rendering.
///
/// With no event bound (editor preview of an unattached page) the blocks
/// show mock content instead.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    pub event: Option<EventView>,
    pub sessions: Vec<SessionView>,
    /// Where the registration form posts to.
    pub registration_action: Option<String>,
}

impl RenderContext {
    pub fn preview() -> Self {
        Self::default()
    }

    pub fn live(event: EventView, sessions: Vec<SessionView>, registration_action: String) -> Self {
        Self {
            event: Some(event),
            sessions,
            registration_action: Some(registration_action),
        }
    }

    fn event_view(&self) -> EventView {
        self.event.clone().unwrap_or_else(EventView::mock)
    }

    fn session_views(&self) -> Vec<SessionView> {
        if self.event.is_some() {
            self.sessions.clone()
        } else {
            SessionView::mock_list()
        }
    }
}

// ---------------------------------------------------------------------------
// Node templates
// ---------------------------------------------------------------------------

#[derive(Template)]
#[template(path = "nodes/container.html")]
struct ContainerHtml<'a> {
    style: String,
    children: &'a str,
}

#[derive(Template)]
#[template(path = "nodes/text.html")]
struct TextHtml<'a> {
    text: &'a str,
    style: String,
}

#[derive(Template)]
#[template(path = "nodes/heading.html")]
struct HeadingHtml<'a> {
    level: u8,
    text: &'a str,
    style: String,
}

#[derive(Template)]
#[template(path = "nodes/button.html")]
struct ButtonHtml<'a> {
    text: &'a str,
    href: &'a str,
}

#[derive(Template)]
#[template(path = "nodes/image.html")]
struct ImageHtml<'a> {
    src: &'a str,
    alt: &'a str,
}

struct FormField {
    name: String,
    label: String,
    input_type: &'static str,
}

#[derive(Template)]
#[template(path = "nodes/registration_form.html")]
struct RegistrationFormHtml<'a> {
    event_id: &'a str,
    action: &'a str,
    fields: Vec<FormField>,
    submit_text: &'a str,
}

#[derive(Template)]
#[template(path = "page.html")]
struct PageHtml<'a> {
    title: &'a str,
    body: &'a str,
}

// ---------------------------------------------------------------------------
// Style helpers
// ---------------------------------------------------------------------------

fn safe_color(raw: &str) -> Option<&str> {
    COLOR_RE.is_match(raw).then_some(raw)
}

fn text_align(raw: Option<&str>) -> Option<&'static str> {
    match raw {
        Some("left") => Some("left"),
        Some("center") => Some("center"),
        Some("right") => Some("right"),
        Some("justify") => Some("justify"),
        _ => None,
    }
}

/// Build an inline style from the common visual props of a node.
fn style_for(node: &Node) -> String {
    let r = PropReader(&node.props);
    let mut parts = Vec::new();
    if let Some(bg) = r.text("background").and_then(safe_color) {
        parts.push(format!("background: {bg}"));
    }
    if let Some(color) = r.text("color").and_then(safe_color) {
        parts.push(format!("color: {color}"));
    }
    if let Some(padding) = r.number("padding").filter(|p| p.is_finite() && *p >= 0.0) {
        parts.push(format!("padding: {}px", padding.min(400.0).round()));
    }
    if let Some(size) = r.number("fontSize").filter(|s| s.is_finite() && *s > 0.0) {
        parts.push(format!("font-size: {}px", size.min(200.0).round()));
    }
    if let Some(align) = text_align(r.text("textAlign")) {
        parts.push(format!("text-align: {align}"));
    }
    parts.join("; ")
}

fn field_label(name: &str) -> (String, &'static str) {
    match name {
        "prenom" => ("Prénom".to_string(), "text"),
        "nom" => ("Nom".to_string(), "text"),
        "email" => ("Email".to_string(), "email"),
        "telephone" => ("Téléphone".to_string(), "tel"),
        "entreprise" => ("Entreprise".to_string(), "text"),
        other => (other.to_string(), "text"),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the tree's body HTML. The tree is validated first.
pub fn render_tree(tree: &Tree, ctx: &RenderContext) -> Result<String, RenderError> {
    tree.validate()?;
    match tree.root() {
        Some(root) => render_node(tree, root, ctx, 0),
        None => Ok(String::new()),
    }
}

/// Render a complete HTML document for a published page.
pub fn render_document(tree: &Tree, ctx: &RenderContext, title: &str) -> Result<String, RenderError> {
    let body = render_tree(tree, ctx)?;
    Ok(PageHtml { title, body: &body }.render()?)
}

fn render_children(tree: &Tree, node: &Node, ctx: &RenderContext, depth: usize) -> Result<String, RenderError> {
    let mut out = String::new();
    for child_id in &node.children {
        if let Some(child) = tree.node(child_id) {
            out.push_str(&render_node(tree, child, ctx, depth + 1)?);
        }
    }
    Ok(out)
}

fn render_node(tree: &Tree, node: &Node, ctx: &RenderContext, depth: usize) -> Result<String, RenderError> {
    if depth > MAX_RENDER_DEPTH {
        return Err(RenderError::TooDeep);
    }
    let r = PropReader(&node.props);

    let html = match node.node_type.as_str() {
        node_types::CONTAINER => {
            let children = render_children(tree, node, ctx, depth)?;
            ContainerHtml {
                style: style_for(node),
                children: &children,
            }
            .render()?
        }
        node_types::TEXT => TextHtml {
            text: r.text("text").unwrap_or_default(),
            style: style_for(node),
        }
        .render()?,
        node_types::HEADING => HeadingHtml {
            level: r.number("level").map(|l| l.clamp(1.0, 6.0) as u8).unwrap_or(2),
            text: r.text("text").unwrap_or_default(),
            style: style_for(node),
        }
        .render()?,
        node_types::BUTTON => match r.text("href").and_then(blocks::safe_url) {
            Some(href) => ButtonHtml {
                text: r.text("text").unwrap_or("En savoir plus"),
                href,
            }
            .render()?,
            None => String::new(),
        },
        node_types::IMAGE => match r.text("src").and_then(blocks::safe_url) {
            Some(src) => ImageHtml {
                src,
                alt: r.text("alt").unwrap_or_default(),
            }
            .render()?,
            None => String::new(),
        },
        node_types::REGISTRATION_FORM => {
            let fields = match node.props.get("fields") {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|name| {
                        let (label, input_type) = field_label(name);
                        FormField {
                            name: name.to_string(),
                            label,
                            input_type,
                        }
                    })
                    .collect(),
                _ => ["prenom", "nom", "email"]
                    .iter()
                    .map(|name| {
                        let (label, input_type) = field_label(name);
                        FormField {
                            name: name.to_string(),
                            label,
                            input_type,
                        }
                    })
                    .collect(),
            };
            RegistrationFormHtml {
                event_id: r.text("eventId").unwrap_or_default(),
                action: ctx.registration_action.as_deref().unwrap_or("#"),
                fields,
                submit_text: r.text("submitText").unwrap_or("S'inscrire"),
            }
            .render()?
        }
        node_types::EVENT_DETAILS => {
            blocks::event_details::render(&EventDetailsProps::from_props(&node.props), &ctx.event_view())?
        }
        node_types::SESSION => {
            blocks::session::render(&SessionProps::from_props(&node.props), &ctx.session_views())?
        }
        node_types::IMAGE_HERO => {
            blocks::image_hero::render(&ImageHeroProps::from_props(&node.props), &ctx.event_view())?
        }
        // Unknown components contribute only their children.
        _ => render_children(tree, node, ctx, depth)?,
    };
    Ok(html)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_template::{find_template, instantiate};
    use assert_matches::assert_matches;
    use serde_json::json;

    fn tree(value: Value) -> Tree {
        Tree::from_stored(&value).unwrap()
    }

    #[test]
    fn empty_tree_renders_nothing() {
        assert_eq!(render_tree(&Tree::empty(), &RenderContext::preview()).unwrap(), "");
    }

    #[test]
    fn children_render_in_order_and_text_is_escaped() {
        let t = tree(json!({
            "rootNodeId": "r",
            "nodes": {
                "r": {"id": "r", "type": "Container", "children": ["a", "b"], "props": {"padding": 16}},
                "a": {"id": "a", "type": "Text", "props": {"text": "first <b>"}},
                "b": {"id": "b", "type": "Heading", "props": {"text": "second", "level": 9}}
            }
        }));
        let html = render_tree(&t, &RenderContext::preview()).unwrap();
        assert!(html.find("first").unwrap() < html.find("second").unwrap());
        assert!(html.contains("first &lt;b&gt;"));
        assert!(html.contains("<h6"));
        assert!(html.contains("padding: 16px"));
    }

    #[test]
    fn unknown_types_render_children_only() {
        let t = tree(json!({
            "rootNodeId": "r",
            "nodes": {
                "r": {"id": "r", "type": "Mystery", "children": ["a"], "props": {}},
                "a": {"id": "a", "type": "Text", "props": {"text": "inside"}}
            }
        }));
        let html = render_tree(&t, &RenderContext::preview()).unwrap();
        assert!(html.contains("inside"));
        assert!(!html.contains("Mystery"));
    }

    #[test]
    fn invalid_tree_is_refused() {
        let t = tree(json!({
            "rootNodeId": "r",
            "nodes": {"r": {"id": "r", "type": "Container", "children": ["ghost"]}}
        }));
        assert_matches!(
            render_tree(&t, &RenderContext::preview()),
            Err(RenderError::Tree(TreeError::DanglingChild { .. }))
        );
    }

    #[test]
    fn unsafe_style_values_are_dropped() {
        let t = tree(json!({
            "rootNodeId": "r",
            "nodes": {"r": {"id": "r", "type": "Container", "props": {"background": "red; position: fixed"}}}
        }));
        let html = render_tree(&t, &RenderContext::preview()).unwrap();
        assert!(!html.contains("position"));
    }

    #[test]
    fn preview_uses_mock_data_and_live_uses_event() {
        let template = find_template("landing").unwrap().tree();
        let bound = instantiate(&template, "5");

        let preview = render_tree(&bound, &RenderContext::preview()).unwrap();
        assert!(preview.contains("Conférence annuelle"));

        let live = RenderContext::live(
            EventView::from_json(&json!({"nom": "Salon du livre", "lieu": "Lyon"})),
            vec![SessionView::from_json(&json!({"title": "Dédicaces"}))],
            "/api/v1/public/events/5/register".to_string(),
        );
        let html = render_tree(&bound, &live).unwrap();
        assert!(html.contains("Salon du livre"));
        assert!(html.contains("Dédicaces"));
        assert!(!html.contains("Conférence annuelle"));
    }

    #[test]
    fn registration_form_binds_event_and_fields() {
        let template = find_template("registration").unwrap().tree();
        let bound = instantiate(&template, "77");
        let ctx = RenderContext::live(
            EventView::default(),
            Vec::new(),
            "/api/v1/public/events/77/register".to_string(),
        );
        let html = render_tree(&bound, &ctx).unwrap();
        assert!(html.contains("data-event-id=\"77\""));
        assert!(html.contains("name=\"email\""));
        assert!(html.contains("type=\"email\""));
    }

    #[test]
    fn document_wraps_body() {
        let t = find_template("agenda").unwrap().tree();
        let html = render_document(&instantiate(&t, "1"), &RenderContext::preview(), "Programme").unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Programme</title>"));
    }

    #[test]
    fn excessive_nesting_is_rejected() {
        let mut nodes = serde_json::Map::new();
        for i in 0..=MAX_RENDER_DEPTH + 1 {
            let children = if i <= MAX_RENDER_DEPTH { json!([format!("n{}", i + 1)]) } else { json!([]) };
            nodes.insert(
                format!("n{i}"),
                json!({"id": format!("n{i}"), "type": "Container", "children": children}),
            );
        }
        let t = tree(json!({"rootNodeId": "n0", "nodes": nodes}));
        assert_matches!(render_tree(&t, &RenderContext::preview()), Err(RenderError::TooDeep));
    }
}
