//! Page templates and placeholder substitution.
//!
//! A template is an ordinary [`Tree`] whose node props contain placeholder
//! tokens such as `{{EVENT_ID}}`. Instantiating a template deep-clones the
//! tree and replaces every prop value that is *exactly* a known token; all
//! other values, including strings that merely contain a token, are left
//! untouched.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};

use crate::page_tree::{Node, Tree};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Placeholder name bound to the target event id.
pub const EVENT_ID_VAR: &str = "EVENT_ID";

/// The literal token substituted with the event id.
pub const EVENT_ID_TOKEN: &str = "{{EVENT_ID}}";

/// A prop value that is a whole placeholder token.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{\{([A-Z][A-Z0-9_]*)\}\}$").expect("valid regex"));

/// Page type written on pages produced from a template.
pub mod page_types {
    pub const LANDING: &str = "landing";
    pub const REGISTRATION: &str = "registration";
    pub const AGENDA: &str = "agenda";

    pub const ALL: &[&str] = &[LANDING, REGISTRATION, AGENDA];
}

// ---------------------------------------------------------------------------
// Substitution
// ---------------------------------------------------------------------------

/// Format a placeholder name as its token, e.g. `EVENT_ID` -> `{{EVENT_ID}}`.
pub fn token(name: &str) -> String {
    format!("{{{{{name}}}}}")
}

/// Return a copy of `template` with whole-token prop values replaced.
///
/// `vars` maps placeholder names (without braces) to replacement strings.
/// Nested objects and arrays inside props are searched too.
pub fn substitute(template: &Tree, vars: &HashMap<&str, String>) -> Tree {
    let mut tree = template.clone();
    for node in tree.nodes.values_mut() {
        for value in node.props.values_mut() {
            substitute_value(value, vars);
        }
    }
    tree
}

fn substitute_value(value: &mut Value, vars: &HashMap<&str, String>) {
    match value {
        Value::String(s) => {
            let replacement = TOKEN_RE
                .captures(s)
                .and_then(|caps| vars.get(&caps[1]))
                .cloned();
            if let Some(replacement) = replacement {
                *s = replacement;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(|v| substitute_value(v, vars)),
        Value::Object(map) => map.values_mut().for_each(|v| substitute_value(v, vars)),
        _ => {}
    }
}

/// Bind a template to an event.
pub fn instantiate(template: &Tree, event_id: &str) -> Tree {
    let vars = HashMap::from([(EVENT_ID_VAR, event_id.to_string())]);
    substitute(template, &vars)
}

/// Placeholder names still present as whole prop values, sorted and
/// de-duplicated. A tree is only fit to persist when this is empty.
pub fn unresolved_placeholders(tree: &Tree) -> Vec<String> {
    let mut names = Vec::new();
    for node in tree.nodes.values() {
        for value in node.props.values() {
            collect_tokens(value, &mut names);
        }
    }
    names.sort();
    names.dedup();
    names
}

fn collect_tokens(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => {
            if let Some(caps) = TOKEN_RE.captures(s) {
                out.push(caps[1].to_string());
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect_tokens(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_tokens(v, out)),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Built-in catalog
// ---------------------------------------------------------------------------

/// A canned page offered when creating a new page.
#[derive(Debug, Clone, Serialize)]
pub struct PageTemplate {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub page_type: &'static str,
}

/// All built-in templates.
pub const BUILTIN_TEMPLATES: &[PageTemplate] = &[
    PageTemplate {
        key: "registration",
        name: "Inscription",
        description: "Event summary followed by the registration form",
        page_type: page_types::REGISTRATION,
    },
    PageTemplate {
        key: "landing",
        name: "Landing page",
        description: "Hero banner, event details and the session programme",
        page_type: page_types::LANDING,
    },
    PageTemplate {
        key: "agenda",
        name: "Programme",
        description: "Session list for the event",
        page_type: page_types::AGENDA,
    },
];

/// Look up a built-in template by key.
pub fn find_template(key: &str) -> Option<&'static PageTemplate> {
    BUILTIN_TEMPLATES.iter().find(|t| t.key == key)
}

impl PageTemplate {
    /// The template's tree, still carrying its placeholder tokens.
    pub fn tree(&self) -> Tree {
        match self.key {
            "registration" => build(
                json!({"padding": 24, "background": "#ffffff"}),
                vec![
                    ("title", "Heading", json!({"text": "Inscription", "level": 1})),
                    (
                        "details",
                        "EventDetails",
                        json!({"eventId": EVENT_ID_TOKEN, "layout": "card"}),
                    ),
                    (
                        "form",
                        "RegistrationForm",
                        json!({
                            "eventId": EVENT_ID_TOKEN,
                            "submitText": "Je m'inscris",
                            "fields": ["prenom", "nom", "email"]
                        }),
                    ),
                ],
            ),
            "landing" => build(
                json!({"padding": 0, "background": "#ffffff"}),
                vec![
                    (
                        "hero",
                        "ImageHero",
                        json!({
                            "eventId": EVENT_ID_TOKEN,
                            "imageUrl": "",
                            "overlayOpacity": 0.4,
                            "align": "center",
                            "showCta": true,
                            "ctaText": "S'inscrire",
                            "ctaUrl": "inscription"
                        }),
                    ),
                    (
                        "details",
                        "EventDetails",
                        json!({"eventId": EVENT_ID_TOKEN, "layout": "full"}),
                    ),
                    (
                        "sessions",
                        "Session",
                        json!({"eventId": EVENT_ID_TOKEN, "layout": "grid"}),
                    ),
                ],
            ),
            _ => build(
                json!({"padding": 24}),
                vec![
                    ("title", "Heading", json!({"text": "Programme", "level": 1})),
                    (
                        "sessions",
                        "Session",
                        json!({"eventId": EVENT_ID_TOKEN, "layout": "list"}),
                    ),
                ],
            ),
        }
    }
}

/// Assemble a `ROOT` container with the given direct children.
fn build(root_props: Value, children: Vec<(&str, &str, Value)>) -> Tree {
    let mut root = Node::new("ROOT", "Container", as_map(root_props));
    let mut tree = Tree::empty();
    for (id, node_type, props) in children {
        root.children.push(id.to_string());
        let mut node = Node::new(id, node_type, as_map(props));
        node.parent = Some("ROOT".to_string());
        tree.nodes.insert(id.to_string(), node);
    }
    tree.root_node_id = root.id.clone();
    tree.nodes.insert(root.id.clone(), root);
    tree
}

fn as_map(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
