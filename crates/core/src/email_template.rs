//! Organizer-editable email templates with `{{ variable }}` placeholders.
//!
//! Substituted values are HTML-escaped in bodies and inserted raw in
//! subjects. Unknown placeholders are left in place and reported so the
//! editor can flag typos.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use askama::Template;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid regex")
});

/// Variables every template can use.
pub const STANDARD_VARIABLES: &[&str] = &[
    "prenom", "nom", "email", "evenement", "date", "lieu", "qr_url", "lien",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Inscription,
    Invitation,
    Rappel,
}

impl TemplateKind {
    pub const ALL: &[TemplateKind] = &[Self::Inscription, Self::Invitation, Self::Rappel];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "inscription" => Some(Self::Inscription),
            "invitation" => Some(Self::Invitation),
            "rappel" => Some(Self::Rappel),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inscription => "inscription",
            Self::Invitation => "invitation",
            Self::Rappel => "rappel",
        }
    }
}

#[derive(Template)]
#[template(source = "{{ value }}", ext = "html")]
struct Escaped<'a> {
    value: &'a str,
}

/// HTML-escape a single value.
pub fn escape_html(value: &str) -> Result<String, askama::Error> {
    Escaped { value }.render()
}

/// Result of filling a subject/body pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    /// Placeholder names with no value, sorted and de-duplicated.
    pub unknown_variables: Vec<String>,
}

/// Replace placeholders in `text`. Returns the text and unknown names.
fn fill(
    text: &str,
    vars: &BTreeMap<String, String>,
    escape: bool,
    unknown: &mut Vec<String>,
) -> Result<String, askama::Error> {
    let mut failure = None;
    let out = VAR_RE.replace_all(text, |caps: &Captures| {
        let name = &caps[1];
        match vars.get(name) {
            Some(value) if escape => match escape_html(value) {
                Ok(escaped) => escaped,
                Err(e) => {
                    failure = Some(e);
                    String::new()
                }
            },
            Some(value) => value.clone(),
            None => {
                unknown.push(name.to_string());
                caps[0].to_string()
            }
        }
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(out.into_owned()),
    }
}

pub fn render(
    subject: &str,
    body_html: &str,
    vars: &BTreeMap<String, String>,
) -> Result<RenderedEmail, askama::Error> {
    let mut unknown = Vec::new();
    let subject = fill(subject, vars, false, &mut unknown)?;
    let html = fill(body_html, vars, true, &mut unknown)?;
    unknown.sort();
    unknown.dedup();
    Ok(RenderedEmail {
        subject,
        html,
        unknown_variables: unknown,
    })
}

/// Placeholder names used in a template, sorted and de-duplicated.
pub fn variables_in(text: &str) -> Vec<String> {
    let mut names: Vec<String> = VAR_RE
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Inputs for the standard variable set.
#[derive(Debug, Clone, Default)]
pub struct StandardVars<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub event_name: &'a str,
    pub event_date: Option<&'a str>,
    pub event_location: Option<&'a str>,
    pub qr_url: Option<&'a str>,
    pub link: Option<&'a str>,
}

impl StandardVars<'_> {
    /// Absent optional values become empty strings so the placeholder
    /// disappears instead of being reported as unknown.
    pub fn to_map(&self) -> BTreeMap<String, String> {
        let pairs = [
            ("prenom", self.first_name),
            ("nom", self.last_name),
            ("email", self.email),
            ("evenement", self.event_name),
            ("date", self.event_date.unwrap_or_default()),
            ("lieu", self.event_location.unwrap_or_default()),
            ("qr_url", self.qr_url.unwrap_or_default()),
            ("lien", self.link.unwrap_or_default()),
        ];
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> BTreeMap<String, String> {
        StandardVars {
            first_name: "Léa",
            last_name: "Durand",
            email: "lea@example.com",
            event_name: "Gala <2025>",
            ..Default::default()
        }
        .to_map()
    }

    #[test]
    fn whitespace_tolerant_substitution() {
        let out = render("Bonjour {{prenom}}", "<p>{{ prenom }} {{  nom }}</p>", &vars()).unwrap();
        assert_eq!(out.subject, "Bonjour Léa");
        assert_eq!(out.html, "<p>Léa Durand</p>");
        assert!(out.unknown_variables.is_empty());
    }

    #[test]
    fn body_values_are_escaped_subject_is_not() {
        let out = render("{{ evenement }}", "<h1>{{ evenement }}</h1>", &vars()).unwrap();
        assert_eq!(out.subject, "Gala <2025>");
        assert_eq!(out.html, "<h1>Gala &lt;2025&gt;</h1>");
    }

    #[test]
    fn unknown_variables_are_kept_and_reported() {
        let out = render("{{ code_promo }}", "{{ inconnu }} {{ inconnu }}", &vars()).unwrap();
        assert_eq!(out.subject, "{{ code_promo }}");
        assert_eq!(out.html, "{{ inconnu }} {{ inconnu }}");
        assert_eq!(out.unknown_variables, vec!["code_promo", "inconnu"]);
    }

    #[test]
    fn missing_optional_values_become_empty() {
        let out = render("", "Lieu: {{ lieu }}.", &vars()).unwrap();
        assert_eq!(out.html, "Lieu: .");
    }

    #[test]
    fn variable_listing() {
        assert_eq!(variables_in("{{ b }} {{a}} {{ b }} {{ not valid }}"), vec!["a", "b"]);
    }

    #[test]
    fn kinds() {
        for kind in TemplateKind::ALL {
            assert_eq!(TemplateKind::parse(kind.as_str()), Some(*kind));
        }
        assert_eq!(TemplateKind::parse("relance"), None);
    }
}
