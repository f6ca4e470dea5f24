//! URL slugs for builder sites and pages.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

pub const MAX_SLUG_LEN: usize = 80;

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

/// Derive a slug from a display name. Accented Latin letters are folded to
/// ASCII; everything else that is not alphanumeric becomes a separator.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars().flat_map(char::to_lowercase) {
        let mapped = fold(c);
        if mapped.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(mapped);
        } else {
            pending_dash = true;
        }
        if out.len() >= MAX_SLUG_LEN {
            break;
        }
    }
    out.truncate(MAX_SLUG_LEN);
    out.trim_end_matches('-').to_string()
}

/// `"{slugify(name)}-{suffix}"`, with the name part shortened so the whole
/// slug fits in [`MAX_SLUG_LEN`]. `suffix` must itself be a valid slug.
pub fn slug_with_suffix(name: &str, suffix: &str) -> String {
    let budget = MAX_SLUG_LEN.saturating_sub(suffix.len() + 1);
    let mut base = slugify(name);
    base.truncate(budget);
    let base = base.trim_end_matches('-');
    if base.is_empty() {
        suffix.to_string()
    } else {
        format!("{base}-{suffix}")
    }
}

fn fold(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN || !SLUG_RE.is_match(slug) {
        return Err(CoreError::Validation(format!(
            "Invalid slug '{slug}': use 1-{MAX_SLUG_LEN} lowercase letters, digits and single dashes"
        )));
    }
    Ok(())
}
