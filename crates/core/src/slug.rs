//! URL slug derivation for category names.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex is valid"));

static VALID_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("static regex is valid"));

/// Derive a slug from a display name: lowercase, runs of anything other
/// than ASCII letters and digits collapsed to `-`, no leading or trailing `-`.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Check an explicitly supplied slug.
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if VALID_SLUG.is_match(slug) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid slug '{slug}'. Use lowercase letters, digits and single hyphens"
        )))
    }
}
