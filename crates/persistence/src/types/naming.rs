//! Type name rules.

use once_cell::sync::Lazy;
use regex::Regex;

static TYPE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_\-]*$").expect("type name pattern is valid")
});

/// Returns `true` if the string is usable as a type name.
pub fn is_valid_type_name(name: &str) -> bool {
    TYPE_NAME.is_match(name)
}

/// Derives the plural form of a singular type name.
///
/// ```
/// use strata_persistence::types::pluralize;
///
/// assert_eq!(pluralize("cat"), "cats");
/// assert_eq!(pluralize("category"), "categories");
/// assert_eq!(pluralize("box"), "boxes");
/// assert_eq!(pluralize("day"), "days");
/// ```
pub fn pluralize(singular: &str) -> String {
    if singular.is_empty() {
        return String::new();
    }
    let lower = singular.to_ascii_lowercase();
    if let Some(stem) = singular.strip_suffix(['y', 'Y']) {
        let before = stem.chars().last();
        if before.is_some_and(|c| !"aeiouAEIOU".contains(c)) {
            return format!("{stem}ies");
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        return format!("{singular}es");
    }
    format!("{singular}s")
}
