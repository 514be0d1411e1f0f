//! # Placeholder Extraction
//!
//! Template bodies mark substitution points with double braces, for example
//! `{{ ФИО_студента }}` or `{{name}}`. A variable name is made of Latin
//! letters, Cyrillic letters, digits and underscores; whitespace is allowed
//! between the braces and the name.
//!
//! Extraction is tolerant: anything between braces that does not match the
//! name pattern is ignored and stays in the body untouched. The renderer is
//! the strict side and reports such sequences as syntax errors.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Name pattern shared by extraction and rendering.
pub(crate) const NAME_PATTERN: &str = r"(?:[A-Za-z0-9_]|[\p{Cyrillic}&&\p{L}])+";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(r"\{{\{{\s*({NAME_PATTERN})\s*\}}\}}"))
            .expect("placeholder pattern is valid")
    })
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("^{NAME_PATTERN}$")).expect("name pattern is valid"))
}

/// Returns `true` when `name` could appear inside a placeholder.
pub fn is_variable_name(name: &str) -> bool {
    name_regex().is_match(name)
}

/// Collects the distinct variable names referenced by `text`.
///
/// Names are returned in order of first appearance, which is also the order
/// used when prompting for values.
///
/// # Arguments
/// * `text` - The template body.
///
/// # Returns
/// A vector without duplicates; empty when the body has no placeholders.
pub fn extract_variables(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    placeholder_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}
