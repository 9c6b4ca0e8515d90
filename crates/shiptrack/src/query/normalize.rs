//! Comparison keys for status and search text.

use std::sync::OnceLock;

use regex::Regex;

fn whitespace_runs() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Canonical comparison key for a status value.
///
/// Every whitespace run becomes a single `-`, then the result is lower-cased,
/// so `"In Transit"`, `"In-Transit"` and `"in   transit"` all give
/// `"in-transit"`. An absent status gives the empty string.
#[must_use]
pub fn normalize_status(status: Option<&str>) -> String {
    match status {
        Some(raw) => whitespace_runs().replace_all(raw, "-").to_lowercase(),
        None => String::new(),
    }
}

/// Canonical comparison key for search text: lower-case only.
#[must_use]
pub fn normalize_search(text: &str) -> String {
    text.to_lowercase()
}
