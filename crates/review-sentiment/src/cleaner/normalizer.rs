//! Review text normalization.

use once_cell::sync::Lazy;
use regex::Regex;

// Compiled once at startup
static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"http\S+|www\S+|https\S+").expect("Invalid regex: url"));
static NON_ALPHA_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z\s]").expect("Invalid regex: non-alpha"));
static WHITESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex: whitespace"));

/// Normalize one review text.
///
/// Missing text becomes an empty string. Otherwise the text is lowercased,
/// URL-like tokens and every character outside `a-z`/whitespace are replaced
/// by a space, whitespace runs collapse to one space and the ends are trimmed.
/// Applying it twice gives the same result as applying it once.
pub fn normalize_text(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    let lowered = raw.to_lowercase();
    let without_urls = URL_PATTERN.replace_all(&lowered, " ");
    let letters_only = NON_ALPHA_PATTERN.replace_all(&without_urls, " ");
    let collapsed = WHITESPACE_PATTERN.replace_all(&letters_only, " ");
    collapsed.trim().to_string()
}

/// Normalize a whole text column.
pub fn normalize_column(values: &[Option<String>]) -> Vec<String> {
    values
        .iter()
        .map(|value| normalize_text(value.as_deref()))
        .collect()
}
