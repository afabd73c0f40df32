//! Shared helpers for column access and output naming.

use polars::prelude::*;
use std::collections::HashSet;

// =============================================================================
// Column Utilities
// =============================================================================

/// Read a column as optional strings, whatever its inferred dtype.
///
/// Numeric product ids or review texts that polars inferred as numbers are
/// cast back to their string form; nulls stay `None`.
pub fn column_as_strings(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let values = series.str()?;

    Ok(values
        .into_iter()
        .map(|opt_val| opt_val.map(str::to_string))
        .collect())
}

/// Names of all columns in the frame, as owned strings.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

// =============================================================================
// Naming Utilities
// =============================================================================

/// Longest file stem produced by [`sanitize_file_stem`].
pub const MAX_FILE_STEM_CHARS: usize = 80;

/// Turn an arbitrary product name into a safe file-name fragment.
///
/// Keeps ASCII letters, digits, `-` and `_`; every other run of characters
/// becomes a single `_`. The result is trimmed of `_`, capped at
/// [`MAX_FILE_STEM_CHARS`] and never empty.
///
/// ```rust,ignore
/// assert_eq!(sanitize_file_stem("Mi 10/Pro (Blue)"), "Mi_10_Pro_Blue");
/// ```
pub fn sanitize_file_stem(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            if pending_separator && !stem.is_empty() {
                stem.push('_');
            }
            pending_separator = false;
            stem.push(c);
        } else {
            pending_separator = true;
        }
    }

    // Only ASCII is pushed, so byte truncation is safe.
    stem.truncate(MAX_FILE_STEM_CHARS);
    let stem = stem.trim_matches('_');

    if stem.is_empty() {
        "product".to_string()
    } else {
        stem.to_string()
    }
}

/// Return `stem`, or `stem_2`, `stem_3`, ... if it was already handed out.
pub fn unique_file_stem(used: &mut HashSet<String>, stem: String) -> String {
    if used.insert(stem.clone()) {
        return stem;
    }

    let mut n = 2;
    loop {
        let candidate = format!("{stem}_{n}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Truncate a label to `max_chars` characters with an ellipsis.
pub fn truncate_label(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_as_strings_casts_numbers() {
        let df = df!(
            "id" => [Some(101i64), None, Some(7)],
            "text" => ["a", "b", "c"]
        )
        .unwrap();

        let ids = column_as_strings(&df, "id").unwrap();
        assert_eq!(ids, vec![Some("101".to_string()), None, Some("7".to_string())]);
    }

    #[test]
    fn test_column_as_strings_missing_column() {
        let df = df!("text" => ["a"]).unwrap();
        assert!(column_as_strings(&df, "nope").is_err());
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("B001E4KFG0"), "B001E4KFG0");
        assert_eq!(sanitize_file_stem("Mi 10/Pro (Blue)"), "Mi_10_Pro_Blue");
        assert_eq!(sanitize_file_stem("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_file_stem("???"), "product");
        assert_eq!(sanitize_file_stem(""), "product");
    }

    #[test]
    fn test_sanitize_file_stem_caps_length() {
        let long = "x".repeat(300);
        assert_eq!(sanitize_file_stem(&long).len(), MAX_FILE_STEM_CHARS);
    }

    #[test]
    fn test_unique_file_stem() {
        let mut used = HashSet::new();
        assert_eq!(unique_file_stem(&mut used, "a_b".to_string()), "a_b");
        assert_eq!(unique_file_stem(&mut used, "a_b".to_string()), "a_b_2");
        assert_eq!(unique_file_stem(&mut used, "a_b".to_string()), "a_b_3");
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("a much longer name", 10), "a much ...");
        assert_eq!(truncate_label("ééééééé", 5), "éé...");
    }
}
