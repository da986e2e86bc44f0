//! Field normalization applied once per cell before any comparison.
//!
//! Case is deliberately left alone: the linkage fields are names, phone
//! numbers, and CJK addresses, where letter case carries no signal.

/// Trim and collapse internal whitespace runs to a single space.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep ASCII digits only.
pub fn phone_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Keep ASCII digits and the redaction marker.
pub fn phone_digits_masked(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '*')
        .collect()
}

/// Remove all whitespace, internal included.
pub fn strip_whitespace(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Spreadsheet exports encode absent cells as empty strings or a literal
/// "nan" left over from numeric coercion upstream.
pub fn is_blank(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == "nan"
}
