//! Text normalization and placeholder classification.
//!
//! The upstream catalog frequently encodes "no data" as literal strings
//! ("N/A", runs of dashes, "Add a Plot »") instead of nulls. Everything here
//! operates on already-fetched strings; no I/O.

/// Collapses internal whitespace runs to single spaces and trims the ends.
pub fn normalize(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns true when normalized text is a known "looks like content, means
/// nothing" marker. The empty string is NOT a placeholder: absent and
/// placeholder are distinct conditions with different fallback messaging.
pub fn is_placeholder(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    if text.chars().all(|c| c == '|') {
        return true;
    }
    if text.chars().all(|c| c == '-') {
        return true;
    }
    if text.chars().all(|c| c == '\u{2014}') {
        return true;
    }
    let lower = text.to_lowercase();
    if lower.starts_with("add a plot") {
        return true;
    }
    if lower == "n/a" || lower == "na" {
        return true;
    }
    lower == "unknown"
}

/// Shortens `text` to at most `max` characters, cutting on the last word
/// boundary and appending an ellipsis. Used for the best-film blurb.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    let head = match cut.rfind(' ') {
        Some(i) if i > 0 => &cut[..i],
        _ => cut.as_str(),
    };
    format!("{head}\u{2026}")
}
