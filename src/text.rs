//! Cleaning of raw OCR text into plate candidates.

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest line that can still be a plate number.
pub const MAX_CANDIDATE_LEN: usize = 8;

static LINE_BREAK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r\n|\r|\n").unwrap_or_else(|e| panic!("Failed to compile regex pattern: {}", e))
});

fn is_line_break(c: char) -> bool {
    c == '\r' || c == '\n'
}

/// Strips an OCR string down to upper case letters, digits and line breaks.
///
/// Line breaks are kept so the text can still be split into lines, but any
/// leading or trailing ones are dropped together with the surrounding whitespace.
/// Upper casing happens first, since it can expand a letter into marks that
/// are not letters themselves.
pub fn normalize(raw: &str) -> String {
    let kept: String = raw
        .to_uppercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || is_line_break(*c))
        .collect();
    kept.trim_matches(is_line_break).to_string()
}

/// Splits normalized text into lines and keeps the ones short enough to be a plate.
pub fn extract_candidates(normalized: &str, max_len: usize) -> Vec<String> {
    LINE_BREAK_REGEX
        .split(normalized)
        .filter(|line| !line.is_empty() && line.chars().count() <= max_len)
        .map(String::from)
        .collect()
}
