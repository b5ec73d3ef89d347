//! Normalization of block text before hashing.

use crate::patterns::Patterns;

/// Normalizes code so cosmetic differences hash equal.
///
/// Line comments are removed, single quotes become double quotes, whitespace
/// runs collapse to one space and the result is trimmed.
#[must_use]
pub fn normalize_code(patterns: &Patterns, text: &str) -> String {
    let without_comments = patterns.line_comment.replace_all(text, "");
    let quotes = patterns.quote.replace_all(&without_comments, "\"");
    let collapsed = patterns.whitespace.replace_all(&quotes, " ");
    collapsed.trim().to_owned()
}

/// Keeps at most `limit` characters.
#[must_use]
pub fn truncate_chars(mut text: String, limit: usize) -> String {
    if let Some((index, _)) = text.char_indices().nth(limit) {
        text.truncate(index);
    }
    text
}
