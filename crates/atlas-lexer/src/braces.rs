//! Depth-counting brace matcher.
//!
//! Every `{` and `}` byte counts, including those inside strings, comments
//! and regex literals. The matcher knows nothing about the patterns that
//! located the block starts, so it can be swapped for a real parser without
//! touching callers.

use atlas_core::ByteSpan;

/// Returns the offset of the `}` matching the `{` at `open`.
///
/// If the braces never balance, or `open` is not a `{`, returns `open`.
///
/// # Examples
///
/// ```
/// use atlas_lexer::find_block_end;
///
/// let text = "f() { if (x) { y(); } }";
/// assert_eq!(find_block_end(text, 4), text.len() - 1);
/// assert_eq!(find_block_end("{ {", 0), 0);
/// ```
#[must_use]
pub fn find_block_end(text: &str, open: usize) -> usize {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'{') {
        return open;
    }

    let mut depth: usize = 0;
    for (i, byte) in bytes.iter().enumerate().skip(open) {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
    }
    open
}

/// Returns the span of the block whose header starts at `start`.
///
/// The body opens at the first `{` at or after `start`. Returns `None` when
/// there is no such brace.
#[must_use]
pub fn block_span(text: &str, start: usize) -> Option<ByteSpan> {
    let open = start + text.get(start..)?.find('{')?;
    Some(ByteSpan::new(start, find_block_end(text, open)))
}

/// Maps each block start to its span, skipping starts with no opening brace.
#[must_use]
pub fn scope_spans(text: &str, starts: &[usize]) -> Vec<ByteSpan> {
    starts
        .iter()
        .filter_map(|&start| block_span(text, start))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_braces() {
        let text = "a{b{c}d}e";
        assert_eq!(find_block_end(text, 1), 7);
        assert_eq!(find_block_end(text, 3), 5);
    }

    #[test]
    fn test_unbalanced_returns_open() {
        assert_eq!(find_block_end("x { { }", 2), 2);
    }

    #[test]
    fn test_not_a_brace_returns_open() {
        assert_eq!(find_block_end("abc", 1), 1);
        assert_eq!(find_block_end("abc", 10), 10);
    }

    #[test]
    fn test_braces_in_strings_count() {
        // The brace inside the string literal closes the block early.
        let text = "f() { s = \"}\"; }";
        assert_eq!(find_block_end(text, 4), 11);
    }

    #[test]
    fn test_block_span_finds_first_brace() {
        let text = "function f(a) { return a; }";
        let span = block_span(text, 0).unwrap();
        assert_eq!(span, ByteSpan::new(0, text.len() - 1));
        assert!(block_span("no braces here", 0).is_none());
    }

    #[test]
    fn test_scope_spans_skips_missing() {
        let text = "x { } y";
        assert_eq!(scope_spans(text, &[0, 6]), vec![ByteSpan::new(0, 4)]);
    }

    #[test]
    fn test_multibyte_text() {
        let text = "é { ü }";
        let open = text.find('{').unwrap();
        assert_eq!(find_block_end(text, open), text.len() - 1);
    }
}
