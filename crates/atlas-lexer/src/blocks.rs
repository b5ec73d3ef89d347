//! Block extraction pass.

use atlas_core::{BlockKind, CodeBlock};
use regex::Regex;

use crate::braces::block_span;
use crate::normalize::{normalize_code, truncate_chars};
use crate::patterns::Patterns;

const fn pattern_for(patterns: &Patterns, kind: BlockKind) -> &Regex {
    match kind {
        BlockKind::Function => &patterns.function_block,
        BlockKind::Method => &patterns.method_block,
        BlockKind::Class => &patterns.class_block,
    }
}

/// Finds every function, method and class block in `text`.
///
/// Blocks are returned grouped by kind (functions, then methods, then
/// classes) and in source order within each kind. The normalized text of
/// each block keeps at most `text_limit` characters.
#[must_use]
pub fn extract_code_blocks(patterns: &Patterns, text: &str, text_limit: usize) -> Vec<CodeBlock> {
    let mut blocks = Vec::new();

    for kind in BlockKind::ALL {
        for caps in pattern_for(patterns, kind).captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(span) = block_span(text, whole.start()) else {
                continue;
            };
            let Some(body) = text.get(span.start..=span.end) else {
                continue;
            };

            blocks.push(CodeBlock {
                name: name.as_str().to_owned(),
                kind,
                normalized: truncate_chars(normalize_code(patterns, body), text_limit),
                span,
            });
        }
    }

    blocks
}

#[cfg(test)]
mod tests {
    use atlas_core::ByteSpan;

    use super::*;
    use crate::patterns::patterns;

    fn blocks(text: &str) -> Vec<CodeBlock> {
        extract_code_blocks(patterns().unwrap(), text, 10_000)
    }

    #[test]
    fn test_function_block() {
        let text = "function add(a,b){return a+b;}";
        let found = blocks(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "add");
        assert_eq!(found[0].kind, BlockKind::Function);
        assert_eq!(found[0].span, ByteSpan::new(0, text.len() - 1));
        assert_eq!(found[0].normalized, text);
    }

    #[test]
    fn test_class_with_extends_and_method() {
        let text = "class Dog extends Animal {\n  bark() {\n    return 1;\n  }\n}";
        let found = blocks(text);

        let class = found.iter().find(|b| b.kind == BlockKind::Class).unwrap();
        assert_eq!(class.name, "Dog");
        assert_eq!(class.span, ByteSpan::new(0, text.len() - 1));

        let method = found.iter().find(|b| b.kind == BlockKind::Method).unwrap();
        assert_eq!(method.name, "bark");
        // The method match starts at the newline before its name.
        assert_eq!(method.span.start, text.find("\n  bark").unwrap());
        assert_eq!(&text[method.span.end..=method.span.end], "}");
        assert_eq!(method.normalized, "bark() { return 1; }");
    }

    #[test]
    fn test_control_flow_matches_method_pattern() {
        let text = "function run() {\n  if (ready) {\n    go();\n  }\n}";
        let names: Vec<_> = blocks(text)
            .into_iter()
            .filter(|b| b.kind == BlockKind::Method)
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["if"]);
    }

    #[test]
    fn test_block_text_is_truncated() {
        let text = "function long() { return 1234567890; }";
        let found = extract_code_blocks(patterns().unwrap(), text, 8);
        assert_eq!(found[0].normalized, "function");
    }

    #[test]
    fn test_unbalanced_block_ends_at_open_brace() {
        let text = "function broken() { if (x) {";
        let found = blocks(text);
        let function = found.iter().find(|b| b.kind == BlockKind::Function).unwrap();
        assert_eq!(function.span.end, text.find('{').unwrap());
        assert_eq!(function.normalized, "function broken() {");
    }
}
