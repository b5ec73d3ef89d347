//! Pre-compiled extraction patterns.
//!
//! Identifiers use explicit ASCII classes (`[A-Za-z_$][A-Za-z0-9_$]*`) so that
//! matching does not depend on Unicode word tables.
//!
//! All patterns are compiled once into a shared [`Patterns`] value, see
//! [`patterns`]. The value is immutable and safe to use from any thread.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::LexError;

/// Named `function` declaration with a body.
pub const FUNCTION_BLOCK: &str = r"function\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*\([^)]*\)\s*\{";

/// Call signature at the start of a line followed by a brace.
///
/// Also matches `if (...) {`, `for (...) {` and object-literal methods.
pub const METHOD_BLOCK: &str = r"\n\s*([A-Za-z_$][A-Za-z0-9_$]*)\s*\([^;]*\)\s*\{";

/// Named `class` declaration, with an optional single `extends` clause.
pub const CLASS_BLOCK: &str =
    r"class\s+([A-Za-z_$][A-Za-z0-9_$]*)\s*(?:extends\s+[A-Za-z_$][A-Za-z0-9_$]*)?\s*\{";

/// `const`, `let` or `var` followed by a name.
pub const VARIABLE: &str = r"(?:const|let|var)\s+([A-Za-z_$][A-Za-z0-9_$]*)";

/// Function name for the flat summary list.
pub const FUNCTION_NAME: &str = r"function\s+([A-Za-z_$][A-Za-z0-9_$]*)";

/// Class name for the flat summary list.
pub const CLASS_NAME: &str = r"class\s+([A-Za-z_$][A-Za-z0-9_$]*)";

/// Static import target: `import x from "target"`, `import "target"`.
pub const STATIC_IMPORT: &str = r#"import[^'"`]*['"`]([^'"`]+)['"`]"#;

/// Synchronous `require("target")`.
pub const REQUIRE_CALL: &str = r#"require\(\s*['"`]([^'"`]+)['"`]\s*\)"#;

/// Dynamic `import("target")`.
pub const DYNAMIC_IMPORT: &str = r#"import\(\s*['"`]([^'"`]+)['"`]\s*\)"#;

/// Line comment up to the end of the line.
pub const LINE_COMMENT: &str = r"//[^\r\n]*";

/// Single or double quote.
pub const QUOTE: &str = r#"['"]"#;

/// Any whitespace run.
pub const WHITESPACE: &str = r"\s+";

/// The compiled pattern set.
#[derive(Debug)]
pub struct Patterns {
    /// See [`FUNCTION_BLOCK`].
    pub function_block: Regex,
    /// See [`METHOD_BLOCK`].
    pub method_block: Regex,
    /// See [`CLASS_BLOCK`].
    pub class_block: Regex,
    /// See [`VARIABLE`].
    pub variable: Regex,
    /// See [`FUNCTION_NAME`].
    pub function_name: Regex,
    /// See [`CLASS_NAME`].
    pub class_name: Regex,
    /// Reference patterns in the order their targets are collected.
    pub references: [Regex; 3],
    /// See [`LINE_COMMENT`].
    pub line_comment: Regex,
    /// See [`QUOTE`].
    pub quote: Regex,
    /// See [`WHITESPACE`].
    pub whitespace: Regex,
}

static COMPILED: OnceLock<Patterns> = OnceLock::new();

/// Returns the compiled pattern set.
///
/// Patterns are compiled on the first call and cached for all later calls.
///
/// # Errors
///
/// Returns [`LexError::PatternCompile`] if a pattern fails to compile.
pub fn patterns() -> Result<&'static Patterns, LexError> {
    if let Some(patterns) = COMPILED.get() {
        return Ok(patterns);
    }

    let compiled = Patterns {
        function_block: compile("function_block", FUNCTION_BLOCK)?,
        method_block: compile("method_block", METHOD_BLOCK)?,
        class_block: compile("class_block", CLASS_BLOCK)?,
        variable: compile("variable", VARIABLE)?,
        function_name: compile("function_name", FUNCTION_NAME)?,
        class_name: compile("class_name", CLASS_NAME)?,
        references: [
            compile("static_import", STATIC_IMPORT)?,
            compile("require_call", REQUIRE_CALL)?,
            compile("dynamic_import", DYNAMIC_IMPORT)?,
        ],
        line_comment: compile("line_comment", LINE_COMMENT)?,
        quote: compile("quote", QUOTE)?,
        whitespace: compile("whitespace", WHITESPACE)?,
    };

    Ok(COMPILED.get_or_init(|| compiled))
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex, LexError> {
    Regex::new(pattern).map_err(|source| LexError::PatternCompile { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        let result = patterns();
        assert!(result.is_ok(), "patterns should compile: {result:?}");
    }

    #[test]
    fn test_identifier_is_ascii_only() {
        let p = patterns().unwrap();
        let caps = p.function_name.captures("function caf\u{e9}()").unwrap();
        assert_eq!(&caps[1], "caf");
    }

    #[test]
    fn test_variable_has_no_word_boundary() {
        let p = patterns().unwrap();
        let names: Vec<_> = p
            .variable
            .captures_iter("unlet total = 1; constant = 2; let x;")
            .map(|c| c[1].to_owned())
            .collect();
        assert_eq!(names, vec!["total", "x"]);
    }
}
