//! Lexical extraction of code facts from raw source text.
//!
//! This crate approximates source structure without a grammar. Each file is
//! run through independent passes over the same immutable text:
//!
//! - **Blocks**: `function`, method-like and `class` headers, delimited by
//!   brace-depth matching ([`find_block_end`]) and normalized for hashing
//! - **Variables**: `const`/`let`/`var` declarations, each resolved to the
//!   innermost enclosing block ([`resolve_scope`])
//! - **Flat lists**: function, class and method names without scope
//! - **References**: string targets of `import`, `import()` and `require()`
//!
//! # Overview
//!
//! ```
//! use atlas_core::ScopeKind;
//! use atlas_lexer::Lexer;
//!
//! let lexer = Lexer::new(10_000)?;
//! let source = r#"
//! import { helper } from "../shared/util";
//! const version = 1;
//! function add(a, b) {
//!   let total = a + b;
//!   return total;
//! }
//! "#;
//!
//! let result = lexer.extract(source);
//! assert_eq!(result.functions, vec!["add"]);
//! assert_eq!(result.references.as_slice(), ["../shared/util"]);
//! assert_eq!(result.variables[1].scope, ScopeKind::Function);
//! # Ok::<(), atlas_lexer::LexError>(())
//! ```
//!
//! # Limitations
//!
//! Braces inside strings, comments and regex literals are counted like any
//! other brace. The method pattern matches any `name(...) {` that starts a
//! line, so `if`, `for` and object-literal methods are reported as methods.
//!
//! # Thread Safety
//!
//! [`Lexer`] is `Copy`, `Send` and `Sync`. The compiled patterns are shared
//! globally, so one lexer can be used from every rayon worker.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod blocks;
mod braces;
pub mod error;
mod identifiers;
mod normalize;
pub mod patterns;
mod references;
mod scope;

use atlas_core::CodeBlock;

pub use blocks::extract_code_blocks;
pub use braces::{block_span, find_block_end, scope_spans};
pub use error::LexError;
pub use identifiers::{
    ScopedVariable, class_names, extract_variables, function_names, method_names,
};
pub use normalize::{normalize_code, truncate_chars};
pub use patterns::{Patterns, patterns};
pub use references::{References, extract_reference_targets};
pub use scope::resolve_scope;

/// Everything extracted from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Function, method and class blocks.
    pub blocks: Vec<CodeBlock>,
    /// Variable declarations in source order, with scopes.
    pub variables: Vec<ScopedVariable>,
    /// Function names in source order.
    pub functions: Vec<String>,
    /// Class names in source order.
    pub classes: Vec<String>,
    /// Method names in source order.
    pub methods: Vec<String>,
    /// Deduplicated import/require targets.
    pub references: References,
}

impl Extraction {
    /// Variable names in source order, without scopes.
    #[must_use]
    pub fn variable_names(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }
}

/// Runs every extraction pass over a file's text.
#[derive(Debug, Clone, Copy)]
pub struct Lexer {
    patterns: &'static Patterns,
    block_text_limit: usize,
}

impl Lexer {
    /// Creates a lexer keeping at most `block_text_limit` characters of each
    /// normalized block.
    ///
    /// # Errors
    ///
    /// Returns [`LexError::PatternCompile`] if a built-in pattern fails to compile.
    pub fn new(block_text_limit: usize) -> Result<Self, LexError> {
        Ok(Self {
            patterns: patterns()?,
            block_text_limit,
        })
    }

    /// Extracts blocks, scoped variables, flat name lists and references.
    #[must_use]
    pub fn extract(&self, text: &str) -> Extraction {
        let blocks = extract_code_blocks(self.patterns, text, self.block_text_limit);
        let variables = extract_variables(self.patterns, text, &blocks);

        Extraction {
            variables,
            functions: function_names(self.patterns, text),
            classes: class_names(self.patterns, text),
            methods: method_names(self.patterns, text),
            references: extract_reference_targets(self.patterns, text),
            blocks,
        }
    }
}

#[cfg(test)]
mod tests {
    use atlas_core::{BlockKind, ScopeKind};

    use super::*;

    #[test]
    fn test_method_inside_class_inside_function() {
        let lexer = Lexer::new(10_000).unwrap();
        let text = "function factory() {\n  class Widget {\n    render() {\n      const label = 1;\n    }\n  }\n}\n";
        let result = lexer.extract(text);

        let label = result.variables.iter().find(|v| v.name == "label").unwrap();
        assert_eq!(label.scope, ScopeKind::Method);

        let kinds: Vec<_> = result.blocks.iter().map(|b| (b.kind, b.name.as_str())).collect();
        assert!(kinds.contains(&(BlockKind::Function, "factory")));
        assert!(kinds.contains(&(BlockKind::Class, "Widget")));
        assert!(kinds.contains(&(BlockKind::Method, "render")));
    }

    #[test]
    fn test_variable_in_class_body() {
        let lexer = Lexer::new(10_000).unwrap();
        let text = "class Store {\n  static x = (() => { var cache = 1; return cache; })\n}";
        let result = lexer.extract(text);
        let cache = result.variables.iter().find(|v| v.name == "cache").unwrap();
        assert_eq!(cache.scope, ScopeKind::Class);
    }

    #[test]
    fn test_empty_text() {
        let lexer = Lexer::new(10_000).unwrap();
        assert_eq!(lexer.extract(""), Extraction::default());
    }

    #[test]
    fn test_variable_names() {
        let lexer = Lexer::new(10_000).unwrap();
        let result = lexer.extract("let a = 1; var b = 2; let a = 3;");
        assert_eq!(result.variable_names(), vec!["a", "b", "a"]);
    }
}
