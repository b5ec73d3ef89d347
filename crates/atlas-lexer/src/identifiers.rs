//! Variable declarations and flat name lists.

use atlas_core::{CodeBlock, ScopeKind};
use regex::Regex;

use crate::patterns::Patterns;
use crate::scope::resolve_scope;

/// A variable declaration with its resolved scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedVariable {
    /// Declared name.
    pub name: String,
    /// Byte offset of the declaring keyword.
    pub offset: usize,
    /// Innermost enclosing scope.
    pub scope: ScopeKind,
}

/// Collects `const`/`let`/`var` declarations and resolves each against `blocks`.
#[must_use]
pub fn extract_variables(patterns: &Patterns, text: &str, blocks: &[CodeBlock]) -> Vec<ScopedVariable> {
    patterns
        .variable
        .captures_iter(text)
        .filter_map(|caps| {
            let offset = caps.get(0)?.start();
            Some(ScopedVariable {
                name: caps.get(1)?.as_str().to_owned(),
                offset,
                scope: resolve_scope(blocks, offset),
            })
        })
        .collect()
}

fn names(pattern: &Regex, text: &str) -> Vec<String> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_owned()))
        .collect()
}

/// Names after every `function` keyword, with or without a body.
#[must_use]
pub fn function_names(patterns: &Patterns, text: &str) -> Vec<String> {
    names(&patterns.function_name, text)
}

/// Names after every `class` keyword.
#[must_use]
pub fn class_names(patterns: &Patterns, text: &str) -> Vec<String> {
    names(&patterns.class_name, text)
}

/// Names matched by the method heuristic.
#[must_use]
pub fn method_names(patterns: &Patterns, text: &str) -> Vec<String> {
    names(&patterns.method_block, text)
}
