//! Block and scope kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a lexically delimited code block.
///
/// # Examples
///
/// ```
/// use atlas_core::{BlockKind, ScopeKind};
///
/// assert!(BlockKind::Method.priority() < BlockKind::Class.priority());
/// assert_eq!(BlockKind::Function.scope(), ScopeKind::Function);
/// assert_eq!(BlockKind::Class.as_str(), "class");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    /// A named `function` declaration.
    Function,

    /// A call signature followed by a brace on an indented line.
    Method,

    /// A named `class` declaration.
    Class,
}

impl BlockKind {
    /// All block kinds, in extraction order.
    pub const ALL: [Self; 3] = [Self::Function, Self::Method, Self::Class];

    /// Scope resolution priority. Lower wins.
    #[inline]
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Method => 0,
            Self::Function => 1,
            Self::Class => 2,
        }
    }

    /// The scope a variable gets when this block is its innermost container.
    #[inline]
    #[must_use]
    pub const fn scope(self) -> ScopeKind {
        match self {
            Self::Function => ScopeKind::Function,
            Self::Method => ScopeKind::Method,
            Self::Class => ScopeKind::Class,
        }
    }

    /// Returns the lowercase name used in reports and identifier keys.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
            Self::Class => "class",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The resolved scope of a variable declaration.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// Not inside any extracted block.
    #[default]
    Global,

    /// Innermost container is a class body.
    Class,

    /// Innermost container is a function body.
    Function,

    /// Innermost container is a method body.
    Method,
}

impl ScopeKind {
    /// Returns the lowercase name used in reports.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Class => "class",
            Self::Function => "function",
            Self::Method => "method",
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let mut kinds = BlockKind::ALL;
        kinds.sort_by_key(|k| k.priority());
        assert_eq!(kinds, [BlockKind::Method, BlockKind::Function, BlockKind::Class]);
    }

    #[test]
    fn test_scope_mapping() {
        assert_eq!(BlockKind::Method.scope(), ScopeKind::Method);
        assert_eq!(BlockKind::Class.scope(), ScopeKind::Class);
        assert_eq!(ScopeKind::default(), ScopeKind::Global);
    }

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&BlockKind::Method).unwrap(), "\"method\"");
        assert_eq!(serde_json::to_string(&ScopeKind::Global).unwrap(), "\"global\"");
        let kind: BlockKind = serde_json::from_str("\"class\"").unwrap();
        assert_eq!(kind, BlockKind::Class);
    }
}
