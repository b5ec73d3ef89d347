//! Scope resolution for declaration offsets.

use atlas_core::{CodeBlock, ScopeKind};

/// Resolves the scope of a declaration at `offset`.
///
/// Among all blocks whose span contains the offset, the one with the best
/// priority (method, then function, then class) wins; ties go to the
/// narrowest span. No containing block means [`ScopeKind::Global`].
///
/// # Examples
///
/// ```
/// use atlas_core::{BlockKind, ByteSpan, CodeBlock, ScopeKind};
/// use atlas_lexer::resolve_scope;
///
/// let class = CodeBlock {
///     name: "A".to_owned(),
///     kind: BlockKind::Class,
///     normalized: String::new(),
///     span: ByteSpan::new(0, 100),
/// };
/// assert_eq!(resolve_scope(&[class.clone()], 50), ScopeKind::Class);
/// assert_eq!(resolve_scope(&[class], 150), ScopeKind::Global);
/// ```
#[must_use]
pub fn resolve_scope(blocks: &[CodeBlock], offset: usize) -> ScopeKind {
    blocks
        .iter()
        .filter(|block| block.span.contains(offset))
        .min_by_key(|block| (block.kind.priority(), block.span.width()))
        .map_or(ScopeKind::Global, |block| block.kind.scope())
}
