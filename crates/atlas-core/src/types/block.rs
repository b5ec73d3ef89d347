//! Code blocks and identifier details.

use serde::{Deserialize, Serialize};

use super::scope::BlockKind;
use super::span::ByteSpan;
use crate::hash::ContentDigest;

/// A lexically delimited function, method, or class body.
///
/// Blocks only live for the duration of a single file's extraction; what
/// survives into the report is the [`IdentifierDetail`] derived from each one.
///
/// # Examples
///
/// ```
/// use atlas_core::{BlockKind, ByteSpan, CodeBlock};
///
/// let block = CodeBlock {
///     name: "add".to_owned(),
///     kind: BlockKind::Function,
///     normalized: "function add(a,b){return a+b;}".to_owned(),
///     span: ByteSpan::new(0, 29),
/// };
/// assert_eq!(block.digest(), block.clone().digest());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// The declared name.
    pub name: String,

    /// Which pattern produced the block.
    pub kind: BlockKind,

    /// Normalized, length-bounded block text.
    pub normalized: String,

    /// Location of the block in the original text.
    pub span: ByteSpan,
}

impl CodeBlock {
    /// Digest of the normalized text.
    #[must_use]
    pub fn digest(&self) -> ContentDigest {
        ContentDigest::of(self.normalized.as_bytes())
    }

    /// Converts the block into the record used for cross-project matching.
    #[must_use]
    pub fn into_detail(self, file: &str) -> IdentifierDetail {
        let content_hash = self.digest();
        IdentifierDetail {
            name: self.name,
            kind: self.kind,
            file: file.to_owned(),
            content_hash,
        }
    }
}

/// One extracted code block, reduced to what shared-identifier detection needs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierDetail {
    /// The declared name.
    pub name: String,

    /// Block kind.
    pub kind: BlockKind,

    /// Path of the declaring file, relative to its project root.
    pub file: String,

    /// Digest of the normalized block text.
    pub content_hash: ContentDigest,
}

impl IdentifierDetail {
    /// Grouping key `kind:name`.
    #[must_use]
    pub fn key(&self) -> (BlockKind, &str) {
        (self.kind, self.name.as_str())
    }
}
