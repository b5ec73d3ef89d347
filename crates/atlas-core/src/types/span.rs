//! Byte ranges within a source file.

use serde::{Deserialize, Serialize};

/// An inclusive byte range `[start, end]` in the original file text.
///
/// `end` is the offset of the closing brace, or of the opening brace when
/// no matching close exists.
///
/// # Examples
///
/// ```
/// use atlas_core::ByteSpan;
///
/// let span = ByteSpan::new(4, 10);
/// assert!(span.contains(4));
/// assert!(span.contains(10));
/// assert!(!span.contains(11));
/// assert_eq!(span.width(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ByteSpan {
    /// Offset of the first byte of the match.
    pub start: usize,

    /// Offset of the closing brace (inclusive).
    pub end: usize,
}

impl ByteSpan {
    /// Creates a new span.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns `true` if `offset` lies within the span, both ends inclusive.
    #[inline]
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// `end - start`, used to break scope priority ties.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}
