//! Error types for the atlas-lexer crate.

/// Errors that can occur while preparing the extractor.
///
/// Extraction itself never fails on input text; the only failure is a
/// pattern that does not compile.
///
/// # Examples
///
/// ```
/// use atlas_lexer::LexError;
///
/// fn handle_error(err: LexError) {
///     match err {
///         LexError::PatternCompile { name, .. } => eprintln!("bad pattern {name}"),
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum LexError {
    /// A built-in pattern failed to compile.
    #[error("failed to compile pattern '{name}': {source}")]
    PatternCompile {
        /// Name of the pattern.
        name: &'static str,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },
}
