//! Error types for the atlas-scanner crate.
//!
//! This module provides the [`ScanError`] type for errors that can occur
//! while scanning a workspace.

use camino::Utf8PathBuf;

/// Errors that can occur during scanning operations.
///
/// # Error Recovery Strategy
///
/// - **Root errors** ([`ScanError::RootNotFound`], [`ScanError::NotADirectory`]):
///   fatal, returned to the caller
/// - **File errors** ([`ScanError::Read`], [`ScanError::Oversized`]): logged,
///   the file is skipped and the scan continues
/// - **Cancellation** ([`ScanError::Cancelled`]): the scan stops and no
///   partial report is produced
///
/// # Examples
///
/// ```
/// use atlas_scanner::ScanError;
///
/// fn handle_error(err: ScanError) {
///     match err {
///         ScanError::RootNotFound(path) => eprintln!("no such directory: {path}"),
///         ScanError::NotADirectory(path) => eprintln!("not a directory: {path}"),
///         ScanError::Cancelled => eprintln!("scan cancelled"),
///         other => eprintln!("scan failed: {other}"),
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The scan root does not exist.
    #[error("root directory not found: {0}")]
    RootNotFound(Utf8PathBuf),

    /// The scan root exists but is not a directory.
    #[error("root path is not a directory: {0}")]
    NotADirectory(Utf8PathBuf),

    /// Invalid scanner configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A path is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// The scan was cancelled before it completed.
    #[error("scan cancelled")]
    Cancelled,

    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    Read {
        /// The path of the file that couldn't be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file exceeds the configured size ceiling.
    #[error("file {path} is too large to scan ({size} bytes)")]
    Oversized {
        /// The path of the oversized file.
        path: Utf8PathBuf,
        /// File size in bytes.
        size: u64,
    },
}

impl ScanError {
    /// Creates a new [`ScanError::Read`] error.
    #[inline]
    pub fn read(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates a new [`ScanError::Config`] error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns `true` if this error is recoverable (scanning can continue).
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Oversized { .. })
    }

    /// Returns `true` if this error is fatal (scanning should stop).
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::RootNotFound(path)
            | Self::NotADirectory(path)
            | Self::Read { path, .. }
            | Self::Oversized { path, .. } => Some(path),
            Self::Config(_) | Self::NonUtf8Path(_) | Self::Cancelled => None,
        }
    }
}

impl From<atlas_core::ConfigError> for ScanError {
    fn from(err: atlas_core::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<atlas_lexer::LexError> for ScanError {
    fn from(err: atlas_lexer::LexError) -> Self {
        Self::Config(err.to_string())
    }
}
