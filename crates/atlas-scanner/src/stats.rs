//! Scan statistics with atomic counters.
//!
//! All counters use relaxed ordering; they are informational and are read
//! once the parallel phases have joined.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic counters updated by the parallel scan phases.
///
/// # Examples
///
/// ```
/// use atlas_scanner::ScanStats;
///
/// let stats = ScanStats::new();
/// stats.increment_files_seen();
/// stats.increment_files_parsed();
/// stats.add_blocks(3);
///
/// let snap = stats.snapshot();
/// assert_eq!(snap.files_seen, 1);
/// assert_eq!(snap.blocks_extracted, 3);
/// ```
#[derive(Debug, Default)]
pub struct ScanStats {
    projects: AtomicU64,
    files_seen: AtomicU64,
    files_parsed: AtomicU64,
    files_skipped: AtomicU64,
    files_hashed: AtomicU64,
    hash_failures: AtomicU64,
    blocks_extracted: AtomicU64,
}

impl ScanStats {
    /// Creates a new [`ScanStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the number of detected projects.
    #[inline]
    pub fn set_projects(&self, count: u64) {
        self.projects.store(count, Ordering::Relaxed);
    }

    /// A file was found under a project root.
    #[inline]
    pub fn increment_files_seen(&self) {
        self.files_seen.fetch_add(1, Ordering::Relaxed);
    }

    /// A file was read and run through the lexer.
    #[inline]
    pub fn increment_files_parsed(&self) {
        self.files_parsed.fetch_add(1, Ordering::Relaxed);
    }

    /// A file was skipped (ignored, oversized, binary, empty or unreadable).
    #[inline]
    pub fn increment_files_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// A file's content digest was computed.
    #[inline]
    pub fn increment_files_hashed(&self) {
        self.files_hashed.fetch_add(1, Ordering::Relaxed);
    }

    /// A file could not be hashed and was dropped from duplicate detection.
    #[inline]
    pub fn increment_hash_failures(&self) {
        self.hash_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds extracted code blocks.
    #[inline]
    pub fn add_blocks(&self, count: u64) {
        self.blocks_extracted.fetch_add(count, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of all counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            projects: self.projects.load(Ordering::Relaxed),
            files_seen: self.files_seen.load(Ordering::Relaxed),
            files_parsed: self.files_parsed.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            files_hashed: self.files_hashed.load(Ordering::Relaxed),
            hash_failures: self.hash_failures.load(Ordering::Relaxed),
            blocks_extracted: self.blocks_extracted.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`ScanStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Detected projects.
    pub projects: u64,
    /// Files found under project roots (a file under nested projects counts once per project).
    pub files_seen: u64,
    /// Files run through the lexer.
    pub files_parsed: u64,
    /// Files skipped before parsing.
    pub files_skipped: u64,
    /// Files fingerprinted for duplicate detection.
    pub files_hashed: u64,
    /// Files that failed to hash.
    pub hash_failures: u64,
    /// Code blocks extracted across all files.
    pub blocks_extracted: u64,
}

impl StatsSnapshot {
    /// Percentage of seen files that were parsed.
    ///
    /// Returns 100.0 when no files were seen.
    ///
    /// # Examples
    ///
    /// ```
    /// use atlas_scanner::StatsSnapshot;
    ///
    /// let snap = StatsSnapshot { files_seen: 4, files_parsed: 3, ..Default::default() };
    /// assert!((snap.parsed_percent() - 75.0).abs() < 0.1);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Acceptable for statistics display
    pub fn parsed_percent(&self) -> f64 {
        if self.files_seen == 0 {
            return 100.0;
        }
        (self.files_parsed as f64 / self.files_seen as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = ScanStats::new();
        stats.set_projects(2);
        stats.increment_files_seen();
        stats.increment_files_seen();
        stats.increment_files_skipped();
        stats.increment_files_hashed();
        stats.increment_hash_failures();

        let snap = stats.snapshot();
        assert_eq!(snap.projects, 2);
        assert_eq!(snap.files_seen, 2);
        assert_eq!(snap.files_skipped, 1);
        assert_eq!(snap.files_hashed, 1);
        assert_eq!(snap.hash_failures, 1);
        assert_eq!(ScanStats::new().snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn test_concurrent_increments() {
        use rayon::prelude::*;

        let stats = ScanStats::new();
        (0..1000).into_par_iter().for_each(|_| stats.increment_files_parsed());
        assert_eq!(stats.snapshot().files_parsed, 1000);
    }

    #[test]
    fn test_snapshot_serialization() {
        let snap = StatsSnapshot {
            files_seen: 10,
            ..StatsSnapshot::default()
        };
        let json = serde_json::to_string(&snap).unwrap();
        let parsed: StatsSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snap, parsed);
    }
}
