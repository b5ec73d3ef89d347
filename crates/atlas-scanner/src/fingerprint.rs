//! Whole-file content fingerprints and duplicate grouping.
//!
//! Hashing is the I/O-heavy part of a scan, so it runs on the rayon pool.
//! Workers only share the digest-to-members map, which sits behind a
//! `parking_lot::Mutex` and is touched once per file after the digest is
//! computed. Members are stored as candidate indexes and re-sorted after
//! the join, so the report does not depend on worker timing.

use std::collections::BTreeSet;

use parking_lot::Mutex;
use rayon::prelude::*;
use smallvec::SmallVec;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use atlas_core::{ContentDigest, DuplicateEntry, FxHashMap, fx_hash_map_with_capacity};

use crate::aggregate::HashCandidate;
use crate::stats::ScanStats;

/// Most digests belong to a single file.
type Members = SmallVec<[usize; 2]>;

/// Files grouped by the SHA-256 digest of their raw bytes.
#[derive(Debug, Default)]
pub struct FingerprintIndex {
    candidates: Vec<HashCandidate>,
    groups: FxHashMap<ContentDigest, Members>,
}

impl FingerprintIndex {
    /// Hashes every candidate in parallel.
    ///
    /// Files that cannot be read are dropped. Once `cancel` fires, the
    /// remaining files are not hashed.
    #[must_use]
    pub fn build(
        candidates: Vec<HashCandidate>,
        stats: &ScanStats,
        cancel: &CancellationToken,
    ) -> Self {
        let groups: Mutex<FxHashMap<ContentDigest, Members>> =
            Mutex::new(fx_hash_map_with_capacity(candidates.len()));

        candidates.par_iter().enumerate().for_each(|(index, candidate)| {
            if cancel.is_cancelled() {
                return;
            }
            match ContentDigest::of_file(candidate.absolute_path.as_std_path()) {
                Ok(digest) => {
                    stats.increment_files_hashed();
                    groups.lock().entry(digest).or_default().push(index);
                }
                Err(e) => {
                    stats.increment_hash_failures();
                    debug!(path = %candidate.absolute_path, error = %e, "Dropping unhashable file");
                }
            }
        });

        let groups = groups.into_inner();
        info!(files = candidates.len(), digests = groups.len(), "Fingerprinted files");

        Self { candidates, groups }
    }

    /// Number of distinct digests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns `true` if nothing was hashed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// One entry per digest whose files span two or more projects.
    ///
    /// Entries are ordered by the discovery position of their first file;
    /// files within an entry keep discovery order.
    #[must_use]
    pub fn duplicates(&self) -> Vec<DuplicateEntry> {
        let mut entries: Vec<(usize, DuplicateEntry)> = self
            .groups
            .values()
            .filter(|members| members.len() > 1)
            .filter_map(|members| {
                let mut members = members.clone();
                members.sort_unstable();

                let files: Vec<&HashCandidate> =
                    members.iter().filter_map(|&i| self.candidates.get(i)).collect();
                let owners: BTreeSet<usize> = files.iter().map(|c| c.project_index).collect();
                if owners.len() < 2 {
                    return None;
                }

                let entry = DuplicateEntry {
                    projects: files.iter().map(|c| c.project.clone()).collect(),
                    files: files
                        .iter()
                        .map(|c| format!("{}/{}", c.project, c.relative_path))
                        .collect(),
                };
                Some((members[0], entry))
            })
            .collect();

        entries.sort_by_key(|(first, _)| *first);
        entries.into_iter().map(|(_, entry)| entry).collect()
    }
}
