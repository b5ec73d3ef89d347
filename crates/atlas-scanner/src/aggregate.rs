//! Per-project result aggregation.

use std::collections::BTreeSet;

use camino::{Utf8Path, Utf8PathBuf};
use rustc_hash::FxHashSet;

use atlas_core::{DuplicateEntry, Project, ScanReport, SharedIdentifierEntry};

use crate::analyzer::FileRecord;

/// A file that takes part in whole-file duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashCandidate {
    /// Position of the owning project in detection order. Identifies the
    /// project; names are only for display.
    pub project_index: usize,
    /// Owning project name.
    pub project: String,
    /// Path relative to the project root.
    pub relative_path: String,
    /// Absolute path on disk.
    pub absolute_path: Utf8PathBuf,
}

/// Folds [`FileRecord`]s into a [`Project`].
///
/// Name lists become sets, variables are grouped by scope, and reference
/// mentions are deduplicated keeping their first occurrence.
#[derive(Debug)]
pub struct ProjectBuilder {
    index: usize,
    project: Project,
    mentions: FxHashSet<String>,
    candidates: Vec<HashCandidate>,
}

impl ProjectBuilder {
    /// Starts an empty project at position `index` in detection order.
    #[must_use]
    pub fn new(index: usize, name: impl Into<String>, root_path: Utf8PathBuf) -> Self {
        Self {
            index,
            project: Project::new(name, root_path),
            mentions: FxHashSet::default(),
            candidates: Vec::new(),
        }
    }

    /// The project root.
    #[must_use]
    pub fn root_path(&self) -> &Utf8Path {
        &self.project.root_path
    }

    /// Adds one file. Records must arrive in walk order.
    pub fn add_record(&mut self, record: FileRecord) {
        self.project.technologies.extend(record.technologies);

        if record.hashable {
            self.candidates.push(HashCandidate {
                project_index: self.index,
                project: self.project.name.clone(),
                relative_path: record.relative_path,
                absolute_path: record.absolute_path,
            });
        }

        let Some(parsed) = record.parsed else {
            return;
        };

        for variable in parsed.variables {
            self.project
                .variables_by_scope
                .insert(variable.scope, variable.name);
        }
        self.project.identifier_details.extend(parsed.identifiers);
        for target in parsed.references {
            if self.mentions.insert(target.clone()) {
                self.project.reference_mentions.push(target);
            }
        }
        self.project.absorb_file(parsed.summary);
    }

    /// Adds technology labels from outside the file list (the manifest).
    pub fn add_technologies(&mut self, labels: impl IntoIterator<Item = String>) {
        self.project.technologies.extend(labels);
    }

    /// Number of parsed files so far.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.project.files.len()
    }

    /// Finishes the project with the result of the dirty check.
    #[must_use]
    pub fn finish(mut self, has_uncommitted_changes: bool) -> (Project, Vec<HashCandidate>) {
        self.project.has_uncommitted_changes = has_uncommitted_changes;
        (self.project, self.candidates)
    }
}

/// Assembles the final report.
#[must_use]
pub fn build_report(
    projects: Vec<Project>,
    duplicates: Vec<DuplicateEntry>,
    shared_identifiers: Vec<SharedIdentifierEntry>,
) -> ScanReport {
    ScanReport {
        projects,
        duplicates,
        shared_identifiers,
    }
}

/// Distinct project names in a report, for summaries.
#[must_use]
pub fn project_names(report: &ScanReport) -> BTreeSet<&str> {
    report.projects.iter().map(|p| p.name.as_str()).collect()
}
