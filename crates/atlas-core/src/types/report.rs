//! Scan report types.
//!
//! A [`ScanReport`] is the single output of a scan. It is rebuilt from scratch
//! on every run; nothing here is cached between scans.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::project::Project;
use super::scope::BlockKind;

/// A whole-file content hash shared by files in two or more projects.
///
/// `files` entries are `"<project>/<relative path>"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateEntry {
    /// Projects containing at least one copy.
    pub projects: BTreeSet<String>,

    /// Every copy, in discovery order.
    pub files: Vec<String>,
}

/// How strongly a shared identifier indicates duplicated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    /// Only the name collides.
    Soft,

    /// At least two projects carry a byte-identical normalized body.
    Hard,
}

impl Strength {
    /// Returns `true` for [`Strength::Hard`].
    #[inline]
    #[must_use]
    pub const fn is_hard(self) -> bool {
        matches!(self, Self::Hard)
    }
}

/// A `(kind, name)` pair declared in two or more projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedIdentifierEntry {
    /// Declared name.
    pub name: String,

    /// Block kind.
    pub kind: BlockKind,

    /// Every project declaring the pair.
    pub projects: BTreeSet<String>,

    /// `hard` if any body digest spans two or more projects.
    pub strength: Strength,

    /// Project sets of each body digest spanning two or more projects.
    pub hard_overlap_groups: Vec<BTreeSet<String>>,
}

/// The kind of a project-to-project relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// The projects share duplicate files.
    Duplicate,

    /// One project imports a path naming the other.
    Reference,
}

/// An undirected weighted edge between two projects.
///
/// `source` sorts before `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipEdge {
    /// Lexically smaller project name.
    pub source: String,

    /// Lexically larger project name.
    pub target: String,

    /// Relationship kind.
    pub kind: EdgeKind,

    /// Accumulated weight.
    pub weight: usize,
}

/// The complete result of scanning a workspace.
///
/// # Examples
///
/// ```
/// use atlas_core::ScanReport;
///
/// let report = ScanReport::default();
/// let json = serde_json::to_value(&report).unwrap();
/// assert!(json["sharedIdentifiers"].as_array().unwrap().is_empty());
/// assert!(report.relationship_edges().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Detected projects, in detection order.
    pub projects: Vec<Project>,

    /// Files duplicated across projects.
    pub duplicates: Vec<DuplicateEntry>,

    /// Identifiers declared in several projects, sorted by name.
    pub shared_identifiers: Vec<SharedIdentifierEntry>,
}

impl ScanReport {
    /// Looks up a project by name.
    #[must_use]
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Derives the project relationship graph.
    ///
    /// Each duplicate entry adds its file count to every project pair it spans.
    /// Each internal reference adds one to its pair. Self-pairs are dropped.
    #[must_use]
    pub fn relationship_edges(&self) -> Vec<RelationshipEdge> {
        let mut weights: BTreeMap<(EdgeKind, String, String), usize> = BTreeMap::new();
        let mut bump = |kind: EdgeKind, a: &str, b: &str, amount: usize| {
            if a == b {
                return;
            }
            let (source, target) = if a < b { (a, b) } else { (b, a) };
            *weights
                .entry((kind, source.to_owned(), target.to_owned()))
                .or_default() += amount;
        };

        for entry in &self.duplicates {
            let projects: Vec<&String> = entry.projects.iter().collect();
            for (i, a) in projects.iter().enumerate() {
                for b in &projects[i + 1..] {
                    bump(EdgeKind::Duplicate, a, b, entry.files.len());
                }
            }
        }

        for project in &self.projects {
            for target in &project.references {
                bump(EdgeKind::Reference, &project.name, target, 1);
            }
        }

        weights
            .into_iter()
            .map(|((kind, source, target), weight)| RelationshipEdge {
                source,
                target,
                kind,
                weight,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;

    use super::*;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| (*n).to_owned()).collect()
    }

    #[test]
    fn test_duplicate_edges_weighted_by_files() {
        let report = ScanReport {
            duplicates: vec![
                DuplicateEntry {
                    projects: set(&["alpha", "beta", "gamma"]),
                    files: vec!["alpha/a".into(), "beta/a".into(), "gamma/a".into()],
                },
                DuplicateEntry {
                    projects: set(&["alpha", "beta"]),
                    files: vec!["alpha/b".into(), "beta/b".into()],
                },
            ],
            ..ScanReport::default()
        };

        let edges = report.relationship_edges();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[0].source, "alpha");
        assert_eq!(edges[0].target, "beta");
        assert_eq!(edges[0].weight, 5);
        assert_eq!(edges[1].target, "gamma");
        assert_eq!(edges[1].weight, 3);
        assert!(edges.iter().all(|e| e.kind == EdgeKind::Duplicate));
    }

    #[test]
    fn test_reference_edges_are_undirected() {
        let mut alpha = Project::new("alpha", Utf8PathBuf::from("/ws/alpha"));
        alpha.references = vec!["beta".to_owned()];
        let mut beta = Project::new("beta", Utf8PathBuf::from("/ws/beta"));
        beta.references = vec!["alpha".to_owned(), "beta".to_owned()];

        let report = ScanReport {
            projects: vec![beta, alpha],
            ..ScanReport::default()
        };

        let edges = report.relationship_edges();
        assert_eq!(
            edges,
            vec![RelationshipEdge {
                source: "alpha".to_owned(),
                target: "beta".to_owned(),
                kind: EdgeKind::Reference,
                weight: 2,
            }]
        );
    }

    #[test]
    fn test_shared_identifier_serialization() {
        let entry = SharedIdentifierEntry {
            name: "add".to_owned(),
            kind: BlockKind::Function,
            projects: set(&["alpha", "beta"]),
            strength: Strength::Hard,
            hard_overlap_groups: vec![set(&["alpha", "beta"])],
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "function");
        assert_eq!(json["strength"], "hard");
        assert_eq!(json["hardOverlapGroups"][0][1], "beta");
        assert!(entry.strength.is_hard());
    }
}
