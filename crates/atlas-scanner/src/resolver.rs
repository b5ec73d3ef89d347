//! Cross-project resolution.
//!
//! Two passes run once every project has been aggregated:
//!
//! - [`resolve_references`] classifies each project's raw import targets as
//!   references to sibling projects or as external mentions.
//! - [`shared_identifiers`] groups extracted blocks by `(kind, name)` across
//!   projects and marks groups with byte-identical normalized bodies as hard.
//!
//! Both passes are linear in mentions times projects, which is fine for the
//! workspace sizes this runs on.

use std::collections::{BTreeMap, BTreeSet};

use rustc_hash::FxHashSet;
use tracing::debug;

use atlas_core::{BlockKind, ContentDigest, Project, SharedIdentifierEntry, Strength};

/// Returns `true` if a lowercased import target names the project `name`.
///
/// `name` must already be lowercased and non-empty.
///
/// # Examples
///
/// ```
/// use atlas_scanner::matches_project_name;
///
/// assert!(matches_project_name("../beta/index", "beta"));
/// assert!(matches_project_name("@beta/core", "beta"));
/// assert!(!matches_project_name("lodash", "beta"));
/// ```
#[must_use]
pub fn matches_project_name(mention: &str, name: &str) -> bool {
    mention == name
        || mention.ends_with(&format!("/{name}"))
        || mention.contains(&format!("/{name}/"))
        || mention.contains(&format!("@{name}"))
        || mention.contains(&format!(":{name}"))
        || mention.contains(&format!("{name}/"))
        || mention.contains(&format!("{name}."))
}

/// Fills `references` and `external_references` on every project.
///
/// A project never references itself. When two projects share a name
/// (case-insensitively) the first one's spelling is reported.
pub fn resolve_references(projects: &mut [Project]) {
    let mut seen = FxHashSet::default();
    let names: Vec<(String, String)> = projects
        .iter()
        .filter(|p| !p.name.is_empty())
        .filter_map(|p| {
            let lower = p.name.to_lowercase();
            seen.insert(lower.clone()).then(|| (lower, p.name.clone()))
        })
        .collect();

    for project in projects.iter_mut() {
        let own = project.name.to_lowercase();
        let mut references: Vec<String> = Vec::new();
        let mut external: Vec<String> = Vec::new();

        for mention in &project.reference_mentions {
            let lowered = mention.to_lowercase();
            let mut matched = false;
            for (lower, original) in &names {
                if *lower == own || !matches_project_name(&lowered, lower) {
                    continue;
                }
                matched = true;
                if !references.contains(original) {
                    references.push(original.clone());
                }
            }
            if !matched && !external.contains(mention) {
                external.push(mention.clone());
            }
        }

        debug!(
            project = %project.name,
            references = references.len(),
            external = external.len(),
            "Resolved references"
        );
        project.references = references;
        project.external_references = external;
    }
}

/// Projects are tracked by their position in the scan, not their name.
#[derive(Default)]
struct IdentifierGroup {
    projects: BTreeSet<usize>,
    by_body: BTreeMap<ContentDigest, BTreeSet<usize>>,
}

/// Every `(kind, name)` pair declared in two or more projects.
///
/// Entries are sorted by name, then kind.
#[must_use]
pub fn shared_identifiers(projects: &[Project]) -> Vec<SharedIdentifierEntry> {
    let mut groups: BTreeMap<(&str, BlockKind), IdentifierGroup> = BTreeMap::new();

    for (index, project) in projects.iter().enumerate() {
        for detail in &project.identifier_details {
            let (kind, name) = detail.key();
            let group = groups.entry((name, kind)).or_default();
            group.projects.insert(index);
            group.by_body.entry(detail.content_hash).or_default().insert(index);
        }
    }

    let names = |indexes: BTreeSet<usize>| -> BTreeSet<String> {
        indexes
            .into_iter()
            .filter_map(|i| projects.get(i))
            .map(|p| p.name.clone())
            .collect()
    };

    groups
        .into_iter()
        .filter(|(_, group)| group.projects.len() > 1)
        .map(|((name, kind), group)| {
            let hard_overlap_groups: Vec<BTreeSet<String>> = group
                .by_body
                .into_values()
                .filter(|owners| owners.len() > 1)
                .map(names)
                .collect();
            let strength = if hard_overlap_groups.is_empty() {
                Strength::Soft
            } else {
                Strength::Hard
            };
            SharedIdentifierEntry {
                name: name.to_owned(),
                kind,
                projects: names(group.projects),
                strength,
                hard_overlap_groups,
            }
        })
        .collect()
}
