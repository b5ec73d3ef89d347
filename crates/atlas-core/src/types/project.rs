//! Projects and their files.

use std::collections::BTreeSet;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use super::block::IdentifierDetail;
use super::scope::ScopeKind;

/// Facts extracted from a single parsed file.
///
/// The name lists keep every occurrence in source order; deduplication happens
/// at the project level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    /// Path relative to the project root, `/`-separated.
    pub relative_path: String,

    /// Absolute path on disk.
    pub absolute_path: Utf8PathBuf,

    /// Declared variable names.
    pub variables: Vec<String>,

    /// Declared function names.
    pub functions: Vec<String>,

    /// Declared class names.
    pub classes: Vec<String>,

    /// Names matched by the method heuristic.
    pub methods: Vec<String>,
}

/// Variable names partitioned by their resolved scope.
///
/// # Examples
///
/// ```
/// use atlas_core::{ScopeKind, VariablesByScope};
///
/// let mut vars = VariablesByScope::default();
/// vars.insert(ScopeKind::Method, "total");
/// vars.insert(ScopeKind::Method, "total");
/// assert_eq!(vars.get(ScopeKind::Method).len(), 1);
/// assert!(vars.get(ScopeKind::Global).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariablesByScope {
    /// Declarations outside any block.
    pub global: BTreeSet<String>,

    /// Declarations whose innermost block is a class.
    pub class: BTreeSet<String>,

    /// Declarations whose innermost block is a function.
    pub function: BTreeSet<String>,

    /// Declarations whose innermost block is a method.
    pub method: BTreeSet<String>,
}

impl VariablesByScope {
    /// Records a variable under a scope.
    pub fn insert(&mut self, scope: ScopeKind, name: impl Into<String>) {
        self.get_mut(scope).insert(name.into());
    }

    /// Names recorded under a scope.
    #[must_use]
    pub const fn get(&self, scope: ScopeKind) -> &BTreeSet<String> {
        match scope {
            ScopeKind::Global => &self.global,
            ScopeKind::Class => &self.class,
            ScopeKind::Function => &self.function,
            ScopeKind::Method => &self.method,
        }
    }

    fn get_mut(&mut self, scope: ScopeKind) -> &mut BTreeSet<String> {
        match scope {
            ScopeKind::Global => &mut self.global,
            ScopeKind::Class => &mut self.class,
            ScopeKind::Function => &mut self.function,
            ScopeKind::Method => &mut self.method,
        }
    }

    /// Total number of distinct (scope, name) entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.global.len() + self.class.len() + self.function.len() + self.method.len()
    }

    /// Returns `true` if no variables were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A detected project and everything learned about it.
///
/// Built once per project root by the aggregator and not modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Display name derived from the root path.
    pub name: String,

    /// Project root directory. Identity of the project.
    pub root_path: Utf8PathBuf,

    /// Parsed files, in walk order.
    pub files: Vec<FileSummary>,

    /// Technology labels.
    pub technologies: BTreeSet<String>,

    /// Whether the working tree has uncommitted changes.
    pub has_uncommitted_changes: bool,

    /// Variables grouped by resolved scope.
    pub variables_by_scope: VariablesByScope,

    /// Distinct variable names across all files.
    pub variables: BTreeSet<String>,

    /// Distinct function names across all files.
    pub functions: BTreeSet<String>,

    /// Distinct class names across all files.
    pub classes: BTreeSet<String>,

    /// Distinct method names across all files.
    pub methods: BTreeSet<String>,

    /// Names of other projects this project mentions in import targets.
    pub references: Vec<String>,

    /// Import targets that match no known project.
    pub external_references: Vec<String>,

    /// One record per extracted block; consumed by shared-identifier detection.
    #[serde(skip)]
    pub identifier_details: Vec<IdentifierDetail>,

    /// Raw import/require targets, in discovery order.
    #[serde(skip)]
    pub reference_mentions: Vec<String>,
}

impl Project {
    /// Creates an empty project rooted at `root_path`.
    #[must_use]
    pub fn new(name: impl Into<String>, root_path: Utf8PathBuf) -> Self {
        Self {
            name: name.into(),
            root_path,
            ..Self::default()
        }
    }

    /// Folds one file's facts into the project's name sets and pushes the file.
    pub fn absorb_file(&mut self, file: FileSummary) {
        self.variables.extend(file.variables.iter().cloned());
        self.functions.extend(file.functions.iter().cloned());
        self.classes.extend(file.classes.iter().cloned());
        self.methods.extend(file.methods.iter().cloned());
        self.files.push(file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_file_dedupes_names() {
        let mut project = Project::new("alpha", Utf8PathBuf::from("/ws/alpha"));
        project.absorb_file(FileSummary {
            relative_path: "a.js".to_owned(),
            functions: vec!["add".to_owned(), "add".to_owned()],
            variables: vec!["x".to_owned()],
            ..FileSummary::default()
        });
        project.absorb_file(FileSummary {
            relative_path: "b.js".to_owned(),
            functions: vec!["add".to_owned(), "sub".to_owned()],
            ..FileSummary::default()
        });

        assert_eq!(project.files.len(), 2);
        assert_eq!(project.files[0].relative_path, "a.js");
        assert_eq!(project.functions.len(), 2);
        assert_eq!(project.variables.len(), 1);
    }

    #[test]
    fn test_project_serializes_camel_case() {
        let mut project = Project::new("alpha", Utf8PathBuf::from("/ws/alpha"));
        project.variables_by_scope.insert(ScopeKind::Global, "config");
        project.reference_mentions.push("../beta".to_owned());

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["rootPath"], "/ws/alpha");
        assert_eq!(json["hasUncommittedChanges"], false);
        assert_eq!(json["variablesByScope"]["global"][0], "config");
        assert!(json.get("externalReferences").is_some());
        assert!(json.get("referenceMentions").is_none());
    }

    #[test]
    fn test_variables_by_scope_len() {
        let mut vars = VariablesByScope::default();
        assert!(vars.is_empty());
        vars.insert(ScopeKind::Class, "a");
        vars.insert(ScopeKind::Function, "a");
        assert_eq!(vars.len(), 2);
    }
}
