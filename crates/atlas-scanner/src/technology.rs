//! Technology tagging from file names and dependency manifests.

use std::collections::BTreeSet;

use camino::Utf8Path;
use serde::Deserialize;
use serde_json::Map;
use smallvec::SmallVec;
use tracing::debug;

use atlas_core::TechnologyTables;

/// The manifest file inspected for dependency-based technologies.
pub const MANIFEST_FILE: &str = "package.json";

/// Labels for a single file: at most one from its extension and one from
/// its basename.
pub fn technologies_for_file<'t>(
    tables: &'t TechnologyTables,
    path: &Utf8Path,
) -> SmallVec<[&'t str; 2]> {
    let mut labels = SmallVec::new();
    if let Some(label) = path.extension().and_then(|ext| tables.for_extension(ext)) {
        labels.push(label);
    }
    if let Some(label) = path.file_name().and_then(|name| tables.for_basename(name)) {
        labels.push(label);
    }
    labels
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    #[serde(default)]
    dependencies: Option<Map<String, serde_json::Value>>,
    #[serde(default)]
    dev_dependencies: Option<Map<String, serde_json::Value>>,
}

/// Labels derived from the project's `package.json`.
///
/// A parseable manifest contributes the manifest label plus one label per
/// known dependency or dev-dependency. A missing or malformed manifest
/// contributes nothing.
#[must_use]
pub fn technologies_from_manifest(tables: &TechnologyTables, project_root: &Utf8Path) -> BTreeSet<String> {
    let path = project_root.join(MANIFEST_FILE);
    if !path.is_file() {
        return BTreeSet::new();
    }

    let manifest = match std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str::<Manifest>(&text).map_err(|e| e.to_string()))
    {
        Ok(manifest) => manifest,
        Err(error) => {
            debug!(path = %path, error = %error, "Ignoring unreadable manifest");
            return BTreeSet::new();
        }
    };

    let mut labels = BTreeSet::new();
    labels.insert(tables.manifest_label.clone());

    let dependencies = manifest.dependencies.iter().flat_map(Map::keys);
    let dev_dependencies = manifest.dev_dependencies.iter().flat_map(Map::keys);
    for name in dependencies.chain(dev_dependencies) {
        if let Some(label) = tables.for_package(name) {
            labels.insert(label.to_owned());
        }
    }

    labels
}

#[cfg(test)]
mod tests {
    use std::fs;

    use camino::Utf8PathBuf;

    use super::*;

    fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, root)
    }

    #[test]
    fn test_file_technologies() {
        let tables = TechnologyTables::default();
        assert_eq!(technologies_for_file(&tables, Utf8Path::new("src/app.tsx")).as_slice(), ["React (TSX)"]);
        assert_eq!(technologies_for_file(&tables, Utf8Path::new("Dockerfile")).as_slice(), ["Docker"]);
        assert_eq!(
            technologies_for_file(&tables, Utf8Path::new("docker-compose.yml")).as_slice(),
            ["Docker Compose"]
        );
        assert!(technologies_for_file(&tables, Utf8Path::new("logo.png")).is_empty());
    }

    #[test]
    fn test_manifest_dependencies() {
        let (_dir, root) = temp_root();
        fs::write(
            root.join("package.json"),
            r#"{"dependencies": {"react": "^18", "left-pad": "1"}, "devDependencies": {"jest": "29"}}"#,
        )
        .unwrap();

        let labels = technologies_from_manifest(&TechnologyTables::default(), &root);
        let labels: Vec<_> = labels.into_iter().collect();
        assert_eq!(labels, vec!["Jest", "Node.js", "React"]);
    }

    #[test]
    fn test_manifest_without_dependencies() {
        let (_dir, root) = temp_root();
        fs::write(root.join("package.json"), r#"{"name": "x"}"#).unwrap();
        let labels = technologies_from_manifest(&TechnologyTables::default(), &root);
        assert_eq!(labels.len(), 1);
        assert!(labels.contains("Node.js"));
    }

    #[test]
    fn test_malformed_or_missing_manifest() {
        let (_dir, root) = temp_root();
        assert!(technologies_from_manifest(&TechnologyTables::default(), &root).is_empty());

        fs::write(root.join("package.json"), "{ not json").unwrap();
        assert!(technologies_from_manifest(&TechnologyTables::default(), &root).is_empty());
    }
}
