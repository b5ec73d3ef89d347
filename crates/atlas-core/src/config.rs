//! Configuration structures for repo-atlas.
//!
//! This module provides configuration types for the scanning engine:
//!
//! - [`ScanConfig`] - Traversal, detection and extraction limits
//! - [`IgnoreSet`] - Case-insensitive directory basename filter built from a [`ScanConfig`]
//! - [`TechnologyTables`] - Extension / basename / dependency to label lookups
//! - [`Config`] - Root configuration combining all settings
//!
//! Every value here is passed explicitly into the walker, detector and analyzer.
//! Nothing is read from process-global state, so several scans with different
//! configurations can run side by side.

use std::collections::BTreeMap;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::hash::{FxHashSet, fx_hash_set};

const DEFAULT_IGNORED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".cache",
    "dist",
    "build",
    "library",
    "packagecache",
];

const DEFAULT_IGNORED_FILES: &[&str] = &[
    ".gitignore",
    ".gitattributes",
    "edge-functions-import-map.json",
    "netlify.toml",
    "debug-env.js",
];

const DEFAULT_BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "ico", "zip", "tar", "gz", "tgz", "rar", "7z", "pdf",
    "woff", "woff2", "ttf", "eot", "mp3", "mp4", "mov", "avi",
];

const DEFAULT_PROJECT_MARKERS: &[&str] = &[
    "package.json",
    "requirements.txt",
    "pyproject.toml",
    "Gemfile",
    "composer.json",
    ".git",
];

const DEFAULT_EXTENSION_TECH: &[(&str, &str)] = &[
    ("js", "JavaScript"),
    ("mjs", "JavaScript"),
    ("cjs", "JavaScript"),
    ("jsx", "React (JSX)"),
    ("ts", "TypeScript"),
    ("tsx", "React (TSX)"),
    ("json", "JSON"),
    ("html", "HTML"),
    ("htm", "HTML"),
    ("css", "CSS"),
    ("scss", "Sass/SCSS"),
    ("sass", "Sass/SCSS"),
    ("less", "Less"),
    ("md", "Markdown"),
    ("py", "Python"),
    ("rb", "Ruby"),
    ("java", "Java"),
    ("cs", "C#"),
    ("go", "Go"),
    ("php", "PHP"),
    ("rs", "Rust"),
    ("swift", "Swift"),
    ("kt", "Kotlin"),
    ("cpp", "C++"),
    ("c", "C"),
];

const DEFAULT_BASENAME_TECH: &[(&str, &str)] = &[
    ("dockerfile", "Docker"),
    ("docker-compose.yml", "Docker Compose"),
    ("docker-compose.yaml", "Docker Compose"),
    ("makefile", "Makefile"),
];

const DEFAULT_PACKAGE_TECH: &[(&str, &str)] = &[
    ("react", "React"),
    ("react-dom", "React DOM"),
    ("vue", "Vue"),
    ("@angular/core", "Angular"),
    ("express", "Express"),
    ("next", "Next.js"),
    ("nuxt", "Nuxt"),
    ("svelte", "Svelte"),
    ("@nestjs/core", "NestJS"),
    ("tailwindcss", "Tailwind CSS"),
    ("typescript", "TypeScript"),
    ("jest", "Jest"),
    ("vitest", "Vitest"),
    ("webpack", "Webpack"),
    ("rollup", "Rollup"),
    ("parcel", "Parcel"),
    ("eslint", "ESLint"),
    ("prettier", "Prettier"),
    ("@babel/core", "Babel"),
];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

fn owned_table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect()
}

/// Configuration for a workspace scan.
///
/// # Examples
///
/// ```
/// use atlas_core::ScanConfig;
///
/// let config = ScanConfig::default().with_extra_ignored([" Vendor ", ""]);
/// assert_eq!(config.max_file_size, 1_500_000);
/// assert_eq!(config.extra_ignored_dirs, vec!["vendor".to_owned()]);
/// assert!(config.ignore_set().contains("NODE_MODULES"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory basenames never descended into (case-insensitive, exact match).
    pub ignored_dirs: Vec<String>,

    /// Caller-supplied directory basenames, added on top of `ignored_dirs`.
    pub extra_ignored_dirs: Vec<String>,

    /// File basenames that are never scanned, tagged, or hashed.
    pub ignored_files: Vec<String>,

    /// Extensions (without the dot) whose content is never parsed.
    pub binary_extensions: Vec<String>,

    /// Files larger than this many bytes are skipped.
    pub max_file_size: u64,

    /// Files or directories whose presence marks a project root.
    pub project_markers: Vec<String>,

    /// Name of the directory that groups repositories (e.g. an `svn` checkout root).
    pub container_root: String,

    /// Names that are containers when they sit directly under `container_root`.
    pub container_names: Vec<String>,

    /// First segment of the serverless-functions convention (`netlify`).
    pub serverless_parent: String,

    /// Second segment of the serverless-functions convention (`functions`).
    pub serverless_child: String,

    /// Maximum number of characters of normalized block text that are hashed.
    pub block_text_limit: usize,

    /// Maximum number of parallel jobs.
    /// `None` means use all available CPU cores.
    pub max_parallel_jobs: Option<usize>,

    /// Whether to follow symbolic links while walking.
    pub follow_links: bool,

    /// Whether to ask the version-control oracle about uncommitted changes.
    pub check_vcs: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignored_dirs: owned(DEFAULT_IGNORED_DIRS),
            extra_ignored_dirs: Vec::new(),
            ignored_files: owned(DEFAULT_IGNORED_FILES),
            binary_extensions: owned(DEFAULT_BINARY_EXTENSIONS),
            max_file_size: 1_500_000,
            project_markers: owned(DEFAULT_PROJECT_MARKERS),
            container_root: "svn".to_owned(),
            container_names: owned(&["svn", "bitbucket"]),
            serverless_parent: "netlify".to_owned(),
            serverless_child: "functions".to_owned(),
            block_text_limit: 10_000,
            max_parallel_jobs: None,
            follow_links: false,
            check_vcs: true,
        }
    }
}

impl ScanConfig {
    /// Adds caller-supplied directory names to ignore.
    ///
    /// Names are trimmed and lower-cased; blank names are dropped.
    #[must_use]
    pub fn with_extra_ignored<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra_ignored_dirs.extend(
            names
                .into_iter()
                .map(|name| name.as_ref().trim().to_lowercase())
                .filter(|name| !name.is_empty()),
        );
        self
    }

    /// Sets the parallel job limit.
    #[must_use]
    pub const fn with_max_parallel_jobs(mut self, jobs: Option<usize>) -> Self {
        self.max_parallel_jobs = jobs;
        self
    }

    /// Enables or disables the version-control dirty check.
    #[must_use]
    pub const fn with_vcs_check(mut self, check: bool) -> Self {
        self.check_vcs = check;
        self
    }

    /// Builds the directory ignore set (`ignored_dirs` plus `extra_ignored_dirs`).
    #[must_use]
    pub fn ignore_set(&self) -> IgnoreSet {
        IgnoreSet::from_names(self.ignored_dirs.iter().chain(&self.extra_ignored_dirs))
    }

    /// Returns `true` if the basename is in `ignored_files` (case-insensitive).
    #[must_use]
    pub fn is_ignored_file(&self, basename: &str) -> bool {
        self.ignored_files
            .iter()
            .any(|name| name.eq_ignore_ascii_case(basename))
    }

    /// Returns `true` if the extension (without the dot) is a known binary format.
    #[must_use]
    pub fn is_binary_extension(&self, extension: &str) -> bool {
        self.binary_extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }

    /// Checks the configuration for values the scanner cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_parallel_jobs == Some(0) {
            return Err(ConfigError::InvalidOption {
                option: "max_parallel_jobs".to_owned(),
                reason: "must be positive".to_owned(),
            });
        }
        if self.block_text_limit == 0 {
            return Err(ConfigError::InvalidOption {
                option: "block_text_limit".to_owned(),
                reason: "must be positive".to_owned(),
            });
        }
        if self.project_markers.is_empty() {
            return Err(ConfigError::InvalidOption {
                option: "project_markers".to_owned(),
                reason: "at least one marker is required".to_owned(),
            });
        }
        Ok(())
    }
}

/// A case-insensitive set of directory basenames to skip.
///
/// Matching is exact: `dist` ignores `dist/` and `DIST/` but not `distribution/`.
///
/// # Examples
///
/// ```
/// use atlas_core::IgnoreSet;
///
/// let set = IgnoreSet::from_names(["node_modules", "Dist"]);
/// assert!(set.contains("dist"));
/// assert!(!set.contains("distribution"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    names: FxHashSet<String>,
}

impl IgnoreSet {
    /// Builds a set from names, lower-casing each one.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = fx_hash_set();
        for name in names {
            let name = name.as_ref().trim().to_lowercase();
            if !name.is_empty() {
                set.insert(name);
            }
        }
        Self { names: set }
    }

    /// Returns `true` if the basename is ignored.
    #[must_use]
    pub fn contains(&self, basename: &str) -> bool {
        if self.names.contains(basename) {
            return true;
        }
        self.names.contains(&basename.to_lowercase())
    }

    /// Number of names in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if nothing is ignored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Lookup tables mapping files and dependencies to technology labels.
///
/// Keys are matched case-insensitively; extensions are stored without the dot.
///
/// # Examples
///
/// ```
/// use atlas_core::TechnologyTables;
///
/// let tables = TechnologyTables::default();
/// assert_eq!(tables.for_extension("TS"), Some("TypeScript"));
/// assert_eq!(tables.for_basename("Dockerfile"), Some("Docker"));
/// assert_eq!(tables.for_package("react"), Some("React"));
/// assert_eq!(tables.for_extension("xyz"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnologyTables {
    /// Extension (lower-case, no dot) to label.
    pub extensions: BTreeMap<String, String>,

    /// Basename (lower-case) to label.
    pub basenames: BTreeMap<String, String>,

    /// Dependency name from a manifest to label.
    pub packages: BTreeMap<String, String>,

    /// Label added whenever a parseable dependency manifest is present.
    pub manifest_label: String,
}

impl Default for TechnologyTables {
    fn default() -> Self {
        Self {
            extensions: owned_table(DEFAULT_EXTENSION_TECH),
            basenames: owned_table(DEFAULT_BASENAME_TECH),
            packages: owned_table(DEFAULT_PACKAGE_TECH),
            manifest_label: "Node.js".to_owned(),
        }
    }
}

impl TechnologyTables {
    /// Label for a file extension (without the dot).
    #[must_use]
    pub fn for_extension(&self, extension: &str) -> Option<&str> {
        self.extensions
            .get(&extension.to_lowercase())
            .map(String::as_str)
    }

    /// Label for a special file basename such as `Dockerfile`.
    #[must_use]
    pub fn for_basename(&self, basename: &str) -> Option<&str> {
        self.basenames
            .get(&basename.to_lowercase())
            .map(String::as_str)
    }

    /// Label for a manifest dependency name. Dependency names are case-sensitive.
    #[must_use]
    pub fn for_package(&self, dependency: &str) -> Option<&str> {
        self.packages.get(dependency).map(String::as_str)
    }
}

/// Root configuration for repo-atlas.
///
/// # Examples
///
/// ```
/// use atlas_core::Config;
///
/// let config = Config::default();
/// let json = serde_json::to_string_pretty(&config).unwrap();
/// assert!(json.contains("node_modules"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scanner configuration.
    pub scan: ScanConfig,

    /// Technology lookup tables.
    pub technologies: TechnologyTables,
}

impl Config {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields keep their defaults.
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::InvalidPath {
                path: path.to_owned(),
                reason: "configuration file not found".to_owned(),
            });
        }
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.scan.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_config_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.max_file_size, 1_500_000);
        assert_eq!(config.block_text_limit, 10_000);
        assert!(config.project_markers.contains(&".git".to_owned()));
        assert!(config.check_vcs);
        assert!(!config.follow_links);
    }

    #[test]
    fn test_ignore_set_includes_extras() {
        let set = ScanConfig::default()
            .with_extra_ignored(["Vendor", "  ", "third_party"])
            .ignore_set();
        assert!(set.contains("vendor"));
        assert!(set.contains("VENDOR"));
        assert!(set.contains("third_party"));
        assert!(set.contains(".git"));
        assert!(!set.contains("src"));
    }

    #[test]
    fn test_ignore_set_is_exact_match() {
        let set = IgnoreSet::from_names(["build"]);
        assert!(set.contains("Build"));
        assert!(!set.contains("builder"));
        assert!(!set.contains("prebuild"));
    }

    #[test]
    fn test_ignored_files_and_binary_extensions() {
        let config = ScanConfig::default();
        assert!(config.is_ignored_file("Netlify.toml"));
        assert!(!config.is_ignored_file("index.js"));
        assert!(config.is_binary_extension("PNG"));
        assert!(!config.is_binary_extension("js"));
    }

    #[test]
    fn test_validate_rejects_zero_jobs() {
        let config = ScanConfig::default().with_max_parallel_jobs(Some(0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOption { .. })
        ));
        assert!(ScanConfig::default().validate().is_ok());
    }

    #[test]
    fn test_technology_tables_case_insensitive() {
        let tables = TechnologyTables::default();
        assert_eq!(tables.for_extension("JSX"), Some("React (JSX)"));
        assert_eq!(tables.for_basename("Makefile"), Some("Makefile"));
        assert_eq!(
            tables.for_basename("docker-compose.yaml"),
            Some("Docker Compose")
        );
        assert_eq!(tables.for_package("@angular/core"), Some("Angular"));
        assert_eq!(tables.for_package("React"), None);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_config_deserialize_with_missing_fields() {
        let json = r#"{"scan": {"max_file_size": 42}}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.scan.max_file_size, 42);
        assert_eq!(config.scan.block_text_limit, 10_000);
        assert_eq!(config.technologies.manifest_label, "Node.js");
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = camino::Utf8PathBuf::from_path_buf(dir.path().join("atlas.json")).unwrap();
        std::fs::write(&path, r#"{"scan": {"extra_ignored_dirs": ["vendor"]}}"#).unwrap();

        let config = Config::from_json_file(&path).unwrap();
        assert!(config.scan.ignore_set().contains("vendor"));

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Config::from_json_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = Config::from_json_file(Utf8Path::new("/nonexistent/atlas.json"));
        assert!(matches!(result, Err(ConfigError::InvalidPath { .. })));
    }
}
