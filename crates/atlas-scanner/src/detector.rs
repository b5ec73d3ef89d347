//! Project root detection.
//!
//! A directory is a project root when it carries one of the configured
//! marker files, is not a repository container, and is not the functions
//! folder of a serverless site. Every matching directory is reported,
//! including projects nested inside other projects. The scan root itself is
//! never a project.
//!
//! Both the serverless rule and naming look only at the path below the scan
//! root, so where the root itself lives has no effect on the result.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use rustc_hash::FxHashMap;
use tracing::debug;

use atlas_core::ScanConfig;

/// Decides which directories are projects and how they are named.
///
/// # Examples
///
/// ```
/// use atlas_core::ScanConfig;
/// use atlas_scanner::ProjectDetector;
/// use camino::Utf8Path;
///
/// let config = ScanConfig::default();
/// let detector = ProjectDetector::new(&config);
/// assert!(detector.is_container(Utf8Path::new("/ws/svn")));
/// assert!(detector.is_container(Utf8Path::new("/ws/svn/bitbucket")));
/// assert!(!detector.is_container(Utf8Path::new("/ws/bitbucket")));
/// let root = Utf8Path::new("/ws");
/// assert_eq!(detector.project_name(root, Utf8Path::new("/ws/site/netlify/functions/api")), "site");
/// assert_eq!(detector.project_name(root, Utf8Path::new("/ws/site/api")), "api");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ProjectDetector<'a> {
    config: &'a ScanConfig,
}

impl<'a> ProjectDetector<'a> {
    /// Creates a detector using the markers and naming rules in `config`.
    #[must_use]
    pub const fn new(config: &'a ScanConfig) -> Self {
        Self { config }
    }

    /// Filters `dirs` (all directories below `root`, in walk order) down to
    /// project roots.
    #[must_use]
    pub fn detect(&self, root: &Utf8Path, dirs: &[Utf8PathBuf]) -> Vec<Utf8PathBuf> {
        dirs.iter()
            .filter(|dir| self.is_project_root(root, dir))
            .cloned()
            .collect()
    }

    /// Returns `true` if `dir` is a project root under the scan `root`.
    #[must_use]
    pub fn is_project_root(&self, root: &Utf8Path, dir: &Utf8Path) -> bool {
        if dir == root || !self.has_marker(dir) {
            return false;
        }
        if self.is_container(dir) {
            debug!(path = %dir, "Skipping container directory");
            return false;
        }
        if self.is_serverless_path(relative_to(root, dir)) {
            debug!(path = %dir, "Skipping serverless functions directory");
            return false;
        }
        true
    }

    /// Returns `true` if any project marker exists directly inside `dir`.
    #[must_use]
    pub fn has_marker(&self, dir: &Utf8Path) -> bool {
        self.config
            .project_markers
            .iter()
            .any(|marker| dir.join(marker).exists())
    }

    /// Returns `true` if `dir` only groups other repositories.
    ///
    /// That is the container root name itself, or one of the container names
    /// directly below a container root.
    #[must_use]
    pub fn is_container(&self, dir: &Utf8Path) -> bool {
        let Some(name) = dir.file_name() else {
            return false;
        };
        let container_root = self.config.container_root.as_str();
        if name.eq_ignore_ascii_case(container_root) {
            return true;
        }

        let parent_is_root = dir
            .parent()
            .and_then(Utf8Path::file_name)
            .is_some_and(|parent| parent.eq_ignore_ascii_case(container_root));

        parent_is_root
            && self
                .config
                .container_names
                .iter()
                .any(|candidate| candidate.eq_ignore_ascii_case(name))
    }

    /// Returns `true` if `path` runs through `<parent>/<child>`
    /// (`netlify/functions` by default).
    #[must_use]
    pub fn is_serverless_path(&self, path: &Utf8Path) -> bool {
        self.serverless_index(path).is_some()
    }

    /// Derives the display name of the project at `dir` under `root`.
    ///
    /// Projects below a serverless functions folder take the name of the
    /// folder that holds it; everything else uses its own basename.
    #[must_use]
    pub fn project_name(&self, root: &Utf8Path, dir: &Utf8Path) -> String {
        let relative = relative_to(root, dir);
        let segments = normal_segments(relative);
        if let Some(index) = self.serverless_index(relative) {
            if let Some(owner) = index.checked_sub(1).and_then(|i| segments.get(i)) {
                return (*owner).to_owned();
            }
        }
        dir.file_name().unwrap_or(dir.as_str()).to_owned()
    }

    /// Display names for `dirs`, unique ignoring case.
    ///
    /// Names shared by several projects are replaced by each project's
    /// `/`-joined path below `root`.
    #[must_use]
    pub fn display_names(&self, root: &Utf8Path, dirs: &[Utf8PathBuf]) -> Vec<String> {
        let names: Vec<String> = dirs.iter().map(|dir| self.project_name(root, dir)).collect();

        let mut counts: FxHashMap<String, usize> = FxHashMap::default();
        for name in &names {
            *counts.entry(name.to_lowercase()).or_default() += 1;
        }

        names
            .into_iter()
            .zip(dirs)
            .map(|(name, dir)| {
                if counts.get(&name.to_lowercase()).copied().unwrap_or_default() < 2 {
                    return name;
                }
                let qualified = normal_segments(relative_to(root, dir)).join("/");
                debug!(name = %name, qualified = %qualified, "Qualifying shared project name");
                qualified
            })
            .collect()
    }

    /// Index of the serverless parent segment, if followed by the child.
    fn serverless_index(&self, path: &Utf8Path) -> Option<usize> {
        let segments = normal_segments(path);
        segments.windows(2).position(|pair| {
            pair[0].eq_ignore_ascii_case(&self.config.serverless_parent)
                && pair[1].eq_ignore_ascii_case(&self.config.serverless_child)
        })
    }
}

fn relative_to<'p>(root: &Utf8Path, dir: &'p Utf8Path) -> &'p Utf8Path {
    dir.strip_prefix(root).unwrap_or(dir)
}

fn normal_segments(path: &Utf8Path) -> Vec<&str> {
    path.components()
        .filter_map(|component| match component {
            Utf8Component::Normal(segment) => Some(segment),
            _ => None,
        })
        .collect()
}
