//! Directory traversal honoring an ignore set.
//!
//! [`DirectoryWalker`] wraps the `ignore` crate's [`WalkBuilder`] with the
//! gitignore and hidden-file filters turned off: only the configured
//! [`IgnoreSet`] decides what is skipped. Ignored directories are pruned
//! before descent, so nothing below them is ever read.
//!
//! Entries are sorted by file name, which makes discovery order stable
//! across runs. Unreadable directories and non-UTF-8 paths are skipped with
//! a debug log; a bad subtree never aborts the walk.

use camino::{Utf8Path, Utf8PathBuf};
use ignore::{DirEntry, WalkBuilder};
use tracing::debug;

use atlas_core::IgnoreSet;

/// A walker over one directory tree.
///
/// Uses the "collect-then-parallelize" pattern: paths are gathered on one
/// thread, then processed in parallel by the caller.
///
/// # Examples
///
/// ```
/// use atlas_core::IgnoreSet;
/// use atlas_scanner::DirectoryWalker;
/// use camino::Utf8Path;
///
/// let walker = DirectoryWalker::new(Utf8Path::new("."), IgnoreSet::from_names(["target"]));
/// let files = walker.collect_files();
/// assert!(files.iter().all(|f| !f.as_str().contains("/target/")));
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    root: Utf8PathBuf,
    ignore: IgnoreSet,
    follow_links: bool,
}

impl DirectoryWalker {
    /// Creates a walker rooted at `root`.
    #[must_use]
    pub fn new(root: &Utf8Path, ignore: IgnoreSet) -> Self {
        Self {
            root: root.to_owned(),
            ignore,
            follow_links: false,
        }
    }

    /// Configures whether to follow symbolic links.
    ///
    /// When enabled, link cycles are detected by the walker and skipped.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Returns the root directory being walked.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Collects every regular file below the root.
    #[must_use]
    pub fn collect_files(&self) -> Vec<Utf8PathBuf> {
        self.collect(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
    }

    /// Collects every directory strictly below the root.
    #[must_use]
    pub fn collect_dirs(&self) -> Vec<Utf8PathBuf> {
        self.collect(|entry| entry.depth() > 0 && is_dir(entry))
    }

    fn collect(&self, keep: impl Fn(&DirEntry) -> bool) -> Vec<Utf8PathBuf> {
        let mut paths = Vec::new();

        for result in self.build_walker() {
            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(root = %self.root, error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            if !keep(&entry) {
                continue;
            }

            match Utf8Path::from_path(entry.path()) {
                Some(path) => paths.push(path.to_owned()),
                None => debug!(path = %entry.path().display(), "Skipping non-UTF-8 path"),
            }
        }

        paths
    }

    /// Builds the ignore walker with configured settings.
    fn build_walker(&self) -> ignore::Walk {
        let ignore = self.ignore.clone();

        WalkBuilder::new(&self.root)
            // Only the ignore set filters; no gitignore, no hidden-file rules
            .standard_filters(false)
            .follow_links(self.follow_links)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                if entry.depth() == 0 || !is_dir(entry) {
                    return true;
                }
                entry
                    .file_name()
                    .to_str()
                    .is_none_or(|name| !ignore.contains(name))
            })
            .build()
    }
}

fn is_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|ft| ft.is_dir())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("app/src")).unwrap();
        fs::create_dir_all(root.join("app/Node_Modules/pkg")).unwrap();
        fs::create_dir_all(root.join(".git/objects")).unwrap();
        fs::create_dir_all(root.join("distribution")).unwrap();
        fs::write(root.join("app/src/index.js"), "const a = 1;").unwrap();
        fs::write(root.join("app/Node_Modules/pkg/index.js"), "x").unwrap();
        fs::write(root.join(".git/HEAD"), "ref").unwrap();
        fs::write(root.join("distribution/notes.md"), "# notes").unwrap();
        fs::write(root.join("build"), "a file named like an ignored dir").unwrap();
        dir
    }

    fn utf8(dir: &tempfile::TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    fn default_ignore() -> IgnoreSet {
        atlas_core::ScanConfig::default().ignore_set()
    }

    #[test]
    fn test_collect_files_skips_ignored_dirs() {
        let dir = fixture();
        let root = utf8(&dir);
        let files = DirectoryWalker::new(&root, default_ignore()).collect_files();
        let relative: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(&root).unwrap().as_str().to_owned())
            .collect();

        assert_eq!(relative, vec!["app/src/index.js", "build", "distribution/notes.md"]);
    }

    #[test]
    fn test_collect_dirs_excludes_root() {
        let dir = fixture();
        let root = utf8(&dir);
        let dirs = DirectoryWalker::new(&root, default_ignore()).collect_dirs();

        assert!(!dirs.contains(&root));
        assert!(dirs.contains(&root.join("app")));
        assert!(dirs.contains(&root.join("app/src")));
        assert!(!dirs.iter().any(|d| d.as_str().contains("Node_Modules")));
        assert!(!dirs.iter().any(|d| d.ends_with(".git")));
    }

    #[test]
    fn test_extra_ignores() {
        let dir = fixture();
        let root = utf8(&dir);
        let ignore = atlas_core::ScanConfig::default()
            .with_extra_ignored(["SRC"])
            .ignore_set();
        let files = DirectoryWalker::new(&root, ignore).collect_files();
        assert!(!files.iter().any(|f| f.ends_with("index.js")));
    }

    #[test]
    fn test_missing_root_is_empty() {
        let walker = DirectoryWalker::new(Utf8Path::new("/nonexistent/atlas/root"), IgnoreSet::default());
        assert!(walker.collect_files().is_empty());
    }

    #[test]
    fn test_with_follow_links() {
        let walker = DirectoryWalker::new(Utf8Path::new("."), IgnoreSet::default()).with_follow_links(true);
        assert!(walker.follow_links);
        assert_eq!(walker.root(), Utf8Path::new("."));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_link_does_not_stop_walk() {
        let dir = tempfile::tempdir().unwrap();
        let root = utf8(&dir);
        fs::create_dir_all(root.join("a")).unwrap();
        fs::create_dir_all(root.join("z")).unwrap();
        fs::write(root.join("a/one.js"), "1").unwrap();
        fs::write(root.join("z/two.js"), "2").unwrap();
        std::os::unix::fs::symlink(root.join("missing/target"), root.join("m")).unwrap();

        for follow in [false, true] {
            let files = DirectoryWalker::new(&root, default_ignore())
                .with_follow_links(follow)
                .collect_files();
            let relative: Vec<_> = files
                .iter()
                .map(|f| f.strip_prefix(&root).unwrap().as_str().to_owned())
                .collect();
            assert!(relative.contains(&"a/one.js".to_owned()), "follow={follow}");
            assert!(relative.contains(&"z/two.js".to_owned()), "follow={follow}");
        }
    }
}
