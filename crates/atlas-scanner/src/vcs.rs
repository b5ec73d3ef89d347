//! Version-control dirty checks.
//!
//! The scanner treats the check as a boolean oracle behind [`VcsStatus`]:
//! any failure reads as "clean" and never reaches the caller.

use std::fmt;
use std::process::Command;

use anyhow::{Context, Result, bail};
use camino::Utf8Path;
use tracing::debug;

/// Answers whether a project's working tree has uncommitted changes.
pub trait VcsStatus: Send + Sync + fmt::Debug {
    /// Returns `true` if the working tree at `project_root` is dirty.
    ///
    /// Must return `false` when there is no repository or the check fails.
    fn has_uncommitted_changes(&self, project_root: &Utf8Path) -> bool;
}

/// Shells out to `git status --porcelain`.
///
/// Any porcelain output counts as dirty, untracked files included. Projects
/// without a `.git` directory are clean.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitStatus;

impl GitStatus {
    fn porcelain(project_root: &Utf8Path) -> Result<String> {
        let output = Command::new("git")
            .args(["status", "--porcelain"])
            .current_dir(project_root)
            .output()
            .context("failed to run git status")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git status failed: {}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VcsStatus for GitStatus {
    fn has_uncommitted_changes(&self, project_root: &Utf8Path) -> bool {
        if !project_root.join(".git").is_dir() {
            return false;
        }

        match Self::porcelain(project_root) {
            Ok(stdout) => !stdout.trim().is_empty(),
            Err(e) => {
                debug!(path = %project_root, error = %e, "Treating failed git status as clean");
                false
            }
        }
    }
}

/// Reports every project as clean without running anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVcs;

impl VcsStatus for NoVcs {
    fn has_uncommitted_changes(&self, _project_root: &Utf8Path) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use camino::Utf8PathBuf;

    use super::*;

    #[test]
    fn test_no_git_dir_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        std::fs::write(root.join("index.js"), "x").unwrap();
        assert!(!GitStatus.has_uncommitted_changes(&root));
    }

    #[test]
    fn test_no_vcs() {
        assert!(!NoVcs.has_uncommitted_changes(Utf8Path::new("/anything")));
    }
}
