//! Workspace scanner: project detection, lexical extraction, duplicate
//! detection and cross-project resolution.
//!
//! # Overview
//!
//! The main entry point is [`Scanner`], which runs the whole pipeline:
//!
//! - [`DirectoryWalker`]: directory traversal pruned by an ignore set
//! - [`ProjectDetector`]: marker-based project roots
//! - [`FileAnalyzer`]: parallel per-file extraction with rayon
//! - [`ProjectBuilder`]: folds file records into a [`Project`]
//! - [`FingerprintIndex`]: whole-file SHA-256 grouping across projects
//! - [`resolve_references`] / [`shared_identifiers`]: cross-project passes
//! - [`ScanStats`]: atomic statistics, fresh for every scan
//!
//! # Example
//!
//! ```no_run
//! use atlas_core::ScanConfig;
//! use atlas_scanner::Scanner;
//!
//! let config = ScanConfig::default().with_extra_ignored(["vendor"]);
//! let scanner = Scanner::new("./workspace", config, Default::default())?;
//!
//! let result = scanner.scan()?;
//! for project in &result.report.projects {
//!     println!("{}: {} files", project.name, project.files.len());
//! }
//! # Ok::<(), atlas_scanner::ScanError>(())
//! ```
//!
//! # Streaming API
//!
//! ```ignore
//! use atlas_scanner::{Scanner, ScanUpdate};
//! use tokio::sync::mpsc;
//!
//! let (tx, mut rx) = mpsc::channel(64);
//! let scanner_clone = scanner.clone();
//! tokio::task::spawn_blocking(move || scanner_clone.scan_streaming(tx));
//!
//! while let Some(update) = rx.recv().await {
//!     match update {
//!         ScanUpdate::ProjectsDetected(n) => println!("Found {n} projects"),
//!         ScanUpdate::ProjectScanned(summary) => println!("Scanned: {}", summary.name),
//!         ScanUpdate::Complete(result) => println!("Done: {}", result.stats.files_parsed),
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Scanner
//!     │
//!     ├── DirectoryWalker ─── ProjectDetector      (project roots)
//!     │
//!     ├── per project, in parallel:
//!     │       ├── VcsStatus                        (rayon::join)
//!     │       └── DirectoryWalker ─── FileAnalyzer ─── ProjectBuilder
//!     │
//!     ├── resolve_references
//!     ├── FingerprintIndex                         (parking_lot::Mutex)
//!     ├── shared_identifiers
//!     │
//!     └── ScanStats (atomic counters, one set per scan)
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod aggregate;
mod analyzer;
mod detector;
mod error;
mod fingerprint;
mod resolver;
mod stats;
mod technology;
mod vcs;
mod walker;

pub use aggregate::{HashCandidate, ProjectBuilder, build_report, project_names};
pub use analyzer::{FileAnalyzer, FileRecord, ParsedFile};
pub use detector::ProjectDetector;
pub use error::ScanError;
pub use fingerprint::FingerprintIndex;
pub use resolver::{matches_project_name, resolve_references, shared_identifiers};
pub use stats::{ScanStats, StatsSnapshot};
pub use technology::{MANIFEST_FILE, technologies_for_file, technologies_from_manifest};
pub use vcs::{GitStatus, NoVcs, VcsStatus};
pub use walker::DirectoryWalker;

use std::path::Path;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use atlas_core::{Config, IgnoreSet, Project, ScanConfig, ScanReport, TechnologyTables};
use atlas_lexer::Lexer;

/// A short description of one finished project, sent while scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    /// Project name.
    pub name: String,
    /// Project root directory.
    pub root_path: Utf8PathBuf,
    /// Number of parsed files.
    pub files: usize,
    /// Technology labels, sorted.
    pub technologies: Vec<String>,
    /// Result of the dirty check.
    pub has_uncommitted_changes: bool,
}

impl ProjectSummary {
    fn of(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            root_path: project.root_path.clone(),
            files: project.files.len(),
            technologies: project.technologies.iter().cloned().collect(),
            has_uncommitted_changes: project.has_uncommitted_changes,
        }
    }
}

/// Update sent during a streaming scan.
///
/// `Complete` is boxed since the report dwarfs the other variants.
#[derive(Debug)]
pub enum ScanUpdate {
    /// Number of project roots found (sent once, before extraction starts).
    ProjectsDetected(usize),

    /// A project finished extraction. Arrives in completion order.
    ProjectScanned(ProjectSummary),

    /// The scan finished.
    Complete(Box<ScanResult>),
}

/// Result of a completed scan.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// The report.
    pub report: ScanReport,
    /// Counters collected while producing it.
    pub stats: StatsSnapshot,
}

/// The workspace scanner.
///
/// `Scanner` is cheaply cloneable; clones share the VCS oracle. Every scan
/// rebuilds the report and its statistics from scratch, so clones may scan
/// concurrently.
#[derive(Debug, Clone)]
pub struct Scanner {
    root: Utf8PathBuf,
    config: ScanConfig,
    tables: TechnologyTables,
    vcs: Arc<dyn VcsStatus>,
}

impl Scanner {
    /// Creates a scanner for `root`.
    ///
    /// # Errors
    ///
    /// - [`ScanError::RootNotFound`] if `root` does not exist or cannot be
    ///   resolved to a canonical path
    /// - [`ScanError::NotADirectory`] if `root` is not a directory
    /// - [`ScanError::NonUtf8Path`] if `root` is not valid UTF-8
    /// - [`ScanError::Config`] if `config` fails validation
    pub fn new(
        root: impl AsRef<Path>,
        config: ScanConfig,
        tables: TechnologyTables,
    ) -> Result<Self, ScanError> {
        let root = root.as_ref();
        let utf8 = Utf8Path::from_path(root)
            .ok_or_else(|| ScanError::NonUtf8Path(root.to_path_buf()))?;

        let root = utf8.canonicalize_utf8().map_err(|e| {
            debug!(root = %utf8, error = %e, "Cannot resolve scan root");
            ScanError::RootNotFound(utf8.to_owned())
        })?;
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(utf8.to_owned()));
        }
        config.validate()?;

        let vcs: Arc<dyn VcsStatus> = if config.check_vcs {
            Arc::new(GitStatus)
        } else {
            Arc::new(NoVcs)
        };

        info!(root = %root, check_vcs = config.check_vcs, "Creating scanner");

        Ok(Self {
            root,
            config,
            tables,
            vcs,
        })
    }

    /// Creates a scanner from a loaded [`Config`].
    ///
    /// # Errors
    ///
    /// Same as [`Scanner::new`].
    pub fn from_config(root: impl AsRef<Path>, config: Config) -> Result<Self, ScanError> {
        Self::new(root, config.scan, config.technologies)
    }

    /// Replaces the VCS oracle.
    #[must_use]
    pub fn with_vcs(mut self, vcs: Arc<dyn VcsStatus>) -> Self {
        self.vcs = vcs;
        self
    }

    /// The canonical scan root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// The scan configuration.
    #[must_use]
    pub const fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scans the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the worker pool cannot be built.
    /// Per-file and per-project failures never surface here.
    pub fn scan(&self) -> Result<ScanResult, ScanError> {
        self.scan_with_cancel(&CancellationToken::new())
    }

    /// Scans the workspace, stopping early once `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Cancelled`] if the token fired before the report
    /// was complete; no partial report is produced.
    pub fn scan_with_cancel(&self, cancel: &CancellationToken) -> Result<ScanResult, ScanError> {
        self.run(cancel, None)
    }

    /// Scans the workspace, sending progress over `tx`.
    ///
    /// Updates arrive in this order:
    /// 1. [`ScanUpdate::ProjectsDetected`], once
    /// 2. [`ScanUpdate::ProjectScanned`], once per project
    /// 3. [`ScanUpdate::Complete`], once
    ///
    /// Must not be called from an async context; run it on a blocking task.
    /// If the receiver is dropped the scan stops early and still returns `Ok`.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Config`] if the worker pool cannot be built.
    #[allow(clippy::needless_pass_by_value)] // Sender is shared with rayon threads
    pub fn scan_streaming(&self, tx: mpsc::Sender<ScanUpdate>) -> Result<(), ScanError> {
        let cancel = CancellationToken::new();

        match self.run(&cancel, Some(&tx)) {
            Ok(result) => {
                // Receiver may be gone by now
                let _ = tx.blocking_send(ScanUpdate::Complete(Box::new(result)));
                Ok(())
            }
            Err(ScanError::Cancelled) if tx.is_closed() => {
                debug!("Receiver dropped, streaming scan stopped");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn run(
        &self,
        cancel: &CancellationToken,
        progress: Option<&mpsc::Sender<ScanUpdate>>,
    ) -> Result<ScanResult, ScanError> {
        match self.config.max_parallel_jobs {
            Some(jobs) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(jobs)
                    .build()
                    .map_err(|e| ScanError::config(format!("failed to build worker pool: {e}")))?;
                pool.install(|| self.execute(cancel, progress))
            }
            None => self.execute(cancel, progress),
        }
    }

    fn execute(
        &self,
        cancel: &CancellationToken,
        progress: Option<&mpsc::Sender<ScanUpdate>>,
    ) -> Result<ScanResult, ScanError> {
        info!(root = %self.root, "Starting scan");
        let stats = ScanStats::new();

        let notify = |update: ScanUpdate| {
            if let Some(tx) = progress {
                if tx.blocking_send(update).is_err() {
                    cancel.cancel();
                }
            }
        };

        let ignore = self.config.ignore_set();
        let dirs = DirectoryWalker::new(&self.root, ignore.clone())
            .with_follow_links(self.config.follow_links)
            .collect_dirs();
        let detector = ProjectDetector::new(&self.config);
        let roots = detector.detect(&self.root, &dirs);
        let names = detector.display_names(&self.root, &roots);

        stats.set_projects(roots.len() as u64);
        info!(root = %self.root, projects = roots.len(), "Detected projects");
        notify(ScanUpdate::ProjectsDetected(roots.len()));
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let lexer = Lexer::new(self.config.block_text_limit)?;
        let analyzer = FileAnalyzer::new(&self.config, &self.tables, lexer, &stats);

        let scanned: Vec<(Project, Vec<HashCandidate>)> = roots
            .par_iter()
            .zip(names)
            .enumerate()
            .map(|(index, (root, name))| {
                let builder = ProjectBuilder::new(index, name, root.clone());
                let (dirty, builder) = rayon::join(
                    || self.vcs.has_uncommitted_changes(root),
                    || self.analyze_project(builder, &analyzer, &ignore, cancel),
                );
                let (project, candidates) = builder.finish(dirty);
                notify(ScanUpdate::ProjectScanned(ProjectSummary::of(&project)));
                (project, candidates)
            })
            .collect();

        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }

        let (mut projects, candidates): (Vec<Project>, Vec<Vec<HashCandidate>>) =
            scanned.into_iter().unzip();
        let candidates: Vec<HashCandidate> = candidates.into_iter().flatten().collect();

        resolve_references(&mut projects);

        let index = FingerprintIndex::build(candidates, &stats, cancel);
        if cancel.is_cancelled() {
            return Err(ScanError::Cancelled);
        }
        let duplicates = index.duplicates();
        let shared = shared_identifiers(&projects);

        let report = build_report(projects, duplicates, shared);
        let stats = stats.snapshot();

        info!(
            projects = stats.projects,
            files_parsed = stats.files_parsed,
            files_skipped = stats.files_skipped,
            duplicates = report.duplicates.len(),
            shared_identifiers = report.shared_identifiers.len(),
            "Scan completed"
        );

        Ok(ScanResult { report, stats })
    }

    fn analyze_project(
        &self,
        mut builder: ProjectBuilder,
        analyzer: &FileAnalyzer<'_>,
        ignore: &IgnoreSet,
        cancel: &CancellationToken,
    ) -> ProjectBuilder {
        let root = builder.root_path().to_owned();
        let root = root.as_path();

        let files = DirectoryWalker::new(root, ignore.clone())
            .with_follow_links(self.config.follow_links)
            .collect_files();
        for record in analyzer.analyze_files(root, &files, cancel) {
            builder.add_record(record);
        }
        builder.add_technologies(technologies_from_manifest(&self.tables, root));

        debug!(project = %root, files = builder.file_count(), "Analyzed project");
        builder
    }
}

/// Scans `root` with default settings plus extra ignored directory names.
///
/// # Errors
///
/// Returns [`ScanError::RootNotFound`] or [`ScanError::NotADirectory`] for a
/// bad root.
///
/// # Examples
///
/// ```no_run
/// let report = atlas_scanner::scan("./workspace", &["vendor", "tmp"])?;
/// println!("{} projects", report.projects.len());
/// # Ok::<(), atlas_scanner::ScanError>(())
/// ```
pub fn scan<S: AsRef<str>>(
    root: impl AsRef<Path>,
    extra_ignored: &[S],
) -> Result<ScanReport, ScanError> {
    let config =
        ScanConfig::default().with_extra_ignored(extra_ignored.iter().map(AsRef::as_ref));
    Scanner::new(root, config, TechnologyTables::default())?
        .scan()
        .map(|result| result.report)
}
