//! Parallel per-file analysis.
//!
//! [`FileAnalyzer`] turns the file list of one project into [`FileRecord`]s.
//! Files are processed with `rayon::par_iter()`; each worker owns its
//! record and the results are collected in walk order, so no state is
//! shared between workers apart from the atomic statistics.
//!
//! # Skip rules
//!
//! Applied in this order, each one short-circuiting the rest:
//!
//! 1. Ignored basename: nothing is recorded at all
//! 2. Technology labels are collected from the name (always)
//! 3. Larger than `max_file_size`: no parse, no hash
//! 4. Binary extension or empty: no parse (non-empty binaries are still hashed)
//! 5. Not valid UTF-8 or unreadable: no parse
//!
//! Skipped files are logged at debug level and never reported as errors.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use smallvec::SmallVec;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use atlas_core::{FileSummary, IdentifierDetail, ScanConfig, TechnologyTables};
use atlas_lexer::{Lexer, References, ScopedVariable};

use crate::error::ScanError;
use crate::stats::ScanStats;
use crate::technology::technologies_for_file;

/// Everything learned about one file of a project.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Path relative to the project root, `/`-separated.
    pub relative_path: String,
    /// Absolute path on disk.
    pub absolute_path: Utf8PathBuf,
    /// Technology labels derived from the file name.
    pub technologies: SmallVec<[String; 2]>,
    /// Whether the file takes part in whole-file duplicate detection.
    pub hashable: bool,
    /// Lexical facts, when the file was parsed.
    pub parsed: Option<ParsedFile>,
}

/// Lexical facts of a parsed file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// Flat name lists.
    pub summary: FileSummary,
    /// Variable declarations with resolved scopes.
    pub variables: Vec<ScopedVariable>,
    /// One record per extracted block.
    pub identifiers: Vec<IdentifierDetail>,
    /// Import and require targets.
    pub references: References,
}

/// Parallel file analyzer.
///
/// `FileAnalyzer` is `Send` and `Sync`; the lexer's compiled patterns are
/// shared by every worker.
#[derive(Debug, Clone, Copy)]
pub struct FileAnalyzer<'a> {
    config: &'a ScanConfig,
    tables: &'a TechnologyTables,
    lexer: Lexer,
    stats: &'a ScanStats,
}

impl<'a> FileAnalyzer<'a> {
    /// Creates an analyzer with the given limits, lookup tables and counters.
    #[must_use]
    pub const fn new(
        config: &'a ScanConfig,
        tables: &'a TechnologyTables,
        lexer: Lexer,
        stats: &'a ScanStats,
    ) -> Self {
        Self {
            config,
            tables,
            lexer,
            stats,
        }
    }

    /// Analyzes the files of one project in parallel.
    ///
    /// Records come back in the order of `paths`. Once `cancel` fires, the
    /// remaining files are dropped.
    #[must_use]
    pub fn analyze_files(
        &self,
        project_root: &Utf8Path,
        paths: &[Utf8PathBuf],
        cancel: &CancellationToken,
    ) -> Vec<FileRecord> {
        paths
            .par_iter()
            .filter_map(|path| {
                if cancel.is_cancelled() {
                    return None;
                }
                self.analyze_file(project_root, path)
            })
            .collect()
    }

    /// Analyzes a single file. Returns `None` for ignored basenames.
    #[must_use]
    pub fn analyze_file(&self, project_root: &Utf8Path, path: &Utf8Path) -> Option<FileRecord> {
        self.stats.increment_files_seen();

        let basename = path.file_name().unwrap_or_default();
        if self.config.is_ignored_file(basename) {
            self.stats.increment_files_skipped();
            debug!(path = %path, "Skipping ignored file");
            return None;
        }

        let mut record = FileRecord {
            relative_path: relative_path(project_root, path),
            absolute_path: path.to_owned(),
            technologies: technologies_for_file(self.tables, path)
                .into_iter()
                .map(str::to_owned)
                .collect(),
            hashable: false,
            parsed: None,
        };

        let size = match fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                self.skip(&ScanError::read(path, e));
                return Some(record);
            }
        };
        record.hashable = size > 0 && size <= self.config.max_file_size;

        match self.read_source(path, size) {
            Ok(Some(text)) => {
                record.parsed = Some(self.parse(&record.relative_path, path, &text));
                self.stats.increment_files_parsed();
            }
            Ok(None) => {
                self.stats.increment_files_skipped();
                debug!(path = %path, size, "Skipping binary or empty file");
            }
            Err(e) => self.skip(&e),
        }

        Some(record)
    }

    /// Reads a file's text if it should be parsed.
    fn read_source(&self, path: &Utf8Path, size: u64) -> Result<Option<String>, ScanError> {
        if size > self.config.max_file_size {
            return Err(ScanError::Oversized {
                path: path.to_owned(),
                size,
            });
        }

        let is_binary = path
            .extension()
            .is_some_and(|ext| self.config.is_binary_extension(ext));
        if is_binary || size == 0 {
            return Ok(None);
        }

        let bytes = fs::read(path).map_err(|e| ScanError::read(path, e))?;
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| ScanError::read(path, io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    fn parse(&self, relative: &str, path: &Utf8Path, text: &str) -> ParsedFile {
        let extraction = self.lexer.extract(text);
        self.stats.add_blocks(extraction.blocks.len() as u64);

        let summary = FileSummary {
            relative_path: relative.to_owned(),
            absolute_path: path.to_owned(),
            variables: extraction.variable_names(),
            functions: extraction.functions,
            classes: extraction.classes,
            methods: extraction.methods,
        };

        ParsedFile {
            summary,
            variables: extraction.variables,
            identifiers: extraction
                .blocks
                .into_iter()
                .map(|block| block.into_detail(relative))
                .collect(),
            references: extraction.references,
        }
    }

    fn skip(&self, error: &ScanError) {
        debug_assert!(error.is_recoverable());
        self.stats.increment_files_skipped();
        debug!(error = %error, "Skipping file");
    }
}

/// `path` relative to `root`, joined with `/` on every platform.
fn relative_path(root: &Utf8Path, path: &Utf8Path) -> String {
    path.strip_prefix(root).map_or_else(
        |_| path.as_str().to_owned(),
        |relative| {
            relative
                .components()
                .map(|component| component.as_str())
                .collect::<Vec<_>>()
                .join("/")
        },
    )
}

#[cfg(test)]
mod tests {
    use atlas_core::{BlockKind, ScopeKind};

    use super::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        root: Utf8PathBuf,
        config: ScanConfig,
        tables: TechnologyTables,
        stats: ScanStats,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
            Self {
                _dir: dir,
                root,
                config: ScanConfig::default(),
                tables: TechnologyTables::default(),
                stats: ScanStats::new(),
            }
        }

        fn write(&self, relative: &str, contents: &[u8]) -> Utf8PathBuf {
            let path = self.root.join(relative);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, contents).unwrap();
            path
        }

        fn analyzer(&self) -> FileAnalyzer<'_> {
            FileAnalyzer::new(&self.config, &self.tables, Lexer::new(10_000).unwrap(), &self.stats)
        }
    }

    #[test]
    fn test_parsed_file() {
        let fx = Fixture::new();
        let path = fx.write(
            "src/util.js",
            b"import x from '../beta/index';\nconst top = 1;\nfunction add(a,b){return a+b;}",
        );

        let record = fx.analyzer().analyze_file(&fx.root, &path).unwrap();
        assert_eq!(record.relative_path, "src/util.js");
        assert_eq!(record.technologies.as_slice(), ["JavaScript"]);
        assert!(record.hashable);

        let parsed = record.parsed.unwrap();
        assert_eq!(parsed.summary.functions, vec!["add"]);
        assert_eq!(parsed.summary.variables, vec!["top"]);
        assert_eq!(parsed.variables[0].scope, ScopeKind::Global);
        assert_eq!(parsed.identifiers.len(), 1);
        assert_eq!(parsed.identifiers[0].kind, BlockKind::Function);
        assert_eq!(parsed.identifiers[0].file, "src/util.js");
        assert_eq!(parsed.references.as_slice(), ["../beta/index"]);
    }

    #[test]
    fn test_ignored_basename_has_no_record() {
        let fx = Fixture::new();
        let path = fx.write("netlify.toml", b"[build]");
        assert!(fx.analyzer().analyze_file(&fx.root, &path).is_none());
        assert_eq!(fx.stats.snapshot().files_skipped, 1);
    }

    #[test]
    fn test_binary_is_tagged_and_hashable_but_not_parsed() {
        let fx = Fixture::new();
        let path = fx.write("assets/logo.png", b"\x89PNG\r\n\x1a\nfunction fake() {}");
        let record = fx.analyzer().analyze_file(&fx.root, &path).unwrap();
        assert!(record.parsed.is_none());
        assert!(record.hashable);
        assert!(record.technologies.is_empty());
    }

    #[test]
    fn test_empty_file_is_skipped() {
        let fx = Fixture::new();
        let path = fx.write("empty.js", b"");
        let record = fx.analyzer().analyze_file(&fx.root, &path).unwrap();
        assert!(record.parsed.is_none());
        assert!(!record.hashable);
        assert_eq!(record.technologies.as_slice(), ["JavaScript"]);
    }

    #[test]
    fn test_oversized_file_is_tagged_only() {
        let mut fx = Fixture::new();
        fx.config.max_file_size = 8;
        let path = fx.write("big.ts", b"const value = 123456789;");
        let record = fx.analyzer().analyze_file(&fx.root, &path).unwrap();
        assert!(record.parsed.is_none());
        assert!(!record.hashable);
        assert_eq!(record.technologies.as_slice(), ["TypeScript"]);
    }

    #[test]
    fn test_invalid_utf8_is_skipped() {
        let fx = Fixture::new();
        let path = fx.write("bad.js", &[0x66, 0xff, 0xfe, 0x7b]);
        let record = fx.analyzer().analyze_file(&fx.root, &path).unwrap();
        assert!(record.parsed.is_none());
        assert!(record.hashable);
    }

    #[test]
    fn test_analyze_files_preserves_order() {
        let fx = Fixture::new();
        let paths: Vec<_> = (0..20)
            .map(|i| fx.write(&format!("f{i:02}.js"), format!("const v{i} = {i};").as_bytes()))
            .collect();
        let records = fx.analyzer().analyze_files(&fx.root, &paths, &CancellationToken::new());
        let names: Vec<_> = records.iter().map(|r| r.relative_path.clone()).collect();
        let expected: Vec<_> = (0..20).map(|i| format!("f{i:02}.js")).collect();
        assert_eq!(names, expected);
        assert_eq!(fx.stats.snapshot().files_parsed, 20);
    }

    #[test]
    fn test_cancelled_analysis_returns_nothing() {
        let fx = Fixture::new();
        let path = fx.write("a.js", b"const a = 1;");
        let cancel = CancellationToken::new();
        cancel.cancel();
        assert!(fx.analyzer().analyze_files(&fx.root, &[path], &cancel).is_empty());
    }
}
