//! CLI entry point for repo-atlas.
//!
//! Inventories a directory of independent projects and reports duplicated
//! files, shared identifiers and cross-project references.
//!
//! # Usage
//!
//! ```bash
//! atlas [OPTIONS] <COMMAND>
//!
//! # Scan and show a summary
//! atlas scan ~/code --exclude vendor,tmp
//!
//! # Write the full JSON report
//! atlas scan ~/code --format json --output atlas.json
//!
//! # Print the project relationship graph
//! atlas edges ~/code
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use atlas_core::{Config, ScanReport, Strength};
use atlas_scanner::{ScanResult, ScanUpdate, Scanner, StatsSnapshot, project_names};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{WrapErr, eyre};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Inventory a workspace of projects: duplicates, shared code, references.
#[derive(Parser)]
#[command(name = "atlas", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file with limits and lookup tables.
    #[arg(short, long, global = true, env = "ATLAS_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Scan a workspace and print a summary or the JSON report.
    Scan {
        #[command(flatten)]
        target: Target,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,

        /// Output file (defaults to stdout).
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },

    /// Print the weighted project relationship graph.
    Edges {
        #[command(flatten)]
        target: Target,
    },
}

/// Arguments shared by every scanning command.
#[derive(Args)]
struct Target {
    /// Workspace root to scan.
    dir: Utf8PathBuf,

    /// Extra directory names to skip (comma separated, case-insensitive).
    #[arg(short, long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Skip the git dirty check.
    #[arg(long)]
    no_vcs: bool,

    /// Limit the number of worker threads.
    #[arg(short, long)]
    jobs: Option<usize>,
}

/// Scan output format.
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary.
    Summary,
    /// The full report as JSON.
    Json,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects `RUST_LOG` if set; otherwise `debug` with `--verbose` and
/// `info` by default. Logs go to stderr so reports can be piped.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},ignore=warn"))
    });

    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(use_ansi)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

/// Loads the configuration file, if any, and applies the target's overrides.
fn build_scanner(config_path: Option<&Utf8PathBuf>, target: &Target) -> color_eyre::Result<Scanner> {
    let config = match config_path {
        Some(path) => Config::from_json_file(path)
            .wrap_err_with(|| format!("Failed to load configuration from {path}"))?,
        None => Config::default(),
    };

    let scan = config
        .scan
        .with_extra_ignored(&target.exclude)
        .with_vcs_check(!target.no_vcs)
        .with_max_parallel_jobs(target.jobs);

    Scanner::new(&target.dir, scan, config.technologies)
        .map_err(|e| eyre!("Failed to create scanner: {e}"))
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Runs a streaming scan on a blocking task, logging progress.
///
/// Ctrl-C drops the receiver, which stops the scan.
async fn run_streaming(scanner: Scanner) -> color_eyre::Result<Option<ScanResult>> {
    let (tx, mut rx) = mpsc::channel(64);
    let worker = tokio::task::spawn_blocking(move || scanner.scan_streaming(tx));

    let mut total = 0;
    let mut scanned = 0;
    let mut result = None;

    loop {
        tokio::select! {
            update = rx.recv() => {
                match update {
                    Some(ScanUpdate::ProjectsDetected(count)) => {
                        total = count;
                        info!(projects = count, "Detected projects");
                    }
                    Some(ScanUpdate::ProjectScanned(summary)) => {
                        scanned += 1;
                        debug!(
                            project = %summary.name,
                            files = summary.files,
                            dirty = summary.has_uncommitted_changes,
                            "Scanned project {scanned}/{total}"
                        );
                    }
                    Some(ScanUpdate::Complete(done)) => result = Some(*done),
                    None => break,
                }
            }
            _ = tokio::signal::ctrl_c() => {
                warn!("Interrupted, stopping scan");
                break;
            }
        }
    }

    // A closed channel makes the worker stop at its next update
    drop(rx);
    worker.await??;
    Ok(result)
}

/// Runs `atlas scan`.
async fn run_scan(
    scanner: Scanner,
    format: OutputFormat,
    output: Option<Utf8PathBuf>,
) -> color_eyre::Result<()> {
    info!(root = %scanner.root(), "Starting scan");

    let Some(result) = run_streaming(scanner).await? else {
        return Ok(());
    };

    let content = match format {
        OutputFormat::Summary => render_summary(&result.report, &result.stats),
        OutputFormat::Json => serde_json::to_string_pretty(&result.report)
            .map_err(|e| eyre!("Failed to serialize JSON: {e}"))?,
    };

    if let Some(output_path) = output {
        std::fs::write(output_path.as_std_path(), &content)?;
        info!(path = %output_path, "Report written");
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{content}")?;
    }

    Ok(())
}

/// Runs `atlas edges`.
async fn run_edges(scanner: Scanner) -> color_eyre::Result<()> {
    let Some(result) = run_streaming(scanner).await? else {
        return Ok(());
    };

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for edge in result.report.relationship_edges() {
        let kind = match edge.kind {
            atlas_core::EdgeKind::Duplicate => "duplicate",
            atlas_core::EdgeKind::Reference => "reference",
        };
        writeln!(handle, "{kind:<9}  {} -- {}  ({})", edge.source, edge.target, edge.weight)?;
    }

    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Renders a human-readable summary of a report.
fn render_summary(report: &ScanReport, stats: &StatsSnapshot) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let names = project_names(report);
    let hard = report
        .shared_identifiers
        .iter()
        .filter(|e| e.strength == Strength::Hard)
        .count();
    let dirty = report
        .projects
        .iter()
        .filter(|p| p.has_uncommitted_changes)
        .count();

    let _ = writeln!(out, "Workspace Summary");
    let _ = writeln!(out, "=================");
    let _ = writeln!(out);
    let _ = writeln!(out, "Projects:            {} ({dirty} with uncommitted changes)", names.len());
    let _ = writeln!(out, "Files parsed:        {} of {} seen", stats.files_parsed, stats.files_seen);
    let _ = writeln!(out, "Files hashed:        {}", stats.files_hashed);
    let _ = writeln!(out, "Duplicate files:     {}", report.duplicates.len());
    let _ = writeln!(
        out,
        "Shared identifiers:  {} ({hard} hard, {} soft)",
        report.shared_identifiers.len(),
        report.shared_identifiers.len() - hard
    );

    if !report.projects.is_empty() {
        let _ = writeln!(out);
        for project in &report.projects {
            let technologies: Vec<&str> = project.technologies.iter().map(String::as_str).collect();
            let marker = if project.has_uncommitted_changes { " *" } else { "" };
            let _ = writeln!(
                out,
                "  {}{marker}  {} files  [{}]",
                project.name,
                project.files.len(),
                technologies.join(", ")
            );
            if !project.references.is_empty() {
                let _ = writeln!(out, "      references: {}", project.references.join(", "));
            }
        }
    }

    for entry in report.shared_identifiers.iter().filter(|e| e.strength.is_hard()) {
        let projects: Vec<&str> = entry.projects.iter().map(String::as_str).collect();
        let _ = writeln!(
            out,
            "  hard {} {}: {}",
            entry.kind,
            entry.name,
            projects.join(", ")
        );
    }

    out
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    match cli.command {
        Commands::Scan {
            target,
            format,
            output,
        } => {
            let scanner = build_scanner(cli.config.as_ref(), &target)?;
            run_scan(scanner, format, output).await
        }
        Commands::Edges { target } => {
            let scanner = build_scanner(cli.config.as_ref(), &target)?;
            run_edges(scanner).await
        }
    }
}
