//! Core types, errors, and utilities for repo-atlas.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Error types for consistent error handling
//! - Configuration structures ([`ScanConfig`], [`TechnologyTables`], [`Config`])
//! - Domain types ([`Project`], [`FileSummary`], [`CodeBlock`], [`ScanReport`], ...)
//! - Type aliases for `FxHashMap`/`FxHashSet` and the [`ContentDigest`] fingerprint

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod hash;
pub mod types;

pub use config::{Config, IgnoreSet, ScanConfig, TechnologyTables};
pub use error::ConfigError;
pub use hash::{
    ContentDigest, FxHashMap, FxHashSet, fx_hash_map, fx_hash_map_with_capacity, fx_hash_set,
};
pub use types::{
    BlockKind, ByteSpan, CodeBlock, DuplicateEntry, EdgeKind, FileSummary, IdentifierDetail,
    Project, RelationshipEdge, ScanReport, ScopeKind, SharedIdentifierEntry, Strength,
    VariablesByScope,
};
