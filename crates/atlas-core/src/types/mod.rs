//! Domain types for repo-atlas.
//!
//! This module contains the records produced by a scan, from the transient
//! per-file [`CodeBlock`] up to the top-level [`ScanReport`].
//!
//! # Module Organization
//!
//! - [`scope`] - Block kinds and lexical scope kinds
//! - [`span`] - Inclusive byte ranges within a file
//! - [`block`] - Code blocks and identifier details
//! - [`project`] - Projects, their files and scope-grouped variables
//! - [`report`] - Duplicates, shared identifiers and the final report
//!
//! All public types are re-exported at this module level and at the crate root:
//!
//! ```
//! use atlas_core::{BlockKind, Project, ScanReport, ScopeKind};
//! ```

mod block;
mod project;
mod report;
mod scope;
mod span;

pub use block::{CodeBlock, IdentifierDetail};
pub use project::{FileSummary, Project, VariablesByScope};
pub use report::{
    DuplicateEntry, EdgeKind, RelationshipEdge, ScanReport, SharedIdentifierEntry, Strength,
};
pub use scope::{BlockKind, ScopeKind};
pub use span::ByteSpan;
