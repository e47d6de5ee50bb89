//! jxref: a Java cross-reference indexer
//!
//! jxref parses Java sources, binds every name to the symbol it denotes and
//! persists one occurrence row per syntactic occurrence into a SQLite
//! graph. Symbols are identified by 64-bit entity hashes computed from
//! their semantic key, so a declaration and all of its usages share a hash
//! without any lookup table. Inheritance, override and implementation edges
//! are stored as relations between hashes, and the [`query`] engine answers
//! navigation requests (definition, usages, callers, overrides, reads,
//! writes, ...) over the stored graph.
//!
//! # Position Conventions
//!
//! - **Line positions**: 1-indexed
//! - **Column positions**: 0-indexed bytes within the line
//! - **Byte offsets**: 0-indexed from file start
//!
//! # Pipeline
//!
//! ```text
//! source -> ingest (outline, universe, bind) -> SyntaxNode
//!        -> writer (identity, relations)     -> OccurrenceRecord
//!        -> graph (one transaction per file)  -> query
//! ```

pub mod binding;
pub mod common;
pub mod config;
pub mod error;
pub mod error_codes;
pub mod graph;
pub mod identity;
pub mod indexer;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod output;
pub mod query;
pub mod relations;
pub mod writer;

pub use binding::SyntaxNode;
pub use config::Config;
pub use error::{ConfigError, IndexError, QueryError, StoreError};
pub use graph::{GraphReader, SqliteGraph};
pub use indexer::{index_directory, index_sources, IndexOptions, IndexReport};
pub use model::{OccurrenceKind, SourceRange, SymbolKind};
pub use query::{FileReferenceKind, QueryEngine, ReferenceKind, ReferenceSummary};
