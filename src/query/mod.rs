//! Cross-reference query engine
//!
//! Turns a (occurrence, reference kind) request into a traversal over the
//! [`GraphReader`](crate::graph::GraphReader) and returns a deterministically
//! ordered result set. Every traversal is read-only.

pub mod documentation;
mod engine;
pub mod kinds;
mod properties;

pub use engine::{canonical_hash, QueryEngine, ReferenceSummary};
pub use kinds::{FileReferenceKind, ReferenceKind};
pub use properties::properties;
