//! Java front end.
//!
//! Two passes over the parsed sources:
//! 1. [`outline`]: per file, every type declaration and member signature
//! 2. [`java`]: per file, bound [`SyntaxNode`]s resolved against the
//!    [`TypeUniverse`] built from all outlines
//!
//! Both passes are pure functions of (path, source, universe) and run on
//! worker threads.

pub mod java;
pub mod outline;
pub mod pool;
pub mod types;
pub mod universe;

pub use outline::FileOutline;
pub use universe::{ResolvedType, TypeUniverse};

use crate::binding::SyntaxNode;

/// A Java source file and its syntax tree
pub struct ParsedFile {
    /// Store key: path relative to the index root
    pub path: String,
    pub source: Vec<u8>,
    pub tree: tree_sitter::Tree,
}

impl ParsedFile {
    /// Parse a source file with this thread's pooled parser
    pub fn parse(path: impl Into<String>, source: Vec<u8>) -> anyhow::Result<Self> {
        let path = path.into();
        let tree = pool::parse(&source)?
            .ok_or_else(|| anyhow::anyhow!("tree-sitter returned no tree for {}", path))?;
        Ok(Self { path, source, tree })
    }

    /// Whether the tree contains syntax errors
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    pub fn outline(&self) -> FileOutline {
        outline::outline(&self.path, &self.tree, &self.source)
    }

    pub fn bind(&self, universe: &TypeUniverse) -> Vec<SyntaxNode> {
        java::bind(&self.path, &self.tree, &self.source, universe)
    }
}

/// Outline, resolve and bind a set of in-memory sources
///
/// Convenience for tests and tools that index without a store.
pub fn bind_sources(
    sources: &[(&str, &str)],
) -> anyhow::Result<(TypeUniverse, Vec<(String, Vec<SyntaxNode>)>)> {
    let parsed = sources
        .iter()
        .map(|(path, source)| ParsedFile::parse(*path, source.as_bytes().to_vec()))
        .collect::<anyhow::Result<Vec<_>>>()?;
    let universe = TypeUniverse::build(parsed.iter().map(ParsedFile::outline).collect());
    let bound = parsed
        .iter()
        .map(|file| (file.path.clone(), file.bind(&universe)))
        .collect();
    Ok((universe, bound))
}
