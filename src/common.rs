//! Common helpers shared by the front end and the indexer.

use sha2::{Digest, Sha256};
use std::path::Path;

use crate::model::SourceRange;

/// Safely slice source bytes with bounds checking
///
/// # Example
/// ```rust
/// use jxref::common::safe_slice;
/// let source = b"hello world";
/// assert_eq!(safe_slice(source, 0, 5), Some(&b"hello"[..]));
/// assert_eq!(safe_slice(source, 10, 20), None);
/// ```
pub fn safe_slice<'a>(source: &'a [u8], start: usize, end: usize) -> Option<&'a [u8]> {
    if start <= end && end <= source.len() {
        Some(&source[start..end])
    } else {
        None
    }
}

/// Source text of a syntax node, empty when the span is not valid UTF-8
pub fn node_text<'a>(node: &tree_sitter::Node<'_>, source: &'a [u8]) -> &'a str {
    safe_slice(source, node.start_byte(), node.end_byte())
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .unwrap_or("")
}

/// Range of a syntax node (lines 1-indexed, columns 0-indexed)
pub fn node_range(node: &tree_sitter::Node<'_>) -> SourceRange {
    let start = node.start_position();
    let end = node.end_position();
    SourceRange {
        start_line: start.row + 1,
        start_col: start.column,
        end_line: end.row + 1,
        end_col: end.column,
        start_offset: node.start_byte(),
        end_offset: node.end_byte(),
    }
}

/// Collapse runs of whitespace into single spaces
pub fn squash_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// SHA-256 hex digest of file contents
pub fn compute_hash(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    hex::encode(hasher.finalize())
}

/// Store key of a file: path relative to `root`, `/`-separated
///
/// Paths outside `root` keep their full form.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            std::path::Component::RootDir => Some(String::new()),
            _ => None,
        })
        .collect();
    parts.join("/")
}
