//! Thread-local parser pool for reusing tree-sitter Parser instances.
//!
//! Each rayon worker keeps one Java parser, created lazily on first use.
//! No locks: RefCell provides single-threaded mutable access.

use anyhow::Result;
use std::cell::RefCell;

thread_local! {
    static JAVA_PARSER: RefCell<Option<tree_sitter::Parser>> = const { RefCell::new(None) };
}

/// Run `f` with this thread's Java parser
pub fn with_parser<F, R>(f: F) -> Result<R>
where
    F: FnOnce(&mut tree_sitter::Parser) -> R,
{
    JAVA_PARSER.with(|parser_cell| {
        let mut parser_ref = parser_cell.borrow_mut();
        if parser_ref.is_none() {
            let mut parser = tree_sitter::Parser::new();
            parser.set_language(&tree_sitter_java::language())?;
            *parser_ref = Some(parser);
        }
        match parser_ref.as_mut() {
            Some(parser) => Ok(f(parser)),
            None => Err(anyhow::anyhow!("Java parser missing after initialization")),
        }
    })
}

/// Parse Java source with the pooled parser
///
/// Returns `None` when tree-sitter gives up on the input.
pub fn parse(source: &[u8]) -> Result<Option<tree_sitter::Tree>> {
    with_parser(|parser| parser.parse(source, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_is_reused_across_calls() {
        let first = parse(b"class A {}").unwrap().unwrap();
        let second = parse(b"class B { void m() {} }").unwrap().unwrap();
        assert_eq!(first.root_node().kind(), "program");
        assert_eq!(second.root_node().kind(), "program");
        assert!(!second.root_node().has_error());
    }

    #[test]
    fn test_pool_is_per_thread() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let source = format!("class T{} {{}}", i);
                    parse(source.as_bytes()).unwrap().is_some()
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
