//! Entity identity and classification.
//!
//! An entity hash is a fingerprint of a semantic key (see [`keys`]). Hashes
//! are pure functions of the key, so workers indexing different files agree
//! on a symbol's identity without coordination.

pub mod classify;
pub mod keys;

pub use classify::{classify, classify_read_write, Classification};
pub use keys::entity_key;

use crate::binding::SyntaxNode;

/// 64-bit fingerprint of a semantic key
///
/// First 8 bytes (little endian) of the BLAKE3 digest.
pub fn entity_hash(key: &str) -> i64 {
    let digest = blake3::hash(key.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest.as_bytes()[..8]);
    i64::from_le_bytes(prefix)
}

/// Hash of a type by erased qualified name
///
/// Returns `None` for unresolved names and primitives, which have no
/// definition to link to.
pub fn type_hash(erased: &str) -> Option<i64> {
    let element = erased.trim_end_matches("[]");
    if element.is_empty() || crate::binding::is_primitive_name(element) {
        None
    } else {
        Some(entity_hash(element))
    }
}

/// Entity hash and definition-entity hash of a bound node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub entity_hash: i64,
    pub definition_entity_hash: i64,
}

/// Compute both hashes of a node
pub fn identify(node: &SyntaxNode) -> Identity {
    let key = entity_key(node);
    let entity = entity_hash(&key);
    let definition = match node {
        SyntaxNode::TypeDecl(n) => match n.enclosing.last() {
            Some(outermost) => entity_hash(outermost),
            None => entity,
        },
        SyntaxNode::TypeUsage(n) => entity_hash(&n.type_name.erased),
        SyntaxNode::Import(n) => entity_hash(&n.qualified_name),
        SyntaxNode::EnumConstantDecl(n) => entity_hash(&n.enum_type.outermost),
        SyntaxNode::EnumConstantUsage(n) => entity_hash(&n.enum_type.outermost),
        SyntaxNode::MethodDecl(n) => entity_hash(&n.method.declaring.outermost),
        SyntaxNode::Call(n) => entity_hash(&n.callee.declaring.outermost),
        SyntaxNode::Initializer(n) => entity_hash(&n.declaring.outermost),
        SyntaxNode::VariableDecl(n) => variable_definition_hash(&n.variable, entity),
        SyntaxNode::VariableUsage(n) => variable_definition_hash(&n.variable, entity),
    };
    if key.starts_with(':') || key.is_empty() {
        tracing::debug!(key = %key, "entity key has unresolved declaring component");
    }
    Identity {
        entity_hash: entity,
        definition_entity_hash: definition,
    }
}

fn variable_definition_hash(variable: &crate::binding::VariableBinding, entity: i64) -> i64 {
    use crate::binding::VariableOwner;
    match &variable.owner {
        VariableOwner::Field(declaring) => entity_hash(&declaring.outermost),
        VariableOwner::ArrayLength => entity,
        VariableOwner::Scope(Some(scope)) => entity_hash(&scope.declaring().outermost),
        VariableOwner::Scope(None) => entity,
    }
}

/// Hash of the body a node lives in, if any
pub fn scope_hash(node: &SyntaxNode) -> Option<i64> {
    node.scope()
        .map(|scope| entity_hash(&keys::scope_key(scope)))
}
