//! Semantic key construction.
//!
//! The key of a usage is built from the same binding components as the key
//! of its declaration, so both hash to the same entity. Unresolved components
//! are empty strings and still produce a key.

use crate::binding::{
    DeclaringType, MethodBinding, ScopeBinding, SyntaxNode, TypeName, VariableBinding,
    VariableOwner,
};

/// Key of a type or enum as it appears at an occurrence
///
/// Declarations pass their erased name; usages pass the display form that
/// carries generic arguments.
pub fn type_key(qualified: &str) -> String {
    qualified.to_string()
}

/// `decl:name(p1,p2)`
pub fn method_key(method: &MethodBinding) -> String {
    format!(
        "{}:{}({})",
        method.declaring.name,
        method.name,
        method.parameter_types.join(",")
    )
}

/// `decl:type:name`
pub fn field_key(declaring: &str, field_type: &TypeName, name: &str) -> String {
    format!("{}:{}:{}", declaring, field_type.display, name)
}

/// `decl:initializer@offset`
pub fn initializer_key(declaring: &DeclaringType, offset: usize) -> String {
    format!("{}:initializer@{}", declaring.name, offset)
}

/// Key of a method, constructor or initializer body
pub fn scope_key(scope: &ScopeBinding) -> String {
    match scope {
        ScopeBinding::Method(method) => method_key(method),
        ScopeBinding::Initializer { declaring, offset } => initializer_key(declaring, *offset),
    }
}

/// Key of a field, parameter or local
pub fn variable_key(variable: &VariableBinding) -> String {
    match &variable.owner {
        VariableOwner::Field(declaring) => {
            field_key(&declaring.name, &variable.var_type, &variable.name)
        }
        VariableOwner::ArrayLength => field_key("", &variable.var_type, &variable.name),
        VariableOwner::Scope(scope) => {
            let scope = scope.as_deref().map(scope_key).unwrap_or_default();
            format!("{}:{}:{}", scope, variable.var_type.display, variable.name)
        }
    }
}

/// `enum:name`
pub fn enum_constant_key(enum_type: &str, name: &str) -> String {
    format!("{}:{}", enum_type, name)
}

/// Semantic key of a bound node
pub fn entity_key(node: &SyntaxNode) -> String {
    match node {
        SyntaxNode::TypeDecl(n) => type_key(&n.qualified_name),
        SyntaxNode::TypeUsage(n) => type_key(&n.type_name.display),
        SyntaxNode::Import(n) => type_key(&n.qualified_name),
        SyntaxNode::EnumConstantDecl(n) => enum_constant_key(&n.enum_type.name, &n.name),
        SyntaxNode::EnumConstantUsage(n) => enum_constant_key(&n.enum_type.name, &n.name),
        SyntaxNode::MethodDecl(n) => method_key(&n.method),
        SyntaxNode::Call(n) => method_key(&n.callee),
        SyntaxNode::Initializer(n) => initializer_key(&n.declaring, n.offset()),
        SyntaxNode::VariableDecl(n) => variable_key(&n.variable),
        SyntaxNode::VariableUsage(n) => variable_key(&n.variable),
    }
}
