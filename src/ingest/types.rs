//! Type expressions as written in source, before name resolution.

use crate::common::node_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeExprKind {
    #[default]
    Named,
    Primitive,
    /// `?`, `? extends B` (`upper`) or `? super B`; the bound is `args[0]`
    Wildcard { upper: bool },
    /// `var` in a local declaration
    Inferred,
}

/// A syntactic type reference
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeExpr {
    /// Dotted name as written (`Map.Entry`, `java.util.List`, `int`)
    pub name: String,
    pub args: Vec<TypeExpr>,
    pub dims: usize,
    pub kind: TypeExprKind,
}

impl TypeExpr {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TypeExprKind::Primitive,
            ..Self::default()
        }
    }

    pub fn with_dims(mut self, dims: usize) -> Self {
        self.dims += dims;
        self
    }

    pub fn is_inferred(&self) -> bool {
        self.kind == TypeExprKind::Inferred
    }
}

/// Node kinds that denote a type
pub fn is_type_node(kind: &str) -> bool {
    matches!(
        kind,
        "type_identifier"
            | "scoped_type_identifier"
            | "generic_type"
            | "array_type"
            | "integral_type"
            | "floating_point_type"
            | "boolean_type"
            | "void_type"
            | "annotated_type"
            | "wildcard"
    )
}

/// Parse a type node; `None` when the node is not a type
pub fn parse_type(node: &tree_sitter::Node<'_>, source: &[u8]) -> Option<TypeExpr> {
    match node.kind() {
        "type_identifier" => {
            let text = node_text(node, source);
            if text == "var" {
                Some(TypeExpr {
                    name: text.to_string(),
                    kind: TypeExprKind::Inferred,
                    ..TypeExpr::default()
                })
            } else {
                Some(TypeExpr::named(text))
            }
        }
        "scoped_type_identifier" => {
            let mut parts = Vec::new();
            scoped_parts(node, source, &mut parts);
            Some(TypeExpr::named(parts.join(".")))
        }
        "generic_type" => {
            let mut cursor = node.walk();
            let mut base = None;
            let mut args = Vec::new();
            for child in node.named_children(&mut cursor) {
                match child.kind() {
                    "type_arguments" => args = parse_type_arguments(&child, source),
                    _ if base.is_none() => base = parse_type(&child, source),
                    _ => {}
                }
            }
            base.map(|mut base| {
                base.args = args;
                base
            })
        }
        "array_type" => {
            let element = node.child_by_field_name("element")?;
            let dims = node
                .child_by_field_name("dimensions")
                .map(|d| node_text(&d, source).matches('[').count())
                .unwrap_or(1);
            parse_type(&element, source).map(|e| e.with_dims(dims))
        }
        "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
            Some(TypeExpr::primitive(node_text(node, source)))
        }
        "annotated_type" => {
            let mut cursor = node.walk();
            let last = node
                .named_children(&mut cursor)
                .filter(|c| is_type_node(c.kind()))
                .last();
            last.and_then(|t| parse_type(&t, source))
        }
        "wildcard" => {
            let mut cursor = node.walk();
            let mut upper = true;
            let mut bound = None;
            for child in node.children(&mut cursor) {
                match child.kind() {
                    "super" => upper = false,
                    kind if is_type_node(kind) => bound = parse_type(&child, source),
                    _ => {}
                }
            }
            Some(TypeExpr {
                name: "?".to_string(),
                args: bound.into_iter().collect(),
                dims: 0,
                kind: TypeExprKind::Wildcard { upper },
            })
        }
        _ => None,
    }
}

/// Arguments of a `type_arguments` node; the diamond `<>` yields none
pub fn parse_type_arguments(node: &tree_sitter::Node<'_>, source: &[u8]) -> Vec<TypeExpr> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter_map(|c| parse_type(&c, source))
        .collect()
}

fn scoped_parts(node: &tree_sitter::Node<'_>, source: &[u8], parts: &mut Vec<String>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "type_identifier" | "identifier" => parts.push(node_text(&child, source).to_string()),
            "scoped_type_identifier" => scoped_parts(&child, source, parts),
            "generic_type" => {
                if let Some(base) = child.named_child(0) {
                    if base.kind() == "scoped_type_identifier" {
                        scoped_parts(&base, source, parts);
                    } else {
                        parts.push(node_text(&base, source).to_string());
                    }
                }
            }
            _ => {}
        }
    }
}
