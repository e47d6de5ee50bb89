//! Pass 2: bind a Java syntax tree into [`SyntaxNode`]s.
//!
//! The binder walks the tree once, keeping a stack of enclosing types, a
//! stack of bodies (methods, constructors, initializers, field
//! initializers) and, inside each body, lexical blocks of locals. Every
//! expression walk returns its static type when it can be determined, so
//! method calls resolve against the receiver's type.
//!
//! Names that cannot be resolved degrade to empty components; the node is
//! still emitted.

use std::sync::Arc;
use tracing::debug;

use super::outline::{formal_params, import_decl, is_type_declaration, ENUM_CONSTANT_MODIFIERS};
use super::types::{is_type_node, parse_type, TypeExpr};
use super::universe::{ResolvedType, Scope, TypeUniverse};
use crate::binding::{
    CallNode, DeclaringType, EnumConstantDeclNode, EnumConstantUsageNode, ImportNode,
    InitializerNode, MethodBinding, MethodDeclNode, NodeSpan, ScopeBinding, SyntaxNode,
    TypeDeclNode, TypeFlavor, TypeName, TypeUsageNode, UsageContext, VariableBinding,
    VariableDeclNode, VariableOwner, VariableUsageNode,
};
use crate::common::{node_range, node_text, safe_slice, squash_whitespace};
use crate::model::{Modifiers, SourceRange, VariableRole};

/// Bind every symbol-bearing node of one file
pub fn bind(
    path: &str,
    tree: &tree_sitter::Tree,
    source: &[u8],
    universe: &TypeUniverse,
) -> Vec<SyntaxNode> {
    let mut binder = Binder {
        path,
        source,
        universe,
        nodes: Vec::new(),
        types: Vec::new(),
        bodies: Vec::new(),
        switch_enums: Vec::new(),
    };
    binder.walk(tree.root_node());
    binder.nodes
}

/// A method, constructor, initializer or field-initializer body
struct Body {
    scope: Option<Arc<ScopeBinding>>,
    type_params: Vec<(String, String)>,
    blocks: Vec<Vec<VariableBinding>>,
    /// Number of enclosing types when the body was entered
    depth: usize,
}

enum NameHit {
    Variable(VariableBinding),
    EnumConstant {
        enum_type: DeclaringType,
        ordinal: usize,
    },
}

struct Binder<'u, 's> {
    path: &'s str,
    source: &'s [u8],
    universe: &'u TypeUniverse,
    nodes: Vec<SyntaxNode>,
    types: Vec<&'u ResolvedType>,
    bodies: Vec<Body>,
    /// Enum type of each enclosing switch, when the selector is an enum
    switch_enums: Vec<Option<String>>,
}

impl<'u, 's> Binder<'u, 's> {
    fn text(&self, node: &tree_sitter::Node<'_>) -> &'s str {
        node_text(node, self.source)
    }

    fn span(&self, node: &tree_sitter::Node<'_>, text: impl Into<String>) -> NodeSpan {
        NodeSpan {
            range: node_range(node),
            text: text.into(),
            visible: true,
        }
    }

    fn current_type(&self) -> Option<&'u ResolvedType> {
        self.types.last().copied()
    }

    /// Body of the innermost type the walk is in, if any
    fn current_scope(&self) -> Option<Arc<ScopeBinding>> {
        self.bodies
            .last()
            .filter(|b| b.depth == self.types.len())
            .and_then(|b| b.scope.clone())
    }

    fn visible_type_params(&self) -> Vec<(String, String)> {
        self.bodies
            .iter()
            .filter(|b| b.depth == self.types.len())
            .flat_map(|b| b.type_params.iter().cloned())
            .collect()
    }

    fn resolve_expr(&self, expr: &TypeExpr) -> TypeName {
        let params = self.visible_type_params();
        let scope = Scope::new(self.path, self.current_type().map(|t| t.qualified.as_str()))
            .with_method_type_params(&params);
        self.universe.resolve(expr, &scope)
    }

    /// A bare identifier naming a type variable in scope
    fn is_type_variable(&self, node: &tree_sitter::Node<'_>) -> bool {
        if node.kind() != "type_identifier" {
            return false;
        }
        let params = self.visible_type_params();
        let scope = Scope::new(self.path, self.current_type().map(|t| t.qualified.as_str()))
            .with_method_type_params(&params);
        self.universe.is_type_param(self.text(node), &scope)
    }

    fn resolve_simple(&self, name: &str) -> Option<String> {
        let scope = Scope::new(self.path, self.current_type().map(|t| t.qualified.as_str()));
        self.universe.resolve_simple(name, &scope)
    }

    fn push_body(&mut self, scope: Option<Arc<ScopeBinding>>, type_params: Vec<(String, String)>) {
        self.bodies.push(Body {
            scope,
            type_params,
            blocks: vec![Vec::new()],
            depth: self.types.len(),
        });
    }

    fn push_block(&mut self) {
        if let Some(body) = self.bodies.last_mut() {
            body.blocks.push(Vec::new());
        }
    }

    fn pop_block(&mut self) {
        if let Some(body) = self.bodies.last_mut() {
            body.blocks.pop();
        }
    }

    fn walk_children(&mut self, node: tree_sitter::Node<'_>) {
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            self.walk(child);
        }
    }

    /// Walk a node, returning the static type of an expression
    fn walk(&mut self, node: tree_sitter::Node<'_>) -> Option<TypeName> {
        let kind = node.kind();
        if is_type_declaration(kind) {
            self.type_declaration(node);
            return None;
        }
        match kind {
            "import_declaration" => {
                self.import(node);
                None
            }
            "package_declaration" | "line_comment" | "block_comment" | "comment" => None,
            "break_statement" | "continue_statement" => None,
            "labeled_statement" => {
                let mut cursor = node.walk();
                let statements: Vec<_> = node
                    .named_children(&mut cursor)
                    .filter(|c| c.kind() != "identifier")
                    .collect();
                for statement in statements {
                    self.walk(statement);
                }
                None
            }
            "element_value_pair" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.walk(value);
                }
                None
            }
            "field_declaration" | "constant_declaration" => {
                self.field_declaration(node);
                None
            }
            "method_declaration"
            | "constructor_declaration"
            | "compact_constructor_declaration"
            | "annotation_type_element_declaration" => {
                self.method_declaration(node);
                None
            }
            "static_initializer" => {
                self.initializer(node, true);
                None
            }
            "block" if node.parent().is_some_and(|p| p.kind() == "class_body") => {
                self.initializer(node, false);
                None
            }
            "enum_constant" => {
                self.enum_constant(node);
                None
            }
            "marker_annotation" | "annotation" => {
                self.annotation(node);
                None
            }
            "block" | "for_statement" | "switch_block" | "try_with_resources_statement" => {
                self.push_block();
                self.walk_children(node);
                self.pop_block();
                None
            }
            "local_variable_declaration" => {
                self.local_declaration(node);
                None
            }
            "resource" => {
                self.resource(node);
                None
            }
            "enhanced_for_statement" => {
                self.enhanced_for(node);
                None
            }
            "catch_clause" => {
                self.catch_clause(node);
                None
            }
            "lambda_expression" => {
                self.lambda(node);
                None
            }
            "switch_expression" | "switch_statement" => self.switch(node),
            "switch_label" => {
                self.switch_label(node);
                None
            }
            "type_pattern" => {
                self.type_pattern(node);
                None
            }
            "identifier" => self.identifier(node),
            "this" => self.current_type().map(|t| TypeName::plain(t.qualified.clone())),
            "super" => self.current_super(),
            "field_access" => self.field_access(node),
            "method_invocation" => self.method_invocation(node),
            "object_creation_expression" => self.object_creation(node),
            "explicit_constructor_invocation" => {
                self.explicit_constructor_invocation(node);
                None
            }
            "method_reference" => {
                if let Some(target) = node.named_child(0) {
                    if self.type_reference(target).is_none() {
                        self.walk(target);
                    }
                }
                None
            }
            "assignment_expression" => {
                let left = node.child_by_field_name("left").and_then(|l| self.walk(l));
                if let Some(right) = node.child_by_field_name("right") {
                    self.walk(right);
                }
                left
            }
            "update_expression" => {
                let mut cursor = node.walk();
                let operand = node.named_children(&mut cursor).next();
                operand.and_then(|o| self.walk(o))
            }
            "unary_expression" => {
                let operator = node
                    .child_by_field_name("operator")
                    .map(|o| self.text(&o))
                    .unwrap_or_default();
                let operand = node.child_by_field_name("operand").and_then(|o| self.walk(o));
                if operator == "!" {
                    Some(TypeName::plain("boolean"))
                } else {
                    operand
                }
            }
            "binary_expression" => self.binary(node),
            "parenthesized_expression" => {
                let mut cursor = node.walk();
                let inner = node.named_children(&mut cursor).next();
                inner.and_then(|i| self.walk(i))
            }
            "cast_expression" => {
                let ty = node.child_by_field_name("type").and_then(|t| self.type_usages(t));
                if let Some(value) = node.child_by_field_name("value") {
                    self.walk(value);
                }
                ty
            }
            "ternary_expression" => {
                if let Some(condition) = node.child_by_field_name("condition") {
                    self.walk(condition);
                }
                let consequence = node
                    .child_by_field_name("consequence")
                    .and_then(|c| self.walk(c));
                let alternative = node
                    .child_by_field_name("alternative")
                    .and_then(|a| self.walk(a));
                consequence.or(alternative)
            }
            "array_access" => {
                let array = node.child_by_field_name("array").and_then(|a| self.walk(a));
                if let Some(index) = node.child_by_field_name("index") {
                    self.walk(index);
                }
                array.and_then(|a| component_type(&a))
            }
            "array_creation_expression" => self.array_creation(node),
            "class_literal" => {
                if let Some(ty) = node.named_child(0) {
                    self.type_usages(ty);
                }
                Some(TypeName::plain("java.lang.Class"))
            }
            "instanceof_expression" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.walk(left);
                }
                let ty = node.child_by_field_name("right").and_then(|r| self.type_usages(r));
                if let Some(name) = node.child_by_field_name("name") {
                    self.declare_local(name, ty.unwrap_or_default(), true, VariableRole::Local);
                } else if let Some(pattern) = node.child_by_field_name("pattern") {
                    self.walk(pattern);
                }
                Some(TypeName::plain("boolean"))
            }
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal" => {
                let text = self.text(&node);
                if text.ends_with(['l', 'L']) {
                    Some(TypeName::plain("long"))
                } else {
                    Some(TypeName::plain("int"))
                }
            }
            "decimal_floating_point_literal" | "hex_floating_point_literal" => {
                let text = self.text(&node);
                if text.ends_with(['f', 'F']) {
                    Some(TypeName::plain("float"))
                } else {
                    Some(TypeName::plain("double"))
                }
            }
            "string_literal" | "text_block" | "string_fragment" => {
                Some(TypeName::plain("java.lang.String"))
            }
            "character_literal" => Some(TypeName::plain("char")),
            "true" | "false" => Some(TypeName::plain("boolean")),
            "null_literal" => None,
            kind if is_type_node(kind) => self.type_usages(node),
            _ => {
                self.walk_children(node);
                None
            }
        }
    }

    fn import(&mut self, node: tree_sitter::Node<'_>) {
        if let Some(import) = import_decl(&node, self.source) {
            let span = self.span(&node, import.name.clone());
            self.nodes.push(SyntaxNode::Import(ImportNode {
                span,
                qualified_name: import.name,
                is_static: import.is_static,
                is_on_demand: import.is_on_demand,
            }));
        }
    }

    fn annotation(&mut self, node: tree_sitter::Node<'_>) {
        if let Some(name) = node.child_by_field_name("name") {
            let written = squash_whitespace(self.text(&name)).replace(' ', "");
            let scope = Scope::new(self.path, self.current_type().map(|t| t.qualified.as_str()));
            let resolved = self
                .universe
                .resolve_name(&written, &scope)
                .map(TypeName::plain)
                .unwrap_or_default();
            self.emit_type_usage(&name, resolved);
        }
        if let Some(arguments) = node.child_by_field_name("arguments") {
            self.walk_children(arguments);
        }
    }

    fn walk_modifiers(&mut self, node: &tree_sitter::Node<'_>) {
        let mut cursor = node.walk();
        let modifiers: Vec<_> = node
            .children(&mut cursor)
            .filter(|c| c.kind() == "modifiers")
            .collect();
        for modifier in modifiers {
            self.walk_children(modifier);
        }
    }

    fn type_declaration(&mut self, node: tree_sitter::Node<'_>) {
        let Some(resolved) = self.universe.type_at(self.path, node.start_byte()) else {
            debug!("No outline for type at {}:{}", self.path, node.start_byte());
            return;
        };
        let span = self.span(&node, header_text(&node, self.source));
        self.emit_type_decl(resolved, span, doc_comment(&node, self.source));
        self.walk_modifiers(&node);

        let mut cursor = node.walk();
        let headers: Vec<_> = node
            .named_children(&mut cursor)
            .filter(|c| {
                matches!(
                    c.kind(),
                    "superclass" | "super_interfaces" | "extends_interfaces" | "type_parameters"
                )
            })
            .collect();

        self.types.push(resolved);
        for header in headers {
            self.type_usages_within(header);
        }
        if resolved.flavor == TypeFlavor::Record {
            self.record_components(node, resolved);
        }
        if let Some(ctor) = resolved.constructors.iter().find(|c| c.implicit) {
            if let Some(name) = node.child_by_field_name("name") {
                let span = NodeSpan {
                    range: node_range(&name),
                    text: resolved.simple.clone(),
                    visible: false,
                };
                self.nodes.push(SyntaxNode::MethodDecl(MethodDeclNode {
                    span,
                    method: resolved.method_binding(ctor),
                    has_body: true,
                    supertypes: resolved.supertypes(),
                    doc: None,
                }));
            }
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.walk_children(body);
        }
        self.types.pop();
    }

    fn emit_type_decl(&mut self, resolved: &ResolvedType, span: NodeSpan, doc: Option<String>) {
        self.nodes.push(SyntaxNode::TypeDecl(TypeDeclNode {
            span,
            qualified_name: resolved.qualified.clone(),
            simple_name: resolved.simple.clone(),
            flavor: resolved.flavor,
            modifiers: resolved.modifiers,
            enclosing: resolved.enclosing.clone(),
            local: resolved.local,
            supertypes: resolved.supertypes(),
            doc,
        }));
    }

    /// Anonymous class body of an object creation or enum constant
    fn anonymous_body(&mut self, owner: &tree_sitter::Node<'_>, body: tree_sitter::Node<'_>) {
        let Some(resolved) = self.universe.type_at(self.path, body.start_byte()) else {
            self.walk_children(body);
            return;
        };
        let range = span_between(owner, &body);
        let header = safe_slice(self.source, owner.start_byte(), body.start_byte())
            .and_then(|b| std::str::from_utf8(b).ok())
            .map(squash_whitespace)
            .unwrap_or_default();
        let span = NodeSpan {
            range,
            text: header,
            visible: true,
        };
        self.emit_type_decl(resolved, span, None);
        self.types.push(resolved);
        self.walk_children(body);
        self.types.pop();
    }

    fn record_components(&mut self, node: tree_sitter::Node<'_>, owner: &ResolvedType) {
        for param in formal_params(&node, self.source) {
            let Some(name) = param.name else { continue };
            if let Some(ty) = param.type_node {
                self.type_usages(ty);
            }
            let Some(field) = owner.field_at(param.node.start_byte()) else {
                continue;
            };
            let variable = VariableBinding {
                name: field.name.clone(),
                var_type: field.ty.clone(),
                modifiers: field.modifiers,
                role: VariableRole::Field,
                owner: VariableOwner::Field(owner.declaring()),
            };
            let span = self.span(&param.node, self.text(&name));
            self.nodes.push(SyntaxNode::VariableDecl(VariableDeclNode {
                span,
                variable,
                has_initializer: false,
                doc: None,
            }));
        }
    }

    fn field_declaration(&mut self, node: tree_sitter::Node<'_>) {
        let Some(owner) = self.current_type() else {
            return;
        };
        let doc = doc_comment(&node, self.source);
        self.walk_modifiers(&node);
        if let Some(ty) = node.child_by_field_name("type") {
            self.type_usages(ty);
        }
        let mut cursor = node.walk();
        let declarators: Vec<_> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();
        for declarator in declarators {
            let Some(name) = declarator.child_by_field_name("name") else {
                continue;
            };
            let value = declarator.child_by_field_name("value");
            if let Some(field) = owner.field_at(declarator.start_byte()) {
                let variable = VariableBinding {
                    name: field.name.clone(),
                    var_type: field.ty.clone(),
                    modifiers: field.modifiers,
                    role: VariableRole::Field,
                    owner: VariableOwner::Field(owner.declaring()),
                };
                let span = self.span(&declarator, self.text(&name));
                self.nodes.push(SyntaxNode::VariableDecl(VariableDeclNode {
                    span,
                    variable,
                    has_initializer: value.is_some(),
                    doc: doc.clone(),
                }));
            }
            if let Some(value) = value {
                self.push_body(None, Vec::new());
                self.walk(value);
                self.bodies.pop();
            }
        }
    }

    fn method_declaration(&mut self, node: tree_sitter::Node<'_>) {
        let Some(owner) = self.current_type() else {
            return;
        };
        let Some(shape) = owner.callable_at(node.start_byte()) else {
            debug!("No outline for callable at {}:{}", self.path, node.start_byte());
            return;
        };
        let method = owner.method_binding(shape);
        let body = node.child_by_field_name("body");
        let has_body = body.is_some() || method.is_constructor;
        let span = self.span(&node, header_text(&node, self.source));
        self.nodes.push(SyntaxNode::MethodDecl(MethodDeclNode {
            span,
            method: method.clone(),
            has_body,
            supertypes: owner.supertypes(),
            doc: doc_comment(&node, self.source),
        }));
        self.walk_modifiers(&node);

        let scope = Arc::new(ScopeBinding::Method(method));
        self.push_body(Some(scope), shape.type_params.clone());

        let mut cursor = node.walk();
        let signature_types: Vec<_> = node
            .named_children(&mut cursor)
            .filter(|c| matches!(c.kind(), "type_parameters" | "throws"))
            .collect();
        for child in signature_types {
            self.type_usages_within(child);
        }
        if let Some(ty) = node.child_by_field_name("type") {
            self.type_usages(ty);
        }
        if node.kind() != "compact_constructor_declaration" {
            for (param, ty) in formal_params(&node, self.source)
                .into_iter()
                .zip(shape.params.iter())
            {
                self.walk_modifiers(&param.node);
                if let Some(ty_node) = param.type_node {
                    self.type_usages(ty_node);
                }
                if let Some(name) = param.name {
                    self.declare_variable(
                        &param.node,
                        self.text(&name),
                        ty.clone(),
                        false,
                        VariableRole::Parameter,
                    );
                }
            }
        }
        if let Some(body) = body {
            self.walk(body);
        }
        self.bodies.pop();
    }

    fn initializer(&mut self, node: tree_sitter::Node<'_>, is_static: bool) {
        let Some(owner) = self.current_type() else {
            return;
        };
        let declaring = owner.declaring();
        let text = if is_static { "static" } else { "{" };
        let span = self.span(&node, text);
        let initializer = InitializerNode {
            span,
            declaring: declaring.clone(),
            is_static,
        };
        let scope = Arc::new(ScopeBinding::Initializer {
            declaring,
            offset: initializer.offset(),
        });
        self.nodes.push(SyntaxNode::Initializer(initializer));
        self.push_body(Some(scope), Vec::new());
        // An instance initializer is the block itself; walking it would re-enter here
        self.walk_children(node);
        self.bodies.pop();
    }

    fn enum_constant(&mut self, node: tree_sitter::Node<'_>) {
        let Some(owner) = self.current_type() else {
            return;
        };
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let constant = self.text(&name).to_string();
        self.walk_modifiers(&node);
        if let Some(ordinal) = owner.ordinal_of(&constant) {
            let span = self.span(&node, constant.clone());
            self.nodes.push(SyntaxNode::EnumConstantDecl(EnumConstantDeclNode {
                span,
                name: constant,
                enum_type: owner.declaring(),
                ordinal,
                modifiers: ENUM_CONSTANT_MODIFIERS,
                doc: doc_comment(&node, self.source),
            }));
        }
        self.push_body(None, Vec::new());
        let args = node
            .child_by_field_name("arguments")
            .map(|a| self.arguments(a))
            .unwrap_or_default();
        self.bodies.pop();
        let callee = self
            .universe
            .find_constructor(&owner.qualified, &args)
            .map(|c| c.binding())
            .unwrap_or_else(|| best_effort_constructor(&owner.qualified, &args));
        let call_end = node.child_by_field_name("arguments").unwrap_or(name);
        let span = NodeSpan {
            range: span_between(&name, &call_end),
            text: owner.simple.clone(),
            visible: node.child_by_field_name("arguments").is_some(),
        };
        self.nodes.push(SyntaxNode::Call(CallNode {
            span,
            callee,
            scope: None,
        }));
        if let Some(body) = node.child_by_field_name("body") {
            self.anonymous_body(&node, body);
        }
    }

    fn local_declaration(&mut self, node: tree_sitter::Node<'_>) {
        self.walk_modifiers(&node);
        let declared = node.child_by_field_name("type");
        let declared_type = declared.and_then(|t| {
            let expr = parse_type(&t, self.source)?;
            if expr.is_inferred() {
                None
            } else {
                self.type_usages(t)
            }
        });
        let mut cursor = node.walk();
        let declarators: Vec<_> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();
        for declarator in declarators {
            let Some(name) = declarator.child_by_field_name("name") else {
                continue;
            };
            let value = declarator.child_by_field_name("value");
            let inferred = value.and_then(|v| self.walk(v));
            let dims = declarator
                .child_by_field_name("dimensions")
                .map(|d| self.text(&d).matches('[').count())
                .unwrap_or(0);
            let ty = match &declared_type {
                Some(ty) if dims > 0 => array_of(ty, dims),
                Some(ty) => ty.clone(),
                None => inferred.unwrap_or_default(),
            };
            self.declare_variable(
                &declarator,
                self.text(&name),
                ty,
                value.is_some(),
                VariableRole::Local,
            );
        }
    }

    fn resource(&mut self, node: tree_sitter::Node<'_>) {
        let (Some(ty), Some(name)) = (
            node.child_by_field_name("type"),
            node.child_by_field_name("name"),
        ) else {
            self.walk_children(node);
            return;
        };
        let inferred = node.child_by_field_name("value").and_then(|v| self.walk(v));
        let declared = match parse_type(&ty, self.source) {
            Some(expr) if expr.is_inferred() => inferred.unwrap_or_default(),
            _ => self.type_usages(ty).unwrap_or_default(),
        };
        self.declare_variable(&node, self.text(&name), declared, true, VariableRole::Local);
    }

    fn enhanced_for(&mut self, node: tree_sitter::Node<'_>) {
        let iterable = node.child_by_field_name("value").and_then(|v| self.walk(v));
        self.push_block();
        if let (Some(ty), Some(name)) = (
            node.child_by_field_name("type"),
            node.child_by_field_name("name"),
        ) {
            let declared = match parse_type(&ty, self.source) {
                Some(expr) if expr.is_inferred() => {
                    iterable.and_then(|i| component_type(&i)).unwrap_or_default()
                }
                _ => self.type_usages(ty).unwrap_or_default(),
            };
            self.declare_variable(&name, self.text(&name), declared, true, VariableRole::Local);
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.walk(body);
        }
        self.pop_block();
    }

    fn catch_clause(&mut self, node: tree_sitter::Node<'_>) {
        self.push_block();
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            if child.kind() == "catch_formal_parameter" {
                let mut inner = child.walk();
                let catch_type = child
                    .named_children(&mut inner)
                    .find(|c| c.kind() == "catch_type");
                let mut first = None;
                if let Some(catch_type) = catch_type {
                    let mut type_cursor = catch_type.walk();
                    let alternatives: Vec<_> =
                        catch_type.named_children(&mut type_cursor).collect();
                    for alternative in alternatives {
                        let ty = self.type_usages(alternative);
                        if first.is_none() {
                            first = ty;
                        }
                    }
                }
                if let Some(name) = child.child_by_field_name("name") {
                    self.declare_variable(
                        &child,
                        self.text(&name),
                        first.unwrap_or_default(),
                        false,
                        VariableRole::Local,
                    );
                }
            } else {
                self.walk(child);
            }
        }
        self.pop_block();
    }

    fn lambda(&mut self, node: tree_sitter::Node<'_>) {
        let standalone = self.bodies.is_empty();
        if standalone {
            self.push_body(None, Vec::new());
        }
        self.push_block();
        if let Some(params) = node.child_by_field_name("parameters") {
            match params.kind() {
                "identifier" => {
                    self.declare_variable(
                        &params,
                        self.text(&params),
                        TypeName::unresolved(),
                        false,
                        VariableRole::Local,
                    );
                }
                "inferred_parameters" => {
                    let mut cursor = params.walk();
                    let names: Vec<_> = params.named_children(&mut cursor).collect();
                    for name in names {
                        self.declare_variable(
                            &name,
                            self.text(&name),
                            TypeName::unresolved(),
                            false,
                            VariableRole::Local,
                        );
                    }
                }
                _ => {
                    for param in formal_params(&node, self.source) {
                        let ty = param
                            .type_node
                            .and_then(|t| self.type_usages(t))
                            .unwrap_or_default();
                        let ty = if param.varargs { array_of(&ty, 1) } else { ty };
                        if let Some(name) = param.name {
                            self.declare_variable(
                                &param.node,
                                self.text(&name),
                                ty,
                                false,
                                VariableRole::Local,
                            );
                        }
                    }
                }
            }
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.walk(body);
        }
        self.pop_block();
        if standalone {
            self.bodies.pop();
        }
    }

    fn type_pattern(&mut self, node: tree_sitter::Node<'_>) {
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        let mut ty = TypeName::unresolved();
        for child in children {
            if child.kind() == "identifier" {
                self.declare_variable(
                    &child,
                    self.text(&child),
                    ty.clone(),
                    true,
                    VariableRole::Local,
                );
            } else if is_type_node(child.kind()) {
                ty = self.type_usages(child).unwrap_or_default();
            }
        }
    }

    fn switch(&mut self, node: tree_sitter::Node<'_>) -> Option<TypeName> {
        let selector = node.child_by_field_name("condition").and_then(|c| self.walk(c));
        let enum_type = selector
            .and_then(|s| self.universe.get(&s.erased))
            .filter(|t| t.flavor == TypeFlavor::Enum)
            .map(|t| t.qualified.clone());
        self.switch_enums.push(enum_type);
        if let Some(body) = node.child_by_field_name("body") {
            self.walk(body);
        }
        self.switch_enums.pop();
        None
    }

    fn switch_label(&mut self, node: tree_sitter::Node<'_>) {
        let enum_type = self.switch_enums.last().cloned().flatten();
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            let constant = match (&enum_type, child.kind()) {
                (Some(enum_type), "identifier") => self
                    .universe
                    .find_enum_constant(enum_type, self.text(&child))
                    .map(|(owner, ordinal)| (owner.declaring(), ordinal)),
                _ => None,
            };
            match constant {
                Some((enum_type, ordinal)) => {
                    self.emit_enum_constant_usage(&child, enum_type, ordinal);
                }
                None => {
                    self.walk(child);
                }
            }
        }
    }

    fn binary(&mut self, node: tree_sitter::Node<'_>) -> Option<TypeName> {
        let left = node.child_by_field_name("left").and_then(|l| self.walk(l));
        let right = node.child_by_field_name("right").and_then(|r| self.walk(r));
        let operator = node
            .child_by_field_name("operator")
            .map(|o| self.text(&o))
            .unwrap_or_default();
        match operator {
            "==" | "!=" | "<" | ">" | "<=" | ">=" | "&&" | "||" => {
                Some(TypeName::plain("boolean"))
            }
            "+" if [&left, &right]
                .iter()
                .any(|t| t.as_ref().is_some_and(|t| t.erased == "java.lang.String")) =>
            {
                Some(TypeName::plain("java.lang.String"))
            }
            "<<" | ">>" | ">>>" => left.map(|l| promote(&l, &l)),
            _ => match (left, right) {
                (Some(l), Some(r)) => Some(promote(&l, &r)),
                (l, r) => l.or(r),
            },
        }
    }

    fn array_creation(&mut self, node: tree_sitter::Node<'_>) -> Option<TypeName> {
        let element = node.child_by_field_name("type").and_then(|t| self.type_usages(t));
        let mut dims = 0;
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "dimensions_expr" => {
                    dims += 1;
                    self.walk_children(child);
                }
                "dimensions" => dims += self.text(&child).matches('[').count(),
                "array_initializer" => {
                    self.walk_children(child);
                }
                _ => {}
            }
        }
        element.map(|e| array_of(&e, dims.max(1)))
    }

    /// Parameter, local or catch/resource variable declaration
    fn declare_variable(
        &mut self,
        span_node: &tree_sitter::Node<'_>,
        name: &str,
        var_type: TypeName,
        has_initializer: bool,
        role: VariableRole,
    ) {
        let variable = VariableBinding {
            name: name.to_string(),
            var_type,
            modifiers: super::outline::modifiers_of(span_node, self.source),
            role,
            owner: VariableOwner::Scope(self.current_scope()),
        };
        let span = self.span(span_node, name);
        self.nodes.push(SyntaxNode::VariableDecl(VariableDeclNode {
            span,
            variable: variable.clone(),
            has_initializer,
            doc: None,
        }));
        if let Some(block) = self.bodies.last_mut().and_then(|b| b.blocks.last_mut()) {
            block.push(variable);
        }
    }

    fn declare_local(
        &mut self,
        name: tree_sitter::Node<'_>,
        var_type: TypeName,
        has_initializer: bool,
        role: VariableRole,
    ) {
        self.declare_variable(&name, self.text(&name), var_type, has_initializer, role);
    }

    /// Resolve a simple name to a local, parameter, field or enum constant
    fn lookup(&self, name: &str) -> Option<NameHit> {
        for level in (0..self.types.len()).rev() {
            for body in self.bodies.iter().rev().filter(|b| b.depth == level + 1) {
                for block in body.blocks.iter().rev() {
                    if let Some(variable) = block.iter().rev().find(|v| v.name == name) {
                        return Some(NameHit::Variable(variable.clone()));
                    }
                }
            }
            let owner = &self.types[level].qualified;
            if let Some(found) = self.universe.find_field(owner, name) {
                return Some(NameHit::Variable(field_binding(found.owner, found.field)));
            }
            if let Some((enum_type, ordinal)) = self.universe.find_enum_constant(owner, name) {
                return Some(NameHit::EnumConstant {
                    enum_type: enum_type.declaring(),
                    ordinal,
                });
            }
        }
        self.static_import_member(name)
    }

    fn static_import_member(&self, name: &str) -> Option<NameHit> {
        let scope = self.universe.file_scope(self.path)?;
        for import in scope.imports.iter().filter(|i| i.is_static) {
            let owner = if import.is_on_demand {
                import.name.as_str()
            } else {
                match import.name.rsplit_once('.') {
                    Some((owner, member)) if member == name => owner,
                    _ => continue,
                }
            };
            if let Some(found) = self.universe.find_field(owner, name) {
                return Some(NameHit::Variable(field_binding(found.owner, found.field)));
            }
            if let Some((enum_type, ordinal)) = self.universe.find_enum_constant(owner, name) {
                return Some(NameHit::EnumConstant {
                    enum_type: enum_type.declaring(),
                    ordinal,
                });
            }
        }
        None
    }

    fn identifier(&mut self, node: tree_sitter::Node<'_>) -> Option<TypeName> {
        let name = self.text(&node);
        match self.lookup(name)? {
            NameHit::Variable(variable) => {
                let var_type = variable.var_type.clone();
                self.emit_variable_usage(&node, &node, variable);
                Some(var_type)
            }
            NameHit::EnumConstant { enum_type, ordinal } => {
                let ty = TypeName::plain(enum_type.name.clone());
                self.emit_enum_constant_usage(&node, enum_type, ordinal);
                Some(ty)
            }
        }
    }

    fn field_access(&mut self, node: tree_sitter::Node<'_>) -> Option<TypeName> {
        let object = node.child_by_field_name("object")?;
        let field = node.child_by_field_name("field")?;

        // `Outer.this`
        if field.kind() == "this" {
            return self.type_reference(object);
        }
        // Qualified type name used as an expression
        if let Some(ty) = self.type_of_name(&node) {
            if self.universe.get(&ty).is_some() {
                return None;
            }
        }

        let name = self.text(&field).to_string();
        let static_owner = self.type_reference(object);
        let receiver = match &static_owner {
            Some(owner) => Some(owner.clone()),
            None => self.walk(object),
        };
        let receiver = receiver.unwrap_or_default();

        if static_owner.is_some() {
            if let Some((enum_type, ordinal)) =
                self.universe.find_enum_constant(&receiver.erased, &name)
            {
                let ty = TypeName::plain(enum_type.qualified.clone());
                let declaring = enum_type.declaring();
                self.emit_enum_constant_usage(&field, declaring, ordinal);
                return Some(ty);
            }
        }
        if receiver.is_array() && name == "length" {
            let variable = VariableBinding {
                name,
                var_type: TypeName::plain("int"),
                modifiers: Modifiers::PUBLIC | Modifiers::FINAL,
                role: VariableRole::Field,
                owner: VariableOwner::ArrayLength,
            };
            self.emit_variable_usage(&field, &node, variable);
            return Some(TypeName::plain("int"));
        }
        let variable = match self.universe.find_field(&receiver.erased, &name) {
            Some(found) => field_binding(found.owner, found.field),
            None => {
                debug!("Unresolved field {}.{} in {}", receiver.erased, name, self.path);
                VariableBinding {
                    name,
                    var_type: TypeName::unresolved(),
                    modifiers: Modifiers::empty(),
                    role: VariableRole::Field,
                    owner: VariableOwner::Field(DeclaringType::top_level(receiver.erased.clone())),
                }
            }
        };
        let ty = variable.var_type.clone();
        self.emit_variable_usage(&field, &node, variable);
        ty.is_resolved().then_some(ty)
    }

    fn method_invocation(&mut self, node: tree_sitter::Node<'_>) -> Option<TypeName> {
        let name_node = node.child_by_field_name("name")?;
        let name = self.text(&name_node).to_string();
        let object = node.child_by_field_name("object");

        let receiver = match object {
            None => None,
            Some(object) if object.kind() == "super" => self.current_super(),
            Some(object) => match self.type_reference(object) {
                Some(owner) => Some(owner),
                None => Some(self.walk(object).unwrap_or_default()),
            },
        };
        let args = node
            .child_by_field_name("arguments")
            .map(|a| self.arguments(a))
            .unwrap_or_default();

        let found = match &receiver {
            Some(receiver) => self
                .universe
                .find_method(&receiver.erased, &name, &args)
                .map(|m| m.binding()),
            None => self.implicit_method(&name, &args),
        };
        let callee = found.unwrap_or_else(|| {
            let declaring = match &receiver {
                Some(receiver) => receiver.erased.clone(),
                None => self
                    .current_type()
                    .map(|t| t.qualified.clone())
                    .unwrap_or_default(),
            };
            debug!("Unresolved call {}.{} in {}", declaring, name, self.path);
            MethodBinding {
                name: name.clone(),
                declaring: match self.universe.get(&declaring) {
                    Some(owner) => owner.declaring(),
                    None => DeclaringType::top_level(declaring),
                },
                parameter_types: args.iter().map(|a| a.erased.clone()).collect(),
                return_type: TypeName::unresolved(),
                is_constructor: false,
                modifiers: Modifiers::empty(),
            }
        });
        let return_type = callee.return_type.clone();
        let span = self.span(&node, name);
        let scope = self.current_scope();
        self.nodes.push(SyntaxNode::Call(CallNode {
            span,
            callee,
            scope,
        }));
        return_type.is_resolved().then_some(return_type)
    }

    /// Unqualified call: enclosing types outward, then static imports
    fn implicit_method(&self, name: &str, args: &[TypeName]) -> Option<MethodBinding> {
        for owner in self.types.iter().rev() {
            if let Some(found) = self.universe.find_method(&owner.qualified, name, args) {
                return Some(found.binding());
            }
        }
        let scope = self.universe.file_scope(self.path)?;
        for import in scope.imports.iter().filter(|i| i.is_static) {
            let owner = if import.is_on_demand {
                import.name.as_str()
            } else {
                match import.name.rsplit_once('.') {
                    Some((owner, member)) if member == name => owner,
                    _ => continue,
                }
            };
            if let Some(found) = self.universe.find_method(owner, name, args) {
                return Some(found.binding());
            }
            if !import.is_on_demand {
                return Some(MethodBinding {
                    name: name.to_string(),
                    declaring: DeclaringType::top_level(owner),
                    parameter_types: args.iter().map(|a| a.erased.clone()).collect(),
                    return_type: TypeName::unresolved(),
                    is_constructor: false,
                    modifiers: Modifiers::STATIC,
                });
            }
        }
        None
    }

    fn arguments(&mut self, node: tree_sitter::Node<'_>) -> Vec<TypeName> {
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        children
            .into_iter()
            .filter(|c| !matches!(c.kind(), "line_comment" | "block_comment"))
            .map(|c| self.walk(c).unwrap_or_default())
            .collect()
    }

    fn object_creation(&mut self, node: tree_sitter::Node<'_>) -> Option<TypeName> {
        if let Some(outer) = node.named_child(0).filter(|c| {
            node.child_by_field_name("type")
                .is_some_and(|t| t.id() != c.id())
                && !matches!(c.kind(), "type_arguments" | "argument_list" | "class_body")
        }) {
            self.walk(outer);
        }
        let type_node = node.child_by_field_name("type")?;
        let created = self.type_usages(type_node).unwrap_or_default();
        let arguments = node.child_by_field_name("arguments");
        let args = arguments.map(|a| self.arguments(a)).unwrap_or_default();

        let callee = self
            .universe
            .find_constructor(&created.erased, &args)
            .map(|c| c.binding())
            .unwrap_or_else(|| best_effort_constructor(&created.erased, &args));
        let end = arguments.unwrap_or(type_node);
        let span = NodeSpan {
            range: span_between(&node, &end),
            text: callee.name.clone(),
            visible: true,
        };
        let scope = self.current_scope();
        self.nodes.push(SyntaxNode::Call(CallNode {
            span,
            callee,
            scope,
        }));

        let mut cursor = node.walk();
        let body = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "class_body");
        if let Some(body) = body {
            self.anonymous_body(&node, body);
        }
        created.is_resolved().then_some(created)
    }

    fn explicit_constructor_invocation(&mut self, node: tree_sitter::Node<'_>) {
        let Some(target) = node.child_by_field_name("constructor") else {
            return;
        };
        if let Some(object) = node.child_by_field_name("object") {
            self.walk(object);
        }
        let owner = match target.kind() {
            "super" => self.current_super().map(|s| s.erased),
            _ => self.current_type().map(|t| t.qualified.clone()),
        }
        .unwrap_or_default();
        let args = node
            .child_by_field_name("arguments")
            .map(|a| self.arguments(a))
            .unwrap_or_default();
        let callee = self
            .universe
            .find_constructor(&owner, &args)
            .map(|c| c.binding())
            .unwrap_or_else(|| best_effort_constructor(&owner, &args));
        let span = self.span(&node, self.text(&target));
        let scope = self.current_scope();
        self.nodes.push(SyntaxNode::Call(CallNode {
            span,
            callee,
            scope,
        }));
    }

    fn current_super(&self) -> Option<TypeName> {
        let current = self.current_type()?;
        Some(
            current
                .superclass
                .clone()
                .unwrap_or_else(|| TypeName::plain("java.lang.Object")),
        )
    }

    /// Name expression that denotes a type, without emitting anything
    fn type_of_name(&self, node: &tree_sitter::Node<'_>) -> Option<String> {
        match node.kind() {
            "identifier" | "type_identifier" => {
                let name = self.text(node);
                if self.lookup(name).is_some() {
                    return None;
                }
                self.resolve_simple(name)
            }
            "field_access" => {
                let object = node.child_by_field_name("object")?;
                let field = node.child_by_field_name("field")?;
                if field.kind() != "identifier" {
                    return None;
                }
                let member = self.text(&field);
                if let Some(outer) = self.type_of_name(&object) {
                    return self.universe.member_type(&outer, member);
                }
                // Package-qualified name of a type outside the index
                let written = squash_whitespace(self.text(node)).replace(' ', "");
                let head = written.split('.').next().unwrap_or_default();
                let is_package_path = written
                    .split('.')
                    .all(|s| s.chars().all(|c| c.is_alphanumeric() || c == '_'))
                    && head.starts_with(|c: char| c.is_ascii_lowercase())
                    && member.starts_with(|c: char| c.is_ascii_uppercase())
                    && self.lookup(head).is_none();
                is_package_path.then_some(written)
            }
            _ => None,
        }
    }

    /// A name expression used as a type: emits its usage and returns it
    fn type_reference(&mut self, node: tree_sitter::Node<'_>) -> Option<TypeName> {
        let qualified = self.type_of_name(&node)?;
        let ty = TypeName::plain(qualified);
        self.emit_type_usage(&node, ty.clone());
        Some(ty)
    }

    /// Emit usages for a type node and its nested type arguments
    ///
    /// Returns the resolved type (with array dimensions) of the whole node.
    fn type_usages(&mut self, node: tree_sitter::Node<'_>) -> Option<TypeName> {
        let expr = parse_type(&node, self.source)?;
        let resolved = self.resolve_expr(&expr);
        match node.kind() {
            "array_type" => {
                if let Some(element) = node.child_by_field_name("element") {
                    self.type_usages(element);
                }
            }
            "annotated_type" | "wildcard" => {
                let mut cursor = node.walk();
                let children: Vec<_> = node.named_children(&mut cursor).collect();
                for child in children {
                    if is_type_node(child.kind()) {
                        self.type_usages(child);
                    } else {
                        self.walk(child);
                    }
                }
            }
            "generic_type" => {
                self.emit_type_usage(&node, resolved.clone());
                let mut cursor = node.walk();
                let arguments: Vec<_> = node
                    .named_children(&mut cursor)
                    .filter(|c| c.kind() == "type_arguments")
                    .collect();
                for list in arguments {
                    self.type_usages_within(list);
                }
            }
            "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {}
            _ if expr.is_inferred() => {}
            // Type variables have no declaration to link to
            _ if self.is_type_variable(&node) => {}
            _ => self.emit_type_usage(&node, resolved.clone()),
        }
        resolved.is_resolved().then_some(resolved)
    }

    /// Type usages of every type node directly or transitively under `node`
    fn type_usages_within(&mut self, node: tree_sitter::Node<'_>) {
        let mut cursor = node.walk();
        let children: Vec<_> = node.named_children(&mut cursor).collect();
        for child in children {
            if is_type_node(child.kind()) {
                self.type_usages(child);
            } else if matches!(child.kind(), "marker_annotation" | "annotation") {
                self.annotation(child);
            } else if child.kind() == "type_parameter" {
                // Only the bounds; the parameter's own name is not a usage
                let mut inner = child.walk();
                let parts: Vec<_> = child
                    .named_children(&mut inner)
                    .filter(|c| {
                        matches!(c.kind(), "type_bound" | "marker_annotation" | "annotation")
                    })
                    .collect();
                for part in parts {
                    if part.kind() == "type_bound" {
                        self.type_usages_within(part);
                    } else {
                        self.annotation(part);
                    }
                }
            } else {
                self.type_usages_within(child);
            }
        }
    }

    fn emit_type_usage(&mut self, node: &tree_sitter::Node<'_>, type_name: TypeName) {
        if type_name.is_primitive() {
            return;
        }
        let declared = self.universe.get(type_name.element());
        let span = self.span(node, squash_whitespace(self.text(node)));
        self.nodes.push(SyntaxNode::TypeUsage(TypeUsageNode {
            span,
            is_enum: declared.is_some_and(|t| t.flavor == TypeFlavor::Enum),
            modifiers: declared.map(|t| t.modifiers).unwrap_or_default(),
            type_name,
            scope: self.current_scope(),
        }));
    }

    fn emit_variable_usage(
        &mut self,
        name: &tree_sitter::Node<'_>,
        reference: &tree_sitter::Node<'_>,
        variable: VariableBinding,
    ) {
        let span = self.span(name, variable.name.clone());
        self.nodes.push(SyntaxNode::VariableUsage(VariableUsageNode {
            span,
            variable,
            context: usage_context(reference),
            reference_start: reference.start_byte(),
            scope: self.current_scope(),
        }));
    }

    fn emit_enum_constant_usage(
        &mut self,
        node: &tree_sitter::Node<'_>,
        enum_type: DeclaringType,
        ordinal: usize,
    ) {
        let name = self.text(node).to_string();
        let span = self.span(node, name.clone());
        self.nodes.push(SyntaxNode::EnumConstantUsage(EnumConstantUsageNode {
            span,
            name,
            enum_type,
            ordinal: Some(ordinal),
            modifiers: ENUM_CONSTANT_MODIFIERS,
            scope: self.current_scope(),
        }));
    }
}

fn field_binding(owner: &ResolvedType, field: &super::universe::FieldShape) -> VariableBinding {
    VariableBinding {
        name: field.name.clone(),
        var_type: field.ty.clone(),
        modifiers: field.modifiers,
        role: VariableRole::Field,
        owner: VariableOwner::Field(owner.declaring()),
    }
}

fn best_effort_constructor(qualified: &str, args: &[TypeName]) -> MethodBinding {
    let declaring = DeclaringType::top_level(qualified);
    MethodBinding {
        name: declaring.simple_name().to_string(),
        declaring,
        parameter_types: args.iter().map(|a| a.erased.clone()).collect(),
        return_type: TypeName::plain("void"),
        is_constructor: true,
        modifiers: Modifiers::empty(),
    }
}

/// Read/write context of a reference expression, from its parent
fn usage_context(reference: &tree_sitter::Node<'_>) -> UsageContext {
    let Some(parent) = reference.parent() else {
        return UsageContext::Other;
    };
    match parent.kind() {
        "assignment_expression" => match parent.child_by_field_name("left") {
            Some(left) => UsageContext::Assignment {
                lhs_start: left.start_byte(),
            },
            None => UsageContext::Other,
        },
        "update_expression" => UsageContext::IncDec,
        "method_invocation" => UsageContext::Invocation {
            start: parent.start_byte(),
        },
        "argument_list" => match parent.parent() {
            Some(call)
                if matches!(
                    call.kind(),
                    "method_invocation"
                        | "object_creation_expression"
                        | "explicit_constructor_invocation"
                ) =>
            {
                UsageContext::Invocation {
                    start: call.start_byte(),
                }
            }
            _ => UsageContext::Other,
        },
        _ => UsageContext::Other,
    }
}

/// Preceding `/** ... */` comment of a declaration
fn doc_comment(node: &tree_sitter::Node<'_>, source: &[u8]) -> Option<String> {
    let previous = node.prev_named_sibling()?;
    if !matches!(previous.kind(), "block_comment" | "comment") {
        return None;
    }
    let text = node_text(&previous, source);
    text.starts_with("/**").then(|| text.to_string())
}

/// Declaration text up to its body, whitespace squashed
fn header_text(node: &tree_sitter::Node<'_>, source: &[u8]) -> String {
    let end = node
        .child_by_field_name("body")
        .map(|b| b.start_byte())
        .unwrap_or_else(|| node.end_byte());
    let header = safe_slice(source, node.start_byte(), end)
        .and_then(|b| std::str::from_utf8(b).ok())
        .unwrap_or_default();
    squash_whitespace(header).trim_end_matches(';').trim().to_string()
}

fn span_between(start: &tree_sitter::Node<'_>, end: &tree_sitter::Node<'_>) -> SourceRange {
    let from = node_range(start);
    let to = node_range(end);
    SourceRange {
        end_line: to.end_line,
        end_col: to.end_col,
        end_offset: to.end_offset,
        ..from
    }
}

fn array_of(element: &TypeName, dims: usize) -> TypeName {
    let suffix = "[]".repeat(dims);
    TypeName::new(
        format!("{}{}", element.erased, suffix),
        format!("{}{}", element.display, suffix),
    )
}

/// Element type of an array type, one dimension removed
fn component_type(array: &TypeName) -> Option<TypeName> {
    let erased = array.erased.strip_suffix("[]")?;
    let display = array.display.strip_suffix("[]").unwrap_or(erased);
    Some(TypeName::new(erased, display))
}

/// Binary numeric promotion
fn promote(left: &TypeName, right: &TypeName) -> TypeName {
    const ORDER: [&str; 4] = ["int", "long", "float", "double"];
    let rank = |t: &TypeName| ORDER.iter().position(|o| *o == t.erased).unwrap_or(0);
    if !left.is_primitive() || !right.is_primitive() {
        return if left.is_resolved() { left.clone() } else { right.clone() };
    }
    if left.erased == "boolean" {
        return left.clone();
    }
    TypeName::plain(ORDER[rank(left).max(rank(right))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::SyntaxNode;
    use crate::identity::{entity_hash, identify};
    use crate::ingest::outline::outline;

    fn bind_files(files: &[(&str, &str)]) -> Vec<(String, Vec<SyntaxNode>)> {
        let trees: Vec<_> = files
            .iter()
            .map(|(path, source)| {
                let tree = crate::ingest::pool::parse(source.as_bytes()).unwrap().unwrap();
                (*path, *source, tree)
            })
            .collect();
        let universe = TypeUniverse::build(
            trees
                .iter()
                .map(|(path, source, tree)| outline(path, tree, source.as_bytes()))
                .collect(),
        );
        trees
            .iter()
            .map(|(path, source, tree)| {
                (path.to_string(), bind(path, tree, source.as_bytes(), &universe))
            })
            .collect()
    }

    fn calls(nodes: &[SyntaxNode]) -> Vec<&CallNode> {
        nodes
            .iter()
            .filter_map(|n| match n {
                SyntaxNode::Call(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_call_resolves_across_files() {
        let bound = bind_files(&[
            ("zoo/Animal.java", "package zoo;\npublic class Animal { public void speak(int times) {} }"),
            (
                "zoo/Keeper.java",
                "package zoo;\nclass Keeper { void feed(Animal a) { a.speak(3); } }",
            ),
        ]);
        let keeper = &bound[1].1;
        let call = calls(keeper).into_iter().find(|c| c.span.text == "speak").unwrap();
        assert_eq!(call.callee.declaring.name, "zoo.Animal");
        assert_eq!(call.callee.parameter_types, vec!["int".to_string()]);

        let decl = bound[0]
            .1
            .iter()
            .find(|n| matches!(n, SyntaxNode::MethodDecl(m) if m.method.name == "speak"))
            .unwrap();
        let usage = SyntaxNode::Call((*call).clone());
        assert_eq!(identify(decl).entity_hash, identify(&usage).entity_hash);
    }

    #[test]
    fn test_local_and_field_usages_are_classified() {
        let bound = bind_files(&[(
            "Counter.java",
            "class Counter { int count; void tick() { int step = 1; count = count + step; step++; } }",
        )]);
        let usages: Vec<_> = bound[0]
            .1
            .iter()
            .filter_map(|n| match n {
                SyntaxNode::VariableUsage(u) => Some(u),
                _ => None,
            })
            .collect();
        assert_eq!(usages.len(), 4);
        let writes: Vec<_> = usages
            .iter()
            .filter(|u| {
                crate::identity::classify_read_write(u) == crate::model::OccurrenceKind::Write
            })
            .map(|u| u.variable.name.as_str())
            .collect();
        assert_eq!(writes, vec!["count", "step"]);
        let count_field = usages.iter().find(|u| u.variable.name == "count").unwrap();
        assert!(matches!(count_field.variable.owner, VariableOwner::Field(_)));
        let step = usages.iter().find(|u| u.variable.name == "step").unwrap();
        assert!(matches!(step.variable.owner, VariableOwner::Scope(Some(_))));
    }

    #[test]
    fn test_implicit_constructor_is_synthesized() {
        let bound = bind_files(&[(
            "zoo/Cage.java",
            "package zoo;\npublic class Cage { }\nclass Use { Object c = new Cage(); }",
        )]);
        let nodes = &bound[0].1;
        let ctor = nodes
            .iter()
            .find_map(|n| match n {
                SyntaxNode::MethodDecl(m) if m.method.is_constructor => Some(m),
                _ => None,
            })
            .unwrap();
        assert!(!ctor.span.visible);
        assert_eq!(ctor.span.text, "Cage");
        let call = calls(nodes).into_iter().next().unwrap();
        assert_eq!(
            identify(&SyntaxNode::Call(call.clone())).entity_hash,
            entity_hash("zoo.Cage:Cage()")
        );
    }

    #[test]
    fn test_enum_constant_usages() {
        let bound = bind_files(&[(
            "zoo/Color.java",
            "package zoo;\nenum Color { RED, GREEN }\nclass Paint { Color c = Color.GREEN; \
             int f(Color x) { switch (x) { case RED: return 1; default: return 0; } } }",
        )]);
        let usages: Vec<_> = bound[0]
            .1
            .iter()
            .filter_map(|n| match n {
                SyntaxNode::EnumConstantUsage(u) => Some((u.name.as_str(), u.ordinal)),
                _ => None,
            })
            .collect();
        assert_eq!(usages, vec![("GREEN", Some(1)), ("RED", Some(0))]);
    }

    #[test]
    fn test_doc_comment_attaches_to_declaration() {
        let bound = bind_files(&[(
            "Doc.java",
            "/** A documented class. */\npublic class Doc {\n  /** Runs. */\n  void run() {}\n}",
        )]);
        let docs: Vec<_> = bound[0].1.iter().filter_map(|n| n.doc()).collect();
        assert_eq!(docs, vec!["/** A documented class. */", "/** Runs. */"]);
    }

    #[test]
    fn test_array_length_and_static_call() {
        let bound = bind_files(&[(
            "Util.java",
            "class Util { static int size(int[] xs) { return Math.max(xs.length, 0); } }",
        )]);
        let nodes = &bound[0].1;
        let length = nodes
            .iter()
            .find_map(|n| match n {
                SyntaxNode::VariableUsage(u) if u.variable.name == "length" => Some(u),
                _ => None,
            })
            .unwrap();
        assert_eq!(length.variable.owner, VariableOwner::ArrayLength);
        let max = calls(nodes).into_iter().find(|c| c.span.text == "max").unwrap();
        assert_eq!(max.callee.declaring.name, "java.lang.Math");
        assert_eq!(max.callee.parameter_types, vec!["int".to_string(), "int".to_string()]);
    }
}
