//! Bound syntax nodes handed from the Java front end to the core.
//!
//! A [`SyntaxNode`] is one symbol-bearing node of a parsed file together with
//! the semantic bindings the identity scheme needs. Each arm carries only the
//! fields relevant to its node shape. Unresolved names are empty strings.
//!
//! Pure data. No behavior beyond small accessors.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::model::{Modifiers, SourceRange, VariableRole};

/// A resolved type name
///
/// `erased` is the qualified name without generic arguments (`java.util.List`),
/// `display` keeps the arguments as written at the occurrence
/// (`java.util.List<java.lang.String>`). Arrays keep their `[]` suffix in both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TypeName {
    pub erased: String,
    pub display: String,
}

impl TypeName {
    pub fn new(erased: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            erased: erased.into(),
            display: display.into(),
        }
    }

    /// A non-generic name; both forms are identical
    pub fn plain(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            erased: name.clone(),
            display: name,
        }
    }

    pub fn unresolved() -> Self {
        Self::default()
    }

    pub fn is_resolved(&self) -> bool {
        !self.erased.is_empty()
    }

    /// Erased name with all array dimensions removed
    pub fn element(&self) -> &str {
        self.erased.trim_end_matches("[]")
    }

    pub fn is_array(&self) -> bool {
        self.erased.ends_with("[]")
    }

    pub fn is_primitive(&self) -> bool {
        is_primitive_name(self.element())
    }

    /// Unqualified element name (`java.util.Map.Entry` -> `Entry`)
    pub fn simple_name(&self) -> &str {
        let element = self.element();
        element.rsplit(['.', '$']).next().unwrap_or(element)
    }
}

pub fn is_primitive_name(name: &str) -> bool {
    matches!(
        name,
        "boolean" | "byte" | "char" | "short" | "int" | "long" | "float" | "double" | "void"
    )
}

/// The class a member is declared in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DeclaringType {
    /// Erased qualified name of the declaring class
    pub name: String,
    /// Erased qualified name of its outermost enclosing type
    pub outermost: String,
}

impl DeclaringType {
    pub fn new(name: impl Into<String>, outermost: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outermost: outermost.into(),
        }
    }

    /// A top-level declaring class
    pub fn top_level(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            outermost: name.clone(),
            name,
        }
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit(['.', '$']).next().unwrap_or(&self.name)
    }
}

/// Direct supertypes of a declaring class, by erased qualified name
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Supertypes {
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
}

/// Resolved method or constructor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodBinding {
    /// Method name; for constructors the simple class name
    pub name: String,
    pub declaring: DeclaringType,
    /// Erased parameter types in declaration order
    pub parameter_types: Vec<String>,
    pub return_type: TypeName,
    pub is_constructor: bool,
    pub modifiers: Modifiers,
}

/// The body a local variable or usage lives in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScopeBinding {
    Method(MethodBinding),
    /// Static or instance initializer block, identified by its start offset
    Initializer { declaring: DeclaringType, offset: usize },
}

impl ScopeBinding {
    pub fn declaring(&self) -> &DeclaringType {
        match self {
            ScopeBinding::Method(method) => &method.declaring,
            ScopeBinding::Initializer { declaring, .. } => declaring,
        }
    }
}

/// Where a variable symbol lives
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariableOwner {
    Field(DeclaringType),
    /// Synthetic `length` of an array; no declaring class
    ArrayLength,
    /// Parameter or local of a body; `None` when declared outside any body
    /// (lambda parameters inside a field initializer)
    Scope(Option<Arc<ScopeBinding>>),
}

/// Resolved field, parameter or local variable
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableBinding {
    pub name: String,
    pub var_type: TypeName,
    pub modifiers: Modifiers,
    pub role: VariableRole,
    pub owner: VariableOwner,
}

/// Syntactic context of a variable reference, used for read/write classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageContext {
    /// Inside an assignment whose left-hand side starts at `lhs_start`
    Assignment { lhs_start: usize },
    /// Directly inside an invocation starting at `start` (receiver or argument)
    Invocation { start: usize },
    /// Operand of `++` / `--`
    IncDec,
    Other,
}

/// Span and source text shared by every node shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpan {
    pub range: SourceRange,
    pub text: String,
    /// False for synthesized nodes (implicit default constructors)
    pub visible: bool,
}

impl NodeSpan {
    pub fn start_offset(&self) -> usize {
        self.range.start_offset
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeFlavor {
    Class,
    Interface,
    Enum,
    Annotation,
    Record,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclNode {
    pub span: NodeSpan,
    /// Erased qualified name
    pub qualified_name: String,
    pub simple_name: String,
    pub flavor: TypeFlavor,
    pub modifiers: Modifiers,
    /// Enclosing types, innermost first; empty for top-level types
    pub enclosing: Vec<String>,
    /// Local or anonymous class; not a member of its enclosing type
    pub local: bool,
    pub supertypes: Supertypes,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumConstantDeclNode {
    pub span: NodeSpan,
    pub name: String,
    pub enum_type: DeclaringType,
    pub ordinal: usize,
    pub modifiers: Modifiers,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDeclNode {
    pub span: NodeSpan,
    pub method: MethodBinding,
    pub has_body: bool,
    /// Direct supertypes of the declaring class
    pub supertypes: Supertypes,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializerNode {
    pub span: NodeSpan,
    pub declaring: DeclaringType,
    pub is_static: bool,
}

impl InitializerNode {
    pub fn offset(&self) -> usize {
        self.span.start_offset()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableDeclNode {
    pub span: NodeSpan,
    pub variable: VariableBinding,
    pub has_initializer: bool,
    pub doc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeUsageNode {
    pub span: NodeSpan,
    pub type_name: TypeName,
    pub is_enum: bool,
    pub modifiers: Modifiers,
    pub scope: Option<Arc<ScopeBinding>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallNode {
    pub span: NodeSpan,
    pub callee: MethodBinding,
    pub scope: Option<Arc<ScopeBinding>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableUsageNode {
    pub span: NodeSpan,
    pub variable: VariableBinding,
    pub context: UsageContext,
    /// Start of the whole reference expression (`this.x` starts at `this`)
    pub reference_start: usize,
    pub scope: Option<Arc<ScopeBinding>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumConstantUsageNode {
    pub span: NodeSpan,
    pub name: String,
    pub enum_type: DeclaringType,
    pub ordinal: Option<usize>,
    pub modifiers: Modifiers,
    pub scope: Option<Arc<ScopeBinding>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportNode {
    pub span: NodeSpan,
    /// Imported name without the trailing `.*`
    pub qualified_name: String,
    pub is_static: bool,
    pub is_on_demand: bool,
}

/// One symbol-bearing node of a parsed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyntaxNode {
    TypeDecl(TypeDeclNode),
    EnumConstantDecl(EnumConstantDeclNode),
    MethodDecl(MethodDeclNode),
    Initializer(InitializerNode),
    VariableDecl(VariableDeclNode),
    TypeUsage(TypeUsageNode),
    Call(CallNode),
    VariableUsage(VariableUsageNode),
    EnumConstantUsage(EnumConstantUsageNode),
    Import(ImportNode),
}

impl SyntaxNode {
    pub fn span(&self) -> &NodeSpan {
        match self {
            SyntaxNode::TypeDecl(n) => &n.span,
            SyntaxNode::EnumConstantDecl(n) => &n.span,
            SyntaxNode::MethodDecl(n) => &n.span,
            SyntaxNode::Initializer(n) => &n.span,
            SyntaxNode::VariableDecl(n) => &n.span,
            SyntaxNode::TypeUsage(n) => &n.span,
            SyntaxNode::Call(n) => &n.span,
            SyntaxNode::VariableUsage(n) => &n.span,
            SyntaxNode::EnumConstantUsage(n) => &n.span,
            SyntaxNode::Import(n) => &n.span,
        }
    }

    pub fn doc(&self) -> Option<&str> {
        match self {
            SyntaxNode::TypeDecl(n) => n.doc.as_deref(),
            SyntaxNode::EnumConstantDecl(n) => n.doc.as_deref(),
            SyntaxNode::MethodDecl(n) => n.doc.as_deref(),
            SyntaxNode::VariableDecl(n) => n.doc.as_deref(),
            _ => None,
        }
    }

    /// Enclosing body of a usage, if any
    pub fn scope(&self) -> Option<&Arc<ScopeBinding>> {
        match self {
            SyntaxNode::TypeUsage(n) => n.scope.as_ref(),
            SyntaxNode::Call(n) => n.scope.as_ref(),
            SyntaxNode::VariableUsage(n) => n.scope.as_ref(),
            SyntaxNode::EnumConstantUsage(n) => n.scope.as_ref(),
            SyntaxNode::VariableDecl(n) => match &n.variable.owner {
                VariableOwner::Scope(scope) => scope.as_ref(),
                _ => None,
            },
            _ => None,
        }
    }
}
