//! Pass 1: per-file outline of every type declaration.
//!
//! The outline records what other files need to know about a type before
//! any body is bound: its name, flavor, supertypes as written, type
//! parameters and member signatures. Anonymous and local classes are named
//! after their innermost enclosing type (`Outer$1`, `Outer$1Local`), counted
//! in document order.

use ahash::AHashMap;

use super::types::{is_type_node, parse_type, TypeExpr};
use crate::binding::TypeFlavor;
use crate::common::node_text;
use crate::model::Modifiers;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Imported name without the trailing `.*`
    pub name: String,
    pub is_static: bool,
    pub is_on_demand: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParamDecl {
    pub name: String,
    pub bounds: Vec<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutline {
    pub name: String,
    pub ty: TypeExpr,
    pub modifiers: Modifiers,
    /// Start of the variable declarator
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodOutline {
    pub name: String,
    pub params: Vec<TypeExpr>,
    pub varargs: bool,
    /// `None` for constructors
    pub return_type: Option<TypeExpr>,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParamDecl>,
    /// Start of the declaration; the class name for implicit constructors
    pub offset: usize,
    pub implicit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    pub qualified: String,
    /// Empty for anonymous classes
    pub simple: String,
    pub flavor: TypeFlavor,
    pub modifiers: Modifiers,
    pub type_params: Vec<TypeParamDecl>,
    /// Innermost first
    pub enclosing: Vec<String>,
    pub local: bool,
    pub anonymous: bool,
    pub superclass: Option<TypeExpr>,
    pub interfaces: Vec<TypeExpr>,
    pub fields: Vec<FieldOutline>,
    pub methods: Vec<MethodOutline>,
    pub constructors: Vec<MethodOutline>,
    pub enum_constants: Vec<String>,
    /// Declaration start, or the body start for anonymous classes
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileOutline {
    pub path: String,
    pub package: String,
    pub imports: Vec<ImportDecl>,
    pub types: Vec<DeclaredType>,
}

/// Node kinds of named type declarations
pub fn is_type_declaration(kind: &str) -> bool {
    matches!(
        kind,
        "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "record_declaration"
            | "annotation_type_declaration"
    )
}

pub fn flavor_of(kind: &str) -> TypeFlavor {
    match kind {
        "interface_declaration" => TypeFlavor::Interface,
        "enum_declaration" => TypeFlavor::Enum,
        "record_declaration" => TypeFlavor::Record,
        "annotation_type_declaration" => TypeFlavor::Annotation,
        _ => TypeFlavor::Class,
    }
}

/// Whether a declaration sits directly in a type body (or the file)
pub fn is_member_position(node: &tree_sitter::Node<'_>) -> bool {
    node.parent().map_or(true, |p| {
        matches!(
            p.kind(),
            "program"
                | "class_body"
                | "interface_body"
                | "enum_body"
                | "enum_body_declarations"
                | "annotation_type_body"
        )
    })
}

/// Explicit modifier keywords of a declaration
pub fn modifiers_of(node: &tree_sitter::Node<'_>, source: &[u8]) -> Modifiers {
    let mut modifiers = Modifiers::empty();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == "modifiers" {
            let mut inner = child.walk();
            for keyword in child.children(&mut inner) {
                if let Some(flag) = Modifiers::from_keyword(node_text(&keyword, source)) {
                    modifiers |= flag;
                }
            }
        }
    }
    modifiers
}

/// Type parameters of a generic declaration
pub fn type_params_of(node: &tree_sitter::Node<'_>, source: &[u8]) -> Vec<TypeParamDecl> {
    let Some(params) = node.child_by_field_name("type_parameters") else {
        return Vec::new();
    };
    let mut result = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        if param.kind() != "type_parameter" {
            continue;
        }
        let mut name = String::new();
        let mut bounds = Vec::new();
        let mut inner = param.walk();
        for child in param.named_children(&mut inner) {
            match child.kind() {
                "type_identifier" | "identifier" if name.is_empty() => {
                    name = node_text(&child, source).to_string();
                }
                "type_bound" => {
                    let mut bound_cursor = child.walk();
                    bounds.extend(
                        child
                            .named_children(&mut bound_cursor)
                            .filter_map(|t| parse_type(&t, source)),
                    );
                }
                _ => {}
            }
        }
        result.push(TypeParamDecl { name, bounds });
    }
    result
}

/// A formal parameter: its type (varargs already an array), its name node
pub struct FormalParam<'t> {
    pub ty: TypeExpr,
    pub type_node: Option<tree_sitter::Node<'t>>,
    pub name: Option<tree_sitter::Node<'t>>,
    pub node: tree_sitter::Node<'t>,
    pub varargs: bool,
}

/// Formal parameters of a method, constructor, record or lambda
pub fn formal_params<'t>(node: &tree_sitter::Node<'t>, source: &[u8]) -> Vec<FormalParam<'t>> {
    let Some(params) = node.child_by_field_name("parameters") else {
        return Vec::new();
    };
    let mut result = Vec::new();
    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        match param.kind() {
            "formal_parameter" => {
                let type_node = param.child_by_field_name("type");
                let Some(ty) = type_node.and_then(|t| parse_type(&t, source)) else {
                    continue;
                };
                let dims = param
                    .child_by_field_name("dimensions")
                    .map(|d| node_text(&d, source).matches('[').count())
                    .unwrap_or(0);
                result.push(FormalParam {
                    ty: ty.with_dims(dims),
                    type_node,
                    name: param.child_by_field_name("name"),
                    node: param,
                    varargs: false,
                });
            }
            "spread_parameter" => {
                let mut inner = param.walk();
                let children: Vec<_> = param.named_children(&mut inner).collect();
                let type_node = children.iter().find(|c| is_type_node(c.kind())).copied();
                let ty = type_node.and_then(|t| parse_type(&t, source));
                let name = children
                    .iter()
                    .find(|c| c.kind() == "variable_declarator")
                    .and_then(|d| d.child_by_field_name("name"));
                if let Some(ty) = ty {
                    result.push(FormalParam {
                        ty: ty.with_dims(1),
                        type_node,
                        name,
                        node: param,
                        varargs: true,
                    });
                }
            }
            _ => {}
        }
    }
    result
}

/// Types listed under `superclass`, `super_interfaces` or `extends_interfaces`
pub fn supertypes_of(
    node: &tree_sitter::Node<'_>,
    source: &[u8],
) -> (Option<TypeExpr>, Vec<TypeExpr>) {
    let mut superclass = None;
    let mut interfaces = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "superclass" => {
                let mut inner = child.walk();
                superclass = child
                    .named_children(&mut inner)
                    .find(|t| is_type_node(t.kind()))
                    .and_then(|t| parse_type(&t, source));
            }
            "super_interfaces" | "extends_interfaces" => {
                interfaces.extend(type_list(&child, source));
            }
            _ => {}
        }
    }
    (superclass, interfaces)
}

fn type_list(node: &tree_sitter::Node<'_>, source: &[u8]) -> Vec<TypeExpr> {
    let mut cursor = node.walk();
    let mut types = Vec::new();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "type_list" {
            types.extend(type_list(&child, source));
        } else if let Some(ty) = parse_type(&child, source) {
            types.push(ty);
        }
    }
    types
}

/// Implicit modifiers a member picks up from its container
pub fn implicit_member_modifiers(
    container: TypeFlavor,
    kind: &str,
    explicit: Modifiers,
    has_body: bool,
) -> Modifiers {
    let interface_like = matches!(container, TypeFlavor::Interface | TypeFlavor::Annotation);
    match kind {
        "constant_declaration" | "field_declaration" if interface_like => {
            explicit | Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL
        }
        "method_declaration" | "annotation_type_element_declaration" if interface_like => {
            if explicit.contains(Modifiers::PRIVATE) {
                explicit
            } else if has_body
                || explicit.intersects(Modifiers::STATIC | Modifiers::DEFAULT)
            {
                explicit | Modifiers::PUBLIC
            } else {
                explicit | Modifiers::PUBLIC | Modifiers::ABSTRACT
            }
        }
        "constructor_declaration" if container == TypeFlavor::Enum => explicit | Modifiers::PRIVATE,
        kind if is_type_declaration(kind) => {
            let mut modifiers = explicit;
            if interface_like {
                modifiers |= Modifiers::PUBLIC | Modifiers::STATIC;
            }
            if matches!(
                kind,
                "interface_declaration"
                    | "enum_declaration"
                    | "record_declaration"
                    | "annotation_type_declaration"
            ) {
                modifiers |= Modifiers::STATIC;
            }
            modifiers
        }
        _ => explicit,
    }
}

/// Modifiers of every enum constant
pub const ENUM_CONSTANT_MODIFIERS: Modifiers = Modifiers::PUBLIC
    .union(Modifiers::STATIC)
    .union(Modifiers::FINAL);

/// Build the outline of one parsed file
pub fn outline(path: &str, tree: &tree_sitter::Tree, source: &[u8]) -> FileOutline {
    let root = tree.root_node();
    let mut walker = OutlineWalker {
        source,
        package: String::new(),
        types: Vec::new(),
        stack: Vec::new(),
        anonymous_counters: AHashMap::new(),
        local_counters: AHashMap::new(),
    };
    let mut imports = Vec::new();

    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        match child.kind() {
            "package_declaration" => {
                walker.package = declared_package(&child, source);
            }
            "import_declaration" => {
                if let Some(import) = import_decl(&child, source) {
                    imports.push(import);
                }
            }
            _ => {}
        }
    }
    walker.walk(root);

    FileOutline {
        path: path.to_string(),
        package: walker.package,
        imports,
        types: walker.types,
    }
}

/// Dotted name of a package declaration
pub fn declared_package(node: &tree_sitter::Node<'_>, source: &[u8]) -> String {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|c| matches!(c.kind(), "scoped_identifier" | "identifier"))
        .map(|c| node_text(&c, source).split_whitespace().collect::<String>());
    found.unwrap_or_default()
}

/// Parse an `import_declaration`
pub fn import_decl(node: &tree_sitter::Node<'_>, source: &[u8]) -> Option<ImportDecl> {
    let mut name = None;
    let mut is_static = false;
    let mut is_on_demand = false;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "static" => is_static = true,
            "asterisk" | "*" => is_on_demand = true,
            "scoped_identifier" | "identifier" => {
                name = Some(node_text(&child, source).split_whitespace().collect::<String>());
            }
            _ => {}
        }
    }
    name.map(|name| ImportDecl {
        name,
        is_static,
        is_on_demand,
    })
}

struct OutlineWalker<'s> {
    source: &'s [u8],
    package: String,
    types: Vec<DeclaredType>,
    /// Qualified names of the enclosing types, outermost first
    stack: Vec<String>,
    anonymous_counters: AHashMap<String, usize>,
    local_counters: AHashMap<(String, String), usize>,
}

impl<'s> OutlineWalker<'s> {
    fn walk(&mut self, node: tree_sitter::Node<'_>) {
        let kind = node.kind();
        if is_type_declaration(kind) {
            self.type_declaration(node);
            return;
        }
        match kind {
            "object_creation_expression" => {
                let mut cursor = node.walk();
                let children: Vec<_> = node.children(&mut cursor).collect();
                for child in &children {
                    if child.kind() != "class_body" {
                        self.walk(*child);
                    }
                }
                if let Some(body) = children.iter().find(|c| c.kind() == "class_body") {
                    let base = node
                        .child_by_field_name("type")
                        .and_then(|t| parse_type(&t, self.source));
                    self.anonymous(base, *body);
                }
            }
            "enum_constant" => {
                if let Some(arguments) = node.child_by_field_name("arguments") {
                    self.walk(arguments);
                }
                if let Some(body) = node.child_by_field_name("body") {
                    let base = self.stack.last().map(|enum_type| {
                        TypeExpr::named(enum_type.rsplit(['.', '$']).next().unwrap_or(enum_type))
                    });
                    self.anonymous(base, body);
                }
            }
            _ => {
                let mut cursor = node.walk();
                let children: Vec<_> = node.children(&mut cursor).collect();
                for child in children {
                    self.walk(child);
                }
            }
        }
    }

    fn type_declaration(&mut self, node: tree_sitter::Node<'_>) {
        let source = self.source;
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let simple = node_text(&name_node, source).to_string();
        let kind = node.kind();
        let flavor = flavor_of(kind);
        let local = !is_member_position(&node);

        let qualified = match self.stack.last() {
            None if self.package.is_empty() => simple.clone(),
            None => format!("{}.{}", self.package, simple),
            Some(outer) if !local => format!("{}.{}", outer, simple),
            Some(outer) => {
                let counter = self
                    .local_counters
                    .entry((outer.clone(), simple.clone()))
                    .or_insert(0);
                *counter += 1;
                format!("{}${}{}", outer, counter, simple)
            }
        };

        let container = self.container_flavor();
        let explicit = modifiers_of(&node, source);
        let modifiers = match container {
            Some(container) if !local => {
                implicit_member_modifiers(container, kind, explicit, false)
            }
            _ => explicit,
        };
        let (superclass, interfaces) = supertypes_of(&node, source);

        let mut declared = DeclaredType {
            qualified: qualified.clone(),
            simple,
            flavor,
            modifiers,
            type_params: type_params_of(&node, source),
            enclosing: self.stack.iter().rev().cloned().collect(),
            local,
            anonymous: false,
            superclass,
            interfaces,
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            enum_constants: Vec::new(),
            offset: node.start_byte(),
        };

        if flavor == TypeFlavor::Record {
            for param in formal_params(&node, source) {
                if let Some(name) = param.name {
                    declared.fields.push(FieldOutline {
                        name: node_text(&name, source).to_string(),
                        ty: param.ty,
                        modifiers: Modifiers::PRIVATE | Modifiers::FINAL,
                        offset: param.node.start_byte(),
                    });
                }
            }
        }

        let body = node.child_by_field_name("body");
        if let Some(body) = body {
            collect_members(&mut declared, &body, source);
        }
        add_implicit_constructor(&mut declared, name_node.start_byte());

        self.types.push(declared);
        self.stack.push(qualified);
        if let Some(body) = body {
            let mut cursor = body.walk();
            let children: Vec<_> = body.children(&mut cursor).collect();
            for child in children {
                self.walk(child);
            }
        }
        self.stack.pop();
    }

    fn anonymous(&mut self, base: Option<TypeExpr>, body: tree_sitter::Node<'_>) {
        let Some(outer) = self.stack.last().cloned() else {
            return;
        };
        let counter = self.anonymous_counters.entry(outer.clone()).or_insert(0);
        *counter += 1;
        let qualified = format!("{}${}", outer, counter);

        let mut declared = DeclaredType {
            qualified: qualified.clone(),
            simple: String::new(),
            flavor: TypeFlavor::Class,
            modifiers: Modifiers::empty(),
            type_params: Vec::new(),
            enclosing: self.stack.iter().rev().cloned().collect(),
            local: true,
            anonymous: true,
            superclass: base,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            enum_constants: Vec::new(),
            offset: body.start_byte(),
        };
        collect_members(&mut declared, &body, self.source);

        self.types.push(declared);
        self.stack.push(qualified);
        let mut cursor = body.walk();
        let children: Vec<_> = body.children(&mut cursor).collect();
        for child in children {
            self.walk(child);
        }
        self.stack.pop();
    }

    fn container_flavor(&self) -> Option<TypeFlavor> {
        let outer = self.stack.last()?;
        self.types
            .iter()
            .rev()
            .find(|t| &t.qualified == outer)
            .map(|t| t.flavor)
    }
}

fn collect_members(declared: &mut DeclaredType, body: &tree_sitter::Node<'_>, source: &[u8]) {
    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        match child.kind() {
            "enum_constant" => {
                if let Some(name) = child.child_by_field_name("name") {
                    declared
                        .enum_constants
                        .push(node_text(&name, source).to_string());
                }
            }
            "enum_body_declarations" => collect_members(declared, &child, source),
            "field_declaration" | "constant_declaration" => {
                let explicit = modifiers_of(&child, source);
                let modifiers =
                    implicit_member_modifiers(declared.flavor, child.kind(), explicit, false);
                let Some(ty) = child
                    .child_by_field_name("type")
                    .and_then(|t| parse_type(&t, source))
                else {
                    continue;
                };
                let mut inner = child.walk();
                for declarator in child.children_by_field_name("declarator", &mut inner) {
                    let Some(name) = declarator.child_by_field_name("name") else {
                        continue;
                    };
                    let dims = declarator
                        .child_by_field_name("dimensions")
                        .map(|d| node_text(&d, source).matches('[').count())
                        .unwrap_or(0);
                    declared.fields.push(FieldOutline {
                        name: node_text(&name, source).to_string(),
                        ty: ty.clone().with_dims(dims),
                        modifiers,
                        offset: declarator.start_byte(),
                    });
                }
            }
            "method_declaration" | "annotation_type_element_declaration" => {
                let Some(name) = child.child_by_field_name("name") else {
                    continue;
                };
                let has_body = child.child_by_field_name("body").is_some();
                let explicit = modifiers_of(&child, source);
                let params = formal_params(&child, source);
                let dims = child
                    .child_by_field_name("dimensions")
                    .map(|d| node_text(&d, source).matches('[').count())
                    .unwrap_or(0);
                declared.methods.push(MethodOutline {
                    name: node_text(&name, source).to_string(),
                    varargs: params.iter().any(|p| p.varargs),
                    params: params.into_iter().map(|p| p.ty).collect(),
                    return_type: child
                        .child_by_field_name("type")
                        .and_then(|t| parse_type(&t, source))
                        .map(|t| t.with_dims(dims)),
                    modifiers: implicit_member_modifiers(
                        declared.flavor,
                        child.kind(),
                        explicit,
                        has_body,
                    ),
                    type_params: type_params_of(&child, source),
                    offset: child.start_byte(),
                    implicit: false,
                });
            }
            "constructor_declaration" | "compact_constructor_declaration" => {
                let explicit = modifiers_of(&child, source);
                let (params, varargs) = if child.kind() == "compact_constructor_declaration" {
                    let components = declared.fields.iter().map(|f| f.ty.clone()).collect();
                    (components, false)
                } else {
                    let params = formal_params(&child, source);
                    let varargs = params.iter().any(|p| p.varargs);
                    (params.into_iter().map(|p| p.ty).collect(), varargs)
                };
                declared.constructors.push(MethodOutline {
                    name: declared.simple.clone(),
                    params,
                    varargs,
                    return_type: None,
                    modifiers: implicit_member_modifiers(
                        declared.flavor,
                        "constructor_declaration",
                        explicit,
                        true,
                    ),
                    type_params: type_params_of(&child, source),
                    offset: child.start_byte(),
                    implicit: false,
                });
            }
            _ => {}
        }
    }
}

/// Default constructor of a class, enum or record declaring none
fn add_implicit_constructor(declared: &mut DeclaredType, name_offset: usize) {
    if declared.anonymous
        || !declared.constructors.is_empty()
        || !matches!(
            declared.flavor,
            TypeFlavor::Class | TypeFlavor::Enum | TypeFlavor::Record
        )
    {
        return;
    }
    let params = if declared.flavor == TypeFlavor::Record {
        declared.fields.iter().map(|f| f.ty.clone()).collect()
    } else {
        Vec::new()
    };
    let modifiers = match declared.flavor {
        TypeFlavor::Enum => Modifiers::PRIVATE,
        _ => declared.modifiers & (Modifiers::PUBLIC | Modifiers::PROTECTED | Modifiers::PRIVATE),
    };
    declared.constructors.push(MethodOutline {
        name: declared.simple.clone(),
        params,
        varargs: false,
        return_type: None,
        modifiers,
        type_params: Vec::new(),
        offset: name_offset,
        implicit: true,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline_of(source: &str) -> FileOutline {
        let tree = crate::ingest::pool::parse(source.as_bytes()).unwrap().unwrap();
        outline("zoo/Zoo.java", &tree, source.as_bytes())
    }

    #[test]
    fn test_package_imports_and_nested_names() {
        let outline = outline_of(
            "package zoo;\nimport java.util.*;\nimport static java.lang.Math.max;\n\
             public class Zoo { static class Cage {} interface Feeder { void feed(); } }",
        );
        assert_eq!(outline.package, "zoo");
        assert_eq!(outline.imports.len(), 2);
        assert!(outline.imports[0].is_on_demand);
        assert_eq!(outline.imports[1].name, "java.lang.Math.max");
        assert!(outline.imports[1].is_static);
        let names: Vec<_> = outline.types.iter().map(|t| t.qualified.as_str()).collect();
        assert_eq!(names, vec!["zoo.Zoo", "zoo.Zoo.Cage", "zoo.Zoo.Feeder"]);
        let feeder = &outline.types[2];
        assert_eq!(feeder.enclosing, vec!["zoo.Zoo".to_string()]);
        assert!(feeder.modifiers.contains(Modifiers::STATIC));
        assert!(feeder.methods[0]
            .modifiers
            .contains(Modifiers::PUBLIC | Modifiers::ABSTRACT));
    }

    #[test]
    fn test_anonymous_and_local_class_names() {
        let outline = outline_of(
            "package zoo;\nclass Zoo {\n  Runnable r = new Runnable() { public void run() {} };\n\
             void m() { class Helper {} Object o = new Object() {}; }\n}",
        );
        let names: Vec<_> = outline.types.iter().map(|t| t.qualified.as_str()).collect();
        assert_eq!(names, vec!["zoo.Zoo", "zoo.Zoo$1", "zoo.Zoo$1Helper", "zoo.Zoo$2"]);
        assert!(outline.types[1].anonymous);
        assert!(outline.types[2].local && !outline.types[2].anonymous);
        assert_eq!(outline.types[1].methods[0].name, "run");
    }

    #[test]
    fn test_implicit_constructor_and_enum_constants() {
        let outline = outline_of(
            "package zoo;\npublic enum Color { RED, GREEN { void shade() {} }, BLUE; }",
        );
        let color = &outline.types[0];
        assert_eq!(color.enum_constants, vec!["RED", "GREEN", "BLUE"]);
        assert_eq!(color.constructors.len(), 1);
        assert!(color.constructors[0].implicit);
        assert_eq!(color.constructors[0].modifiers, Modifiers::PRIVATE);
        assert_eq!(outline.types[1].qualified, "zoo.Color$1");
        assert_eq!(
            outline.types[1].superclass.as_ref().map(|t| t.name.as_str()),
            Some("Color")
        );
    }

    #[test]
    fn test_fields_and_varargs() {
        let outline = outline_of(
            "class Box { private int a, b[]; void put(String... items) {} <T extends Number> T get() { return null; } }",
        );
        let boxed = &outline.types[0];
        assert_eq!(boxed.fields.len(), 2);
        assert_eq!(boxed.fields[1].ty.dims, 1);
        assert!(boxed.methods[0].varargs);
        assert_eq!(boxed.methods[0].params[0].dims, 1);
        assert_eq!(boxed.methods[1].type_params[0].name, "T");
        assert_eq!(boxed.methods[1].type_params[0].bounds[0].name, "Number");
    }
}
