//! Type universe: every outlined type, resolved against every other.
//!
//! Built once per indexing run from all file outlines. Resolution is staged
//! so later stages can rely on earlier ones: type names are registered
//! first, then type-parameter bounds, then supertypes, then member
//! signatures. Lookups walk a type's lineage: the type itself, its
//! superclass chain, then every interface reachable from them.

use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;
use tracing::debug;

use super::outline::{DeclaredType, FileOutline, ImportDecl, MethodOutline, TypeParamDecl};
use super::types::{TypeExpr, TypeExprKind};
use crate::binding::{DeclaringType, MethodBinding, Supertypes, TypeFlavor, TypeName};
use crate::model::Modifiers;
use crate::relations::{MethodSignature, TypeHierarchy, TypeShape};

const OBJECT: &str = "java.lang.Object";

/// Implicitly imported `java.lang` names
const JAVA_LANG: &[&str] = &[
    "Object",
    "String",
    "StringBuilder",
    "StringBuffer",
    "CharSequence",
    "Boolean",
    "Byte",
    "Character",
    "Short",
    "Integer",
    "Long",
    "Float",
    "Double",
    "Number",
    "Void",
    "Math",
    "System",
    "Thread",
    "Runnable",
    "Iterable",
    "Comparable",
    "Cloneable",
    "AutoCloseable",
    "Class",
    "Enum",
    "Record",
    "Exception",
    "RuntimeException",
    "Error",
    "Throwable",
    "IllegalArgumentException",
    "IllegalStateException",
    "NullPointerException",
    "UnsupportedOperationException",
    "IndexOutOfBoundsException",
    "Override",
    "Deprecated",
    "SuppressWarnings",
    "FunctionalInterface",
    "SafeVarargs",
];

/// Well-known names of common packages, for on-demand imports of code outside the index
const WELL_KNOWN_PACKAGES: &[(&str, &[&str])] = &[
    (
        "java.util",
        &[
            "List",
            "ArrayList",
            "LinkedList",
            "Map",
            "HashMap",
            "TreeMap",
            "LinkedHashMap",
            "Set",
            "HashSet",
            "TreeSet",
            "Collection",
            "Collections",
            "Iterator",
            "Optional",
            "Arrays",
            "Objects",
            "Deque",
            "ArrayDeque",
            "Queue",
        ],
    ),
    (
        "java.io",
        &[
            "File",
            "IOException",
            "InputStream",
            "OutputStream",
            "Reader",
            "Writer",
            "Serializable",
        ],
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldShape {
    pub name: String,
    pub ty: TypeName,
    pub modifiers: Modifiers,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodShape {
    /// Simple class name for constructors
    pub name: String,
    pub params: Vec<TypeName>,
    pub varargs: bool,
    pub return_type: TypeName,
    pub modifiers: Modifiers,
    /// Method type parameters and their erased bounds
    pub type_params: Vec<(String, String)>,
    pub offset: usize,
    pub is_constructor: bool,
    pub implicit: bool,
}

impl MethodShape {
    fn accepts_arity(&self, count: usize) -> bool {
        if self.varargs {
            count + 1 >= self.params.len()
        } else {
            count == self.params.len()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub qualified: String,
    pub simple: String,
    pub path: String,
    pub flavor: TypeFlavor,
    pub modifiers: Modifiers,
    /// Innermost first
    pub enclosing: Vec<String>,
    pub local: bool,
    pub anonymous: bool,
    pub type_params: Vec<(String, String)>,
    pub superclass: Option<TypeName>,
    pub interfaces: Vec<TypeName>,
    pub fields: Vec<FieldShape>,
    pub methods: Vec<MethodShape>,
    pub constructors: Vec<MethodShape>,
    /// Ordinal is the index
    pub enum_constants: Vec<String>,
    pub offset: usize,
    /// Member types declared directly in this type: (simple, qualified)
    member_types: Vec<(String, String)>,
    /// Local classes declared in this type's bodies: (simple, qualified)
    local_types: Vec<(String, String)>,
    pub shape: TypeShape,
}

impl ResolvedType {
    pub fn declaring(&self) -> DeclaringType {
        let outermost = self.enclosing.last().unwrap_or(&self.qualified);
        DeclaringType::new(self.qualified.clone(), outermost.clone())
    }

    pub fn supertypes(&self) -> Supertypes {
        Supertypes {
            superclass: self.superclass.as_ref().map(|s| s.erased.clone()),
            interfaces: self.interfaces.iter().map(|i| i.erased.clone()).collect(),
        }
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Interface | TypeFlavor::Annotation)
    }

    /// Method or constructor declared at `offset`
    pub fn callable_at(&self, offset: usize) -> Option<&MethodShape> {
        self.methods
            .iter()
            .chain(self.constructors.iter())
            .find(|m| m.offset == offset)
    }

    pub fn field_at(&self, offset: usize) -> Option<&FieldShape> {
        self.fields.iter().find(|f| f.offset == offset)
    }

    pub fn ordinal_of(&self, constant: &str) -> Option<usize> {
        self.enum_constants.iter().position(|c| c == constant)
    }

    /// Binding of one of this type's methods or constructors
    pub fn method_binding(&self, method: &MethodShape) -> MethodBinding {
        MethodBinding {
            name: if method.is_constructor {
                self.simple.clone()
            } else {
                method.name.clone()
            },
            declaring: self.declaring(),
            parameter_types: method.params.iter().map(|p| p.erased.clone()).collect(),
            return_type: method.return_type.clone(),
            is_constructor: method.is_constructor,
            modifiers: method.modifiers,
        }
    }
}

/// Package and imports of one file
#[derive(Debug, Clone, Default)]
pub struct FileScope {
    pub package: String,
    pub imports: Vec<ImportDecl>,
}

/// Where a name is being resolved
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    pub path: &'a str,
    /// Innermost enclosing type
    pub current_type: Option<&'a str>,
    /// Type parameters of the enclosing method, innermost last
    pub method_type_params: &'a [(String, String)],
}

impl<'a> Scope<'a> {
    pub fn new(path: &'a str, current_type: Option<&'a str>) -> Self {
        Self {
            path,
            current_type,
            method_type_params: &[],
        }
    }

    pub fn with_method_type_params(mut self, params: &'a [(String, String)]) -> Self {
        self.method_type_params = params;
        self
    }
}

/// A method found by lookup, with the type that declares it
#[derive(Debug, Clone, Copy)]
pub struct MethodRef<'u> {
    pub owner: &'u ResolvedType,
    pub method: &'u MethodShape,
}

impl MethodRef<'_> {
    pub fn binding(&self) -> MethodBinding {
        self.owner.method_binding(self.method)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRef<'u> {
    pub owner: &'u ResolvedType,
    pub field: &'u FieldShape,
}

/// All indexed types, resolved
#[derive(Debug, Default)]
pub struct TypeUniverse {
    types: Vec<ResolvedType>,
    by_name: AHashMap<String, usize>,
    by_position: AHashMap<(String, usize), usize>,
    files: AHashMap<String, FileScope>,
}

impl TypeHierarchy for TypeUniverse {
    fn type_shape(&self, qualified_name: &str) -> Option<&TypeShape> {
        self.get(qualified_name).map(|t| &t.shape)
    }
}

impl TypeUniverse {
    /// Resolve every outline into one universe
    pub fn build(outlines: Vec<FileOutline>) -> Self {
        let mut universe = TypeUniverse::default();
        let mut pending: Vec<DeclaredType> = Vec::new();

        for outline in outlines {
            universe.files.insert(
                outline.path.clone(),
                FileScope {
                    package: outline.package,
                    imports: outline.imports,
                },
            );
            for declared in outline.types {
                let index = universe.types.len();
                if universe.by_name.contains_key(&declared.qualified) {
                    debug!(
                        "Duplicate type {} in {}; keeping the first declaration",
                        declared.qualified, outline.path
                    );
                } else {
                    universe.by_name.insert(declared.qualified.clone(), index);
                }
                universe
                    .by_position
                    .insert((outline.path.clone(), declared.offset), index);
                universe.types.push(skeleton(&declared, &outline.path));
                pending.push(declared);
            }
        }

        universe.link_member_types();

        for (index, declared) in pending.iter().enumerate() {
            let type_params = universe.resolve_type_params(index, &declared.type_params, &[]);
            universe.types[index].type_params = type_params;
        }
        for (index, declared) in pending.iter().enumerate() {
            universe.resolve_supertypes(index, declared);
        }
        for (index, declared) in pending.iter().enumerate() {
            universe.resolve_members(index, declared);
        }
        for resolved in &mut universe.types {
            resolved.shape = TypeShape {
                qualified_name: resolved.qualified.clone(),
                is_interface: resolved.is_interface(),
                superclass: resolved.superclass.as_ref().map(|s| s.erased.clone()),
                interfaces: resolved.interfaces.iter().map(|i| i.erased.clone()).collect(),
                methods: resolved
                    .methods
                    .iter()
                    .map(|m| MethodSignature {
                        name: m.name.clone(),
                        parameter_types: m.params.iter().map(|p| p.erased.clone()).collect(),
                    })
                    .collect(),
            };
        }
        universe
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, qualified: &str) -> Option<&ResolvedType> {
        self.by_name.get(qualified).map(|&i| &self.types[i])
    }

    /// The type declared at `offset` of `path` (declaration or anonymous body start)
    pub fn type_at(&self, path: &str, offset: usize) -> Option<&ResolvedType> {
        self.by_position
            .get(&(path.to_string(), offset))
            .map(|&i| &self.types[i])
    }

    pub fn file_scope(&self, path: &str) -> Option<&FileScope> {
        self.files.get(path)
    }

    pub fn types(&self) -> impl Iterator<Item = &ResolvedType> {
        self.types.iter()
    }

    fn link_member_types(&mut self) {
        let mut links: Vec<(usize, bool, String, String)> = Vec::new();
        for resolved in &self.types {
            let Some(parent) = resolved.enclosing.first() else {
                continue;
            };
            if resolved.anonymous {
                continue;
            }
            if let Some(&parent_index) = self.by_name.get(parent) {
                links.push((
                    parent_index,
                    resolved.local,
                    resolved.simple.clone(),
                    resolved.qualified.clone(),
                ));
            }
        }
        for (parent, local, simple, qualified) in links {
            let target = &mut self.types[parent];
            if local {
                target.local_types.push((simple, qualified));
            } else {
                target.member_types.push((simple, qualified));
            }
        }
    }

    fn resolve_type_params(
        &self,
        index: usize,
        params: &[TypeParamDecl],
        outer_method_params: &[(String, String)],
    ) -> Vec<(String, String)> {
        let resolved = &self.types[index];
        let scope = Scope::new(&resolved.path, Some(resolved.qualified.as_str()))
            .with_method_type_params(outer_method_params);
        params
            .iter()
            .map(|param| {
                let bound = param
                    .bounds
                    .first()
                    .filter(|b| b.name != param.name)
                    .map(|b| self.resolve(b, &scope).erased)
                    .filter(|b| !b.is_empty())
                    .unwrap_or_else(|| OBJECT.to_string());
                (param.name.clone(), bound)
            })
            .collect()
    }

    fn resolve_supertypes(&mut self, index: usize, declared: &DeclaredType) {
        let (superclass, mut interfaces) = {
            let resolved = &self.types[index];
            let scope = Scope::new(&resolved.path, Some(resolved.qualified.as_str()));
            let superclass = declared
                .superclass
                .as_ref()
                .map(|s| self.resolve(s, &scope))
                .filter(|s| s.is_resolved());
            let interfaces: Vec<TypeName> = declared
                .interfaces
                .iter()
                .map(|i| self.resolve(i, &scope))
                .filter(|i| i.is_resolved())
                .collect();
            (superclass, interfaces)
        };

        let superclass = match superclass {
            // An anonymous class over an interface implements it
            Some(base)
                if declared.anonymous && self.get(&base.erased).is_some_and(|b| b.is_interface()) =>
            {
                interfaces.insert(0, base);
                None
            }
            // Interfaces only extend interfaces
            other if declared.flavor == TypeFlavor::Interface => {
                interfaces.extend(other);
                None
            }
            other => other,
        };

        let target = &mut self.types[index];
        target.superclass = superclass;
        target.interfaces = interfaces;
    }

    fn resolve_members(&mut self, index: usize, declared: &DeclaredType) {
        let (fields, methods, constructors) = {
            let resolved = &self.types[index];
            let scope = Scope::new(&resolved.path, Some(resolved.qualified.as_str()));
            let fields: Vec<FieldShape> = declared
                .fields
                .iter()
                .map(|f| FieldShape {
                    name: f.name.clone(),
                    ty: self.resolve(&f.ty, &scope),
                    modifiers: f.modifiers,
                    offset: f.offset,
                })
                .collect();
            let methods: Vec<MethodShape> = declared
                .methods
                .iter()
                .map(|m| self.resolve_method(index, m, false))
                .collect();
            let constructors: Vec<MethodShape> = declared
                .constructors
                .iter()
                .map(|m| self.resolve_method(index, m, true))
                .collect();
            (fields, methods, constructors)
        };
        let target = &mut self.types[index];
        target.fields = fields;
        target.methods = methods;
        target.constructors = constructors;
    }

    fn resolve_method(
        &self,
        index: usize,
        method: &MethodOutline,
        is_constructor: bool,
    ) -> MethodShape {
        let type_params = self.resolve_type_params(index, &method.type_params, &[]);
        let resolved = &self.types[index];
        let scope = Scope::new(&resolved.path, Some(resolved.qualified.as_str()))
            .with_method_type_params(&type_params);
        let params = method.params.iter().map(|p| self.resolve(p, &scope)).collect();
        let return_type = match &method.return_type {
            Some(ty) => self.resolve(ty, &scope),
            None => TypeName::plain("void"),
        };
        MethodShape {
            name: method.name.clone(),
            params,
            varargs: method.varargs,
            return_type,
            modifiers: method.modifiers,
            offset: method.offset,
            is_constructor,
            implicit: method.implicit,
            type_params,
        }
    }

    /// Resolve a type expression to its erased and display forms
    pub fn resolve(&self, expr: &TypeExpr, scope: &Scope<'_>) -> TypeName {
        let suffix = "[]".repeat(expr.dims);
        match expr.kind {
            TypeExprKind::Primitive => TypeName::plain(format!("{}{}", expr.name, suffix)),
            TypeExprKind::Inferred => TypeName::unresolved(),
            TypeExprKind::Wildcard { upper } => {
                let bound = expr.args.first().map(|b| self.resolve(b, scope));
                match (bound, upper) {
                    (Some(bound), true) => {
                        TypeName::new(bound.erased, format!("? extends {}", bound.display))
                    }
                    (Some(bound), false) => {
                        TypeName::new(OBJECT, format!("? super {}", bound.display))
                    }
                    (None, _) => TypeName::new(OBJECT, "?"),
                }
            }
            TypeExprKind::Named => {
                if let Some(bound) = self.type_param_bound(&expr.name, scope) {
                    let erased = format!("{}{}", bound, suffix);
                    return TypeName::plain(erased);
                }
                let Some(base) = self.resolve_name(&expr.name, scope) else {
                    debug!("Unresolved type {} in {}", expr.name, scope.path);
                    return TypeName::unresolved();
                };
                let erased = format!("{}{}", base, suffix);
                if expr.args.is_empty() {
                    return TypeName::plain(erased);
                }
                let args: Vec<String> = expr
                    .args
                    .iter()
                    .map(|a| {
                        let arg = self.resolve(a, scope);
                        if arg.display.is_empty() {
                            "?".to_string()
                        } else {
                            arg.display
                        }
                    })
                    .collect();
                TypeName::new(erased, format!("{}<{}>{}", base, args.join(","), suffix))
            }
        }
    }

    /// Whether `name` denotes a type variable visible in `scope`
    pub fn is_type_param(&self, name: &str, scope: &Scope<'_>) -> bool {
        self.type_param_bound(name, scope).is_some()
    }

    fn type_param_bound(&self, name: &str, scope: &Scope<'_>) -> Option<String> {
        if name.contains('.') {
            return None;
        }
        if let Some((_, bound)) = scope
            .method_type_params
            .iter()
            .rev()
            .find(|(param, _)| param == name)
        {
            return Some(bound.clone());
        }
        self.chain(scope).into_iter().find_map(|t| {
            t.type_params
                .iter()
                .find(|(param, _)| param == name)
                .map(|(_, bound)| bound.clone())
        })
    }

    /// Enclosing chain of the scope, innermost first
    fn chain(&self, scope: &Scope<'_>) -> Vec<&ResolvedType> {
        let Some(current) = scope.current_type.and_then(|q| self.get(q)) else {
            return Vec::new();
        };
        let mut chain = vec![current];
        chain.extend(current.enclosing.iter().filter_map(|q| self.get(q)));
        chain
    }

    /// Resolve a dotted type name written in `scope`
    pub fn resolve_name(&self, dotted: &str, scope: &Scope<'_>) -> Option<String> {
        let mut segments = dotted.split('.');
        let first = segments.next().filter(|s| !s.is_empty())?;
        let rest: Vec<&str> = segments.collect();

        if let Some(head) = self.resolve_simple(first, scope) {
            return Some(self.descend(head, &rest));
        }
        if rest.is_empty() {
            return None;
        }
        for split in 1..=rest.len() {
            let candidate = format!("{}.{}", first, rest[..split].join("."));
            if self.by_name.contains_key(&candidate) {
                return Some(self.descend(candidate, &rest[split..]));
            }
        }
        // Fully qualified name of a type outside the index
        first
            .starts_with(|c: char| c.is_ascii_lowercase())
            .then(|| dotted.to_string())
    }

    fn descend(&self, mut head: String, rest: &[&str]) -> String {
        for segment in rest {
            head = self
                .member_type(&head, segment)
                .unwrap_or_else(|| format!("{}.{}", head, segment));
        }
        head
    }

    /// Resolve a simple type name
    pub fn resolve_simple(&self, name: &str, scope: &Scope<'_>) -> Option<String> {
        for level in self.chain(scope) {
            if let Some(member) = self.member_type(&level.qualified, name) {
                return Some(member);
            }
            if let Some((_, local)) = level.local_types.iter().find(|(s, _)| s == name) {
                return Some(local.clone());
            }
            if level.simple == name {
                return Some(level.qualified.clone());
            }
        }

        let file = self.files.get(scope.path);
        let imports = file.map(|f| f.imports.as_slice()).unwrap_or_default();

        if let Some(import) = imports.iter().find(|i| {
            !i.is_static && !i.is_on_demand && i.name.rsplit('.').next() == Some(name)
        }) {
            return Some(import.name.clone());
        }

        let package = file.map(|f| f.package.as_str()).unwrap_or_default();
        let same_package = if package.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", package, name)
        };
        if self.by_name.contains_key(&same_package) {
            return Some(same_package);
        }

        for import in imports.iter().filter(|i| i.is_on_demand) {
            let candidate = format!("{}.{}", import.name, name);
            if self.by_name.contains_key(&candidate) {
                return Some(candidate);
            }
            if let Some(member) = self.member_type(&import.name, name) {
                return Some(member);
            }
            let well_known = WELL_KNOWN_PACKAGES
                .iter()
                .any(|(pkg, names)| *pkg == import.name && names.contains(&name));
            if well_known {
                return Some(candidate);
            }
        }

        if JAVA_LANG.contains(&name) {
            return Some(format!("java.lang.{}", name));
        }
        None
    }

    /// Member type of `qualified` (inherited ones included)
    pub fn member_type(&self, qualified: &str, simple: &str) -> Option<String> {
        let start = *self.by_name.get(qualified)?;
        self.lineage(start).into_iter().find_map(|i| {
            self.types[i]
                .member_types
                .iter()
                .find(|(s, _)| s == simple)
                .map(|(_, q)| q.clone())
        })
    }

    /// Indices of a type, its superclass chain, then reachable interfaces
    fn lineage(&self, start: usize) -> Vec<usize> {
        let mut order = Vec::new();
        let mut seen = AHashSet::new();
        let mut current = Some(start);
        while let Some(index) = current {
            if !seen.insert(index) {
                break;
            }
            order.push(index);
            current = self.types[index]
                .superclass
                .as_ref()
                .and_then(|s| self.by_name.get(&s.erased).copied());
        }
        let mut queue: VecDeque<usize> = order
            .iter()
            .flat_map(|&i| self.interface_indices(i))
            .collect();
        while let Some(index) = queue.pop_front() {
            if seen.insert(index) {
                order.push(index);
                queue.extend(self.interface_indices(index));
            }
        }
        order
    }

    fn interface_indices(&self, index: usize) -> Vec<usize> {
        self.types[index]
            .interfaces
            .iter()
            .filter_map(|i| self.by_name.get(&i.erased).copied())
            .collect()
    }

    /// Whether `sub` is `sup` or one of its indexed descendants
    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        if sub == sup || sup == OBJECT {
            return true;
        }
        let Some(&start) = self.by_name.get(sub) else {
            return false;
        };
        self.lineage(start)
            .into_iter()
            .any(|i| self.types[i].qualified == sup)
    }

    /// Find a method by name and arguments in a type's lineage
    ///
    /// Candidates must accept the argument count; the best match by known
    /// argument types wins, the first in lineage order on a tie.
    pub fn find_method(
        &self,
        qualified: &str,
        name: &str,
        args: &[TypeName],
    ) -> Option<MethodRef<'_>> {
        let start = *self.by_name.get(qualified)?;
        let mut best: Option<(i64, MethodRef<'_>)> = None;
        for index in self.lineage(start) {
            let owner = &self.types[index];
            for method in owner.methods.iter().filter(|m| m.name == name) {
                if !method.accepts_arity(args.len()) {
                    continue;
                }
                let score = self.argument_score(method, args);
                if best.as_ref().map_or(true, |(s, _)| score > *s) {
                    best = Some((score, MethodRef { owner, method }));
                }
            }
        }
        best.map(|(_, found)| found)
    }

    /// Find a constructor declared by `qualified`
    pub fn find_constructor(&self, qualified: &str, args: &[TypeName]) -> Option<MethodRef<'_>> {
        let owner = self.get(qualified)?;
        let mut best: Option<(i64, MethodRef<'_>)> = None;
        for method in owner.constructors.iter() {
            if !method.accepts_arity(args.len()) {
                continue;
            }
            let score = self.argument_score(method, args);
            if best.as_ref().map_or(true, |(s, _)| score > *s) {
                best = Some((score, MethodRef { owner, method }));
            }
        }
        best.map(|(_, found)| found)
    }

    fn argument_score(&self, method: &MethodShape, args: &[TypeName]) -> i64 {
        let mut score = 0;
        for (position, arg) in args.iter().enumerate() {
            let param = match method.params.last() {
                Some(last) if method.varargs && position + 1 >= method.params.len() => {
                    if arg.erased == last.erased {
                        last.erased.as_str()
                    } else {
                        last.element()
                    }
                }
                _ => method
                    .params
                    .get(position)
                    .map(|p| p.erased.as_str())
                    .unwrap_or_default(),
            };
            if !arg.is_resolved() {
                continue;
            }
            if arg.erased == param {
                score += 2;
            } else if self.is_subtype(&arg.erased, param) || boxes_to(&arg.erased, param) {
                score += 1;
            } else {
                score -= 4;
            }
        }
        score
    }

    /// Find a field in a type's lineage
    pub fn find_field(&self, qualified: &str, name: &str) -> Option<FieldRef<'_>> {
        let start = *self.by_name.get(qualified)?;
        self.lineage(start).into_iter().find_map(|i| {
            let owner = &self.types[i];
            owner
                .fields
                .iter()
                .find(|f| f.name == name)
                .map(|field| FieldRef { owner, field })
        })
    }

    /// Find an enum constant visible from `qualified` (the enum or a constant body)
    pub fn find_enum_constant(
        &self,
        qualified: &str,
        name: &str,
    ) -> Option<(&ResolvedType, usize)> {
        let start = *self.by_name.get(qualified)?;
        self.lineage(start).into_iter().find_map(|i| {
            let owner = &self.types[i];
            owner.ordinal_of(name).map(|ordinal| (owner, ordinal))
        })
    }
}

fn skeleton(declared: &DeclaredType, path: &str) -> ResolvedType {
    ResolvedType {
        qualified: declared.qualified.clone(),
        simple: declared.simple.clone(),
        path: path.to_string(),
        flavor: declared.flavor,
        modifiers: declared.modifiers,
        enclosing: declared.enclosing.clone(),
        local: declared.local,
        anonymous: declared.anonymous,
        type_params: Vec::new(),
        superclass: None,
        interfaces: Vec::new(),
        fields: Vec::new(),
        methods: Vec::new(),
        constructors: Vec::new(),
        enum_constants: declared.enum_constants.clone(),
        offset: declared.offset,
        member_types: Vec::new(),
        local_types: Vec::new(),
        shape: TypeShape::default(),
    }
}

/// Primitive to wrapper conversions and widening between numeric primitives
fn boxes_to(arg: &str, param: &str) -> bool {
    let wrapper = match arg {
        "int" => "java.lang.Integer",
        "long" => "java.lang.Long",
        "double" => "java.lang.Double",
        "float" => "java.lang.Float",
        "boolean" => "java.lang.Boolean",
        "char" => "java.lang.Character",
        "byte" => "java.lang.Byte",
        "short" => "java.lang.Short",
        _ => return false,
    };
    if param == wrapper || param == OBJECT || param == "java.lang.Number" {
        return true;
    }
    let rank = |t: &str| match t {
        "byte" => Some(0),
        "short" | "char" => Some(1),
        "int" => Some(2),
        "long" => Some(3),
        "float" => Some(4),
        "double" => Some(5),
        _ => None,
    };
    matches!((rank(arg), rank(param)), (Some(a), Some(p)) if a < p)
}
