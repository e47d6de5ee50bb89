//! Graph writer: turns one bound node into its persisted row set.
//!
//! [`build_record`] is pure and runs on worker threads; [`persist_record`]
//! writes the rows in a fixed order through a [`RowSink`]:
//! relations, occurrence, member rows, documentation, import.

use crate::binding::{MethodBinding, SyntaxNode, TypeFlavor, VariableBinding, VariableOwner};
use crate::graph::schema::{ImportRow, NewOccurrence, SymbolDetails};
use crate::graph::{RowSink, StoreError};
use crate::identity::{self, classify, classify_read_write, entity_hash, Classification};
use crate::model::{Modifiers, OccurrenceKind, SymbolKind};
use crate::relations::{
    collect_inherit_relations, collect_method_relations, Relation, TypeHierarchy,
};

/// Everything persisted for one syntactic occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceRecord {
    pub relations: Vec<Relation>,
    pub occurrence: NewOccurrence,
    pub members: Vec<Classification>,
    /// Preceding documentation comment, keyed by the occurrence's entity hash
    pub doc: Option<String>,
    pub import: Option<ImportRow>,
}

/// Build the row set of a node
pub fn build_record(node: &SyntaxNode, hierarchy: &dyn TypeHierarchy) -> OccurrenceRecord {
    let identity = identity::identify(node);

    let relations = match node {
        SyntaxNode::MethodDecl(n) => collect_method_relations(&n.method, &n.supertypes, hierarchy),
        SyntaxNode::TypeDecl(n) => collect_inherit_relations(&n.qualified_name, &n.supertypes),
        _ => Vec::new(),
    };

    let (symbol_kind, occurrence_kind, details) = describe(node);
    let span = node.span();
    let occurrence = NewOccurrence {
        range: span.range,
        text: span.text.clone(),
        symbol_kind,
        occurrence_kind,
        entity_hash: identity.entity_hash,
        definition_entity_hash: identity.definition_entity_hash,
        scope_hash: identity::scope_hash(node),
        visible: span.visible,
        details,
    };

    let import = match node {
        SyntaxNode::Import(n) => Some(ImportRow {
            qualified_name: n.qualified_name.clone(),
            is_static: n.is_static,
            is_on_demand: n.is_on_demand,
        }),
        _ => None,
    };

    OccurrenceRecord {
        relations,
        occurrence,
        members: classify(node),
        doc: node.doc().map(str::to_string),
        import,
    }
}

/// Persist a record; returns the new occurrence id
///
/// Stops at the first failing write. The caller discards the whole file.
pub fn persist_record(
    sink: &mut dyn RowSink,
    file_id: i64,
    record: &OccurrenceRecord,
) -> Result<i64, StoreError> {
    for relation in &record.relations {
        sink.insert_relation(file_id, relation)?;
    }
    let occurrence_id = sink.insert_occurrence(file_id, &record.occurrence)?;
    for member in &record.members {
        sink.insert_member(occurrence_id, member)?;
    }
    if let Some(doc) = &record.doc {
        sink.insert_doc(file_id, record.occurrence.entity_hash, doc)?;
    }
    if let Some(import) = &record.import {
        sink.insert_import(file_id, occurrence_id, import)?;
    }
    Ok(occurrence_id)
}

fn describe(node: &SyntaxNode) -> (SymbolKind, OccurrenceKind, SymbolDetails) {
    match node {
        SyntaxNode::TypeDecl(n) => {
            let kind = if n.flavor == TypeFlavor::Enum {
                SymbolKind::Enum
            } else {
                SymbolKind::Type
            };
            let details = SymbolDetails {
                name: n.simple_name.clone(),
                qualified_name: n.qualified_name.clone(),
                owner_hash: n.enclosing.first().map(|e| entity_hash(e)),
                modifiers: n.modifiers,
                ..SymbolDetails::default()
            };
            (kind, OccurrenceKind::Definition, details)
        }
        SyntaxNode::TypeUsage(n) => {
            let kind = if n.is_enum {
                SymbolKind::Enum
            } else {
                SymbolKind::Type
            };
            let details = SymbolDetails {
                name: n.type_name.simple_name().to_string(),
                qualified_name: n.type_name.display.clone(),
                modifiers: n.modifiers,
                ..SymbolDetails::default()
            };
            (kind, OccurrenceKind::Usage, details)
        }
        SyntaxNode::Import(n) => {
            let name = n.qualified_name.rsplit('.').next().unwrap_or_default();
            let details = SymbolDetails {
                name: name.to_string(),
                qualified_name: n.qualified_name.clone(),
                modifiers: if n.is_static {
                    Modifiers::STATIC
                } else {
                    Modifiers::empty()
                },
                ..SymbolDetails::default()
            };
            (SymbolKind::Type, OccurrenceKind::Usage, details)
        }
        SyntaxNode::EnumConstantDecl(n) => {
            let details = SymbolDetails {
                name: n.name.clone(),
                qualified_name: format!("{}.{}", n.enum_type.name, n.name),
                qualified_type: n.enum_type.name.clone(),
                type_hash: identity::type_hash(&n.enum_type.name),
                owner_hash: Some(entity_hash(&n.enum_type.name)),
                modifiers: n.modifiers,
                role: None,
                value: Some(n.ordinal.to_string()),
            };
            (SymbolKind::EnumConstant, OccurrenceKind::Definition, details)
        }
        SyntaxNode::EnumConstantUsage(n) => {
            let details = SymbolDetails {
                name: n.name.clone(),
                qualified_name: format!("{}.{}", n.enum_type.name, n.name),
                qualified_type: n.enum_type.name.clone(),
                type_hash: identity::type_hash(&n.enum_type.name),
                owner_hash: Some(entity_hash(&n.enum_type.name)),
                modifiers: n.modifiers,
                role: None,
                value: n.ordinal.map(|o| o.to_string()),
            };
            (SymbolKind::EnumConstant, OccurrenceKind::Usage, details)
        }
        SyntaxNode::MethodDecl(n) => {
            let kind = if n.has_body {
                OccurrenceKind::Definition
            } else {
                OccurrenceKind::Declaration
            };
            (callable_kind(&n.method), kind, method_details(&n.method))
        }
        SyntaxNode::Call(n) => (
            callable_kind(&n.callee),
            OccurrenceKind::Usage,
            method_details(&n.callee),
        ),
        SyntaxNode::Initializer(n) => {
            let details = SymbolDetails {
                name: if n.is_static { "static" } else { "instance" }.to_string(),
                qualified_name: format!("{}.<init@{}>", n.declaring.name, n.offset()),
                owner_hash: Some(entity_hash(&n.declaring.name)),
                modifiers: if n.is_static {
                    Modifiers::STATIC
                } else {
                    Modifiers::empty()
                },
                ..SymbolDetails::default()
            };
            (SymbolKind::Initializer, OccurrenceKind::Definition, details)
        }
        SyntaxNode::VariableDecl(n) => {
            let kind = if n.has_initializer {
                OccurrenceKind::Definition
            } else {
                OccurrenceKind::Declaration
            };
            (SymbolKind::Variable, kind, variable_details(&n.variable))
        }
        SyntaxNode::VariableUsage(n) => (
            SymbolKind::Variable,
            classify_read_write(n),
            variable_details(&n.variable),
        ),
    }
}

fn callable_kind(method: &MethodBinding) -> SymbolKind {
    if method.is_constructor {
        SymbolKind::Constructor
    } else {
        SymbolKind::Method
    }
}

fn method_details(method: &MethodBinding) -> SymbolDetails {
    let (qualified_type, type_hash) = if method.is_constructor {
        (String::new(), None)
    } else {
        (
            method.return_type.display.clone(),
            identity::type_hash(&method.return_type.erased),
        )
    };
    SymbolDetails {
        name: method.name.clone(),
        qualified_name: format!("{}.{}", method.declaring.name, method.name),
        qualified_type,
        type_hash,
        owner_hash: Some(entity_hash(&method.declaring.name)),
        modifiers: method.modifiers,
        role: None,
        value: None,
    }
}

fn variable_details(variable: &VariableBinding) -> SymbolDetails {
    let (qualified_name, owner_hash) = match &variable.owner {
        VariableOwner::Field(declaring) => (
            format!("{}.{}", declaring.name, variable.name),
            Some(entity_hash(&declaring.name)),
        ),
        _ => (variable.name.clone(), None),
    };
    SymbolDetails {
        name: variable.name.clone(),
        qualified_name,
        qualified_type: variable.var_type.display.clone(),
        type_hash: identity::type_hash(&variable.var_type.erased),
        owner_hash,
        modifiers: variable.modifiers,
        role: Some(variable.role),
        value: None,
    }
}
