//! Member classification and read/write classification.

use super::{entity_hash, identify};
use crate::binding::{SyntaxNode, TypeFlavor, UsageContext, VariableOwner, VariableUsageNode};
use crate::model::{MemberKind, Modifiers, OccurrenceKind, Visibility};

/// One member-classification row, minus the occurrence id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub member_kind: MemberKind,
    pub owning_type_hash: i64,
    pub member_hash: i64,
    pub modifiers: Modifiers,
    pub visibility: Visibility,
}

impl Classification {
    fn new(member_kind: MemberKind, owner: i64, member: i64, modifiers: Modifiers) -> Self {
        Self {
            member_kind,
            owning_type_hash: owner,
            member_hash: member,
            modifiers,
            visibility: Visibility::from_modifiers(modifiers),
        }
    }
}

/// Member rows for a declaration node
///
/// A type gets its self row; a member type also gets a row owned by its
/// enclosing type. Usages, locals, parameters and initializers get none.
pub fn classify(node: &SyntaxNode) -> Vec<Classification> {
    let identity = identify(node);
    match node {
        SyntaxNode::TypeDecl(n) => {
            let kind = if n.flavor == TypeFlavor::Enum {
                MemberKind::Enum
            } else {
                MemberKind::Type
            };
            let own = identity.entity_hash;
            let mut rows = vec![Classification::new(kind, own, own, n.modifiers)];
            if let Some(enclosing) = n.enclosing.first().filter(|_| !n.local) {
                rows.push(Classification::new(
                    kind,
                    entity_hash(enclosing),
                    own,
                    n.modifiers,
                ));
            }
            rows
        }
        SyntaxNode::EnumConstantDecl(n) => vec![Classification::new(
            MemberKind::EnumConstant,
            entity_hash(&n.enum_type.name),
            identity.entity_hash,
            n.modifiers,
        )],
        SyntaxNode::MethodDecl(n) => {
            let kind = if n.method.is_constructor {
                MemberKind::Constructor
            } else {
                MemberKind::Method
            };
            vec![Classification::new(
                kind,
                entity_hash(&n.method.declaring.name),
                identity.entity_hash,
                n.method.modifiers,
            )]
        }
        SyntaxNode::VariableDecl(n) => match &n.variable.owner {
            VariableOwner::Field(declaring) => vec![Classification::new(
                MemberKind::Field,
                entity_hash(&declaring.name),
                identity.entity_hash,
                n.variable.modifiers,
            )],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Classify a variable reference as READ or WRITE
///
/// WRITE when the reference expression is exactly the assignment target,
/// exactly the receiver of an invocation, or an increment/decrement operand.
/// Positions are compared by start offset, not by containment.
pub fn classify_read_write(usage: &VariableUsageNode) -> OccurrenceKind {
    let start = usage.reference_start;
    let is_write = match usage.context {
        UsageContext::Assignment { lhs_start } => lhs_start == start,
        UsageContext::Invocation { start: invocation } => invocation == start,
        UsageContext::IncDec => true,
        UsageContext::Other => false,
    };
    if is_write {
        OccurrenceKind::Write
    } else {
        OccurrenceKind::Read
    }
}
