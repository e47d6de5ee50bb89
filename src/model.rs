//! Core vocabulary of the cross-reference graph.
//!
//! Every enum here is persisted as a lowercase tag string so that rows stay
//! readable with a plain `sqlite3` shell.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of symbol an occurrence refers to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Type,
    Enum,
    EnumConstant,
    Method,
    Constructor,
    Variable,
    Initializer,
}

impl SymbolKind {
    pub const ALL: [SymbolKind; 7] = [
        SymbolKind::Type,
        SymbolKind::Enum,
        SymbolKind::EnumConstant,
        SymbolKind::Method,
        SymbolKind::Constructor,
        SymbolKind::Variable,
        SymbolKind::Initializer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Type => "type",
            SymbolKind::Enum => "enum",
            SymbolKind::EnumConstant => "enum_constant",
            SymbolKind::Method => "method",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Variable => "variable",
            SymbolKind::Initializer => "initializer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Type-like kinds share one identity space
    pub fn is_type_like(&self) -> bool {
        matches!(self, SymbolKind::Type | SymbolKind::Enum)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a symbol appears at an occurrence
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum OccurrenceKind {
    /// Signature without body or initializer
    Declaration,
    /// Signature with body or initializer
    Definition,
    Usage,
    /// Variable usage that only reads the value
    Read,
    /// Variable usage that stores into the variable
    Write,
}

impl OccurrenceKind {
    pub const ALL: [OccurrenceKind; 5] = [
        OccurrenceKind::Declaration,
        OccurrenceKind::Definition,
        OccurrenceKind::Usage,
        OccurrenceKind::Read,
        OccurrenceKind::Write,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OccurrenceKind::Declaration => "declaration",
            OccurrenceKind::Definition => "definition",
            OccurrenceKind::Usage => "usage",
            OccurrenceKind::Read => "read",
            OccurrenceKind::Write => "write",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            OccurrenceKind::Usage | OccurrenceKind::Read | OccurrenceKind::Write
        )
    }
}

impl fmt::Display for OccurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind recorded in a member-classification row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Type,
    Enum,
    EnumConstant,
    Method,
    Constructor,
    Field,
}

impl MemberKind {
    pub const ALL: [MemberKind; 6] = [
        MemberKind::Type,
        MemberKind::Enum,
        MemberKind::EnumConstant,
        MemberKind::Method,
        MemberKind::Constructor,
        MemberKind::Field,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberKind::Type => "type",
            MemberKind::Enum => "enum",
            MemberKind::EnumConstant => "enum_constant",
            MemberKind::Method => "method",
            MemberKind::Constructor => "constructor",
            MemberKind::Field => "field",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Member kind used to look up tags for an occurrence of `symbol`
    ///
    /// Initializers have no member row.
    pub fn for_symbol(symbol: SymbolKind) -> Option<Self> {
        match symbol {
            SymbolKind::Type => Some(MemberKind::Type),
            SymbolKind::Enum => Some(MemberKind::Enum),
            SymbolKind::EnumConstant => Some(MemberKind::EnumConstant),
            SymbolKind::Method => Some(MemberKind::Method),
            SymbolKind::Constructor => Some(MemberKind::Constructor),
            SymbolKind::Variable => Some(MemberKind::Field),
            SymbolKind::Initializer => None,
        }
    }
}

/// Access level derived from modifiers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    Private,
    Package,
}

impl Visibility {
    pub fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.contains(Modifiers::PUBLIC) {
            Visibility::Public
        } else if modifiers.contains(Modifiers::PRIVATE) {
            Visibility::Private
        } else if modifiers.contains(Modifiers::PROTECTED) {
            Visibility::Protected
        } else {
            Visibility::Package
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
            Visibility::Package => "package",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "public" => Some(Visibility::Public),
            "protected" => Some(Visibility::Protected),
            "private" => Some(Visibility::Private),
            "package" => Some(Visibility::Package),
            _ => None,
        }
    }
}

/// Typed edge between two entity hashes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Supertype to subtype
    Inherit,
    /// Ancestor-class method to overriding method
    Override,
    /// Interface method to implementing method
    Implement,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Inherit => "inherit",
            RelationKind::Override => "override",
            RelationKind::Implement => "implement",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "inherit" => Some(RelationKind::Inherit),
            "override" => Some(RelationKind::Override),
            "implement" => Some(RelationKind::Implement),
            _ => None,
        }
    }
}

/// Role of a variable symbol
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VariableRole {
    Field,
    Parameter,
    Local,
}

impl VariableRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableRole::Field => "field",
            VariableRole::Parameter => "parameter",
            VariableRole::Local => "local",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "field" => Some(VariableRole::Field),
            "parameter" => Some(VariableRole::Parameter),
            "local" => Some(VariableRole::Local),
            _ => None,
        }
    }
}

bitflags! {
    /// Java modifier set
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u32 {
        const PUBLIC = 1;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const STATIC = 1 << 3;
        const FINAL = 1 << 4;
        const ABSTRACT = 1 << 5;
        const SYNCHRONIZED = 1 << 6;
        const NATIVE = 1 << 7;
        const TRANSIENT = 1 << 8;
        const VOLATILE = 1 << 9;
        const STRICTFP = 1 << 10;
        const DEFAULT = 1 << 11;
        const SEALED = 1 << 12;
        const NON_SEALED = 1 << 13;
    }
}

impl Modifiers {
    /// Map a modifier keyword to its flag
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "public" => Some(Modifiers::PUBLIC),
            "private" => Some(Modifiers::PRIVATE),
            "protected" => Some(Modifiers::PROTECTED),
            "static" => Some(Modifiers::STATIC),
            "final" => Some(Modifiers::FINAL),
            "abstract" => Some(Modifiers::ABSTRACT),
            "synchronized" => Some(Modifiers::SYNCHRONIZED),
            "native" => Some(Modifiers::NATIVE),
            "transient" => Some(Modifiers::TRANSIENT),
            "volatile" => Some(Modifiers::VOLATILE),
            "strictfp" => Some(Modifiers::STRICTFP),
            "default" => Some(Modifiers::DEFAULT),
            "sealed" => Some(Modifiers::SEALED),
            "non-sealed" => Some(Modifiers::NON_SEALED),
            _ => None,
        }
    }
}

/// Source span of an occurrence
///
/// Lines are 1-indexed, columns are 0-indexed byte columns, offsets are
/// 0-indexed bytes from file start (tree-sitter conventions).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct SourceRange {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
    pub start_offset: usize,
    pub end_offset: usize,
}

impl SourceRange {
    /// Whether (line, col) falls inside this range, start inclusive, end exclusive
    pub fn contains(&self, line: usize, col: usize) -> bool {
        let pos = (line, col);
        (self.start_line, self.start_col) <= pos && pos < (self.end_line, self.end_col)
    }

    pub fn byte_len(&self) -> usize {
        self.end_offset.saturating_sub(self.start_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_round_trip_through_parse() {
        for kind in SymbolKind::ALL {
            assert_eq!(SymbolKind::parse(kind.as_str()), Some(kind));
        }
        for kind in OccurrenceKind::ALL {
            assert_eq!(OccurrenceKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(SymbolKind::parse("class"), None);
    }

    #[test]
    fn test_visibility_from_modifiers() {
        assert_eq!(
            Visibility::from_modifiers(Modifiers::PUBLIC | Modifiers::STATIC),
            Visibility::Public
        );
        assert_eq!(Visibility::from_modifiers(Modifiers::PRIVATE), Visibility::Private);
        assert_eq!(Visibility::from_modifiers(Modifiers::PROTECTED), Visibility::Protected);
        assert_eq!(Visibility::from_modifiers(Modifiers::FINAL), Visibility::Package);
    }

    #[test]
    fn test_range_contains_is_end_exclusive() {
        let range = SourceRange {
            start_line: 2,
            start_col: 4,
            end_line: 4,
            end_col: 1,
            start_offset: 10,
            end_offset: 40,
        };
        assert!(range.contains(2, 4));
        assert!(range.contains(3, 0));
        assert!(range.contains(4, 0));
        assert!(!range.contains(4, 1));
        assert!(!range.contains(2, 3));
        assert_eq!(range.byte_len(), 30);
    }
}
