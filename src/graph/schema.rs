//! Row types and DDL for the cross-reference store.
//!
//! Hash-valued columns are plain integers, never foreign keys: entity
//! identity is virtual and derived by equality of hash values across rows.

use serde::{Deserialize, Serialize};

use crate::model::{
    MemberKind, Modifiers, OccurrenceKind, RelationKind, SourceRange, SymbolKind, VariableRole,
    Visibility,
};

/// Bumped whenever a table layout changes
pub const JXREF_SCHEMA_VERSION: i64 = 1;

pub const SCHEMA_DDL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS files (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        path TEXT NOT NULL UNIQUE,
        content_hash TEXT NOT NULL,
        indexed_at INTEGER NOT NULL,
        status TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS occurrences (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        file_id INTEGER NOT NULL REFERENCES files(id),
        start_line INTEGER NOT NULL,
        start_col INTEGER NOT NULL,
        end_line INTEGER NOT NULL,
        end_col INTEGER NOT NULL,
        start_offset INTEGER NOT NULL,
        end_offset INTEGER NOT NULL,
        text TEXT NOT NULL,
        symbol_kind TEXT NOT NULL,
        occurrence_kind TEXT NOT NULL,
        entity_hash INTEGER NOT NULL,
        definition_entity_hash INTEGER NOT NULL,
        scope_hash INTEGER,
        visible INTEGER NOT NULL,
        name TEXT NOT NULL,
        qualified_name TEXT NOT NULL,
        qualified_type TEXT NOT NULL,
        type_hash INTEGER,
        owner_hash INTEGER,
        modifiers INTEGER NOT NULL,
        role TEXT,
        value TEXT
    )",
    "CREATE TABLE IF NOT EXISTS relations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        file_id INTEGER NOT NULL REFERENCES files(id),
        kind TEXT NOT NULL,
        from_hash INTEGER NOT NULL,
        to_hash INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS member_types (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        occurrence_id INTEGER NOT NULL REFERENCES occurrences(id),
        type_hash INTEGER NOT NULL,
        member_hash INTEGER NOT NULL,
        kind TEXT NOT NULL,
        modifiers INTEGER NOT NULL,
        visibility TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS doc_comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        file_id INTEGER NOT NULL REFERENCES files(id),
        entity_hash INTEGER NOT NULL,
        content TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS imports (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        file_id INTEGER NOT NULL REFERENCES files(id),
        occurrence_id INTEGER NOT NULL REFERENCES occurrences(id),
        qualified_name TEXT NOT NULL,
        is_static INTEGER NOT NULL,
        is_on_demand INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_occ_file ON occurrences(file_id)",
    "CREATE INDEX IF NOT EXISTS idx_occ_entity ON occurrences(entity_hash)",
    "CREATE INDEX IF NOT EXISTS idx_occ_definition ON occurrences(definition_entity_hash)",
    "CREATE INDEX IF NOT EXISTS idx_occ_scope ON occurrences(scope_hash)",
    "CREATE INDEX IF NOT EXISTS idx_occ_owner ON occurrences(owner_hash)",
    "CREATE INDEX IF NOT EXISTS idx_rel_from ON relations(kind, from_hash)",
    "CREATE INDEX IF NOT EXISTS idx_rel_to ON relations(kind, to_hash)",
    "CREATE INDEX IF NOT EXISTS idx_rel_file ON relations(file_id)",
    "CREATE INDEX IF NOT EXISTS idx_member_type ON member_types(type_hash)",
    "CREATE INDEX IF NOT EXISTS idx_member_member ON member_types(member_hash)",
    "CREATE INDEX IF NOT EXISTS idx_member_occ ON member_types(occurrence_id)",
    "CREATE INDEX IF NOT EXISTS idx_doc_entity ON doc_comments(entity_hash)",
    "CREATE INDEX IF NOT EXISTS idx_doc_file ON doc_comments(file_id)",
    "CREATE INDEX IF NOT EXISTS idx_import_file ON imports(file_id)",
];

/// Per-symbol attributes stored alongside an occurrence
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SymbolDetails {
    pub name: String,
    pub qualified_name: String,
    /// Declared type, return type or enum type, with generic arguments
    pub qualified_type: String,
    /// Hash of the erased element type, when it can have a definition
    pub type_hash: Option<i64>,
    /// Hash of the declaring (owning) type
    pub owner_hash: Option<i64>,
    pub modifiers: Modifiers,
    pub role: Option<VariableRole>,
    /// Enum constant ordinal
    pub value: Option<String>,
}

/// An occurrence ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOccurrence {
    pub range: SourceRange,
    pub text: String,
    pub symbol_kind: SymbolKind,
    pub occurrence_kind: OccurrenceKind,
    pub entity_hash: i64,
    pub definition_entity_hash: i64,
    pub scope_hash: Option<i64>,
    pub visible: bool,
    pub details: SymbolDetails,
}

/// A persisted occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub id: i64,
    pub file_id: i64,
    pub file_path: String,
    pub range: SourceRange,
    pub text: String,
    pub symbol_kind: SymbolKind,
    pub occurrence_kind: OccurrenceKind,
    pub entity_hash: i64,
    pub definition_entity_hash: i64,
    pub scope_hash: Option<i64>,
    pub visible: bool,
    pub details: SymbolDetails,
}

/// A persisted member-classification row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRow {
    pub occurrence_id: i64,
    pub type_hash: i64,
    pub member_hash: i64,
    pub kind: MemberKind,
    pub modifiers: Modifiers,
    pub visibility: Visibility,
}

/// A persisted relation edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRow {
    pub file_id: i64,
    pub kind: RelationKind,
    pub from_hash: i64,
    pub to_hash: i64,
}

/// Import row payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    pub qualified_name: String,
    pub is_static: bool,
    pub is_on_demand: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Indexed,
    /// A previous write failed; rows of this file must not be trusted
    NeedsReindex,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Indexed => "indexed",
            FileStatus::NeedsReindex => "needs_reindex",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "indexed" => Some(FileStatus::Indexed),
            "needs_reindex" => Some(FileStatus::NeedsReindex),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    pub path: String,
    /// SHA-256 hex of the indexed contents
    pub content_hash: String,
    /// Unix seconds
    pub indexed_at: i64,
    pub status: FileStatus,
}

/// Row counts per table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphStats {
    pub files: usize,
    pub occurrences: usize,
    pub relations: usize,
    pub members: usize,
    pub doc_comments: usize,
    pub imports: usize,
}
