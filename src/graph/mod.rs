//! Cross-reference graph store
//!
//! The core only sees two seams: [`RowSink`] on the write side and
//! [`GraphReader`] on the read side. [`SqliteGraph`] implements both.
pub mod schema;
mod sqlite;

pub use crate::error::StoreError;
pub use schema::{
    FileRecord, FileStatus, GraphStats, ImportRow, MemberRow, NewOccurrence, Occurrence,
    RelationRow, SymbolDetails,
};
pub use sqlite::{FileWrite, SqliteGraph};

use crate::identity::Classification;
use crate::model::{OccurrenceKind, RelationKind, SymbolKind, VariableRole};
use crate::relations::Relation;

/// Write side of the store, used by the graph writer
///
/// Every call belongs to the transaction of the file being replaced.
pub trait RowSink {
    fn insert_relation(&mut self, file_id: i64, relation: &Relation) -> Result<(), StoreError>;

    /// Insert an occurrence and return its id
    fn insert_occurrence(
        &mut self,
        file_id: i64,
        occurrence: &NewOccurrence,
    ) -> Result<i64, StoreError>;

    fn insert_member(
        &mut self,
        occurrence_id: i64,
        member: &Classification,
    ) -> Result<(), StoreError>;

    fn insert_doc(&mut self, file_id: i64, entity_hash: i64, content: &str)
        -> Result<(), StoreError>;

    fn insert_import(
        &mut self,
        file_id: i64,
        occurrence_id: i64,
        import: &ImportRow,
    ) -> Result<(), StoreError>;
}

/// Which endpoint of a relation edge a lookup matches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeEnd {
    From,
    To,
}

/// Conjunctive filter over occurrence rows
///
/// Unset fields match everything. Kind lists match any listed kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceFilter {
    pub entity_hash: Option<i64>,
    pub definition_entity_hash: Option<i64>,
    pub scope_hash: Option<i64>,
    /// Keeps rows whose scope differs (no scope counts as different)
    pub exclude_scope_hash: Option<i64>,
    pub owner_hash: Option<i64>,
    pub file_id: Option<i64>,
    pub symbol_kinds: Vec<SymbolKind>,
    pub occurrence_kinds: Vec<OccurrenceKind>,
    pub role: Option<VariableRole>,
    pub visible_only: bool,
    /// (line, column) that must fall inside the range, end exclusive
    pub position: Option<(usize, usize)>,
}

impl OccurrenceFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(mut self, hash: i64) -> Self {
        self.entity_hash = Some(hash);
        self
    }

    pub fn definition(mut self, hash: i64) -> Self {
        self.definition_entity_hash = Some(hash);
        self
    }

    pub fn scope(mut self, hash: i64) -> Self {
        self.scope_hash = Some(hash);
        self
    }

    pub fn outside_scope(mut self, hash: i64) -> Self {
        self.exclude_scope_hash = Some(hash);
        self
    }

    pub fn owner(mut self, hash: i64) -> Self {
        self.owner_hash = Some(hash);
        self
    }

    pub fn file(mut self, file_id: i64) -> Self {
        self.file_id = Some(file_id);
        self
    }

    pub fn symbols(mut self, kinds: &[SymbolKind]) -> Self {
        self.symbol_kinds = kinds.to_vec();
        self
    }

    pub fn kinds(mut self, kinds: &[OccurrenceKind]) -> Self {
        self.occurrence_kinds = kinds.to_vec();
        self
    }

    pub fn role(mut self, role: VariableRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn visible(mut self) -> Self {
        self.visible_only = true;
        self
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.position = Some((line, column));
        self
    }
}

/// Read side of the store, used by the query engine
pub trait GraphReader: Send + Sync {
    fn occurrence(&self, id: i64) -> Result<Option<Occurrence>, StoreError>;

    /// Matching occurrences ordered by (start line, start column, id)
    fn occurrences(&self, filter: &OccurrenceFilter) -> Result<Vec<Occurrence>, StoreError>;

    fn relations(
        &self,
        kind: RelationKind,
        end: EdgeEnd,
        hash: i64,
    ) -> Result<Vec<RelationRow>, StoreError>;

    /// Member rows whose owning type is `type_hash`
    fn members_of(&self, type_hash: i64) -> Result<Vec<MemberRow>, StoreError>;

    /// Member rows describing `member_hash` itself
    fn member_rows(&self, member_hash: i64) -> Result<Vec<MemberRow>, StoreError>;

    /// Lowest-id comment keyed by `entity_hash`
    fn first_doc(&self, entity_hash: i64) -> Result<Option<String>, StoreError>;

    fn file_by_path(&self, path: &str) -> Result<Option<FileRecord>, StoreError>;

    /// Import rows of a file with their linked occurrence ids
    fn imports(&self, file_id: i64) -> Result<Vec<(i64, ImportRow)>, StoreError>;

    fn files(&self) -> Result<Vec<FileRecord>, StoreError>;

    fn stats(&self) -> Result<GraphStats, StoreError>;
}
