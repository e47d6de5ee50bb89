//! Reference traversals over the graph reader.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::documentation::{self, MemberDoc};
use super::kinds::{FileReferenceKind, ReferenceKind};
use super::properties;
use crate::error::QueryError;
use crate::graph::{EdgeEnd, GraphReader, Occurrence, OccurrenceFilter};
use crate::model::{
    MemberKind, Modifiers, OccurrenceKind, RelationKind, SourceRange, SymbolKind, VariableRole,
};

const TYPE_LIKE: &[SymbolKind] = &[SymbolKind::Type, SymbolKind::Enum];
const CALLABLE: &[SymbolKind] = &[SymbolKind::Method, SymbolKind::Constructor];
const USAGE_KINDS: &[OccurrenceKind] = &[
    OccurrenceKind::Usage,
    OccurrenceKind::Read,
    OccurrenceKind::Write,
];
const DECLARING_KINDS: &[OccurrenceKind] =
    &[OccurrenceKind::Declaration, OccurrenceKind::Definition];

/// One entry of a reference listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSummary {
    pub id: i64,
    pub entity_hash: i64,
    pub occurrence_kind: OccurrenceKind,
    pub symbol_kind: SymbolKind,
    pub text: String,
    pub file_path: String,
    pub range: SourceRange,
    pub tags: Vec<String>,
}

/// Read-only navigation over an indexed graph
pub struct QueryEngine<R: GraphReader> {
    reader: R,
}

/// Hash a traversal starts from
///
/// Type usages carry the display form in their entity hash; their
/// definition-entity hash is the declaration's identity.
pub fn canonical_hash(occurrence: &Occurrence) -> i64 {
    if occurrence.symbol_kind.is_type_like() && occurrence.occurrence_kind.is_usage() {
        occurrence.definition_entity_hash
    } else {
        occurrence.entity_hash
    }
}

fn sort_occurrences(occurrences: &mut Vec<Occurrence>) {
    occurrences.sort_by_key(|o| (o.range.start_line, o.range.start_col, o.id));
    occurrences.dedup_by_key(|o| o.id);
}

impl<R: GraphReader> QueryEngine<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn occurrence(&self, id: i64) -> Result<Occurrence, QueryError> {
        self.reader.occurrence(id)?.ok_or(QueryError::NotFound(id))
    }

    /// Smallest occurrence covering a position, preferring visible ones
    pub fn occurrence_at(
        &self,
        path: &str,
        line: usize,
        column: usize,
    ) -> Result<Occurrence, QueryError> {
        let file = self
            .reader
            .file_by_path(path)?
            .ok_or_else(|| QueryError::FileNotFound(path.to_string()))?;
        let candidates = self
            .reader
            .occurrences(&OccurrenceFilter::new().file(file.id).at(line, column))?;

        let smallest = |visible_only: bool| {
            candidates
                .iter()
                .filter(|o| !visible_only || o.visible)
                .min_by_key(|o| (o.range.byte_len(), o.id))
                .cloned()
        };
        smallest(true)
            .or_else(|| smallest(false))
            .ok_or(QueryError::InvalidPosition {
                path: path.to_string(),
                line,
                column,
            })
    }

    pub fn properties(&self, id: i64) -> Result<BTreeMap<String, String>, QueryError> {
        Ok(properties::properties(&self.occurrence(id)?))
    }

    /// Supported reference kinds of an occurrence, as (label, kind) in display order
    pub fn reference_kinds(
        &self,
        id: i64,
    ) -> Result<Vec<(&'static str, ReferenceKind)>, QueryError> {
        let occurrence = self.occurrence(id)?;
        Ok(ReferenceKind::supported_by(occurrence.symbol_kind)
            .iter()
            .map(|kind| (kind.label(), *kind))
            .collect())
    }

    pub fn reference_count(&self, id: i64, kind: ReferenceKind) -> Result<usize, QueryError> {
        Ok(self.references(id, kind, &[])?.len())
    }

    /// Run one traversal
    ///
    /// Results carrying every tag in `tags` are kept, sorted by
    /// (line, column, id). Unsupported kinds yield an empty list.
    pub fn references(
        &self,
        id: i64,
        kind: ReferenceKind,
        tags: &[String],
    ) -> Result<Vec<ReferenceSummary>, QueryError> {
        let target = self.occurrence(id)?;
        if !kind.is_supported_by(target.symbol_kind) {
            return Ok(Vec::new());
        }
        let mut found = self.traverse(&target, kind)?;
        sort_occurrences(&mut found);

        let mut out = Vec::with_capacity(found.len());
        for occurrence in found {
            let summary = self.summarize(occurrence)?;
            if tags.iter().all(|t| summary.tags.contains(t)) {
                out.push(summary);
            }
        }
        Ok(out)
    }

    pub fn file_reference_count(
        &self,
        path: &str,
        kind: FileReferenceKind,
    ) -> Result<usize, QueryError> {
        Ok(self.file_references(path, kind)?.len())
    }

    /// Imports, declared types, constructors or methods of one file
    pub fn file_references(
        &self,
        path: &str,
        kind: FileReferenceKind,
    ) -> Result<Vec<ReferenceSummary>, QueryError> {
        let file = self
            .reader
            .file_by_path(path)?
            .ok_or_else(|| QueryError::FileNotFound(path.to_string()))?;
        let in_file = OccurrenceFilter::new().file(file.id);

        let mut found = match kind {
            FileReferenceKind::Imports => {
                let mut imports = Vec::new();
                for (occurrence_id, _) in self.reader.imports(file.id)? {
                    if let Some(occurrence) = self.reader.occurrence(occurrence_id)? {
                        imports.push(occurrence);
                    }
                }
                imports
            }
            FileReferenceKind::Types => self.reader.occurrences(
                &in_file
                    .symbols(TYPE_LIKE)
                    .kinds(&[OccurrenceKind::Definition]),
            )?,
            FileReferenceKind::Constructors => self.reader.occurrences(
                &in_file
                    .symbols(&[SymbolKind::Constructor])
                    .kinds(DECLARING_KINDS)
                    .visible(),
            )?,
            FileReferenceKind::Methods => self.reader.occurrences(
                &in_file
                    .symbols(&[SymbolKind::Method])
                    .kinds(DECLARING_KINDS)
                    .visible(),
            )?,
        };
        sort_occurrences(&mut found);
        found.into_iter().map(|o| self.summarize(o)).collect()
    }

    /// Own comment plus, for types and enums, each constructor and method
    pub fn documentation(&self, id: i64) -> Result<String, QueryError> {
        let target = self.occurrence(id)?;
        let canonical = canonical_hash(&target);
        let own = self.reader.first_doc(canonical)?;

        let mut members = Vec::new();
        if target.symbol_kind.is_type_like() {
            let mut callables = Vec::new();
            for kind in [MemberKind::Constructor, MemberKind::Method] {
                callables.extend(self.members(canonical, |row_kind| row_kind == kind)?);
            }
            for occurrence in callables.into_iter().filter(|o| o.visible) {
                let member_hash = occurrence.entity_hash;
                members.push(MemberDoc {
                    tags: self.tags(&occurrence)?,
                    signature: occurrence.text,
                    comment: self.reader.first_doc(member_hash)?,
                });
            }
        }
        Ok(documentation::render(own.as_deref(), &members))
    }

    fn summarize(&self, occurrence: Occurrence) -> Result<ReferenceSummary, QueryError> {
        let tags = self.tags(&occurrence)?;
        Ok(ReferenceSummary {
            id: occurrence.id,
            entity_hash: occurrence.entity_hash,
            occurrence_kind: occurrence.occurrence_kind,
            symbol_kind: occurrence.symbol_kind,
            text: occurrence.text,
            file_path: occurrence.file_path,
            range: occurrence.range,
            tags,
        })
    }

    /// Visibility plus static/final/abstract, from the symbol's member rows
    fn tags(&self, occurrence: &Occurrence) -> Result<Vec<String>, QueryError> {
        let Some(expected) = MemberKind::for_symbol(occurrence.symbol_kind) else {
            return Ok(Vec::new());
        };
        let rows = self.reader.member_rows(canonical_hash(occurrence))?;
        let Some(row) = rows.iter().find(|r| r.kind == expected) else {
            return Ok(Vec::new());
        };
        let mut tags = vec![row.visibility.as_str().to_string()];
        for (flag, tag) in [
            (Modifiers::STATIC, "static"),
            (Modifiers::FINAL, "final"),
            (Modifiers::ABSTRACT, "abstract"),
        ] {
            if row.modifiers.contains(flag) {
                tags.push(tag.to_string());
            }
        }
        Ok(tags)
    }

    fn traverse(
        &self,
        target: &Occurrence,
        kind: ReferenceKind,
    ) -> Result<Vec<Occurrence>, QueryError> {
        let hash = canonical_hash(target);
        let found = match kind {
            ReferenceKind::Definition => self.reader.occurrences(
                &OccurrenceFilter::new()
                    .entity(hash)
                    .kinds(&[OccurrenceKind::Definition]),
            )?,
            ReferenceKind::Declarations => self.reader.occurrences(
                &OccurrenceFilter::new()
                    .entity(hash)
                    .kinds(&[OccurrenceKind::Declaration])
                    .visible(),
            )?,
            ReferenceKind::Usages if target.symbol_kind.is_type_like() => {
                self.reader.occurrences(
                    &OccurrenceFilter::new()
                        .definition(hash)
                        .symbols(TYPE_LIKE)
                        .kinds(USAGE_KINDS),
                )?
            }
            ReferenceKind::Usages => self
                .reader
                .occurrences(&OccurrenceFilter::new().entity(hash).kinds(USAGE_KINDS))?,
            ReferenceKind::CallsMade => self.calls_made(hash)?,
            ReferenceKind::Callees => {
                let mut seen = HashSet::new();
                let mut callees = Vec::new();
                for call in self.calls_made(hash)? {
                    if !seen.insert(call.entity_hash) {
                        continue;
                    }
                    let resolved = self.resolve(call.entity_hash, CALLABLE)?;
                    if resolved.is_empty() {
                        callees.push(call);
                    } else {
                        callees.extend(resolved);
                    }
                }
                callees
            }
            ReferenceKind::Callers => self.reader.occurrences(
                &OccurrenceFilter::new()
                    .entity(hash)
                    .symbols(CALLABLE)
                    .kinds(&[OccurrenceKind::Usage])
                    .outside_scope(hash),
            )?,
            ReferenceKind::Parameters => self.variables_in(hash, VariableRole::Parameter)?,
            ReferenceKind::Locals => self.variables_in(hash, VariableRole::Local)?,
            ReferenceKind::Overrides => self.edges(RelationKind::Override, EdgeEnd::To, hash)?,
            ReferenceKind::OverriddenBy => {
                self.edges(RelationKind::Override, EdgeEnd::From, hash)?
            }
            ReferenceKind::Implements => self.edges(RelationKind::Implement, EdgeEnd::To, hash)?,
            ReferenceKind::ImplementedBy => {
                self.edges(RelationKind::Implement, EdgeEnd::From, hash)?
            }
            ReferenceKind::InheritsFrom => self.edges(RelationKind::Inherit, EdgeEnd::To, hash)?,
            ReferenceKind::InheritedBy => self.edges(RelationKind::Inherit, EdgeEnd::From, hash)?,
            ReferenceKind::ReturnType | ReferenceKind::Type => match target.details.type_hash {
                Some(type_hash) => self.reader.occurrences(
                    &OccurrenceFilter::new()
                        .entity(type_hash)
                        .symbols(TYPE_LIKE)
                        .kinds(&[OccurrenceKind::Definition]),
                )?,
                None => Vec::new(),
            },
            ReferenceKind::Reads => self.reader.occurrences(
                &OccurrenceFilter::new()
                    .entity(hash)
                    .kinds(&[OccurrenceKind::Read]),
            )?,
            ReferenceKind::Writes => self.reader.occurrences(
                &OccurrenceFilter::new()
                    .entity(hash)
                    .kinds(&[OccurrenceKind::Write]),
            )?,
            ReferenceKind::Initializer => self.reader.occurrences(
                &OccurrenceFilter::new()
                    .owner(hash)
                    .symbols(&[SymbolKind::Initializer]),
            )?,
            ReferenceKind::InnerTypes => {
                let mut inner = Vec::new();
                for row in self.reader.members_of(hash)? {
                    let type_like = matches!(row.kind, MemberKind::Type | MemberKind::Enum);
                    if type_like && row.member_hash != row.type_hash {
                        if let Some(occurrence) = self.reader.occurrence(row.occurrence_id)? {
                            inner.push(occurrence);
                        }
                    }
                }
                inner
            }
            ReferenceKind::EnumConstants => self.members(hash, |k| k == MemberKind::EnumConstant)?,
            ReferenceKind::Constructors => self.members(hash, |k| k == MemberKind::Constructor)?,
            ReferenceKind::Fields => self.members(hash, |k| k == MemberKind::Field)?,
            ReferenceKind::Methods => self.members(hash, |k| k == MemberKind::Method)?,
        };
        Ok(found)
    }

    fn calls_made(&self, scope: i64) -> Result<Vec<Occurrence>, QueryError> {
        Ok(self.reader.occurrences(
            &OccurrenceFilter::new()
                .scope(scope)
                .symbols(CALLABLE)
                .kinds(&[OccurrenceKind::Usage]),
        )?)
    }

    fn variables_in(&self, scope: i64, role: VariableRole) -> Result<Vec<Occurrence>, QueryError> {
        Ok(self.reader.occurrences(
            &OccurrenceFilter::new()
                .scope(scope)
                .symbols(&[SymbolKind::Variable])
                .kinds(DECLARING_KINDS)
                .role(role),
        )?)
    }

    /// Definitions of an entity, falling back to its declarations
    fn resolve(&self, hash: i64, symbols: &[SymbolKind]) -> Result<Vec<Occurrence>, QueryError> {
        let definitions = self.reader.occurrences(
            &OccurrenceFilter::new()
                .entity(hash)
                .symbols(symbols)
                .kinds(&[OccurrenceKind::Definition]),
        )?;
        if !definitions.is_empty() {
            return Ok(definitions);
        }
        Ok(self.reader.occurrences(
            &OccurrenceFilter::new()
                .entity(hash)
                .symbols(symbols)
                .kinds(&[OccurrenceKind::Declaration]),
        )?)
    }

    /// Endpoints opposite to `end` of every edge touching `hash`
    fn edges(
        &self,
        kind: RelationKind,
        end: EdgeEnd,
        hash: i64,
    ) -> Result<Vec<Occurrence>, QueryError> {
        let symbols = match kind {
            RelationKind::Inherit => TYPE_LIKE,
            RelationKind::Override | RelationKind::Implement => CALLABLE,
        };
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for edge in self.reader.relations(kind, end, hash)? {
            let other = match end {
                EdgeEnd::From => edge.to_hash,
                EdgeEnd::To => edge.from_hash,
            };
            if seen.insert(other) {
                out.extend(self.resolve(other, symbols)?);
            }
        }
        Ok(out)
    }

    fn members(
        &self,
        type_hash: i64,
        keep: impl Fn(MemberKind) -> bool,
    ) -> Result<Vec<Occurrence>, QueryError> {
        let mut out = Vec::new();
        for row in self.reader.members_of(type_hash)? {
            if !keep(row.kind) {
                continue;
            }
            if let Some(occurrence) = self.reader.occurrence(row.occurrence_id)? {
                out.push(occurrence);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NewOccurrence, RowSink, SqliteGraph, SymbolDetails};
    use crate::identity::{entity_hash, Classification};
    use crate::model::Visibility;
    use crate::relations::Relation;

    fn new_occurrence(
        text: &str,
        symbol_kind: SymbolKind,
        occurrence_kind: OccurrenceKind,
        entity: &str,
        (line, col, len): (usize, usize, usize),
    ) -> NewOccurrence {
        NewOccurrence {
            range: SourceRange {
                start_line: line,
                start_col: col,
                end_line: line,
                end_col: col + len,
                start_offset: line * 100 + col,
                end_offset: line * 100 + col + len,
            },
            text: text.to_string(),
            symbol_kind,
            occurrence_kind,
            entity_hash: entity_hash(entity),
            definition_entity_hash: entity_hash("zoo.Animal"),
            scope_hash: None,
            visible: true,
            details: SymbolDetails::default(),
        }
    }

    fn member(kind: MemberKind, owner: &str, entity: &str, modifiers: Modifiers) -> Classification {
        Classification {
            member_kind: kind,
            owning_type_hash: entity_hash(owner),
            member_hash: entity_hash(entity),
            modifiers,
            visibility: Visibility::from_modifiers(modifiers),
        }
    }

    /// Animal.speak defined at line 3, overridden by Dog.speak at line 9;
    /// usages inserted out of order.
    fn fixture() -> QueryEngine<SqliteGraph> {
        let graph = SqliteGraph::open_in_memory().unwrap();
        graph
            .replace_file("zoo/Animal.java", "h", |sink: &mut dyn RowSink, file_id| {
                let animal_speak = "zoo.Animal:speak()";
                let dog_speak = "zoo.Dog:speak()";
                sink.insert_relation(
                    file_id,
                    &Relation {
                        kind: RelationKind::Override,
                        from_hash: entity_hash(animal_speak),
                        to_hash: entity_hash(dog_speak),
                    },
                )?;
                let id = sink.insert_occurrence(
                    file_id,
                    &new_occurrence(
                        "void speak()",
                        SymbolKind::Method,
                        OccurrenceKind::Definition,
                        animal_speak,
                        (3, 4, 20),
                    ),
                )?;
                sink.insert_member(
                    id,
                    &member(MemberKind::Method, "zoo.Animal", animal_speak, Modifiers::PUBLIC),
                )?;
                let id = sink.insert_occurrence(
                    file_id,
                    &new_occurrence(
                        "void speak()",
                        SymbolKind::Method,
                        OccurrenceKind::Definition,
                        dog_speak,
                        (9, 4, 20),
                    ),
                )?;
                sink.insert_member(
                    id,
                    &member(
                        MemberKind::Method,
                        "zoo.Dog",
                        dog_speak,
                        Modifiers::PUBLIC | Modifiers::FINAL,
                    ),
                )?;
                for (line, col) in [(20, 8), (12, 16), (12, 2)] {
                    sink.insert_occurrence(
                        file_id,
                        &new_occurrence(
                            "speak()",
                            SymbolKind::Method,
                            OccurrenceKind::Usage,
                            animal_speak,
                            (line, col, 7),
                        ),
                    )?;
                }
                Ok(())
            })
            .unwrap();
        QueryEngine::new(graph)
    }

    fn animal_speak_id(engine: &QueryEngine<SqliteGraph>) -> i64 {
        engine.occurrence_at("zoo/Animal.java", 3, 5).unwrap().id
    }

    #[test]
    fn test_usages_are_sorted_by_line_then_column() {
        let engine = fixture();
        let usages = engine
            .references(animal_speak_id(&engine), ReferenceKind::Usages, &[])
            .unwrap();
        let positions: Vec<(usize, usize)> = usages
            .iter()
            .map(|u| (u.range.start_line, u.range.start_col))
            .collect();
        assert_eq!(positions, vec![(12, 2), (12, 16), (20, 8)]);
    }

    #[test]
    fn test_overridden_by_finds_the_override() {
        let engine = fixture();
        let id = animal_speak_id(&engine);
        let overriders = engine.references(id, ReferenceKind::OverriddenBy, &[]).unwrap();
        assert_eq!(overriders.len(), 1);
        assert_eq!(overriders[0].entity_hash, entity_hash("zoo.Dog:speak()"));
        assert_eq!(overriders[0].tags, vec!["public", "final"]);

        let dog = overriders[0].id;
        let overridden = engine.references(dog, ReferenceKind::Overrides, &[]).unwrap();
        assert_eq!(overridden.len(), 1);
        assert_eq!(overridden[0].id, id);
    }

    #[test]
    fn test_tag_filter_requires_every_tag() {
        let engine = fixture();
        let id = animal_speak_id(&engine);
        let with = |tags: &[&str]| {
            let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
            engine
                .references(id, ReferenceKind::OverriddenBy, &tags)
                .unwrap()
                .len()
        };
        assert_eq!(with(&["public"]), 1);
        assert_eq!(with(&["public", "final"]), 1);
        assert_eq!(with(&["public", "static"]), 0);
    }

    #[test]
    fn test_unsupported_kind_is_empty() {
        let engine = fixture();
        let id = animal_speak_id(&engine);
        assert!(engine.references(id, ReferenceKind::Fields, &[]).unwrap().is_empty());
        assert_eq!(engine.reference_count(id, ReferenceKind::InheritedBy).unwrap(), 0);
    }

    #[test]
    fn test_missing_id_and_file_errors() {
        let engine = fixture();
        assert!(matches!(engine.occurrence(999), Err(QueryError::NotFound(999))));
        assert!(matches!(
            engine.occurrence_at("nope.java", 1, 0),
            Err(QueryError::FileNotFound(_))
        ));
        assert!(matches!(
            engine.occurrence_at("zoo/Animal.java", 1, 0),
            Err(QueryError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn test_reference_kinds_follow_symbol_kind() {
        let engine = fixture();
        let kinds = engine.reference_kinds(animal_speak_id(&engine)).unwrap();
        assert_eq!(kinds.len(), 13);
        assert_eq!(kinds[0], ("Definition", ReferenceKind::Definition));
    }
}
