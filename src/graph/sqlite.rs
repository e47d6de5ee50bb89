//! SQLite implementation of the graph store.

use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, Transaction};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use super::schema::{
    FileRecord, FileStatus, GraphStats, ImportRow, MemberRow, NewOccurrence, Occurrence,
    RelationRow, SymbolDetails, JXREF_SCHEMA_VERSION, SCHEMA_DDL,
};
use super::{EdgeEnd, GraphReader, OccurrenceFilter, RowSink, StoreError};
use crate::identity::Classification;
use crate::model::{
    MemberKind, Modifiers, OccurrenceKind, RelationKind, SourceRange, SymbolKind, VariableRole,
    Visibility,
};
use crate::relations::Relation;

const OCCURRENCE_COLUMNS: &str = "o.id, o.file_id, f.path, o.start_line, o.start_col, \
     o.end_line, o.end_col, o.start_offset, o.end_offset, o.text, o.symbol_kind, \
     o.occurrence_kind, o.entity_hash, o.definition_entity_hash, o.scope_hash, o.visible, \
     o.name, o.qualified_name, o.qualified_type, o.type_hash, o.owner_hash, o.modifiers, \
     o.role, o.value";

const MEMBER_COLUMNS: &str = "occurrence_id, type_hash, member_hash, kind, modifiers, visibility";

/// Outcome of a committed file replacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileWrite {
    pub file_id: i64,
    pub occurrences: usize,
    pub relations: usize,
}

/// SQLite-backed cross-reference graph
///
/// One connection per instance. Query threads open their own instance;
/// WAL mode lets them read while an indexer writes.
pub struct SqliteGraph {
    conn: Mutex<Connection>,
}

impl SqliteGraph {
    /// Open or create a store at `db_path`
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        let graph = Self {
            conn: Mutex::new(conn),
        };
        graph.ensure_schema()?;
        Ok(graph)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let graph = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        graph.ensure_schema()?;
        Ok(graph)
    }

    fn ensure_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock()?;
        for ddl in SCHEMA_DDL {
            conn.execute(ddl, [])?;
        }

        let stored: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        match stored {
            None => {
                conn.execute(
                    "INSERT INTO meta (key, value) VALUES ('schema_version', ?1)",
                    params![JXREF_SCHEMA_VERSION.to_string()],
                )?;
            }
            Some(version) if version == JXREF_SCHEMA_VERSION.to_string() => {}
            Some(version) => {
                return Err(StoreError::Corrupt(format!(
                    "schema version {} (expected {})",
                    version, JXREF_SCHEMA_VERSION
                )));
            }
        }
        Ok(())
    }

    /// Replace every row of one file behind a single transaction
    ///
    /// `write` receives the sink and the file id. If it fails the
    /// transaction is rolled back, the file's rows are dropped and the file
    /// is marked `needs_reindex`; the original error is returned.
    pub fn replace_file<F>(
        &self,
        path: &str,
        content_hash: &str,
        write: F,
    ) -> Result<FileWrite, StoreError>
    where
        F: FnOnce(&mut dyn RowSink, i64) -> Result<(), StoreError>,
    {
        let mut conn = self.conn.lock()?;
        match write_file(&mut conn, path, content_hash, write) {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "file write rolled back");
                if let Err(mark) = mark_failed(&mut conn, path, content_hash) {
                    tracing::warn!(path = %path, error = %mark, "could not mark file for reindex");
                }
                Err(e)
            }
        }
    }

    /// Drop a file's rows and flag it for reindexing
    pub fn mark_needs_reindex(&self, path: &str, content_hash: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.lock()?;
        mark_failed(&mut conn, path, content_hash)
    }

    /// Delete a file and all of its rows; returns whether it existed
    pub fn remove_file(&self, path: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.lock()?;
        let tx = conn.transaction()?;
        let file_id: Option<i64> = tx
            .query_row("SELECT id FROM files WHERE path = ?1", params![path], |row| {
                row.get(0)
            })
            .optional()?;
        let Some(file_id) = file_id else {
            return Ok(false);
        };
        delete_file_rows(&tx, file_id)?;
        tx.execute("DELETE FROM files WHERE id = ?1", params![file_id])?;
        tx.commit()?;
        Ok(true)
    }
}

fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

fn upsert_file(
    tx: &Transaction<'_>,
    path: &str,
    content_hash: &str,
    status: FileStatus,
) -> Result<i64, StoreError> {
    tx.execute(
        "INSERT INTO files (path, content_hash, indexed_at, status) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(path) DO UPDATE SET
            content_hash = excluded.content_hash,
            indexed_at = excluded.indexed_at,
            status = excluded.status",
        params![path, content_hash, now_secs(), status.as_str()],
    )?;
    let id = tx.query_row(
        "SELECT id FROM files WHERE path = ?1",
        params![path],
        |row| row.get(0),
    )?;
    Ok(id)
}

fn delete_file_rows(tx: &Transaction<'_>, file_id: i64) -> Result<(), StoreError> {
    tx.execute(
        "DELETE FROM member_types WHERE occurrence_id IN
            (SELECT id FROM occurrences WHERE file_id = ?1)",
        params![file_id],
    )?;
    tx.execute("DELETE FROM imports WHERE file_id = ?1", params![file_id])?;
    tx.execute("DELETE FROM doc_comments WHERE file_id = ?1", params![file_id])?;
    tx.execute("DELETE FROM relations WHERE file_id = ?1", params![file_id])?;
    tx.execute("DELETE FROM occurrences WHERE file_id = ?1", params![file_id])?;
    Ok(())
}

fn write_file<F>(
    conn: &mut Connection,
    path: &str,
    content_hash: &str,
    write: F,
) -> Result<FileWrite, StoreError>
where
    F: FnOnce(&mut dyn RowSink, i64) -> Result<(), StoreError>,
{
    let tx = conn.transaction()?;
    let file_id = upsert_file(&tx, path, content_hash, FileStatus::NeedsReindex)?;
    delete_file_rows(&tx, file_id)?;

    let mut sink = TransactionSink {
        tx: &tx,
        occurrences: 0,
        relations: 0,
    };
    write(&mut sink, file_id)?;
    let outcome = FileWrite {
        file_id,
        occurrences: sink.occurrences,
        relations: sink.relations,
    };

    tx.execute(
        "UPDATE files SET status = ?1 WHERE id = ?2",
        params![FileStatus::Indexed.as_str(), file_id],
    )?;
    tx.commit()?;
    Ok(outcome)
}

fn mark_failed(conn: &mut Connection, path: &str, content_hash: &str) -> Result<(), StoreError> {
    let tx = conn.transaction()?;
    let file_id = upsert_file(&tx, path, content_hash, FileStatus::NeedsReindex)?;
    delete_file_rows(&tx, file_id)?;
    tx.commit()?;
    Ok(())
}

struct TransactionSink<'a> {
    tx: &'a Transaction<'a>,
    occurrences: usize,
    relations: usize,
}

impl RowSink for TransactionSink<'_> {
    fn insert_relation(&mut self, file_id: i64, relation: &Relation) -> Result<(), StoreError> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO relations (file_id, kind, from_hash, to_hash) VALUES (?1, ?2, ?3, ?4)",
        )?;
        stmt.execute(params![
            file_id,
            relation.kind.as_str(),
            relation.from_hash,
            relation.to_hash
        ])?;
        self.relations += 1;
        Ok(())
    }

    fn insert_occurrence(
        &mut self,
        file_id: i64,
        occurrence: &NewOccurrence,
    ) -> Result<i64, StoreError> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO occurrences (
                file_id, start_line, start_col, end_line, end_col, start_offset, end_offset,
                text, symbol_kind, occurrence_kind, entity_hash, definition_entity_hash,
                scope_hash, visible, name, qualified_name, qualified_type, type_hash,
                owner_hash, modifiers, role, value
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                      ?16, ?17, ?18, ?19, ?20, ?21, ?22)",
        )?;
        let range = &occurrence.range;
        let details = &occurrence.details;
        stmt.execute(params![
            file_id,
            range.start_line as i64,
            range.start_col as i64,
            range.end_line as i64,
            range.end_col as i64,
            range.start_offset as i64,
            range.end_offset as i64,
            occurrence.text,
            occurrence.symbol_kind.as_str(),
            occurrence.occurrence_kind.as_str(),
            occurrence.entity_hash,
            occurrence.definition_entity_hash,
            occurrence.scope_hash,
            occurrence.visible,
            details.name,
            details.qualified_name,
            details.qualified_type,
            details.type_hash,
            details.owner_hash,
            details.modifiers.bits() as i64,
            details.role.map(|r| r.as_str()),
            details.value,
        ])?;
        self.occurrences += 1;
        Ok(self.tx.last_insert_rowid())
    }

    fn insert_member(
        &mut self,
        occurrence_id: i64,
        member: &Classification,
    ) -> Result<(), StoreError> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO member_types
                (occurrence_id, type_hash, member_hash, kind, modifiers, visibility)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        stmt.execute(params![
            occurrence_id,
            member.owning_type_hash,
            member.member_hash,
            member.member_kind.as_str(),
            member.modifiers.bits() as i64,
            member.visibility.as_str(),
        ])?;
        Ok(())
    }

    fn insert_doc(
        &mut self,
        file_id: i64,
        entity_hash: i64,
        content: &str,
    ) -> Result<(), StoreError> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO doc_comments (file_id, entity_hash, content) VALUES (?1, ?2, ?3)",
        )?;
        stmt.execute(params![file_id, entity_hash, content])?;
        Ok(())
    }

    fn insert_import(
        &mut self,
        file_id: i64,
        occurrence_id: i64,
        import: &ImportRow,
    ) -> Result<(), StoreError> {
        let mut stmt = self.tx.prepare_cached(
            "INSERT INTO imports (file_id, occurrence_id, qualified_name, is_static, is_on_demand)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        stmt.execute(params![
            file_id,
            occurrence_id,
            import.qualified_name,
            import.is_static,
            import.is_on_demand
        ])?;
        Ok(())
    }
}

fn decode_tag<T>(row: &Row<'_>, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown tag '{}'", raw).into(),
        )
    })
}

fn occurrence_from_row(row: &Row<'_>) -> rusqlite::Result<Occurrence> {
    let role: Option<String> = row.get(22)?;
    let role = match role {
        Some(raw) => Some(VariableRole::parse(&raw).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                22,
                Type::Text,
                format!("unknown role '{}'", raw).into(),
            )
        })?),
        None => None,
    };
    Ok(Occurrence {
        id: row.get(0)?,
        file_id: row.get(1)?,
        file_path: row.get(2)?,
        range: SourceRange {
            start_line: row.get::<_, i64>(3)? as usize,
            start_col: row.get::<_, i64>(4)? as usize,
            end_line: row.get::<_, i64>(5)? as usize,
            end_col: row.get::<_, i64>(6)? as usize,
            start_offset: row.get::<_, i64>(7)? as usize,
            end_offset: row.get::<_, i64>(8)? as usize,
        },
        text: row.get(9)?,
        symbol_kind: decode_tag(row, 10, SymbolKind::parse)?,
        occurrence_kind: decode_tag(row, 11, OccurrenceKind::parse)?,
        entity_hash: row.get(12)?,
        definition_entity_hash: row.get(13)?,
        scope_hash: row.get(14)?,
        visible: row.get(15)?,
        details: SymbolDetails {
            name: row.get(16)?,
            qualified_name: row.get(17)?,
            qualified_type: row.get(18)?,
            type_hash: row.get(19)?,
            owner_hash: row.get(20)?,
            modifiers: Modifiers::from_bits_truncate(row.get::<_, i64>(21)? as u32),
            role,
            value: row.get(23)?,
        },
    })
}

fn member_from_row(row: &Row<'_>) -> rusqlite::Result<MemberRow> {
    Ok(MemberRow {
        occurrence_id: row.get(0)?,
        type_hash: row.get(1)?,
        member_hash: row.get(2)?,
        kind: decode_tag(row, 3, MemberKind::parse)?,
        modifiers: Modifiers::from_bits_truncate(row.get::<_, i64>(4)? as u32),
        visibility: decode_tag(row, 5, Visibility::parse)?,
    })
}

fn file_from_row(row: &Row<'_>) -> rusqlite::Result<FileRecord> {
    Ok(FileRecord {
        id: row.get(0)?,
        path: row.get(1)?,
        content_hash: row.get(2)?,
        indexed_at: row.get(3)?,
        status: decode_tag(row, 4, FileStatus::parse)?,
    })
}

fn push_in<T>(
    clauses: &mut Vec<String>,
    values: &mut Vec<Value>,
    column: &str,
    items: &[T],
    tag: fn(&T) -> &'static str,
) {
    if items.is_empty() {
        return;
    }
    let marks = vec!["?"; items.len()].join(", ");
    clauses.push(format!("{} IN ({})", column, marks));
    values.extend(items.iter().map(|item| Value::Text(tag(item).to_string())));
}

/// WHERE clause and bound values for a filter
fn filter_sql(filter: &OccurrenceFilter) -> (String, Vec<Value>) {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    let equalities = [
        ("o.entity_hash", filter.entity_hash),
        ("o.definition_entity_hash", filter.definition_entity_hash),
        ("o.scope_hash", filter.scope_hash),
        ("o.owner_hash", filter.owner_hash),
        ("o.file_id", filter.file_id),
    ];
    for (column, value) in equalities {
        if let Some(value) = value {
            clauses.push(format!("{} = ?", column));
            values.push(Value::Integer(value));
        }
    }
    if let Some(scope) = filter.exclude_scope_hash {
        clauses.push("(o.scope_hash IS NULL OR o.scope_hash != ?)".to_string());
        values.push(Value::Integer(scope));
    }
    push_in(&mut clauses, &mut values, "o.symbol_kind", &filter.symbol_kinds, SymbolKind::as_str);
    push_in(
        &mut clauses,
        &mut values,
        "o.occurrence_kind",
        &filter.occurrence_kinds,
        OccurrenceKind::as_str,
    );
    if let Some(role) = filter.role {
        clauses.push("o.role = ?".to_string());
        values.push(Value::Text(role.as_str().to_string()));
    }
    if filter.visible_only {
        clauses.push("o.visible = 1".to_string());
    }
    if let Some((line, column)) = filter.position {
        let (line, column) = (line as i64, column as i64);
        clauses.push(
            "(o.start_line < ? OR (o.start_line = ? AND o.start_col <= ?)) \
             AND (o.end_line > ? OR (o.end_line = ? AND o.end_col > ?))"
                .to_string(),
        );
        values.extend(
            [line, line, column, line, line, column]
                .into_iter()
                .map(Value::Integer),
        );
    }

    let sql = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", clauses.join(" AND "))
    };
    (sql, values)
}

fn count(conn: &Connection, table: &str) -> Result<usize, StoreError> {
    let n: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })?;
    Ok(n as usize)
}

impl GraphReader for SqliteGraph {
    fn occurrence(&self, id: i64) -> Result<Option<Occurrence>, StoreError> {
        let conn = self.conn.lock()?;
        let sql = format!(
            "SELECT {} FROM occurrences o JOIN files f ON f.id = o.file_id WHERE o.id = ?1",
            OCCURRENCE_COLUMNS
        );
        Ok(conn
            .query_row(&sql, params![id], occurrence_from_row)
            .optional()?)
    }

    fn occurrences(&self, filter: &OccurrenceFilter) -> Result<Vec<Occurrence>, StoreError> {
        let conn = self.conn.lock()?;
        let (clause, values) = filter_sql(filter);
        let sql = format!(
            "SELECT {} FROM occurrences o JOIN files f ON f.id = o.file_id{} \
             ORDER BY o.start_line, o.start_col, o.id",
            OCCURRENCE_COLUMNS, clause
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), occurrence_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn relations(
        &self,
        kind: RelationKind,
        end: EdgeEnd,
        hash: i64,
    ) -> Result<Vec<RelationRow>, StoreError> {
        let conn = self.conn.lock()?;
        let column = match end {
            EdgeEnd::From => "from_hash",
            EdgeEnd::To => "to_hash",
        };
        let sql = format!(
            "SELECT file_id, from_hash, to_hash FROM relations
             WHERE kind = ?1 AND {} = ?2 ORDER BY id",
            column
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![kind.as_str(), hash], |row| {
            Ok(RelationRow {
                file_id: row.get(0)?,
                kind,
                from_hash: row.get(1)?,
                to_hash: row.get(2)?,
            })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn members_of(&self, type_hash: i64) -> Result<Vec<MemberRow>, StoreError> {
        let conn = self.conn.lock()?;
        let sql = format!(
            "SELECT {} FROM member_types WHERE type_hash = ?1 ORDER BY id",
            MEMBER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![type_hash], member_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn member_rows(&self, member_hash: i64) -> Result<Vec<MemberRow>, StoreError> {
        let conn = self.conn.lock()?;
        let sql = format!(
            "SELECT {} FROM member_types WHERE member_hash = ?1 ORDER BY id",
            MEMBER_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![member_hash], member_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn first_doc(&self, entity_hash: i64) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock()?;
        Ok(conn
            .query_row(
                "SELECT content FROM doc_comments WHERE entity_hash = ?1 ORDER BY id LIMIT 1",
                params![entity_hash],
                |row| row.get(0),
            )
            .optional()?)
    }

    fn file_by_path(&self, path: &str) -> Result<Option<FileRecord>, StoreError> {
        let conn = self.conn.lock()?;
        Ok(conn
            .query_row(
                "SELECT id, path, content_hash, indexed_at, status FROM files WHERE path = ?1",
                params![path],
                file_from_row,
            )
            .optional()?)
    }

    fn imports(&self, file_id: i64) -> Result<Vec<(i64, ImportRow)>, StoreError> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(
            "SELECT occurrence_id, qualified_name, is_static, is_on_demand
             FROM imports WHERE file_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![file_id], |row| {
            Ok((
                row.get(0)?,
                ImportRow {
                    qualified_name: row.get(1)?,
                    is_static: row.get(2)?,
                    is_on_demand: row.get(3)?,
                },
            ))
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn files(&self) -> Result<Vec<FileRecord>, StoreError> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, path, content_hash, indexed_at, status FROM files ORDER BY path",
        )?;
        let rows = stmt.query_map([], file_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn stats(&self) -> Result<GraphStats, StoreError> {
        let conn = self.conn.lock()?;
        Ok(GraphStats {
            files: count(&conn, "files")?,
            occurrences: count(&conn, "occurrences")?,
            relations: count(&conn, "relations")?,
            members: count(&conn, "member_types")?,
            doc_comments: count(&conn, "doc_comments")?,
            imports: count(&conn, "imports")?,
        })
    }
}
