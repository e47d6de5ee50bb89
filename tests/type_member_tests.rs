//! Member-oriented reference kinds: inner types, initializers, enum
//! constants, declared types and declarations.

use jxref::graph::{GraphReader, Occurrence, OccurrenceFilter, SqliteGraph};
use jxref::{index_sources, OccurrenceKind, QueryEngine, ReferenceKind, SymbolKind};

const OUTER: &str = concat!(
    "package geo;\n",                                               // 1
    "public class Outer {\n",                                       // 2
    "  static int count;\n",                                        // 3
    "  static { int seed = 4; count = seed; }\n",                   // 4
    "  { int warm = 1; }\n",                                        // 5
    "  static class Inner {}\n",                                    // 6
    "  enum Mode { FAST, SLOW, IDLE }\n",                           // 7
    "  Inner cached;\n",                                            // 8
    "  Inner make() {\n",                                           // 9
    "    class Local {}\n",                                         // 10
    "    Runnable r = new Runnable() { public void run() {} };\n",  // 11
    "    return new Inner();\n",                                    // 12
    "  }\n",                                                        // 13
    "  int size() { return count; }\n",                             // 14
    "}\n",                                                          // 15
);

fn engine() -> QueryEngine<SqliteGraph> {
    let graph = SqliteGraph::open_in_memory().unwrap();
    let report = index_sources(&graph, &[("geo/Outer.java", OUTER)]).unwrap();
    assert!(report.failed.is_empty(), "failed: {:?}", report.failed);
    QueryEngine::new(graph)
}

/// The declaring occurrence of `name` with the given symbol kind
fn declared(engine: &QueryEngine<SqliteGraph>, symbol: SymbolKind, name: &str) -> Occurrence {
    engine
        .reader()
        .occurrences(
            &OccurrenceFilter::new()
                .symbols(&[symbol])
                .kinds(&[OccurrenceKind::Definition, OccurrenceKind::Declaration])
                .visible(),
        )
        .unwrap()
        .into_iter()
        .find(|o| o.details.name == name)
        .unwrap_or_else(|| panic!("no declaration of {}", name))
}

fn names(engine: &QueryEngine<SqliteGraph>, id: i64, kind: ReferenceKind) -> Vec<String> {
    engine
        .references(id, kind, &[])
        .unwrap()
        .into_iter()
        .map(|summary| engine.occurrence(summary.id).unwrap().details.name)
        .collect()
}

#[test]
fn test_inner_types_are_member_types_only() {
    let engine = engine();
    let outer = declared(&engine, SymbolKind::Type, "Outer");
    let inner = engine
        .references(outer.id, ReferenceKind::InnerTypes, &[])
        .unwrap();
    let lines: Vec<usize> = inner.iter().map(|t| t.range.start_line).collect();
    // Local class at line 10 and the anonymous class at line 11 are not members
    assert_eq!(lines, vec![6, 7]);
    assert!(inner.iter().all(|t| t.id != outer.id));
    assert_eq!(inner[1].symbol_kind, SymbolKind::Enum);
}

#[test]
fn test_initializers_and_their_locals() {
    let engine = engine();
    let outer = declared(&engine, SymbolKind::Type, "Outer");
    let blocks = engine
        .references(outer.id, ReferenceKind::Initializer, &[])
        .unwrap();
    let lines: Vec<usize> = blocks.iter().map(|b| b.range.start_line).collect();
    assert_eq!(lines, vec![4, 5]);
    assert!(blocks.iter().all(|b| b.symbol_kind == SymbolKind::Initializer));

    assert_eq!(names(&engine, blocks[0].id, ReferenceKind::Locals), vec!["seed"]);
    assert_eq!(names(&engine, blocks[1].id, ReferenceKind::Locals), vec!["warm"]);
}

#[test]
fn test_enum_constants_in_ordinal_order() {
    let engine = engine();
    let mode = declared(&engine, SymbolKind::Enum, "Mode");
    assert_eq!(
        names(&engine, mode.id, ReferenceKind::EnumConstants),
        vec!["FAST", "SLOW", "IDLE"]
    );
    let ordinals: Vec<Option<String>> = engine
        .references(mode.id, ReferenceKind::EnumConstants, &[])
        .unwrap()
        .into_iter()
        .map(|c| engine.occurrence(c.id).unwrap().details.value)
        .collect();
    assert_eq!(
        ordinals,
        vec![Some("0".to_string()), Some("1".to_string()), Some("2".to_string())]
    );
}

#[test]
fn test_return_type_and_variable_type() {
    let engine = engine();
    let inner = declared(&engine, SymbolKind::Type, "Inner");

    let make = declared(&engine, SymbolKind::Method, "make");
    let returned = engine.references(make.id, ReferenceKind::ReturnType, &[]).unwrap();
    assert_eq!(returned.len(), 1);
    assert_eq!(returned[0].id, inner.id);
    assert_eq!(returned[0].occurrence_kind, OccurrenceKind::Definition);

    let cached = declared(&engine, SymbolKind::Variable, "cached");
    let typed = engine.references(cached.id, ReferenceKind::Type, &[]).unwrap();
    assert_eq!(typed.len(), 1);
    assert_eq!(typed[0].id, inner.id);

    // Primitive types have no definition
    let size = declared(&engine, SymbolKind::Method, "size");
    assert!(engine
        .references(size.id, ReferenceKind::ReturnType, &[])
        .unwrap()
        .is_empty());
    let count = declared(&engine, SymbolKind::Variable, "count");
    assert!(engine
        .references(count.id, ReferenceKind::Type, &[])
        .unwrap()
        .is_empty());
}

#[test]
fn test_declarations_exclude_definitions() {
    let engine = engine();
    let count = declared(&engine, SymbolKind::Variable, "count");
    let declarations = engine
        .references(count.id, ReferenceKind::Declarations, &[])
        .unwrap();
    assert_eq!(declarations.len(), 1);
    assert_eq!(declarations[0].id, count.id);
    assert_eq!(declarations[0].occurrence_kind, OccurrenceKind::Declaration);
    assert!(declarations[0].range.start_line == 3);

    // Initialized locals and bodied methods are definitions
    let seed = declared(&engine, SymbolKind::Variable, "seed");
    assert!(engine
        .references(seed.id, ReferenceKind::Declarations, &[])
        .unwrap()
        .is_empty());
    let make = declared(&engine, SymbolKind::Method, "make");
    assert!(engine
        .references(make.id, ReferenceKind::Declarations, &[])
        .unwrap()
        .is_empty());
}

#[test]
fn test_declarations_of_an_interface_method() {
    let graph = SqliteGraph::open_in_memory().unwrap();
    index_sources(
        &graph,
        &[
            ("geo/Sized.java", "package geo;\npublic interface Sized {\n  int size();\n}\n"),
            (
                "geo/Box.java",
                "package geo;\nclass Box implements Sized {\n  public int size() { return 1; }\n  int twice(Sized s) { return s.size() * 2; }\n}\n",
            ),
        ],
    )
    .unwrap();
    let engine = QueryEngine::new(graph);
    let call = engine.occurrence_at("geo/Box.java", 4, 33).unwrap();
    assert_eq!(call.details.name, "size");
    assert_eq!(call.occurrence_kind, OccurrenceKind::Usage);

    let declarations = engine
        .references(call.id, ReferenceKind::Declarations, &[])
        .unwrap();
    assert_eq!(declarations.len(), 1);
    assert_eq!(declarations[0].file_path, "geo/Sized.java");
    assert_eq!(declarations[0].range.start_line, 3);
    assert!(engine
        .references(call.id, ReferenceKind::Definition, &[])
        .unwrap()
        .is_empty());
}
