//! Entity identity across declarations and usages, through the full
//! index pipeline.

use jxref::graph::{GraphReader, Occurrence, OccurrenceFilter, SqliteGraph};
use jxref::identity::entity_hash;
use jxref::{index_sources, OccurrenceKind, QueryEngine, ReferenceKind, SymbolKind};
use std::collections::HashSet;

fn index(sources: &[(&str, &str)]) -> SqliteGraph {
    let graph = SqliteGraph::open_in_memory().unwrap();
    let report = index_sources(&graph, sources).unwrap();
    assert!(report.failed.is_empty(), "failed: {:?}", report.failed);
    graph
}

fn occurrences(graph: &SqliteGraph, symbol: SymbolKind) -> Vec<Occurrence> {
    graph
        .occurrences(&OccurrenceFilter::new().symbols(&[symbol]))
        .unwrap()
}

#[test]
fn test_method_declaration_and_call_share_hash() {
    let graph = index(&[
        (
            "zoo/Animal.java",
            "package zoo;\npublic class Animal {\n  public void speak(int times) {}\n}\n",
        ),
        (
            "zoo/Keeper.java",
            "package zoo;\nclass Keeper {\n  void feed(Animal a) { a.speak(3); }\n}\n",
        ),
    ]);
    let speak: Vec<Occurrence> = occurrences(&graph, SymbolKind::Method)
        .into_iter()
        .filter(|o| o.details.name == "speak")
        .collect();
    assert_eq!(speak.len(), 2);

    let definition = speak
        .iter()
        .find(|o| o.occurrence_kind == OccurrenceKind::Definition)
        .unwrap();
    let call = speak
        .iter()
        .find(|o| o.occurrence_kind == OccurrenceKind::Usage)
        .unwrap();
    assert_eq!(definition.entity_hash, call.entity_hash);
    assert_eq!(definition.entity_hash, entity_hash("zoo.Animal:speak(int)"));
    assert_eq!(call.file_path, "zoo/Keeper.java");
}

#[test]
fn test_field_declaration_and_usages_share_hash() {
    let graph = index(&[(
        "Counter.java",
        "class Counter {\n  int count;\n  void tick() { count = count + 1; }\n}\n",
    )]);
    let count: Vec<Occurrence> = occurrences(&graph, SymbolKind::Variable)
        .into_iter()
        .filter(|o| o.details.name == "count")
        .collect();
    assert_eq!(count.len(), 3);
    let expected = entity_hash("Counter:int:count");
    assert!(count.iter().all(|o| o.entity_hash == expected));

    let kinds: Vec<OccurrenceKind> = count.iter().map(|o| o.occurrence_kind).collect();
    assert_eq!(
        kinds,
        vec![
            OccurrenceKind::Declaration,
            OccurrenceKind::Write,
            OccurrenceKind::Read
        ]
    );
}

#[test]
fn test_type_usages_link_to_declaration() {
    let graph = index(&[
        ("zoo/Box.java", "package zoo;\npublic class Box<T> {}\n"),
        (
            "zoo/Use.java",
            "package zoo;\nclass Use {\n  Box<String> named;\n  Box raw;\n}\n",
        ),
    ]);
    let types = occurrences(&graph, SymbolKind::Type);
    let declaration = types
        .iter()
        .find(|o| o.occurrence_kind == OccurrenceKind::Definition && o.details.name == "Box")
        .unwrap();
    assert_eq!(declaration.entity_hash, entity_hash("zoo.Box"));

    let usages: Vec<&Occurrence> = types
        .iter()
        .filter(|o| o.occurrence_kind == OccurrenceKind::Usage && o.details.name == "Box")
        .collect();
    assert_eq!(usages.len(), 2);
    // Usages differ by type arguments but resolve to the same declaration
    assert!(usages
        .iter()
        .all(|o| o.definition_entity_hash == declaration.entity_hash));
    assert_ne!(usages[0].entity_hash, usages[1].entity_hash);
}

#[test]
fn test_type_variables_are_not_usages_of_their_bound() {
    let graph = index(&[
        ("geo/Shape.java", "package geo;\npublic class Shape {}\n"),
        (
            "geo/Box.java",
            "package geo;\n\
             public class Box<T extends Shape> {\n\
               T item;\n\
               T get() { return item; }\n\
               <U extends Shape> U pick(U u) { return u; }\n\
             }\n",
        ),
    ]);
    let type_texts: Vec<String> = occurrences(&graph, SymbolKind::Type)
        .into_iter()
        .filter(|o| o.occurrence_kind == OccurrenceKind::Usage)
        .map(|o| o.text)
        .collect();
    assert!(
        !type_texts.iter().any(|t| t == "T" || t == "U"),
        "type variables recorded as usages: {:?}",
        type_texts
    );

    let engine = QueryEngine::new(graph);
    let shape = engine
        .reader()
        .occurrences(
            &OccurrenceFilter::new()
                .symbols(&[SymbolKind::Type])
                .kinds(&[OccurrenceKind::Definition]),
        )
        .unwrap()
        .into_iter()
        .find(|o| o.details.qualified_name == "geo.Shape")
        .unwrap();
    let usages = engine.references(shape.id, ReferenceKind::Usages, &[]).unwrap();
    // Only the two bounds
    let positions: Vec<(String, usize)> = usages
        .iter()
        .map(|u| (u.text.clone(), u.range.start_line))
        .collect();
    assert_eq!(
        positions,
        vec![("Shape".to_string(), 2), ("Shape".to_string(), 5)]
    );
}

#[test]
fn test_implicit_constructor_matches_creation() {
    let graph = index(&[(
        "zoo/Cage.java",
        "package zoo;\npublic class Cage {}\nclass Use { Object c = new Cage(); }\n",
    )]);
    let ctors = occurrences(&graph, SymbolKind::Constructor);
    let implicit = ctors
        .iter()
        .find(|o| !o.visible && o.details.name == "Cage")
        .unwrap();
    let creation = ctors
        .iter()
        .find(|o| o.occurrence_kind == OccurrenceKind::Usage)
        .unwrap();
    assert_eq!(implicit.entity_hash, creation.entity_hash);
    assert_eq!(creation.entity_hash, entity_hash("zoo.Cage:Cage()"));
}

#[test]
fn test_distinct_symbols_get_distinct_hashes() {
    let graph = index(&[
        (
            "a/Shapes.java",
            "package a;\n\
             public class Shapes {\n\
               int size;\n\
               String size() { return \"\"; }\n\
               void draw(int x) { int y = x; }\n\
               void draw(String x) { int y = 0; }\n\
               static class Inner { int size; }\n\
             }\n",
        ),
        (
            "b/Shapes.java",
            "package b;\npublic class Shapes {\n  int size;\n  void draw(int x) {}\n}\n",
        ),
    ]);
    let declared: Vec<Occurrence> = graph
        .occurrences(&OccurrenceFilter::new().kinds(&[
            OccurrenceKind::Definition,
            OccurrenceKind::Declaration,
        ]))
        .unwrap()
        .into_iter()
        .filter(|o| o.visible)
        .collect();

    let mut hashes = HashSet::new();
    for occurrence in &declared {
        assert!(
            hashes.insert(occurrence.entity_hash),
            "duplicate hash for {} in {}",
            occurrence.text,
            occurrence.file_path
        );
    }
    // a.Shapes, Inner, b.Shapes; two fields and a method named size per
    // package a; overloads; parameters; locals
    assert!(declared.len() >= 14, "only {} declarations", declared.len());
}

#[test]
fn test_reindex_is_idempotent() {
    let sources = [
        (
            "zoo/Animal.java",
            "package zoo;\npublic class Animal { public void speak() {} }\n",
        ),
        (
            "zoo/Dog.java",
            "package zoo;\npublic class Dog extends Animal {\n  @Override public void speak() { super.speak(); }\n}\n",
        ),
    ];
    let first = index(&sources);
    let second = index(&sources);
    index_sources(&second, &sources).unwrap();

    let snapshot = |graph: &SqliteGraph| {
        let mut rows: Vec<(String, i64, i64, OccurrenceKind)> = graph
            .occurrences(&OccurrenceFilter::new())
            .unwrap()
            .into_iter()
            .map(|o| (o.file_path, o.entity_hash, o.definition_entity_hash, o.occurrence_kind))
            .collect();
        rows.sort();
        rows
    };
    assert_eq!(snapshot(&first), snapshot(&second));
    assert_eq!(first.stats().unwrap(), second.stats().unwrap());
}
