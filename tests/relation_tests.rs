//! Override, implement and inherit edges, queried end to end.

use jxref::graph::{GraphReader, Occurrence, OccurrenceFilter, SqliteGraph};
use jxref::{index_sources, OccurrenceKind, QueryEngine, ReferenceKind, SymbolKind};

fn engine(sources: &[(&str, &str)]) -> QueryEngine<SqliteGraph> {
    let graph = SqliteGraph::open_in_memory().unwrap();
    let report = index_sources(&graph, sources).unwrap();
    assert!(report.failed.is_empty(), "failed: {:?}", report.failed);
    QueryEngine::new(graph)
}

/// The declaring occurrence of a method or type by qualified name
fn declared(engine: &QueryEngine<SqliteGraph>, symbol: SymbolKind, qualified: &str) -> Occurrence {
    engine
        .reader()
        .occurrences(
            &OccurrenceFilter::new()
                .symbols(&[symbol])
                .kinds(&[OccurrenceKind::Definition, OccurrenceKind::Declaration]),
        )
        .unwrap()
        .into_iter()
        .find(|o| o.details.qualified_name == qualified)
        .unwrap_or_else(|| panic!("no declaration of {}", qualified))
}

fn qualified_names(
    engine: &QueryEngine<SqliteGraph>,
    id: i64,
    kind: ReferenceKind,
) -> Vec<String> {
    let mut names: Vec<String> = engine
        .references(id, kind, &[])
        .unwrap()
        .into_iter()
        .map(|summary| {
            engine
                .occurrence(summary.id)
                .unwrap()
                .details
                .qualified_name
        })
        .collect();
    names.sort();
    names
}

const DIAMOND: &[(&str, &str)] = &[
    ("p/I0.java", "package p;\npublic interface I0 {\n  void m(int x);\n}\n"),
    (
        "p/I1.java",
        "package p;\npublic interface I1 extends I0 {\n  void m(int x);\n}\n",
    ),
    (
        "p/I2.java",
        "package p;\npublic interface I2 extends I0 {\n  void m(int x);\n}\n",
    ),
    ("p/B.java", "package p;\npublic class B {\n  public void m(int x) {}\n}\n"),
    (
        "p/C.java",
        "package p;\npublic class C extends B implements I1, I2 {\n  public void m(int x) {}\n  public void other() {}\n}\n",
    ),
];

#[test]
fn test_overrides_come_from_the_class_chain_only() {
    let engine = engine(DIAMOND);
    let c_m = declared(&engine, SymbolKind::Method, "p.C.m");
    assert_eq!(
        qualified_names(&engine, c_m.id, ReferenceKind::Overrides),
        vec!["p.B.m"]
    );
}

#[test]
fn test_implements_reaches_every_interface_once() {
    let engine = engine(DIAMOND);
    let c_m = declared(&engine, SymbolKind::Method, "p.C.m");
    // I0 is reachable through both I1 and I2
    assert_eq!(
        qualified_names(&engine, c_m.id, ReferenceKind::Implements),
        vec!["p.I0.m", "p.I1.m", "p.I2.m"]
    );
    assert_eq!(
        engine.reference_count(c_m.id, ReferenceKind::Implements).unwrap(),
        3
    );
}

#[test]
fn test_unmatched_method_has_no_edges() {
    let engine = engine(DIAMOND);
    let other = declared(&engine, SymbolKind::Method, "p.C.other");
    assert!(qualified_names(&engine, other.id, ReferenceKind::Overrides).is_empty());
    assert!(qualified_names(&engine, other.id, ReferenceKind::Implements).is_empty());
}

#[test]
fn test_implemented_by_walks_back_to_implementors() {
    let engine = engine(DIAMOND);
    let i0_m = declared(&engine, SymbolKind::Method, "p.I0.m");
    assert_eq!(
        qualified_names(&engine, i0_m.id, ReferenceKind::ImplementedBy),
        vec!["p.C.m", "p.I1.m", "p.I2.m"]
    );
}

#[test]
fn test_inheritance_edges_between_types() {
    let engine = engine(DIAMOND);
    let c = declared(&engine, SymbolKind::Type, "p.C");
    assert_eq!(
        qualified_names(&engine, c.id, ReferenceKind::InheritsFrom),
        vec!["p.B", "p.I1", "p.I2"]
    );
    let i0 = declared(&engine, SymbolKind::Type, "p.I0");
    assert_eq!(
        qualified_names(&engine, i0.id, ReferenceKind::InheritedBy),
        vec!["p.I1", "p.I2"]
    );
}

#[test]
fn test_overridden_by_single_subclass() {
    let engine = engine(&[
        (
            "zoo/Animal.java",
            "package zoo;\npublic class Animal {\n  public void speak() {}\n}\n",
        ),
        (
            "zoo/Dog.java",
            "package zoo;\npublic class Dog extends Animal {\n  @Override\n  public void speak() {}\n}\n",
        ),
    ]);
    let speak = declared(&engine, SymbolKind::Method, "zoo.Animal.speak");
    let overriders = engine
        .references(speak.id, ReferenceKind::OverriddenBy, &[])
        .unwrap();
    assert_eq!(overriders.len(), 1);
    let dog_speak = declared(&engine, SymbolKind::Method, "zoo.Dog.speak");
    assert_eq!(overriders[0].id, dog_speak.id);
    assert_eq!(overriders[0].file_path, "zoo/Dog.java");
}

#[test]
fn test_override_through_intermediate_class() {
    let engine = engine(&[
        ("a/A.java", "package a;\npublic class A { public void run(String s) {} }\n"),
        ("a/B.java", "package a;\npublic class B extends A { }\n"),
        (
            "a/C.java",
            "package a;\npublic class C extends B { public void run(String s) {} public void run(int n) {} }\n",
        ),
    ]);
    let overriders = {
        let a_run = declared(&engine, SymbolKind::Method, "a.A.run");
        qualified_names(&engine, a_run.id, ReferenceKind::OverriddenBy)
    };
    // Only the overload with the matching erased parameter list
    assert_eq!(overriders, vec!["a.C.run"]);
    let c_runs = engine
        .reader()
        .occurrences(
            &OccurrenceFilter::new()
                .symbols(&[SymbolKind::Method])
                .kinds(&[OccurrenceKind::Definition]),
        )
        .unwrap()
        .into_iter()
        .filter(|o| o.details.qualified_name == "a.C.run")
        .count();
    assert_eq!(c_runs, 2);
}
