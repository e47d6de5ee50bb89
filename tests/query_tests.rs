//! Navigation queries over an indexed source set.

use jxref::graph::{GraphReader, Occurrence, OccurrenceFilter, SqliteGraph};
use jxref::{
    index_sources, FileReferenceKind, OccurrenceKind, QueryEngine, QueryError, ReferenceKind,
    SymbolKind,
};

const ANIMAL: &str = concat!(
    "package zoo;\n",                        // 1
    "import java.util.List;\n",              // 2
    "\n",                                    // 3
    "/** An animal. */\n",                   // 4
    "public class Animal {\n",               // 5
    "  private int legs;\n",                 // 6
    "\n",                                    // 7
    "  /** Makes a noise. */\n",             // 8
    "  public void speak(int times) {\n",    // 9
    "    int count = times;\n",              // 10
    "    helper(count);\n",                  // 11
    "    helper(count);\n",                  // 12
    "  }\n",                                 // 13
    "\n",                                    // 14
    "  private static void helper(int n) {}\n", // 15
    "\n",                                    // 16
    "  public Animal() { speak(1); }\n",     // 17
    "}\n",                                   // 18
);

const KEEPER: &str = concat!(
    "package zoo;\n",
    "class Keeper {\n",
    "  void feed(Animal a) { a.speak(2); }\n",
    "}\n",
);

fn engine() -> QueryEngine<SqliteGraph> {
    let graph = SqliteGraph::open_in_memory().unwrap();
    let report =
        index_sources(&graph, &[("zoo/Animal.java", ANIMAL), ("zoo/Keeper.java", KEEPER)]).unwrap();
    assert!(report.failed.is_empty(), "failed: {:?}", report.failed);
    QueryEngine::new(graph)
}

fn defined(engine: &QueryEngine<SqliteGraph>, symbol: SymbolKind, qualified: &str) -> Occurrence {
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
        .find(|o| o.details.qualified_name == qualified)
        .unwrap_or_else(|| panic!("no declaration of {}", qualified))
}

#[test]
fn test_occurrence_at_prefers_smallest_visible_node() {
    let engine = engine();
    // Inside both `speak` and the `helper(count)` call
    let found = engine.occurrence_at("zoo/Animal.java", 11, 4).unwrap();
    assert_eq!(found.symbol_kind, SymbolKind::Method);
    assert_eq!(found.occurrence_kind, OccurrenceKind::Usage);
    assert_eq!(found.details.name, "helper");

    let argument = engine.occurrence_at("zoo/Animal.java", 11, 12).unwrap();
    assert_eq!(argument.symbol_kind, SymbolKind::Variable);
    assert_eq!(argument.details.name, "count");
}

#[test]
fn test_occurrence_at_errors() {
    let engine = engine();
    assert!(matches!(
        engine.occurrence_at("zoo/Animal.java", 3, 0),
        Err(QueryError::InvalidPosition { line: 3, column: 0, .. })
    ));
    assert!(matches!(
        engine.occurrence_at("zoo/Missing.java", 1, 0),
        Err(QueryError::FileNotFound(_))
    ));
    assert!(matches!(engine.occurrence(987_654), Err(QueryError::NotFound(987_654))));
}

#[test]
fn test_method_properties_and_kinds() {
    let engine = engine();
    let speak = defined(&engine, SymbolKind::Method, "zoo.Animal.speak");
    let props = engine.properties(speak.id).unwrap();
    let labels: Vec<&str> = props.keys().map(String::as_str).collect();
    assert_eq!(labels, vec!["isFinal", "isStatic", "name", "qualifiedName", "type"]);
    assert_eq!(props["isStatic"], "false");
    assert_eq!(props["type"], "void");

    let helper = defined(&engine, SymbolKind::Method, "zoo.Animal.helper");
    assert_eq!(engine.properties(helper.id).unwrap()["isStatic"], "true");

    let kinds = engine.reference_kinds(speak.id).unwrap();
    assert!(kinds.iter().any(|(_, k)| *k == ReferenceKind::Callers));
    assert!(kinds.iter().any(|(_, k)| *k == ReferenceKind::Overrides));
    assert_eq!(kinds.len(), ReferenceKind::supported_by(SymbolKind::Method).len());
}

#[test]
fn test_callers_are_ordered_by_position() {
    let engine = engine();
    let helper = defined(&engine, SymbolKind::Method, "zoo.Animal.helper");
    let callers = engine.references(helper.id, ReferenceKind::Callers, &[]).unwrap();
    let lines: Vec<usize> = callers.iter().map(|c| c.range.start_line).collect();
    assert_eq!(lines, vec![11, 12]);

    let speak = defined(&engine, SymbolKind::Method, "zoo.Animal.speak");
    let callers = engine.references(speak.id, ReferenceKind::Callers, &[]).unwrap();
    let positions: Vec<(usize, &str)> = callers
        .iter()
        .map(|c| (c.range.start_line, c.file_path.as_str()))
        .collect();
    assert_eq!(positions, vec![(3, "zoo/Keeper.java"), (17, "zoo/Animal.java")]);
}

#[test]
fn test_calls_made_and_callees() {
    let engine = engine();
    let speak = defined(&engine, SymbolKind::Method, "zoo.Animal.speak");
    assert_eq!(engine.reference_count(speak.id, ReferenceKind::CallsMade).unwrap(), 2);

    let callees = engine.references(speak.id, ReferenceKind::Callees, &[]).unwrap();
    assert_eq!(callees.len(), 1);
    assert_eq!(callees[0].occurrence_kind, OccurrenceKind::Definition);
    assert_eq!(callees[0].tags, vec!["private".to_string(), "static".to_string()]);

    let statics = engine
        .references(speak.id, ReferenceKind::Callees, &["static".to_string()])
        .unwrap();
    assert_eq!(statics.len(), 1);
    let publics = engine
        .references(speak.id, ReferenceKind::Callees, &["public".to_string()])
        .unwrap();
    assert!(publics.is_empty());
}

#[test]
fn test_parameters_and_locals() {
    let engine = engine();
    let speak = defined(&engine, SymbolKind::Method, "zoo.Animal.speak");
    let params = engine.references(speak.id, ReferenceKind::Parameters, &[]).unwrap();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].text, "times");
    let locals = engine.references(speak.id, ReferenceKind::Locals, &[]).unwrap();
    assert_eq!(locals.len(), 1);
    assert_eq!(locals[0].text, "count");
}

#[test]
fn test_definition_of_a_call() {
    let engine = engine();
    let call = engine.occurrence_at("zoo/Keeper.java", 3, 26).unwrap();
    assert_eq!(call.details.name, "speak");
    let definition = engine.references(call.id, ReferenceKind::Definition, &[]).unwrap();
    assert_eq!(definition.len(), 1);
    assert_eq!(definition[0].file_path, "zoo/Animal.java");
    assert_eq!(definition[0].range.start_line, 9);
}

#[test]
fn test_type_members() {
    let engine = engine();
    let animal = defined(&engine, SymbolKind::Type, "zoo.Animal");
    assert_eq!(engine.reference_count(animal.id, ReferenceKind::Fields).unwrap(), 1);
    assert_eq!(engine.reference_count(animal.id, ReferenceKind::Methods).unwrap(), 2);
    assert_eq!(engine.reference_count(animal.id, ReferenceKind::Constructors).unwrap(), 1);

    let usages = engine.references(animal.id, ReferenceKind::Usages, &[]).unwrap();
    assert!(usages.iter().any(|u| u.file_path == "zoo/Keeper.java"));
}

#[test]
fn test_file_references() {
    let engine = engine();
    let path = "zoo/Animal.java";
    assert_eq!(engine.file_reference_count(path, FileReferenceKind::Imports).unwrap(), 1);
    assert_eq!(engine.file_reference_count(path, FileReferenceKind::Types).unwrap(), 1);
    assert_eq!(
        engine.file_reference_count(path, FileReferenceKind::Constructors).unwrap(),
        1
    );
    let methods = engine.file_references(path, FileReferenceKind::Methods).unwrap();
    let lines: Vec<usize> = methods.iter().map(|m| m.range.start_line).collect();
    assert_eq!(lines, vec![9, 15]);

    // Keeper only has its implicit constructor, which is not listed
    assert_eq!(
        engine
            .file_reference_count("zoo/Keeper.java", FileReferenceKind::Constructors)
            .unwrap(),
        0
    );
}

#[test]
fn test_type_documentation_lists_members() {
    let engine = engine();
    let animal = defined(&engine, SymbolKind::Type, "zoo.Animal");
    let doc = engine.documentation(animal.id).unwrap();
    assert!(doc.starts_with("An animal."), "{}", doc);
    assert!(doc.contains("[public] public void speak(int times)\n    Makes a noise."), "{}", doc);
    assert!(doc.contains("[private static] private static void helper(int n)"), "{}", doc);
    assert!(doc.contains("[public] public Animal()"), "{}", doc);

    let speak = defined(&engine, SymbolKind::Method, "zoo.Animal.speak");
    assert_eq!(engine.documentation(speak.id).unwrap(), "Makes a noise.");
}
