//! Indexing throughput benchmarks.
//!
//! - Entity hashing of semantic keys
//! - Index pipeline over generated class hierarchies
//! - Reference queries on an indexed graph
//!
//! Run with: cargo bench --bench indexing_bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use jxref::graph::{GraphReader, OccurrenceFilter, SqliteGraph};
use jxref::identity::entity_hash;
use jxref::{index_sources, OccurrenceKind, QueryEngine, ReferenceKind, SymbolKind};

/// `count` classes, each extending the previous one and overriding `step`
fn hierarchy(count: usize) -> Vec<(String, String)> {
    (0..count)
        .map(|i| {
            let extends = if i == 0 {
                String::new()
            } else {
                format!(" extends C{}", i - 1)
            };
            let source = format!(
                "package bench;\n\
                 public class C{i}{extends} {{\n\
                   protected int value{i};\n\
                   public int step(int n) {{ value{i} = n + {i}; return helper(value{i}); }}\n\
                   private static int helper(int x) {{ int y = x * 2; return y; }}\n\
                 }}\n"
            );
            (format!("bench/C{}.java", i), source)
        })
        .collect()
}

fn index(sources: &[(String, String)]) -> SqliteGraph {
    let graph = SqliteGraph::open_in_memory().unwrap();
    let borrowed: Vec<(&str, &str)> = sources
        .iter()
        .map(|(p, s)| (p.as_str(), s.as_str()))
        .collect();
    index_sources(&graph, &borrowed).unwrap();
    graph
}

fn benchmark_entity_hash(c: &mut Criterion) {
    let keys: Vec<String> = (0..1000)
        .map(|i| format!("bench.C{}:step(int)", i))
        .collect();
    c.bench_function("entity_hash_1000_keys", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(entity_hash(key));
            }
        })
    });
}

fn benchmark_index_sources(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_sources");
    group.sample_size(10);
    for count in [10usize, 50, 200] {
        let sources = hierarchy(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &sources, |b, sources| {
            b.iter(|| black_box(index(sources)))
        });
    }
    group.finish();
}

fn benchmark_queries(c: &mut Criterion) {
    let engine = QueryEngine::new(index(&hierarchy(100)));
    let root_step = engine
        .reader()
        .occurrences(
            &OccurrenceFilter::new()
                .symbols(&[SymbolKind::Method])
                .kinds(&[OccurrenceKind::Definition]),
        )
        .unwrap()
        .into_iter()
        .find(|o| o.details.qualified_name == "bench.C0.step")
        .unwrap();

    let mut group = c.benchmark_group("queries");
    for kind in [
        ReferenceKind::OverriddenBy,
        ReferenceKind::Callees,
        ReferenceKind::Usages,
    ] {
        group.bench_function(kind.as_str(), |b| {
            b.iter(|| black_box(engine.references(root_step.id, kind, &[]).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_entity_hash,
    benchmark_index_sources,
    benchmark_queries
);
criterion_main!(benches);
