//! Indexing driver: discovery, two-pass binding and per-file persistence.
//!
//! A run goes through these stages:
//! 1. discover `*.java` files under the root ([`scan`], [`filter`])
//! 2. read, hash and parse them in parallel
//! 3. outline every file and build one [`TypeUniverse`]
//! 4. bind and build records for the files being written, in parallel
//! 5. persist sequentially, one store transaction per file
//! 6. drop store files that are no longer on disk

pub mod filter;
pub mod scan;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::common::{compute_hash, relative_path};
use crate::error::IndexError;
use crate::graph::{FileRecord, FileStatus, FileWrite, GraphReader, SqliteGraph};
use crate::ingest::{ParsedFile, TypeUniverse};
use crate::writer::{build_record, persist_record, OccurrenceRecord};

pub use filter::{FileFilter, SkipReason};

/// Settings of one index run
#[derive(Debug, Clone)]
pub struct IndexOptions {
    pub root: PathBuf,
    /// Worker threads; 0 lets rayon decide
    pub threads: usize,
    /// Skip files whose stored hash matches and whose status is `indexed`
    pub changed_only: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Draw a progress bar on stderr
    pub progress: bool,
}

impl IndexOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            threads: 0,
            changed_only: false,
            include: Vec::new(),
            exclude: Vec::new(),
            progress: false,
        }
    }
}

/// A file that could not be indexed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub path: String,
    pub code: String,
    pub message: String,
}

impl FailedFile {
    fn new(path: impl Into<String>, error: &IndexError) -> Self {
        Self {
            path: path.into(),
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Summary of one index run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub discovered: usize,
    pub indexed: usize,
    /// Filtered out during discovery, or unchanged in `changed_only` mode
    pub skipped: usize,
    pub removed: usize,
    pub failed: Vec<FailedFile>,
    pub occurrences: usize,
    pub relations: usize,
    pub duration_ms: u64,
}

/// A source read from disk or memory, keyed by its store path
struct SourceFile {
    path: String,
    hash: String,
    parsed: ParsedFile,
}

impl SourceFile {
    fn load(key: String, contents: Vec<u8>) -> Result<Self, IndexError> {
        let hash = compute_hash(&contents);
        let parsed = ParsedFile::parse(key.clone(), contents).map_err(|e| {
            debug!(path = %key, error = %e, "parse failed");
            IndexError::Parse {
                path: PathBuf::from(&key),
            }
        })?;
        if parsed.has_errors() {
            debug!(path = %key, "syntax errors; indexing recovered tree");
        }
        Ok(Self {
            path: key,
            hash,
            parsed,
        })
    }
}

/// Index every Java source under `options.root`
pub fn index_directory(graph: &SqliteGraph, options: &IndexOptions) -> Result<IndexReport> {
    let started = Instant::now();
    let filter = FileFilter::new(&options.root, &options.include, &options.exclude)?;
    let discovery = scan::discover(&filter);
    info!(
        root = %filter.root().display(),
        files = discovery.files.len(),
        "discovered sources"
    );

    let mut report = IndexReport {
        discovered: discovery.files.len(),
        skipped: discovery.skipped,
        ..IndexReport::default()
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()?;

    let root = filter.root().to_path_buf();
    let loaded: Vec<(String, Result<SourceFile, IndexError>)> = pool.install(|| {
        discovery
            .files
            .par_iter()
            .map(|path| {
                let key = relative_path(&root, path);
                let source = std::fs::read(path)
                    .map_err(|source| IndexError::Io {
                        path: path.clone(),
                        source,
                    })
                    .and_then(|contents| SourceFile::load(key.clone(), contents));
                (key, source)
            })
            .collect()
    });

    let on_disk: HashSet<String> = loaded.iter().map(|(key, _)| key.clone()).collect();
    let mut sources = Vec::with_capacity(loaded.len());
    for (key, source) in loaded {
        match source {
            Ok(source) => sources.push(source),
            Err(e) => {
                warn!(path = %key, code = e.code(), error = %e, "file not indexed");
                report.failed.push(FailedFile::new(key, &e));
            }
        }
    }

    pool.install(|| index_sources_into(graph, sources, options, &mut report))?;

    for record in graph.files()? {
        if !on_disk.contains(&record.path) && graph.remove_file(&record.path)? {
            debug!(path = %record.path, "removed from store");
            report.removed += 1;
        }
    }

    report.duration_ms = started.elapsed().as_millis() as u64;
    info!(
        indexed = report.indexed,
        skipped = report.skipped,
        removed = report.removed,
        failed = report.failed.len(),
        occurrences = report.occurrences,
        relations = report.relations,
        duration_ms = report.duration_ms,
        "index complete"
    );
    Ok(report)
}

/// Index in-memory `(path, source)` pairs; nothing is pruned
pub fn index_sources(graph: &SqliteGraph, sources: &[(&str, &str)]) -> Result<IndexReport> {
    let started = Instant::now();
    let mut report = IndexReport {
        discovered: sources.len(),
        ..IndexReport::default()
    };
    let mut loaded = Vec::with_capacity(sources.len());
    for (path, source) in sources {
        match SourceFile::load(path.to_string(), source.as_bytes().to_vec()) {
            Ok(file) => loaded.push(file),
            Err(e) => report.failed.push(FailedFile::new(*path, &e)),
        }
    }
    let options = IndexOptions::new(".");
    index_sources_into(graph, loaded, &options, &mut report)?;
    report.duration_ms = started.elapsed().as_millis() as u64;
    Ok(report)
}

/// Bind and persist loaded sources; runs inside the caller's rayon pool
fn index_sources_into(
    graph: &SqliteGraph,
    sources: Vec<SourceFile>,
    options: &IndexOptions,
    report: &mut IndexReport,
) -> Result<()> {
    let outlines = sources.par_iter().map(|s| s.parsed.outline()).collect();
    let universe = TypeUniverse::build(outlines);
    debug!(types = universe.len(), "type universe built");

    let stored: HashMap<String, FileRecord> = graph
        .files()?
        .into_iter()
        .map(|record| (record.path.clone(), record))
        .collect();

    let (pending, unchanged): (Vec<&SourceFile>, Vec<&SourceFile>) =
        sources.iter().partition(|source| {
            !options.changed_only || needs_write(stored.get(&source.path), &source.hash)
        });
    report.skipped += unchanged.len();

    let records: Vec<Vec<OccurrenceRecord>> = pending
        .par_iter()
        .map(|source| build_records(&source.parsed, &universe))
        .collect();

    let bar = progress_bar(pending.len() as u64, options.progress);
    for (source, records) in pending.iter().zip(records) {
        bar.set_message(source.path.clone());
        match write_records(graph, &source.path, &source.hash, &records) {
            Ok(write) => {
                report.indexed += 1;
                report.occurrences += write.occurrences;
                report.relations += write.relations;
            }
            Err(e) => {
                warn!(path = %source.path, code = e.code(), error = %e, "file not indexed");
                report.failed.push(FailedFile::new(source.path.clone(), &e));
            }
        }
        bar.inc(1);
    }
    bar.finish_and_clear();
    Ok(())
}

fn needs_write(stored: Option<&FileRecord>, hash: &str) -> bool {
    match stored {
        Some(record) => record.content_hash != hash || record.status != FileStatus::Indexed,
        None => true,
    }
}

/// Bound row sets of one file, in document order
pub fn build_records(parsed: &ParsedFile, universe: &TypeUniverse) -> Vec<OccurrenceRecord> {
    parsed
        .bind(universe)
        .iter()
        .map(|node| build_record(node, universe))
        .collect()
}

/// Replace a file's rows with `records` in one transaction
///
/// On failure the store has already discarded the file's rows and marked it
/// `needs_reindex`.
pub fn write_records(
    graph: &SqliteGraph,
    path: &str,
    content_hash: &str,
    records: &[OccurrenceRecord],
) -> Result<FileWrite, IndexError> {
    graph
        .replace_file(path, content_hash, |sink, file_id| {
            for record in records {
                persist_record(sink, file_id, record)?;
            }
            Ok(())
        })
        .map_err(|source| IndexError::Persistence {
            path: PathBuf::from(path),
            source,
        })
}

fn progress_bar(len: u64, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len);
    let template = "{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} {wide_msg}";
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style);
    }
    bar
}
