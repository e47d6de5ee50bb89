//! Index command implementation

use anyhow::Result;
use jxref::config::Config;
use jxref::graph::SqliteGraph;
use jxref::indexer::{index_directory, IndexReport};
use jxref::output::{output_json, JsonResponse, OutputFormat};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Flag overrides on top of the `[index]` configuration
pub struct IndexArgs {
    pub threads: Option<usize>,
    pub changed_only: bool,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

pub fn run_index(
    config: &Config,
    root: &Path,
    db_path: PathBuf,
    args: IndexArgs,
    output_format: OutputFormat,
    exec_id: &str,
) -> Result<()> {
    let mut options = config.index_options(root);
    if let Some(threads) = args.threads {
        options.threads = threads;
    }
    options.changed_only |= args.changed_only;
    if !args.include.is_empty() {
        options.include = args.include;
    }
    options.exclude.extend(args.exclude);
    options.progress = output_format == OutputFormat::Human && std::io::stderr().is_terminal();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let graph = SqliteGraph::open(&db_path)?;
    let report = index_directory(&graph, &options)?;

    match output_format {
        OutputFormat::Json => {
            let partial = !report.failed.is_empty();
            output_json(&JsonResponse::new(&report, exec_id).with_partial(partial))
        }
        OutputFormat::Human => {
            print_report(&report);
            Ok(())
        }
    }
}

fn print_report(report: &IndexReport) {
    println!(
        "Indexed {} of {} files ({} skipped, {} removed, {} failed) in {} ms",
        report.indexed,
        report.discovered,
        report.skipped,
        report.removed,
        report.failed.len(),
        report.duration_ms
    );
    println!(
        "  {} occurrences, {} relations",
        report.occurrences, report.relations
    );
    for failed in &report.failed {
        println!("  [{}] {}: {}", failed.code, failed.path, failed.message);
    }
}
