//! Status command implementation

use anyhow::Result;
use jxref::graph::{FileStatus, GraphReader, SqliteGraph};
use jxref::output::{output_json, JsonResponse, OutputFormat, StatusResponse};

pub fn run_status(graph: &SqliteGraph, output_format: OutputFormat, exec_id: &str) -> Result<()> {
    let stats = graph.stats()?;
    let files = graph.files()?;
    let needs_reindex: Vec<String> = files
        .iter()
        .filter(|f| f.status == FileStatus::NeedsReindex)
        .map(|f| f.path.clone())
        .collect();
    let response = StatusResponse {
        stats,
        indexed: files.len() - needs_reindex.len(),
        needs_reindex,
    };

    match output_format {
        OutputFormat::Json => output_json(&JsonResponse::new(response, exec_id)),
        OutputFormat::Human => {
            println!("files: {} ({} indexed)", response.stats.files, response.indexed);
            println!("occurrences: {}", response.stats.occurrences);
            println!("relations: {}", response.stats.relations);
            println!("member rows: {}", response.stats.members);
            println!("doc comments: {}", response.stats.doc_comments);
            println!("imports: {}", response.stats.imports);
            if !response.needs_reindex.is_empty() {
                println!("needs reindex:");
                for path in &response.needs_reindex {
                    println!("  {}", path);
                }
            }
            Ok(())
        }
    }
}
