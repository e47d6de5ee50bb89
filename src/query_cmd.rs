//! Occurrence commands: `at`, `show`, `kinds`, `doc`

use anyhow::Result;
use jxref::graph::{GraphReader, Occurrence};
use jxref::output::{
    output_json, DocResponse, JsonResponse, KindEntry, KindsResponse, OccurrenceResponse,
    OutputFormat,
};
use jxref::query::QueryEngine;

/// One-line human form of an occurrence
pub fn format_occurrence(occurrence: &Occurrence) -> String {
    let first_line = occurrence.text.lines().next().unwrap_or("");
    format!(
        "#{} {}:{}:{} {} {} {}",
        occurrence.id,
        occurrence.file_path,
        occurrence.range.start_line,
        occurrence.range.start_col,
        occurrence.symbol_kind,
        occurrence.occurrence_kind,
        first_line
    )
}

pub fn run_at<R: GraphReader>(
    engine: &QueryEngine<R>,
    file: &str,
    line: usize,
    column: usize,
    output_format: OutputFormat,
    exec_id: &str,
) -> Result<()> {
    let occurrence = engine.occurrence_at(file, line, column)?;
    match output_format {
        OutputFormat::Json => output_json(&JsonResponse::new(
            OccurrenceResponse {
                occurrence,
                properties: None,
            },
            exec_id,
        )),
        OutputFormat::Human => {
            println!("{}", format_occurrence(&occurrence));
            Ok(())
        }
    }
}

pub fn run_show<R: GraphReader>(
    engine: &QueryEngine<R>,
    id: i64,
    output_format: OutputFormat,
    exec_id: &str,
) -> Result<()> {
    let occurrence = engine.occurrence(id)?;
    let properties = engine.properties(id)?;
    match output_format {
        OutputFormat::Json => output_json(&JsonResponse::new(
            OccurrenceResponse {
                occurrence,
                properties: Some(properties),
            },
            exec_id,
        )),
        OutputFormat::Human => {
            println!("{}", format_occurrence(&occurrence));
            for (label, value) in &properties {
                println!("  {}: {}", label, value);
            }
            Ok(())
        }
    }
}

pub fn run_kinds<R: GraphReader>(
    engine: &QueryEngine<R>,
    id: i64,
    output_format: OutputFormat,
    exec_id: &str,
) -> Result<()> {
    let kinds: Vec<KindEntry> = engine
        .reference_kinds(id)?
        .into_iter()
        .map(|(label, kind)| KindEntry {
            label: label.to_string(),
            tag: kind.as_str().to_string(),
        })
        .collect();
    match output_format {
        OutputFormat::Json => output_json(&JsonResponse::new(KindsResponse { id, kinds }, exec_id)),
        OutputFormat::Human => {
            for entry in &kinds {
                println!("{:<16} {}", entry.tag, entry.label);
            }
            Ok(())
        }
    }
}

pub fn run_doc<R: GraphReader>(
    engine: &QueryEngine<R>,
    id: i64,
    output_format: OutputFormat,
    exec_id: &str,
) -> Result<()> {
    let documentation = engine.documentation(id)?;
    match output_format {
        OutputFormat::Json => output_json(&JsonResponse::new(
            DocResponse { id, documentation },
            exec_id,
        )),
        OutputFormat::Human => {
            println!("{}", documentation);
            Ok(())
        }
    }
}
