//! Reference commands: `refs` and `file-refs`

use anyhow::Result;
use jxref::error::QueryError;
use jxref::graph::GraphReader;
use jxref::output::{output_json, JsonResponse, OutputFormat, RefsResponse};
use jxref::query::{FileReferenceKind, QueryEngine, ReferenceKind, ReferenceSummary};

pub fn run_refs<R: GraphReader>(
    engine: &QueryEngine<R>,
    id: i64,
    kind: &str,
    tags: &[String],
    count_only: bool,
    output_format: OutputFormat,
    exec_id: &str,
) -> Result<()> {
    let kind = ReferenceKind::parse(kind).ok_or_else(|| QueryError::UnknownKind(kind.to_string()))?;
    let references = engine.references(id, kind, tags)?;
    print_references(
        RefsResponse {
            target: id.to_string(),
            kind: kind.as_str().to_string(),
            count: references.len(),
            references: (!count_only).then_some(references),
        },
        output_format,
        exec_id,
    )
}

pub fn run_file_refs<R: GraphReader>(
    engine: &QueryEngine<R>,
    file: &str,
    kind: &str,
    count_only: bool,
    output_format: OutputFormat,
    exec_id: &str,
) -> Result<()> {
    let kind =
        FileReferenceKind::parse(kind).ok_or_else(|| QueryError::UnknownKind(kind.to_string()))?;
    let references = engine.file_references(file, kind)?;
    print_references(
        RefsResponse {
            target: file.to_string(),
            kind: kind.as_str().to_string(),
            count: references.len(),
            references: (!count_only).then_some(references),
        },
        output_format,
        exec_id,
    )
}

fn print_references(
    response: RefsResponse,
    output_format: OutputFormat,
    exec_id: &str,
) -> Result<()> {
    match output_format {
        OutputFormat::Json => output_json(&JsonResponse::new(response, exec_id)),
        OutputFormat::Human => {
            match &response.references {
                None => println!("{}", response.count),
                Some(references) => {
                    for summary in references {
                        println!("{}", format_summary(summary));
                    }
                }
            }
            Ok(())
        }
    }
}

fn format_summary(summary: &ReferenceSummary) -> String {
    let first_line = summary.text.lines().next().unwrap_or("");
    let mut line = format!(
        "#{} {}:{}:{} {} {}",
        summary.id,
        summary.file_path,
        summary.range.start_line,
        summary.range.start_col,
        summary.occurrence_kind,
        first_line
    );
    if !summary.tags.is_empty() {
        line.push_str(&format!(" [{}]", summary.tags.join(" ")));
    }
    line
}
