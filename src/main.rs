//! jxref CLI: index Java sources and navigate the cross-reference graph
//!
//! Usage: jxref <command> [arguments]

mod cli;
mod index_cmd;
mod query_cmd;
mod refs_cmd;
mod status_cmd;

use anyhow::Result;
use clap::Parser;
use jxref::config::Config;
use jxref::error::{ConfigError, IndexError, QueryError, StoreError};
use jxref::error_codes::JXR_GEN_001_OTHER;
use jxref::graph::SqliteGraph;
use jxref::output::{generate_execution_id, output_json, ErrorResponse, JsonResponse, OutputFormat};
use jxref::query::QueryEngine;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use cli::{Cli, Command};
use index_cmd::IndexArgs;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output_format = OutputFormat::from_json_flag(cli.json);
    let exec_id = generate_execution_id();

    match run(cli, output_format, &exec_id) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&e, output_format, &exec_id);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, output_format: OutputFormat, exec_id: &str) -> Result<()> {
    let root = match &cli.command {
        Command::Index {
            root: Some(root), ..
        } => root.clone(),
        _ => std::env::current_dir()?,
    };
    let config = Config::load(&root, cli.config.as_deref())
        .map_err(|e| ConfigError(e.to_string()))?;
    jxref::logging::init_with_config(&config.logging);

    let db_path = cli.db.clone().unwrap_or_else(|| config.database_path(&root));

    match cli.command {
        Command::Index {
            threads,
            changed_only,
            include,
            exclude,
            ..
        } => index_cmd::run_index(
            &config,
            &root,
            db_path,
            IndexArgs {
                threads,
                changed_only,
                include,
                exclude,
            },
            output_format,
            exec_id,
        ),
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Command::Status => {
            let graph = open_existing(&db_path)?;
            status_cmd::run_status(&graph, output_format, exec_id)
        }
        Command::At { file, line, column } => {
            let engine = QueryEngine::new(open_existing(&db_path)?);
            let key = store_key(&root, &file);
            query_cmd::run_at(&engine, &key, line, column, output_format, exec_id)
        }
        Command::Show { id } => {
            let engine = QueryEngine::new(open_existing(&db_path)?);
            query_cmd::run_show(&engine, id, output_format, exec_id)
        }
        Command::Kinds { id } => {
            let engine = QueryEngine::new(open_existing(&db_path)?);
            query_cmd::run_kinds(&engine, id, output_format, exec_id)
        }
        Command::Refs {
            id,
            kind,
            tags,
            count,
        } => {
            let engine = QueryEngine::new(open_existing(&db_path)?);
            refs_cmd::run_refs(&engine, id, &kind, &tags, count, output_format, exec_id)
        }
        Command::FileRefs { file, kind, count } => {
            let engine = QueryEngine::new(open_existing(&db_path)?);
            let key = store_key(&root, &file);
            refs_cmd::run_file_refs(&engine, &key, &kind, count, output_format, exec_id)
        }
        Command::Doc { id } => {
            let engine = QueryEngine::new(open_existing(&db_path)?);
            query_cmd::run_doc(&engine, id, output_format, exec_id)
        }
    }
}

/// Open a store for querying; a missing file is not silently created
fn open_existing(db_path: &Path) -> Result<SqliteGraph> {
    if !db_path.exists() {
        anyhow::bail!(
            "no index at {} (run `jxref index` first)",
            db_path.display()
        );
    }
    Ok(SqliteGraph::open(db_path)?)
}

/// Store key for a user-supplied file argument
fn store_key(root: &Path, file: &str) -> String {
    let path = PathBuf::from(file);
    let canonical_root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let absolute = if path.is_absolute() {
        std::fs::canonicalize(&path).unwrap_or(path)
    } else {
        path
    };
    jxref::common::relative_path(&canonical_root, &absolute)
}

fn error_code(error: &anyhow::Error) -> &'static str {
    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<QueryError>() {
            return e.code();
        }
        if let Some(e) = cause.downcast_ref::<IndexError>() {
            return e.code();
        }
        if let Some(e) = cause.downcast_ref::<StoreError>() {
            return e.code();
        }
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            return e.code();
        }
    }
    JXR_GEN_001_OTHER
}

fn report_error(error: &anyhow::Error, output_format: OutputFormat, exec_id: &str) {
    let code = error_code(error);
    match output_format {
        OutputFormat::Json => {
            let response = ErrorResponse {
                code: code.to_string(),
                message: format!("{:#}", error),
            };
            if output_json(&JsonResponse::new(response, exec_id)).is_err() {
                eprintln!("error[{}]: {:#}", code, error);
            }
        }
        OutputFormat::Human => eprintln!("error[{}]: {:#}", code, error),
    }
}
