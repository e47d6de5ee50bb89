//! JSON output module for CLI commands

pub mod command;

pub use command::{
    generate_execution_id, output_json, DocResponse, ErrorResponse, JsonResponse, KindEntry,
    KindsResponse, OccurrenceResponse, OutputFormat, RefsResponse, StatusResponse,
};
