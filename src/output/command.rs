//! JSON output types for CLI commands
//!
//! Every JSON response is wrapped in a [`JsonResponse`] envelope carrying
//! the schema version and an execution id. Positions inside payloads use
//! the store conventions: 1-indexed lines, 0-indexed byte columns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::graph::{GraphStats, Occurrence};
use crate::query::ReferenceSummary;

/// JSON schema version for jxref command responses
pub const JXREF_JSON_SCHEMA_VERSION: &str = "1.0.0";

/// Wrapper for all JSON responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse<T> {
    pub schema_version: String,
    pub execution_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    /// RFC 3339, seconds precision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub data: T,
    /// Whether the response is partial (e.g. a failed file during indexing)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<bool>,
}

impl<T> JsonResponse<T> {
    pub fn new(data: T, execution_id: &str) -> Self {
        JsonResponse {
            schema_version: JXREF_JSON_SCHEMA_VERSION.to_string(),
            execution_id: execution_id.to_string(),
            tool: Some("jxref".to_string()),
            timestamp: Some(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
            data,
            partial: None,
        }
    }

    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = Some(partial);
        self
    }
}

/// Response for errors in JSON mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable `JXR-*` code
    pub code: String,
    pub message: String,
}

/// `status`: store contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub stats: GraphStats,
    pub indexed: usize,
    /// Files whose last write failed
    pub needs_reindex: Vec<String>,
}

/// `at` and `show`: one occurrence, optionally with its properties
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccurrenceResponse {
    pub occurrence: Occurrence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, String>>,
}

/// One supported reference kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindEntry {
    pub label: String,
    pub tag: String,
}

/// `kinds`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KindsResponse {
    pub id: i64,
    pub kinds: Vec<KindEntry>,
}

/// `refs` and `file-refs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefsResponse {
    /// Occurrence id or file path the request was scoped to
    pub target: String,
    pub kind: String,
    pub count: usize,
    /// Absent for `--count` requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<ReferenceSummary>>,
}

/// `doc`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocResponse {
    pub id: i64,
    pub documentation: String,
}

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Execution id for one run: hex seconds and pid
pub fn generate_execution_id() -> String {
    let timestamp = chrono::Utc::now().timestamp();
    format!("{:x}-{:x}", timestamp, std::process::id())
}

/// Print pretty JSON to stdout
pub fn output_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{}", json);
    Ok(())
}
