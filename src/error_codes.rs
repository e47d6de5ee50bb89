//! jxref error codes
//!
//! Error codes follow the pattern: JXR-{CATEGORY}-{3-digit number}
//!
//! Categories (2-3 uppercase letters):
//! - QRY: Query errors (unknown ids, positions, files, reference kinds)
//! - IDX: Indexing errors (persistence, source reads)
//! - DB: Store errors (SQLite failures, corrupt rows)
//! - CFG: Configuration errors
//! - GEN: Everything else
//!
//! Each error code is stable and should not be reused.

/// Occurrence id has no row
pub const JXR_QRY_001_NOT_FOUND: &str = "JXR-QRY-001";

/// Nothing overlaps the requested position
pub const JXR_QRY_002_INVALID_POSITION: &str = "JXR-QRY-002";

/// File has never been indexed
pub const JXR_QRY_003_FILE_NOT_INDEXED: &str = "JXR-QRY-003";

/// Reference kind tag is not known
pub const JXR_QRY_004_UNKNOWN_KIND: &str = "JXR-QRY-004";

/// Writing a file's rows failed; the file is marked needs_reindex
pub const JXR_IDX_001_PERSISTENCE: &str = "JXR-IDX-001";

/// Source file could not be read
pub const JXR_IDX_002_READ_FAILED: &str = "JXR-IDX-002";

/// Source file could not be parsed
pub const JXR_IDX_003_PARSE_FAILED: &str = "JXR-IDX-003";

/// SQLite call failed
pub const JXR_DB_001_SQLITE: &str = "JXR-DB-001";

/// Stored row holds a value that does not decode
pub const JXR_DB_002_CORRUPT: &str = "JXR-DB-002";

/// Store lock poisoned by a panicking thread
pub const JXR_DB_003_POISONED: &str = "JXR-DB-003";

/// Configuration could not be loaded
pub const JXR_CFG_001_INVALID_CONFIG: &str = "JXR-CFG-001";

/// Failure outside the other categories (missing index, I/O in the CLI)
pub const JXR_GEN_001_OTHER: &str = "JXR-GEN-001";

/// Error code documentation
///
/// # Query Errors (JXR-QRY-*)
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | JXR-QRY-001 | Occurrence not found | Look the id up again with `jxref at`; ids change on reindex |
/// | JXR-QRY-002 | Invalid position | Lines are 1-based, columns 0-based |
/// | JXR-QRY-003 | File not indexed | Run `jxref index` on the containing root |
/// | JXR-QRY-004 | Unknown reference kind | Use `jxref kinds <ID>` to list valid kinds |
///
/// # Indexing Errors (JXR-IDX-*)
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | JXR-IDX-001 | Persistence failed | Re-run `jxref index`; the file is retried |
/// | JXR-IDX-002 | Read failed | Check file permissions |
/// | JXR-IDX-003 | Parse failed | Check the file is Java source |
///
/// # Store Errors (JXR-DB-*)
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | JXR-DB-001 | SQLite failure | Check the database path is writable |
/// | JXR-DB-002 | Corrupt row | Delete the database and re-index |
/// | JXR-DB-003 | Poisoned lock | Restart the process |
///
/// # Configuration Errors (JXR-CFG-*)
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | JXR-CFG-001 | Invalid configuration | Check `jxref.toml` and `JXREF_*` variables |
///
/// # Other Errors (JXR-GEN-*)
///
/// | Code | Description | Remediation |
/// |------|-------------|-------------|
/// | JXR-GEN-001 | Other failure | Read the message; often `jxref index` has not run yet |
pub const ERROR_CODE_DOCUMENTATION: &str = "Error code documentation available in source";
