//! Error taxonomy for the store, the indexer and the query engine.

use std::path::PathBuf;
use thiserror::Error;

use crate::error_codes::*;

/// Failure inside the SQLite store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error("store lock poisoned")]
    Poisoned,
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Sqlite(_) => JXR_DB_001_SQLITE,
            StoreError::Corrupt(_) => JXR_DB_002_CORRUPT,
            StoreError::Poisoned => JXR_DB_003_POISONED,
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StoreError::Poisoned
    }
}

/// Failure answering a navigation request
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no occurrence with id {0}")]
    NotFound(i64),

    #[error("file not indexed: {0}")]
    FileNotFound(String),

    #[error("no occurrence at {path}:{line}:{column}")]
    InvalidPosition {
        path: String,
        line: usize,
        column: usize,
    },

    #[error("unknown reference kind '{0}'")]
    UnknownKind(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl QueryError {
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::NotFound(_) => JXR_QRY_001_NOT_FOUND,
            QueryError::InvalidPosition { .. } => JXR_QRY_002_INVALID_POSITION,
            QueryError::FileNotFound(_) => JXR_QRY_003_FILE_NOT_INDEXED,
            QueryError::UnknownKind(_) => JXR_QRY_004_UNKNOWN_KIND,
            QueryError::Store(e) => e.code(),
        }
    }
}

/// Per-file indexing failure; recorded in the index report
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to persist {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse { path: PathBuf },
}

impl IndexError {
    pub fn code(&self) -> &'static str {
        match self {
            IndexError::Persistence { .. } => JXR_IDX_001_PERSISTENCE,
            IndexError::Io { .. } => JXR_IDX_002_READ_FAILED,
            IndexError::Parse { .. } => JXR_IDX_003_PARSE_FAILED,
        }
    }
}

/// Configuration could not be loaded or parsed
#[derive(Debug, Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(pub String);

impl ConfigError {
    pub fn code(&self) -> &'static str {
        JXR_CFG_001_INVALID_CONFIG
    }
}
