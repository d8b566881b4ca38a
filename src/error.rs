use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the smelt pipeline
#[derive(Debug, Error)]
pub enum SmeltError {
    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    TableWrite(#[from] TableWriteError),
}

/// A single table that could not be written; other tables are unaffected
#[derive(Debug, Error)]
#[error("failed to write table {table} to {path}: {source}")]
pub struct TableWriteError {
    pub table: String,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

pub type Result<T> = std::result::Result<T, SmeltError>;
