use std::path::PathBuf;

use thiserror::Error;

/// Failure to produce a dataset from the input file. Always fatal to the run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table: {0}")]
    Malformed(String),

    #[error("required column missing: {0}")]
    MissingColumn(&'static str),

    #[error("unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error("invalid delimiter: {0:?}")]
    InvalidDelimiter(String),
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Malformed(err.to_string())
    }
}

/// Application error type
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("chart error: {0}")]
    Chart(String),
}
