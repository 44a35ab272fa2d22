use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiabetesError {
    #[error("failed to fetch {url}: {reason}")]
    RemoteFetch { url: String, reason: String },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("table {table} already exists with an incompatible schema: {details}")]
    SchemaConflict { table: String, details: String },

    #[error("csv data has no header row")]
    MissingHeader,

    #[error("failed to parse csv data: {0}")]
    Parse(#[from] csv::Error),

    #[error("failed to write to duckdb: {0}")]
    Database(#[from] duckdb::Error),

    #[error("failed to read from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: duckdb::Error,
    },
}

impl DiabetesError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DiabetesError::Io {
            path: path.into(),
            source,
        }
    }
}
