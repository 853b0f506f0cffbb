//! Error types for materialization runs.

use std::path::PathBuf;

use namaste_standards::StandardsError;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// A required input dataset could not be read or parsed.
    #[error(transparent)]
    Input(#[from] StandardsError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to serialize ConceptMap {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid synonym table {path}: {message}")]
    Synonyms { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, MapError>;
