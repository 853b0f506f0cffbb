//! Error types for runtime resolution.

use std::path::PathBuf;

/// Failures raised by a [`TerminologyStore`](crate::store::TerminologyStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("terminology store unavailable: {message}")]
    Unavailable { message: String },

    #[error("failed to read store import {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed store record {path}: {source}")]
    Record {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolution errors.
///
/// Only [`ResolveError::BadInput`] leaves the engine; the other variants are
/// raised inside a tier and downgraded to a miss.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("bad input: {message}")]
    BadInput { message: String },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("failed to parse fallback document {path}: {source}")]
    ParseFailure {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read fallback document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    StoreFault(#[from] StoreError),
}

impl ResolveError {
    pub fn bad_input(message: impl Into<String>) -> Self {
        Self::BadInput {
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
