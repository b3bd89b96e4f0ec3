//! Error types for output generation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write workbook {path}: {message}")]
    Xlsx { path: PathBuf, message: String },

    #[error("failed to write CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("failed to write JSON {path}: {message}")]
    Json { path: PathBuf, message: String },

    #[error("cannot infer output format from '{path}' (use .xlsx, .csv or .json)")]
    UnknownFormat { path: PathBuf },
}

impl OutputError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, OutputError>;
