//! Error types for workbook ingestion.

use std::path::PathBuf;
use thiserror::Error;

use deid_model::ModelError;

/// Errors that can occur while loading a workbook or a sheet.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Workbook file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exceeds the maximum allowed size.
    #[error("file too large: {path} ({size} bytes, max {max_size} bytes)")]
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    // === Parsing Errors ===
    /// The spreadsheet container could not be parsed.
    #[error("failed to parse workbook {file}: {message}")]
    WorkbookParse { file: String, message: String },

    /// CSV input could not be parsed.
    #[error("failed to parse CSV {file}: {message}")]
    CsvParse { file: String, message: String },

    // === Sheet Selection Errors ===
    /// Named sheet is absent from the workbook.
    #[error("sheet '{sheet}' not found in the loaded workbook (available: {available})")]
    SheetNotFound { sheet: String, available: String },

    /// Header row is zero or beyond the last row of the sheet.
    #[error("header row {requested} is out of range for sheet '{sheet}' ({row_count} rows)")]
    HeaderRowOutOfRange {
        sheet: String,
        requested: usize,
        row_count: usize,
    },

    /// Parsed rows violated the dataset invariants.
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl IngestError {
    pub(crate) fn file_open(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
