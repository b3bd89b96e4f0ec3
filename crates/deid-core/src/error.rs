use deid_ingest::IngestError;
use deid_model::ColumnKey;
use thiserror::Error;

/// Operator-facing session errors. None of them change session state.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no file loaded or invalid file")]
    NoDatasetLoaded,
    #[error("no sheet loaded; load a sheet before selecting columns or hashing")]
    NoSheetLoaded,
    #[error("sheet '{sheet}' has no columns; nothing to hash")]
    NoColumns { sheet: String },
    #[error("column {key} does not exist in the loaded sheet")]
    UnknownColumn { key: ColumnKey },
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

pub type Result<T> = std::result::Result<T, SessionError>;
