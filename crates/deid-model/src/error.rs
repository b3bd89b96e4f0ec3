use thiserror::Error;

use crate::ColumnKey;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid column key '{0}' (expected col1, col2, ...)")]
    InvalidColumnKey(String),
    #[error("row {row} references column {key} which is not in the dataset columns")]
    UnknownColumn { row: usize, key: ColumnKey },
}

pub type Result<T> = std::result::Result<T, ModelError>;
