#![deny(unsafe_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CellValue, ColumnKey, ModelError};

/// Column metadata: a stable key plus a display label.
///
/// Labels may be empty or duplicated; the key is the column's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub key: ColumnKey,
    pub label: String,
}

impl Column {
    pub fn new(key: ColumnKey, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
        }
    }

    /// Column for a 0-based physical position.
    pub fn at(index: usize, label: impl Into<String>) -> Self {
        Self::new(ColumnKey::from_index(index), label)
    }
}

/// One data row, keyed by column.
///
/// Iteration is in column-position order. Empty cells have no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    cells: BTreeMap<ColumnKey, CellValue>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cell(mut self, key: ColumnKey, value: impl Into<CellValue>) -> Self {
        self.cells.insert(key, value.into());
        self
    }

    pub fn get(&self, key: ColumnKey) -> Option<&CellValue> {
        self.cells.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ColumnKey, &CellValue)> {
        self.cells.iter().map(|(key, value)| (*key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = ColumnKey> + '_ {
        self.cells.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(ColumnKey, CellValue)> for Row {
    fn from_iter<I: IntoIterator<Item = (ColumnKey, CellValue)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// Parsed tabular data: ordered columns plus ordered rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Builds a dataset, rejecting rows that reference keys outside `columns`.
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Result<Self, ModelError> {
        for (row_index, row) in rows.iter().enumerate() {
            if let Some(key) = row
                .keys()
                .find(|key| !columns.iter().any(|column| column.key == *key))
            {
                return Err(ModelError::UnknownColumn {
                    row: row_index,
                    key,
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column(&self, key: ColumnKey) -> Option<&Column> {
        self.columns.iter().find(|column| column.key == key)
    }

    pub fn has_column(&self, key: ColumnKey) -> bool {
        self.column(key).is_some()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
