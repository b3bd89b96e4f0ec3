//! Workbook loading from disk or from an in-memory upload.

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use calamine::{Data, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use deid_model::CellValue;
use tracing::{debug, info};

use crate::csv_table::read_csv_sheet;
use crate::error::{IngestError, Result};

/// Maximum workbook size accepted for loading (500 MB).
pub const MAX_WORKBOOK_FILE_SIZE: u64 = 500 * 1024 * 1024;

/// One worksheet as a raw grid of cells.
///
/// Rows are relative to the sheet's used range; `None` marks an empty cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Option<CellValue>>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Option<CellValue>>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row in the grid.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// A parsed workbook with every sheet loaded eagerly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    /// File name the workbook was loaded from.
    pub name: String,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(name: impl Into<String>, sheets: Vec<Sheet>) -> Self {
        Self {
            name: name.into(),
            sheets,
        }
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }

    /// Looks up a sheet by exact name.
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }
}

/// Input container kinds, chosen from the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    /// Comma-separated text, loaded as a single sheet.
    Csv,
    /// Any spreadsheet container calamine can sniff (xlsx, xlsm, xlsb, xls, ods).
    Spreadsheet,
}

impl WorkbookFormat {
    pub fn from_file_name(name: &str) -> Self {
        let is_csv = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv { Self::Csv } else { Self::Spreadsheet }
    }
}

/// Check file size against the default limit.
pub fn check_file_size(path: &Path) -> Result<()> {
    check_file_size_with_limit(path, MAX_WORKBOOK_FILE_SIZE)
}

/// Check file size against a custom limit.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| IngestError::file_open(path, e))?;
    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }
    Ok(())
}

/// Loads every sheet of a workbook file.
///
/// `.csv` files become a single sheet named after the file stem.
pub fn load_workbook(path: &Path) -> Result<Workbook> {
    check_file_size(path)?;
    let name = file_label(path);
    let workbook = match WorkbookFormat::from_file_name(&name) {
        WorkbookFormat::Csv => {
            let file = File::open(path).map_err(|e| IngestError::file_open(path, e))?;
            let sheet = read_csv_sheet(&name, BufReader::new(file))?;
            Workbook::new(name, vec![sheet])
        }
        WorkbookFormat::Spreadsheet => {
            let sheets = open_workbook_auto(path).map_err(|e| parse_error(&name, &e))?;
            collect_sheets(&name, sheets)?
        }
    };
    info!(
        file = %path.display(),
        sheets = workbook.sheets.len(),
        "loaded workbook"
    );
    Ok(workbook)
}

/// Parses a workbook from raw bytes, e.g. a dropped or uploaded file.
pub fn read_workbook_bytes(name: &str, bytes: Vec<u8>) -> Result<Workbook> {
    match WorkbookFormat::from_file_name(name) {
        WorkbookFormat::Csv => {
            let sheet = read_csv_sheet(name, bytes.as_slice())?;
            Ok(Workbook::new(name, vec![sheet]))
        }
        WorkbookFormat::Spreadsheet => {
            let sheets =
                open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| parse_error(name, &e))?;
            collect_sheets(name, sheets)
        }
    }
}

fn collect_sheets<RS: Read + Seek>(name: &str, mut sheets: Sheets<RS>) -> Result<Workbook> {
    let mut loaded = Vec::new();
    for sheet_name in sheets.sheet_names() {
        let range = sheets
            .worksheet_range(&sheet_name)
            .map_err(|e| parse_error(name, &e))?;
        let rows: Vec<Vec<Option<CellValue>>> = range
            .rows()
            .map(|row| row.iter().map(cell_value).collect())
            .collect();
        debug!(sheet = %sheet_name, rows = rows.len(), "read worksheet");
        loaded.push(Sheet::new(sheet_name, rows));
    }
    Ok(Workbook::new(name, loaded))
}

/// Maps a calamine cell onto the loosely typed model.
///
/// Dates keep their serial number so hashes match the raw sheet contents.
pub fn cell_value(cell: &Data) -> Option<CellValue> {
    match cell {
        Data::Empty => None,
        Data::String(text) | Data::DateTimeIso(text) | Data::DurationIso(text) => {
            Some(CellValue::Text(text.clone()))
        }
        Data::Int(value) => Some(CellValue::Number(*value as f64)),
        Data::Float(value) => Some(CellValue::Number(*value)),
        Data::DateTime(value) => Some(CellValue::Number(value.as_f64())),
        Data::Bool(flag) => Some(CellValue::Bool(*flag)),
        Data::Error(error) => Some(CellValue::Text(error.to_string())),
    }
}

fn parse_error(name: &str, error: &impl std::fmt::Display) -> IngestError {
    IngestError::WorkbookParse {
        file: name.to_string(),
        message: error.to_string(),
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
