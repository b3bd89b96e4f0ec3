//! Workbook ingestion for participant de-identification.
//!
//! This crate loads spreadsheet files into an in-memory [`Workbook`] and turns
//! one sheet, read from an operator-chosen header row, into a [`Dataset`].
//!
//! # Features
//!
//! - **Workbook Loading**: xlsx, xlsm, xlsb, xls and ods through calamine
//! - **CSV Loading**: a `.csv` file becomes a single sheet named after its stem
//! - **Upload Support**: parse workbooks straight from in-memory bytes
//! - **Header Rows**: 1-based header row selection with range validation
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use deid_ingest::{load_sheet, load_workbook};
//!
//! let workbook = load_workbook(Path::new("participants.xlsx"))?;
//! println!("sheets: {:?}", workbook.sheet_names());
//!
//! let dataset = load_sheet(&workbook, "Sheet1", 1)?;
//! println!("{} rows", dataset.row_count());
//! ```
//!
//! [`Dataset`]: deid_model::Dataset

mod csv_table;
mod error;
mod sheet;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Workbook Loading ===
pub use workbook::{
    MAX_WORKBOOK_FILE_SIZE, Sheet, Workbook, WorkbookFormat, cell_value, check_file_size,
    check_file_size_with_limit, load_workbook, read_workbook_bytes,
};

// === CSV Reading ===
pub use csv_table::read_csv_sheet;

// === Sheet Parsing ===
pub use sheet::{load_sheet, sheet_to_dataset};
