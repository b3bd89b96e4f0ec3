//! Excel workbook output.

use std::path::Path;

use deid_model::{CellValue, HashedRecord};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use crate::error::{OutputError, Result};
use crate::{HASH_HEADER, PARTICIPANT_ID_HEADER, SHEET_NAME};

/// Width of the hash column, wide enough for 40 hex characters.
const HASH_COLUMN_WIDTH: f64 = 44.0;

/// Writes records to an xlsx file with a single "Hashed Data" sheet.
pub fn write_xlsx(records: &[HashedRecord], path: &Path) -> Result<()> {
    let mut workbook = build_workbook(records).map_err(|e| xlsx_error(path, &e))?;
    workbook.save(path).map_err(|e| xlsx_error(path, &e))
}

/// Renders the xlsx file into memory, e.g. for a download response.
pub fn xlsx_bytes(records: &[HashedRecord]) -> Result<Vec<u8>> {
    let path = Path::new("<memory>");
    let mut workbook = build_workbook(records).map_err(|e| xlsx_error(path, &e))?;
    workbook.save_to_buffer().map_err(|e| xlsx_error(path, &e))
}

fn build_workbook(records: &[HashedRecord]) -> std::result::Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    worksheet.write_string(0, 0, PARTICIPANT_ID_HEADER)?;
    worksheet.write_string(0, 1, HASH_HEADER)?;
    worksheet.set_column_width(1, HASH_COLUMN_WIDTH)?;

    for (idx, record) in records.iter().enumerate() {
        let row = u32::try_from(idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        if let Some(value) = &record.participant_id {
            write_cell(worksheet, row, value)?;
        }
        worksheet.write_string(row, 1, &record.digest)?;
    }
    Ok(workbook)
}

/// Participant IDs keep their original cell type.
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    value: &CellValue,
) -> std::result::Result<(), XlsxError> {
    match value {
        CellValue::Text(text) => worksheet.write_string(row, 0, text)?,
        CellValue::Number(number) => worksheet.write_number(row, 0, *number)?,
        CellValue::Bool(flag) => worksheet.write_boolean(row, 0, *flag)?,
    };
    Ok(())
}

fn xlsx_error(path: &Path, error: &XlsxError) -> OutputError {
    OutputError::Xlsx {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}
