//! CSV input read as a single-sheet workbook.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use deid_model::CellValue;

use crate::error::{IngestError, Result};
use crate::workbook::Sheet;

/// Reads CSV records into a sheet named after the file stem.
///
/// Every field is text. Empty fields are empty cells; values are not trimmed
/// so digests see exactly what the file holds. A leading UTF-8 BOM is dropped.
pub fn read_csv_sheet<R: Read>(file_name: &str, reader: R) -> Result<Sheet> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::CsvParse {
            file: file_name.to_string(),
            message: e.to_string(),
        })?;
        let first_record = rows.is_empty();
        let row: Vec<Option<CellValue>> = record
            .iter()
            .enumerate()
            .map(|(idx, field)| {
                let field = if first_record && idx == 0 {
                    field.trim_start_matches('\u{feff}')
                } else {
                    field
                };
                (!field.is_empty()).then(|| CellValue::text(field))
            })
            .collect();
        rows.push(row);
    }
    Ok(Sheet::new(sheet_name_for(file_name), rows))
}

fn sheet_name_for(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_named_after_stem() {
        let sheet = read_csv_sheet("participants.csv", "ID,Name\nP1,Jane\n".as_bytes()).unwrap();
        assert_eq!(sheet.name, "participants");
        assert_eq!(sheet.row_count(), 2);
    }

    #[test]
    fn test_empty_fields_are_empty_cells() {
        let sheet = read_csv_sheet("a.csv", "ID,Name,DOB\nP1,,2000-01-01\nP2\n".as_bytes()).unwrap();
        assert_eq!(
            sheet.rows[1],
            vec![
                Some(CellValue::text("P1")),
                None,
                Some(CellValue::text("2000-01-01"))
            ]
        );
        assert_eq!(sheet.rows[2], vec![Some(CellValue::text("P2"))]);
        assert_eq!(sheet.width(), 3);
    }

    #[test]
    fn test_bom_and_whitespace() {
        let sheet = read_csv_sheet("a.csv", "\u{feff}ID, Name \nP1, Jane \n".as_bytes()).unwrap();
        assert_eq!(sheet.rows[0][0], Some(CellValue::text("ID")));
        assert_eq!(sheet.rows[0][1], Some(CellValue::text(" Name ")));
        assert_eq!(sheet.rows[1][1], Some(CellValue::text(" Jane ")));
    }
}
