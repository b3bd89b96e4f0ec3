//! Header-row parsing of one sheet into a [`Dataset`].

use deid_model::{CellValue, Column, ColumnKey, Dataset, Row};
use tracing::{info, warn};

use crate::error::{IngestError, Result};
use crate::workbook::{Sheet, Workbook};

/// Sheets wider than this are loaded but logged as a performance risk.
const WIDE_SHEET_COLUMNS: usize = 500;

/// Builds a dataset from a named sheet, using the given 1-based header row.
///
/// Rows above the header are ignored. Every physical column position up to
/// the widest row gets a `colN` key; header cells are stringified into labels
/// and empty header cells yield empty labels.
pub fn load_sheet(workbook: &Workbook, sheet_name: &str, header_row: usize) -> Result<Dataset> {
    let sheet = workbook
        .sheet(sheet_name)
        .ok_or_else(|| IngestError::SheetNotFound {
            sheet: sheet_name.to_string(),
            available: workbook.sheet_names().join(", "),
        })?;
    sheet_to_dataset(sheet, header_row)
}

/// Builds a dataset from an already selected sheet.
pub fn sheet_to_dataset(sheet: &Sheet, header_row: usize) -> Result<Dataset> {
    let row_count = sheet.row_count();
    if header_row == 0 || header_row > row_count {
        return Err(IngestError::HeaderRowOutOfRange {
            sheet: sheet.name.clone(),
            requested: header_row,
            row_count,
        });
    }

    let header_index = header_row - 1;
    let width = sheet.rows[header_index..]
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    if width > WIDE_SHEET_COLUMNS {
        warn!(
            sheet = %sheet.name,
            columns = width,
            "Sheet has more than 500 columns - may impact performance"
        );
    }

    let header = &sheet.rows[header_index];
    let columns: Vec<Column> = (0..width)
        .map(|idx| {
            let label = header
                .get(idx)
                .and_then(Option::as_ref)
                .map(CellValue::render)
                .unwrap_or_default();
            Column::at(idx, label)
        })
        .collect();

    let rows: Vec<Row> = sheet.rows[header_row..]
        .iter()
        .map(|cells| {
            cells
                .iter()
                .enumerate()
                .filter_map(|(idx, cell)| {
                    cell.as_ref()
                        .map(|value| (ColumnKey::from_index(idx), value.clone()))
                })
                .collect()
        })
        .collect();

    let dataset = Dataset::new(columns, rows)?;
    info!(
        sheet = %sheet.name,
        header_row,
        columns = dataset.column_count(),
        rows = dataset.row_count(),
        "loaded sheet"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Option<CellValue> {
        Some(CellValue::text(value))
    }

    fn workbook() -> Workbook {
        Workbook::new(
            "study.xlsx",
            vec![
                Sheet::new(
                    "Participants",
                    vec![
                        vec![text("Exported 2024"), None, None],
                        vec![text("ID"), text("Name"), Some(CellValue::number(1999.0))],
                        vec![text("P1"), text("Jane"), text("x")],
                        vec![text("P2")],
                        vec![],
                    ],
                ),
                Sheet::new("Empty", Vec::new()),
            ],
        )
    }

    #[test]
    fn test_header_row_builds_columns() {
        let dataset = load_sheet(&workbook(), "Participants", 2).unwrap();
        let labels: Vec<&str> = dataset.columns().iter().map(|c| c.label.as_str()).collect();
        let keys: Vec<String> = dataset.columns().iter().map(|c| c.key.to_string()).collect();
        assert_eq!(labels, vec!["ID", "Name", "1999"]);
        assert_eq!(keys, vec!["col1", "col2", "col3"]);
        assert_eq!(dataset.row_count(), 3);
    }

    #[test]
    fn test_short_and_blank_rows_are_kept() {
        let dataset = load_sheet(&workbook(), "Participants", 2).unwrap();
        assert_eq!(dataset.rows()[1].len(), 1);
        assert!(dataset.rows()[2].is_empty());
    }

    #[test]
    fn test_empty_header_cells_get_empty_labels() {
        let dataset = load_sheet(&workbook(), "Participants", 1).unwrap();
        let labels: Vec<&str> = dataset.columns().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Exported 2024", "", ""]);
        assert_eq!(dataset.row_count(), 4);
    }

    #[test]
    fn test_last_row_as_header_gives_no_rows() {
        let dataset = load_sheet(&workbook(), "Participants", 5).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_sheet_not_found() {
        let err = load_sheet(&workbook(), "participants", 1).unwrap_err();
        match err {
            IngestError::SheetNotFound { sheet, available } => {
                assert_eq!(sheet, "participants");
                assert_eq!(available, "Participants, Empty");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_header_row_out_of_range() {
        for requested in [0, 6] {
            let err = load_sheet(&workbook(), "Participants", requested).unwrap_err();
            assert!(matches!(
                err,
                IngestError::HeaderRowOutOfRange { requested: r, row_count: 5, .. } if r == requested
            ));
        }
        let err = load_sheet(&workbook(), "Empty", 1).unwrap_err();
        assert!(matches!(err, IngestError::HeaderRowOutOfRange { row_count: 0, .. }));
    }
}
