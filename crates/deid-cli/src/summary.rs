use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use deid_core::{Selection, Session};
use deid_ingest::Workbook;
use deid_model::{Column, Dataset, HashedRecord};

use crate::commands::HashOutcome;
use crate::logging::REDACTED_VALUE;

pub fn print_sheets(workbook: &Workbook) {
    println!("Workbook: {}", workbook.name);
    println!("{}", sheets_table(workbook));
}

pub fn print_columns(session: &Session) {
    if let Some(dataset) = session.dataset() {
        print_sheet_header(session, dataset);
        println!("{}", columns_table(dataset, session.selection()));
    }
}

pub fn print_preview(session: &Session, limit: usize, show_data: bool) {
    if let Some(dataset) = session.dataset() {
        print_sheet_header(session, dataset);
        println!("{}", preview_table(dataset, limit, show_data));
        if !show_data {
            println!("Values redacted; pass --show-data to display them.");
        }
    }
}

pub fn print_hash_summary(outcome: &HashOutcome, preview: usize) {
    println!(
        "Sheet: {} (header row {})",
        outcome.sheet_name, outcome.header_row
    );
    println!("Identifier: {}", column_name(&outcome.identifier));
    let selected: Vec<String> = outcome.selected.iter().map(column_name).collect();
    if selected.is_empty() {
        println!("Hashed columns: none");
    } else {
        println!("Hashed columns: {}", selected.join(", "));
    }
    if let Some(separator) = &outcome.separator {
        println!("Separator: {separator:?}");
    }
    if outcome.written {
        println!(
            "Output: {} ({}, {} rows)",
            outcome.output.display(),
            outcome.format,
            outcome.records.len()
        );
    } else {
        println!("Dry run: {} rows hashed, nothing written", outcome.records.len());
    }
    if preview > 0 && !outcome.records.is_empty() {
        println!("{}", hashed_table(&outcome.records, preview));
    }
}

fn print_sheet_header(session: &Session, dataset: &Dataset) {
    println!(
        "Sheet: {} (header row {}, {} rows, {} columns)",
        session.sheet_name().unwrap_or_default(),
        session.header_row().unwrap_or_default(),
        dataset.row_count(),
        dataset.column_count()
    );
}

pub fn sheets_table(workbook: &Workbook) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Sheet", "Rows", "Columns"]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    for (idx, sheet) in workbook.sheets.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&sheet.name),
            Cell::new(sheet.row_count()),
            Cell::new(sheet.width()),
        ]);
    }
    table
}

pub fn columns_table(dataset: &Dataset, selection: Option<&Selection>) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Key", "Label", "Role"]);
    apply_table_style(&mut table);
    for column in dataset.columns() {
        let role = selection.map(|s| column_role(s, column)).unwrap_or_default();
        table.add_row(vec![
            Cell::new(column.key),
            Cell::new(&column.label),
            Cell::new(role),
        ]);
    }
    table
}

/// First `limit` data rows; non-empty cells are masked unless `show_data`.
pub fn preview_table(dataset: &Dataset, limit: usize, show_data: bool) -> Table {
    let mut table = Table::new();
    table.set_header(dataset.columns().iter().map(column_header));
    apply_table_style(&mut table);
    for row in dataset.rows().iter().take(limit) {
        let cells = dataset.columns().iter().map(|column| {
            match row.get(column.key) {
                Some(value) if show_data => Cell::new(value.render()),
                Some(_) => dim_cell(REDACTED_VALUE),
                None => Cell::new(""),
            }
        });
        table.add_row(cells);
    }
    if dataset.row_count() > limit {
        table.add_row(vec![dim_cell(format!(
            "... {} more rows",
            dataset.row_count() - limit
        ))]);
    }
    table
}

pub fn hashed_table(records: &[HashedRecord], limit: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Participant ID"), header_cell("Hash")]);
    apply_summary_table_style(&mut table);
    for record in records.iter().take(limit) {
        let id = match &record.participant_id {
            Some(value) => Cell::new(value.render()),
            None => dim_cell("-"),
        };
        table.add_row(vec![id, Cell::new(&record.digest)]);
    }
    if records.len() > limit {
        table.add_row(vec![
            dim_cell(format!("... {} more", records.len() - limit)),
            dim_cell(""),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn column_role(selection: &Selection, column: &Column) -> &'static str {
    let identifier = selection.identifier_column() == column.key;
    match (identifier, selection.is_selected(column.key)) {
        (true, true) => "identifier, hashed",
        (true, false) => "identifier",
        (false, true) => "hashed",
        (false, false) => "",
    }
}

/// `Label (colN)`, or just the key for unlabeled columns.
fn column_name(column: &Column) -> String {
    if column.label.is_empty() {
        column.key.to_string()
    } else {
        format!("{} ({})", column.label, column.key)
    }
}

fn column_header(column: &Column) -> String {
    if column.label.is_empty() {
        column.key.to_string()
    } else {
        column.label.clone()
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
