//! End-to-end runs of the subcommands against files on disk.

use std::path::{Path, PathBuf};

use clap::Parser;
use deid_cli::cli::{Cli, Command, HashArgs, OutputFormatArg, SheetArgs};
use deid_cli::commands::{run_columns, run_hash, run_preview};
use deid_cli::config::Config;
use deid_core::sha1_hex;
use deid_model::{CellValue, ColumnKey};
use deid_output::OutputFormat;
use tempfile::TempDir;

const JANE: &str = "15dd2af950742e9e02f3973d4894beb5042cf126";

fn write_workbook(path: &Path) {
    let mut book = rust_xlsxwriter::Workbook::new();
    let sheet = book.add_worksheet();
    sheet.set_name("Participants").unwrap();
    for (col, label) in ["ID", "Name", "DOB"].iter().enumerate() {
        sheet.write_string(0, col as u16, *label).unwrap();
    }
    sheet.write_string(1, 0, "P1").unwrap();
    sheet.write_string(1, 1, "Jane").unwrap();
    sheet.write_string(1, 2, "2000-01-01").unwrap();
    sheet.write_number(2, 0, 2.0).unwrap();
    sheet.write_string(2, 1, "John").unwrap();
    book.save(path).unwrap();
}

fn sheet_args(file: &Path) -> SheetArgs {
    SheetArgs {
        file: file.to_path_buf(),
        sheet: None,
        header_row: None,
    }
}

fn hash_args(file: &Path, output: PathBuf) -> HashArgs {
    HashArgs {
        sheet: sheet_args(file),
        select: vec!["Name".into(), "col3".into()],
        id: None,
        output: Some(output),
        format: None,
        separator: None,
        dry_run: false,
        preview: 5,
    }
}

fn key(name: &str) -> ColumnKey {
    name.parse().unwrap()
}

#[test]
fn hash_writes_csv_output() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("participants.xlsx");
    write_workbook(&input);
    let output = dir.path().join("hashed.csv");

    let outcome = run_hash(&hash_args(&input, output.clone()), &Config::default()).unwrap();

    assert!(outcome.written);
    assert_eq!(outcome.format, OutputFormat::Csv);
    assert_eq!(outcome.sheet_name, "Participants");
    assert_eq!(outcome.identifier.label, "ID");
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].participant_id, Some(CellValue::text("P1")));
    assert_eq!(outcome.records[0].digest, JANE);

    let contents = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "Participant ID,Hash");
    assert_eq!(lines[1], format!("P1,{JANE}"));
    assert!(lines[2].starts_with("2,"));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("participants.xlsx");
    write_workbook(&input);
    let output = dir.path().join("hashed.xlsx");
    let mut args = hash_args(&input, output.clone());
    args.dry_run = true;

    let outcome = run_hash(&args, &Config::default()).unwrap();

    assert!(!outcome.written);
    assert_eq!(outcome.records.len(), 2);
    assert!(!output.exists());
}

#[test]
fn config_supplies_selection_and_separator() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("participants.xlsx");
    write_workbook(&input);
    let config_path = dir.path().join("deid.toml");
    std::fs::write(
        &config_path,
        "[input]\nsheet = \"Participants\"\n\n\
         [hash]\nidentifier = \"Name\"\ncolumns = [\"ID\"]\nseparator = \"|\"\n\n\
         [output]\nformat = \"json\"\n",
    )
    .unwrap();
    let config = Config::load(&config_path).unwrap();

    let mut args = hash_args(&input, dir.path().join("out.dat"));
    args.select.clear();
    let outcome = run_hash(&args, &config).unwrap();

    assert_eq!(outcome.format, OutputFormat::Json);
    assert_eq!(outcome.separator.as_deref(), Some("|"));
    assert_eq!(outcome.identifier.key, key("col2"));
    assert_eq!(outcome.selected.len(), 1);
    assert_eq!(outcome.records[0].participant_id, Some(CellValue::text("Jane")));
    // A single selected value, so the separator never appears.
    assert_eq!(outcome.records[0].digest, sha1_hex("P1"));
    assert!(dir.path().join("out.dat").exists());
}

#[test]
fn unknown_sheet_lists_available_sheets() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("participants.xlsx");
    write_workbook(&input);
    let mut args = sheet_args(&input);
    args.sheet = Some("Missing".into());

    let err = run_preview(&args, &Config::default()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("Missing"));
    assert!(message.contains("Participants"));
}

#[test]
fn header_row_out_of_range_is_reported() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("participants.xlsx");
    write_workbook(&input);
    let mut args = sheet_args(&input);
    args.header_row = Some(9);

    assert!(run_columns(&args, &Config::default()).is_err());
}

#[test]
fn unknown_column_is_rejected_before_writing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("participants.xlsx");
    write_workbook(&input);
    let output = dir.path().join("hashed.xlsx");
    let mut args = hash_args(&input, output.clone());
    args.select = vec!["Email".into()];

    let err = run_hash(&args, &Config::default()).unwrap_err();
    assert!(err.to_string().contains("Email"));
    assert!(!output.exists());
}

#[test]
fn columns_reflect_config_selection() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("participants.xlsx");
    write_workbook(&input);
    let config: Config = toml::from_str("[hash]\ncolumns = [\"DOB\"]\n").unwrap();

    let session = run_columns(&sheet_args(&input), &config).unwrap();
    let selection = session.selection().unwrap();
    assert!(selection.is_selected(key("col3")));
    assert_eq!(selection.identifier_column(), key("col1"));
}

#[test]
fn command_line_parses() {
    let cli = Cli::try_parse_from([
        "deid",
        "-v",
        "hash",
        "data.xlsx",
        "--sheet",
        "Participants",
        "--header-row",
        "2",
        "-s",
        "Name",
        "--select",
        "col3",
        "--id",
        "col1",
        "--format",
        "csv",
        "--dry-run",
    ])
    .unwrap();

    let Command::Hash(args) = cli.command else {
        panic!("expected hash command");
    };
    assert_eq!(args.sheet.file, PathBuf::from("data.xlsx"));
    assert_eq!(args.sheet.sheet.as_deref(), Some("Participants"));
    assert_eq!(args.sheet.header_row, Some(2));
    assert_eq!(args.select, vec!["Name", "col3"]);
    assert_eq!(args.id.as_deref(), Some("col1"));
    assert!(matches!(args.format, Some(OutputFormatArg::Csv)));
    assert!(args.dry_run);
    assert_eq!(args.preview, 5);
}
