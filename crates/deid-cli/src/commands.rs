//! Subcommand implementations. Each returns data for `summary` to print.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info, info_span, trace, warn};

use deid_core::{DigestOptions, Selection, Session};
use deid_ingest::{Workbook, load_workbook};
use deid_model::{Column, ColumnKey, Dataset, HashedRecord};
use deid_output::{DEFAULT_OUTPUT_FILE, OutputError, OutputFormat, write_records};

use crate::cli::{HashArgs, SheetArgs, SheetsArgs};
use crate::config::{Config, HashConfig, OutputConfig};
use crate::logging::redact_value;

/// Header row used when neither the command line nor the config names one.
pub const DEFAULT_HEADER_ROW: usize = 1;

/// Result of a `hash` run.
#[derive(Debug, Clone)]
pub struct HashOutcome {
    pub sheet_name: String,
    pub header_row: usize,
    pub identifier: Column,
    pub selected: Vec<Column>,
    pub separator: Option<String>,
    pub records: Vec<HashedRecord>,
    pub output: PathBuf,
    pub format: OutputFormat,
    /// False for dry runs.
    pub written: bool,
}

pub fn run_sheets(args: &SheetsArgs) -> Result<Workbook> {
    open_workbook(&args.file)
}

/// Loads the sheet and applies any selection named in the config.
pub fn run_columns(args: &SheetArgs, config: &Config) -> Result<Session> {
    let mut session = open_session(args, config)?;
    let selection = match session.dataset() {
        Some(dataset) => build_selection(dataset, &[], None, &config.hash)?,
        None => None,
    };
    if let Some(selection) = selection {
        session.set_selection(selection)?;
    }
    Ok(session)
}

pub fn run_preview(args: &SheetArgs, config: &Config) -> Result<Session> {
    open_session(args, config)
}

pub fn run_hash(args: &HashArgs, config: &Config) -> Result<HashOutcome> {
    let (output, format) = resolve_output(
        args.output.as_deref(),
        args.format.map(OutputFormat::from),
        &config.output,
    )?;
    let mut session = open_session(&args.sheet, config)?;
    let sheet_name = session.sheet_name().unwrap_or_default().to_string();
    let header_row = session.header_row().unwrap_or(DEFAULT_HEADER_ROW);
    let span = info_span!("hash", sheet = %sheet_name);
    let _guard = span.enter();

    let dataset = session
        .dataset()
        .ok_or_else(|| anyhow!("no sheet loaded"))?;
    let selection = build_selection(dataset, &args.select, args.id.as_deref(), &config.hash)?
        .ok_or_else(|| anyhow!("sheet '{sheet_name}' has no columns"))?;
    let identifier = column_for(dataset, selection.identifier_column())?;
    let selected = selection
        .selected_columns()
        .iter()
        .map(|key| column_for(dataset, *key))
        .collect::<Result<Vec<_>>>()?;
    if selected.is_empty() {
        warn!("no columns selected; every row hashes the empty string");
    }
    session.set_selection(selection)?;

    let separator = args
        .separator
        .clone()
        .or_else(|| config.hash.separator.clone());
    let options = DigestOptions {
        separator: separator.clone(),
    };
    let records = session.compute_hashes_with(&options)?.to_vec();
    for record in &records {
        let participant = record.participant_label();
        trace!(
            participant = redact_value(&participant),
            digest = %record.digest,
            "hashed row"
        );
    }

    if args.dry_run {
        info!(records = records.len(), "dry run, output not written");
    } else {
        write_records(&records, &output, format)
            .with_context(|| format!("write {}", output.display()))?;
    }

    Ok(HashOutcome {
        sheet_name,
        header_row,
        identifier,
        selected,
        separator,
        records,
        output,
        format,
        written: !args.dry_run,
    })
}

fn open_workbook(path: &Path) -> Result<Workbook> {
    load_workbook(path).with_context(|| format!("load {}", path.display()))
}

/// Opens the workbook and loads the requested (or first) sheet.
fn open_session(args: &SheetArgs, config: &Config) -> Result<Session> {
    let workbook = open_workbook(&args.file)?;
    let sheet_name = args
        .sheet
        .clone()
        .or_else(|| config.input.sheet.clone())
        .or_else(|| workbook.first_sheet().map(|sheet| sheet.name.clone()))
        .ok_or_else(|| anyhow!("{} contains no sheets", args.file.display()))?;
    let header_row = args
        .header_row
        .or(config.input.header_row)
        .unwrap_or(DEFAULT_HEADER_ROW);

    let mut session = Session::with_workbook(workbook);
    session
        .load_sheet(&sheet_name, header_row)
        .with_context(|| format!("load sheet '{sheet_name}'"))?;
    Ok(session)
}

/// Resolves a column by key (`col2`) or by exact header label.
///
/// A valid key always wins over a label that happens to look like one.
pub fn resolve_column(dataset: &Dataset, name: &str) -> Result<ColumnKey> {
    if let Ok(key) = ColumnKey::parse(name)
        && dataset.has_column(key)
    {
        return Ok(key);
    }
    let mut matches = dataset
        .columns()
        .iter()
        .filter(|column| column.label == name);
    match (matches.next(), matches.next()) {
        (Some(column), None) => Ok(column.key),
        (Some(_), Some(_)) => bail!("column label '{name}' is ambiguous; use its key instead"),
        (None, _) => bail!("unknown column '{name}'; run `deid columns` to list keys and labels"),
    }
}

/// Builds the selection from command-line names, falling back to the config.
///
/// Returns `None` for a sheet without columns.
pub fn build_selection(
    dataset: &Dataset,
    select: &[String],
    id: Option<&str>,
    config: &HashConfig,
) -> Result<Option<Selection>> {
    let Some(default) = Selection::for_columns(dataset.columns()) else {
        return Ok(None);
    };
    let names = if select.is_empty() {
        config.columns.as_slice()
    } else {
        select
    };
    let identifier = match id.or(config.identifier.as_deref()) {
        Some(name) => resolve_column(dataset, name)?,
        None => default.identifier_column(),
    };
    let selected = names
        .iter()
        .map(|name| resolve_column(dataset, name))
        .collect::<Result<Vec<_>>>()?;
    Ok(Some(Selection::new(identifier).with_selected(selected)))
}

/// Picks the output path and format.
///
/// Format precedence: `--format`, the `--output` extension, the config format,
/// then the config path extension. Without any path the default file name is
/// used with the chosen format's extension.
pub fn resolve_output(
    cli_output: Option<&Path>,
    cli_format: Option<OutputFormat>,
    config: &OutputConfig,
) -> Result<(PathBuf, OutputFormat)> {
    let format = cli_format
        .or_else(|| cli_output.and_then(OutputFormat::from_path))
        .or(config.format)
        .or_else(|| config.path.as_deref().and_then(OutputFormat::from_path));
    let path = cli_output
        .map(Path::to_path_buf)
        .or_else(|| config.path.clone());
    match (path, format) {
        (Some(path), Some(format)) => Ok((path, format)),
        (Some(path), None) => Err(OutputError::UnknownFormat { path }.into()),
        (None, format) => {
            let format = format.unwrap_or_default();
            let path = Path::new(DEFAULT_OUTPUT_FILE).with_extension(format.extension());
            Ok((path, format))
        }
    }
}

fn column_for(dataset: &Dataset, key: ColumnKey) -> Result<Column> {
    dataset
        .column(key)
        .cloned()
        .ok_or_else(|| anyhow!("unknown column {key}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let columns = vec![
            Column::at(0, "ID"),
            Column::at(1, "Name"),
            Column::at(2, "col1"),
            Column::at(3, "Dup"),
            Column::at(4, "Dup"),
        ];
        Dataset::new(columns, Vec::new()).unwrap()
    }

    fn key(name: &str) -> ColumnKey {
        name.parse().unwrap()
    }

    #[test]
    fn columns_resolve_by_key_or_label() {
        let dataset = dataset();
        assert_eq!(resolve_column(&dataset, "col2").unwrap(), key("col2"));
        assert_eq!(resolve_column(&dataset, "Name").unwrap(), key("col2"));
        assert_eq!(resolve_column(&dataset, "col1").unwrap(), key("col1"));
        assert!(resolve_column(&dataset, "Dup").is_err());
        assert!(resolve_column(&dataset, "col9").is_err());
        assert!(resolve_column(&dataset, "name").is_err());
    }

    #[test]
    fn cli_selection_overrides_config() {
        let dataset = dataset();
        let config = HashConfig {
            identifier: Some("Name".into()),
            columns: vec!["ID".into()],
            separator: None,
        };

        let from_config = build_selection(&dataset, &[], None, &config)
            .unwrap()
            .unwrap();
        assert_eq!(from_config.identifier_column(), key("col2"));
        assert!(from_config.is_selected(key("col1")));

        let select = vec!["col4".to_string()];
        let from_cli = build_selection(&dataset, &select, Some("col1"), &config)
            .unwrap()
            .unwrap();
        assert_eq!(from_cli.identifier_column(), key("col1"));
        assert!(from_cli.is_selected(key("col4")));
        assert!(!from_cli.is_selected(key("col1")));
    }

    #[test]
    fn identifier_defaults_to_first_column() {
        let selection = build_selection(&dataset(), &[], None, &HashConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(selection.identifier_column(), key("col1"));
        assert!(selection.selected_columns().is_empty());
    }

    #[test]
    fn no_columns_means_no_selection() {
        let empty = Dataset::new(Vec::new(), Vec::new()).unwrap();
        assert!(
            build_selection(&empty, &[], None, &HashConfig::default())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn output_defaults_follow_format() {
        let none = OutputConfig::default();
        let (path, format) = resolve_output(None, None, &none).unwrap();
        assert_eq!(path, PathBuf::from(DEFAULT_OUTPUT_FILE));
        assert_eq!(format, OutputFormat::Xlsx);

        let (path, format) = resolve_output(None, Some(OutputFormat::Csv), &none).unwrap();
        assert_eq!(path, PathBuf::from("hashed_data.csv"));
        assert_eq!(format, OutputFormat::Csv);
    }

    #[test]
    fn output_precedence() {
        let config = OutputConfig {
            path: Some(PathBuf::from("from_config.json")),
            format: Some(OutputFormat::Json),
        };

        let (path, format) = resolve_output(None, None, &config).unwrap();
        assert_eq!(path, PathBuf::from("from_config.json"));
        assert_eq!(format, OutputFormat::Json);

        let (path, format) = resolve_output(Some(Path::new("cli.csv")), None, &config).unwrap();
        assert_eq!(path, PathBuf::from("cli.csv"));
        assert_eq!(format, OutputFormat::Csv);

        let (_, format) = resolve_output(
            Some(Path::new("cli.csv")),
            Some(OutputFormat::Xlsx),
            &config,
        )
        .unwrap();
        assert_eq!(format, OutputFormat::Xlsx);
    }

    #[test]
    fn unknown_extension_without_format_is_an_error() {
        let err = resolve_output(Some(Path::new("out.txt")), None, &OutputConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("out.txt"));
    }
}
