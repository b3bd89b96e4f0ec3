//! CLI argument definitions for the de-identification tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use deid_output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "deid",
    version,
    about = "Replace identifying spreadsheet columns with a SHA-1 hash",
    long_about = "Pseudonymise participant spreadsheets.\n\n\
                  Pick the columns that identify a person and the column holding the\n\
                  participant ID; every row becomes the ID plus a SHA-1 digest of the\n\
                  selected values. Reads xlsx, xlsm, xls, ods and CSV files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values (participant data) to appear in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,

    /// TOML file supplying defaults for sheet, columns and output.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the sheets of a workbook.
    Sheets(SheetsArgs),

    /// Show the columns of a sheet and their keys.
    Columns(SheetArgs),

    /// Show the first rows of a sheet.
    Preview(PreviewArgs),

    /// Hash the selected columns and write the output file.
    Hash(HashArgs),
}

#[derive(Args)]
pub struct SheetsArgs {
    /// Workbook or CSV file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Input file plus the sheet to parse.
#[derive(Args, Clone)]
pub struct SheetArgs {
    /// Workbook or CSV file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Sheet to load (default: first sheet).
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheet: Option<String>,

    /// 1-based row holding the column labels (default: 1).
    #[arg(long = "header-row", value_name = "N")]
    pub header_row: Option<usize>,
}

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Number of data rows to show.
    #[arg(long = "limit", value_name = "N", default_value_t = 10)]
    pub limit: usize,

    /// Print cell values instead of redacting them.
    #[arg(long = "show-data")]
    pub show_data: bool,
}

#[derive(Args)]
pub struct HashArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Column to feed into the hash, by key (col2) or header label. Repeatable.
    #[arg(long = "select", short = 's', value_name = "COLUMN")]
    pub select: Vec<String>,

    /// Participant identifier column, by key or header label (default: first column).
    #[arg(long = "id", value_name = "COLUMN")]
    pub id: Option<String>,

    /// Output file (default: hashed_data.xlsx).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output format (default: inferred from the output extension).
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormatArg>,

    /// Insert this text between selected values before hashing.
    #[arg(long = "separator", value_name = "SEP")]
    pub separator: Option<String>,

    /// Compute hashes without writing the output file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Number of hashed rows to print.
    #[arg(long = "preview", value_name = "N", default_value_t = 5)]
    pub preview: usize,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Xlsx,
    Csv,
    Json,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Xlsx => Self::Xlsx,
            OutputFormatArg::Csv => Self::Csv,
            OutputFormatArg::Json => Self::Json,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
