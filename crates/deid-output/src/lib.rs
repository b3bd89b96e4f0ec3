//! Output generation for hashed participant records.
//!
//! Every format carries exactly two columns, `Participant ID` and `Hash`,
//! one row per record in pipeline order.

use std::path::Path;

use deid_model::HashedRecord;
use tracing::info;

mod csv_output;
mod error;
mod format;
mod json;
mod xlsx;

pub use csv_output::write_csv;
pub use error::{OutputError, Result};
pub use format::OutputFormat;
pub use json::write_json;
pub use xlsx::{write_xlsx, xlsx_bytes};

/// Header of the identifier column.
pub const PARTICIPANT_ID_HEADER: &str = "Participant ID";

/// Header of the digest column.
pub const HASH_HEADER: &str = "Hash";

/// Worksheet name used for xlsx output.
pub const SHEET_NAME: &str = "Hashed Data";

/// Default output file name.
pub const DEFAULT_OUTPUT_FILE: &str = "hashed_data.xlsx";

/// Writes records in the given format.
pub fn write_records(records: &[HashedRecord], path: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Xlsx => write_xlsx(records, path)?,
        OutputFormat::Csv => write_csv(records, path)?,
        OutputFormat::Json => write_json(records, path)?,
    }
    info!(
        path = %path.display(),
        format = %format,
        records = records.len(),
        "wrote hashed output"
    );
    Ok(())
}

/// Writes records, inferring the format from the file extension.
pub fn write_records_auto(records: &[HashedRecord], path: &Path) -> Result<OutputFormat> {
    let format = OutputFormat::from_path(path).ok_or_else(|| OutputError::UnknownFormat {
        path: path.to_path_buf(),
    })?;
    write_records(records, path, format)?;
    Ok(format)
}
