//! CSV output.

use std::path::Path;

use deid_model::HashedRecord;

use crate::error::{OutputError, Result};
use crate::{HASH_HEADER, PARTICIPANT_ID_HEADER};

/// Writes a header row and one row per record. Absent IDs are empty fields.
pub fn write_csv(records: &[HashedRecord], path: &Path) -> Result<()> {
    let csv_error = |e: csv::Error| OutputError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer
        .write_record([PARTICIPANT_ID_HEADER, HASH_HEADER])
        .map_err(csv_error)?;
    for record in records {
        writer
            .write_record([record.participant_label().as_str(), record.digest.as_str()])
            .map_err(csv_error)?;
    }
    writer.flush().map_err(|e| OutputError::io(path, e))
}
