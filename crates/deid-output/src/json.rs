//! JSON output: an array of `{"Participant ID": ..., "Hash": ...}` objects.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use deid_model::{CellValue, HashedRecord};
use serde::{Serialize, Serializer};

use crate::error::{OutputError, Result};

/// Largest magnitude below which every integral `f64` is exact.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Serialize)]
struct OutputRow<'a> {
    #[serde(rename = "Participant ID", serialize_with = "serialize_participant_id")]
    participant_id: Option<&'a CellValue>,
    #[serde(rename = "Hash")]
    hash: &'a str,
}

pub fn write_json(records: &[HashedRecord], path: &Path) -> Result<()> {
    let rows: Vec<OutputRow<'_>> = records
        .iter()
        .map(|record| OutputRow {
            participant_id: record.participant_id.as_ref(),
            hash: &record.digest,
        })
        .collect();
    let file = File::create(path).map_err(|e| OutputError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &rows).map_err(|e| OutputError::Json {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    writer.write_all(b"\n").map_err(|e| OutputError::io(path, e))?;
    writer.flush().map_err(|e| OutputError::io(path, e))
}

/// Integral numbers are written as JSON integers (`17`, not `17.0`) so the
/// JSON output agrees with the CSV and xlsx renderings.
fn serialize_participant_id<S: Serializer>(
    value: &Option<&CellValue>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(CellValue::Number(number))
            if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER =>
        {
            serializer.serialize_i64(*number as i64)
        }
        Some(other) => other.serialize(serializer),
        None => serializer.serialize_none(),
    }
}
