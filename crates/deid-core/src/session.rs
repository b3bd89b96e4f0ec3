//! Session context: the loaded workbook, the active sheet, the operator's
//! column selection and the latest hashed output, held in one place.
//!
//! Loading a new workbook discards everything derived from the previous one.
//! Failed operations leave the session exactly as it was.

use deid_ingest::{Workbook, load_sheet};
use deid_model::{ColumnKey, Dataset, HashedRecord};
use tracing::info;

use crate::error::{Result, SessionError};
use crate::pipeline::{DigestOptions, compute_digests_with};
use crate::selection::Selection;

/// Sheet-level state that only exists once a sheet has been loaded.
#[derive(Debug, Clone)]
struct LoadedSheet {
    sheet_name: String,
    header_row: usize,
    dataset: Dataset,
    selection: Option<Selection>,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    workbook: Option<Workbook>,
    sheet: Option<LoadedSheet>,
    hashed: Vec<HashedRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workbook(workbook: Workbook) -> Self {
        let mut session = Self::new();
        session.replace_workbook(workbook);
        session
    }

    /// Installs a freshly loaded workbook, clearing sheet, selection and output.
    pub fn replace_workbook(&mut self, workbook: Workbook) {
        info!(file = %workbook.name, sheets = workbook.sheets.len(), "workbook replaced");
        self.workbook = Some(workbook);
        self.sheet = None;
        self.hashed.clear();
    }

    /// Parses `sheet_name` from the loaded workbook using a 1-based header row.
    ///
    /// On success the selection resets to its defaults and prior output is dropped.
    pub fn load_sheet(&mut self, sheet_name: &str, header_row: usize) -> Result<&Dataset> {
        let workbook = self.workbook.as_ref().ok_or(SessionError::NoDatasetLoaded)?;
        let dataset = load_sheet(workbook, sheet_name, header_row)?;
        let selection = Selection::for_columns(dataset.columns());
        self.hashed.clear();
        let loaded = self.sheet.insert(LoadedSheet {
            sheet_name: sheet_name.to_string(),
            header_row,
            dataset,
            selection,
        });
        Ok(&loaded.dataset)
    }

    /// Flips whether `key` feeds the digest. Unknown keys are rejected.
    pub fn toggle_column(&mut self, key: ColumnKey) -> Result<&Selection> {
        self.update_selection(key, |selection| selection.toggle_column(key))
    }

    /// Makes `key` the participant identifier column. Unknown keys are rejected.
    pub fn set_identifier_column(&mut self, key: ColumnKey) -> Result<&Selection> {
        self.update_selection(key, |selection| selection.set_identifier_column(key))
    }

    /// Replaces the whole selection after validating every key it names.
    pub fn set_selection(&mut self, selection: Selection) -> Result<&Selection> {
        let sheet = self.sheet.as_mut().ok_or(SessionError::NoSheetLoaded)?;
        let keys = selection
            .selected_columns()
            .iter()
            .copied()
            .chain(std::iter::once(selection.identifier_column()));
        for key in keys {
            if !sheet.dataset.has_column(key) {
                return Err(SessionError::UnknownColumn { key });
            }
        }
        Ok(sheet.selection.insert(selection))
    }

    fn update_selection(
        &mut self,
        key: ColumnKey,
        apply: impl FnOnce(&Selection) -> Selection,
    ) -> Result<&Selection> {
        let sheet = self.sheet.as_mut().ok_or(SessionError::NoSheetLoaded)?;
        // A sheet without columns has no selection, so every key is unknown there.
        let current = match &sheet.selection {
            Some(current) if sheet.dataset.has_column(key) => current,
            _ => return Err(SessionError::UnknownColumn { key }),
        };
        let next = apply(current);
        Ok(sheet.selection.insert(next))
    }

    /// Runs the hash pipeline with the reference options.
    pub fn compute_hashes(&mut self) -> Result<&[HashedRecord]> {
        self.compute_hashes_with(&DigestOptions::default())
    }

    /// Runs the hash pipeline and swaps in the new output once it is complete.
    ///
    /// A sheet without columns has no identifier column, so it cannot be hashed.
    pub fn compute_hashes_with(&mut self, options: &DigestOptions) -> Result<&[HashedRecord]> {
        let sheet = self.sheet.as_ref().ok_or(SessionError::NoSheetLoaded)?;
        let selection = sheet
            .selection
            .as_ref()
            .ok_or_else(|| SessionError::NoColumns {
                sheet: sheet.sheet_name.clone(),
            })?;
        let records = compute_digests_with(&sheet.dataset, selection, options);
        info!(
            sheet = %sheet.sheet_name,
            records = records.len(),
            "computed hashes"
        );
        self.hashed = records;
        Ok(&self.hashed)
    }

    pub fn workbook(&self) -> Option<&Workbook> {
        self.workbook.as_ref()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.sheet.as_ref().map(|sheet| &sheet.dataset)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.sheet.as_ref().and_then(|sheet| sheet.selection.as_ref())
    }

    pub fn sheet_name(&self) -> Option<&str> {
        self.sheet.as_ref().map(|sheet| sheet.sheet_name.as_str())
    }

    pub fn header_row(&self) -> Option<usize> {
        self.sheet.as_ref().map(|sheet| sheet.header_row)
    }

    /// Output of the most recent successful hash run.
    pub fn hashed(&self) -> &[HashedRecord] {
        &self.hashed
    }
}
