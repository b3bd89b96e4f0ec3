use serde::{Deserialize, Serialize};

use crate::CellValue;

/// Pseudonymised output for one input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HashedRecord {
    /// Identifier-column value carried through unhashed; `None` when the cell was empty.
    pub participant_id: Option<CellValue>,
    /// Lowercase hexadecimal SHA-1 digest.
    pub digest: String,
}

impl HashedRecord {
    pub fn new(participant_id: Option<CellValue>, digest: impl Into<String>) -> Self {
        Self {
            participant_id,
            digest: digest.into(),
        }
    }

    /// Participant identifier rendered for display; empty when absent.
    pub fn participant_label(&self) -> String {
        self.participant_id
            .as_ref()
            .map(CellValue::render)
            .unwrap_or_default()
    }
}
