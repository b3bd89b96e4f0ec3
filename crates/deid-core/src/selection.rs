//! Column selection state.
//!
//! [`Selection`] is a value type: `toggle_column` and `set_identifier_column`
//! return a new state and leave the receiver untouched.

use std::collections::BTreeSet;

use deid_model::{Column, ColumnKey};

/// Which columns feed the digest and which column identifies the participant.
///
/// The identifier column may also be selected for hashing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    selected_columns: BTreeSet<ColumnKey>,
    identifier_column: ColumnKey,
}

impl Selection {
    /// Empty selection with the given identifier column.
    pub fn new(identifier_column: ColumnKey) -> Self {
        Self {
            selected_columns: BTreeSet::new(),
            identifier_column,
        }
    }

    /// Default state after a dataset load: leftmost column as identifier,
    /// nothing selected. `None` when there are no columns.
    pub fn for_columns(columns: &[Column]) -> Option<Self> {
        columns.first().map(|column| Self::new(column.key))
    }

    #[must_use]
    pub fn with_selected(mut self, keys: impl IntoIterator<Item = ColumnKey>) -> Self {
        self.selected_columns.extend(keys);
        self
    }

    /// Adds `key` if absent, removes it if present.
    #[must_use]
    pub fn toggle_column(&self, key: ColumnKey) -> Self {
        let mut next = self.clone();
        if !next.selected_columns.remove(&key) {
            next.selected_columns.insert(key);
        }
        next
    }

    #[must_use]
    pub fn set_identifier_column(&self, key: ColumnKey) -> Self {
        Self {
            selected_columns: self.selected_columns.clone(),
            identifier_column: key,
        }
    }

    pub fn is_selected(&self, key: ColumnKey) -> bool {
        self.selected_columns.contains(&key)
    }

    pub fn selected_columns(&self) -> &BTreeSet<ColumnKey> {
        &self.selected_columns
    }

    pub fn identifier_column(&self) -> ColumnKey {
        self.identifier_column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(index: usize) -> ColumnKey {
        ColumnKey::from_index(index)
    }

    #[test]
    fn default_identifier_is_leftmost_column() {
        let columns = vec![Column::at(0, "ID"), Column::at(1, "Name")];
        let selection = Selection::for_columns(&columns).unwrap();
        assert_eq!(selection.identifier_column(), key(0));
        assert!(selection.selected_columns().is_empty());
    }

    #[test]
    fn no_columns_means_no_selection() {
        assert_eq!(Selection::for_columns(&[]), None);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let base = Selection::new(key(0));
        let on = base.toggle_column(key(2));
        assert!(on.is_selected(key(2)));
        assert!(!base.is_selected(key(2)));
        let off = on.toggle_column(key(2));
        assert_eq!(off, base);
    }

    #[test]
    fn identifier_may_also_be_selected() {
        let selection = Selection::new(key(0)).toggle_column(key(0));
        assert!(selection.is_selected(selection.identifier_column()));
    }

    #[test]
    fn set_identifier_keeps_selected_columns() {
        let selection = Selection::new(key(0)).with_selected([key(1), key(2)]);
        let moved = selection.set_identifier_column(key(3));
        assert_eq!(moved.identifier_column(), key(3));
        assert_eq!(moved.selected_columns(), selection.selected_columns());
    }
}
