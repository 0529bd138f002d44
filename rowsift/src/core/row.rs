//! Row representations for the input and cleaned stages.

use super::value::{CellValue, RawValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One raw input row: an ordered mapping from column name to an untyped value.
///
/// Rows are ephemeral — they exist only between loading and validation. The
/// load adapter guarantees that rows retain source order, so a row's position
/// in the input sequence is its stable source index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    columns: IndexMap<String, RawValue>,
}

impl RawRow {
    /// Creates an empty raw row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column value, replacing any previous value for the same name.
    pub fn with(mut self, column: impl Into<String>, value: RawValue) -> Self {
        self.columns.insert(column.into(), value);
        self
    }

    /// Inserts a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: RawValue) {
        self.columns.insert(column.into(), value);
    }

    /// Returns the value for a column, if the column is present.
    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.columns.get(column)
    }

    /// Iterates over columns in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of columns in the row.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Renders every column as display text, preserving column order.
    ///
    /// Used to preserve the original field values on rejection records.
    pub fn display_values(&self) -> IndexMap<String, String> {
        self.columns
            .iter()
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect()
    }
}

impl FromIterator<(String, RawValue)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, RawValue)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

/// A cleaned row: normalized cell values plus the original row for auditing.
///
/// Still untrusted — normalization never rejects, it only re-shapes. The
/// schema decides acceptance. Cleaning never mutates the [`RawRow`]; the
/// original display values travel along so rejection records can show the
/// row exactly as it arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedRow {
    index: usize,
    values: IndexMap<String, CellValue>,
    original: IndexMap<String, String>,
}

impl CleanedRow {
    /// Creates a cleaned row from its parts.
    pub fn new(
        index: usize,
        values: IndexMap<String, CellValue>,
        original: IndexMap<String, String>,
    ) -> Self {
        Self {
            index,
            values,
            original,
        }
    }

    /// The source row index this row was cleaned from.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the cleaned value for a column, if the column is present.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.values.get(column)
    }

    /// Iterates over cleaned columns in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The original field values as display text, in source column order.
    pub fn original_values(&self) -> &IndexMap<String, String> {
        &self.original
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_row_preserves_column_order() {
        let row = RawRow::new()
            .with("zebra", RawValue::text("z"))
            .with("apple", RawValue::number(1.0))
            .with("mango", RawValue::Empty);

        let names: Vec<&str> = row.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_display_values() {
        let row = RawRow::new()
            .with("volume", RawValue::number(120.0))
            .with("note", RawValue::text(" ok "));

        let display = row.display_values();
        assert_eq!(display["volume"], "120");
        assert_eq!(display["note"], " ok ");
    }

    #[test]
    fn test_cleaned_row_lookup() {
        let mut values = IndexMap::new();
        values.insert("volume".to_string(), CellValue::Number(120.0));
        let row = CleanedRow::new(3, values, IndexMap::new());

        assert_eq!(row.index(), 3);
        assert_eq!(row.get("volume"), Some(&CellValue::Number(120.0)));
        assert_eq!(row.get("absent"), None);
    }
}
