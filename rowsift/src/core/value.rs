//! Scalar value representations at each stage of the pipeline.
//!
//! Three value types mirror the three trust levels a cell moves through:
//!
//! - [`RawValue`]: the input-contract scalar handed over by a load adapter
//! - [`CellValue`]: the cleaned, still-untrusted representation, where
//!   "missing" and "present but invalid" are distinct variants
//! - [`FieldValue`]: the final typed representation inside an accepted record

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An untyped scalar as delivered by the load adapter.
///
/// Load adapters guarantee nothing beyond this shape: a cell is text, a
/// number, a date-like value, or absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawValue {
    /// Textual cell content, exactly as read
    Text(String),
    /// Numeric cell content
    Number(f64),
    /// Date-like cell content already parsed by the adapter
    Timestamp(NaiveDateTime),
    /// An absent cell
    Empty,
}

impl RawValue {
    /// Creates a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Creates a numeric value.
    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    /// Creates a timestamp value.
    pub fn timestamp(value: NaiveDateTime) -> Self {
        Self::Timestamp(value)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(s) => write!(f, "{s}"),
            RawValue::Number(n) => write!(f, "{n}"),
            RawValue::Timestamp(ts) => write!(f, "{ts}"),
            RawValue::Empty => Ok(()),
        }
    }
}

/// A cleaned cell value, normalized but not yet trusted.
///
/// `Missing` and `Invalid` are deliberately separate variants so the schema
/// can report "required field absent" and "value present but malformed" as
/// distinguishable violations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellValue {
    /// The cell was absent or held a configured missing-value token
    Missing,
    /// The cell held a value that could not be normalized to the declared type
    Invalid {
        /// The original (trimmed) text, preserved for the violation message
        raw: String,
    },
    /// Normalized text
    Text(String),
    /// Normalized number
    Number(f64),
    /// Normalized timestamp
    Timestamp(NaiveDateTime),
}

impl CellValue {
    /// Returns true if this cell is the missing marker.
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Returns a short name for the value's shape, used in violation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Missing => "missing",
            CellValue::Invalid { .. } => "invalid",
            CellValue::Text(_) => "text",
            CellValue::Number(_) => "number",
            CellValue::Timestamp(_) => "timestamp",
        }
    }
}

/// A fully typed field value inside an accepted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldValue {
    /// Text field
    Text(String),
    /// Numeric field
    Number(f64),
    /// Timestamp field
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    /// Returns the text content if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric content if this is a number value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the timestamp content if this is a timestamp value.
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            FieldValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Timestamp(ts) => write!(f, "{ts}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_raw_value_display() {
        assert_eq!(RawValue::text("  hello ").to_string(), "  hello ");
        assert_eq!(RawValue::number(42.5).to_string(), "42.5");
        assert_eq!(RawValue::Empty.to_string(), "");
    }

    #[test]
    fn test_missing_and_invalid_are_distinct() {
        let missing = CellValue::Missing;
        let invalid = CellValue::Invalid {
            raw: "not-a-date".to_string(),
        };
        assert!(missing.is_missing());
        assert!(!invalid.is_missing());
        assert_ne!(missing, invalid);
        assert_eq!(missing.type_name(), "missing");
        assert_eq!(invalid.type_name(), "invalid");
    }

    #[test]
    fn test_field_value_accessors() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        assert_eq!(FieldValue::Text("a".to_string()).as_text(), Some("a"));
        assert_eq!(FieldValue::Number(3.0).as_number(), Some(3.0));
        assert_eq!(FieldValue::Timestamp(ts).as_timestamp(), Some(ts));
        assert_eq!(FieldValue::Number(3.0).as_text(), None);
    }
}
