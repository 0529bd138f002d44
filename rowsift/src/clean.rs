//! Normalization of raw rows ahead of validation.
//!
//! The cleaner reduces raw heterogeneity so the schema only reasons about
//! semantically normalized values: it trims text, maps configured
//! missing-value tokens to a single missing marker, and parses textual
//! timestamps and numbers by each column's declared type. It never rejects
//! anything — an unparsable value becomes an explicit invalid marker and is
//! left for the schema to report.

use crate::core::{CellValue, CleanedRow, RawRow, RawValue};
use crate::schema::{FieldType, TableSchema};
use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

static DEFAULT_MISSING_TOKENS: Lazy<Vec<String>> = Lazy::new(|| {
    ["", "na", "n/a", "null", "none", "-"]
        .iter()
        .map(|s| s.to_string())
        .collect()
});

static DEFAULT_TIMESTAMP_FORMATS: Lazy<Vec<String>> = Lazy::new(|| {
    [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d",
        "%d/%m/%Y %H:%M",
        "%d/%m/%Y",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
});

fn default_missing_tokens() -> Vec<String> {
    DEFAULT_MISSING_TOKENS.clone()
}

fn default_timestamp_formats() -> Vec<String> {
    DEFAULT_TIMESTAMP_FORMATS.clone()
}

/// Cleaning rules consumed by the [`Cleaner`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Raw tokens normalized to the missing marker. Matched after trimming,
    /// ignoring case. Whitespace-only cells always count as missing.
    #[serde(default = "default_missing_tokens")]
    pub missing_tokens: Vec<String>,
    /// Accepted textual timestamp formats (chrono syntax), tried in order.
    /// Formats without a time component parse to midnight.
    #[serde(default = "default_timestamp_formats")]
    pub timestamp_formats: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            missing_tokens: default_missing_tokens(),
            timestamp_formats: default_timestamp_formats(),
        }
    }
}

/// Normalizes raw rows into cleaned rows by the schema's declared types.
///
/// Pure per row: cleaning the same raw input always produces the same
/// cleaned row, and the raw row is never mutated, so cleaning can be re-run
/// from raw input for auditing.
#[derive(Debug, Clone)]
pub struct Cleaner {
    missing_tokens: Vec<String>,
    timestamp_formats: Vec<String>,
    field_types: IndexMap<String, FieldType>,
}

impl Cleaner {
    /// Creates a cleaner for the given rules and schema.
    ///
    /// The schema supplies each column's declared type so the cleaner knows
    /// which columns to parse as timestamps or numbers.
    pub fn new(config: CleaningConfig, schema: &TableSchema) -> Self {
        let missing_tokens = config
            .missing_tokens
            .iter()
            .map(|t| t.trim().to_ascii_lowercase())
            .collect();
        let field_types = schema
            .fields()
            .map(|spec| (spec.name.clone(), spec.field_type))
            .collect();
        Self {
            missing_tokens,
            timestamp_formats: config.timestamp_formats,
            field_types,
        }
    }

    /// Cleans one raw row, tagged with its source index.
    pub fn clean(&self, index: usize, row: &RawRow) -> CleanedRow {
        let mut values = IndexMap::with_capacity(row.len());
        for (name, raw) in row.iter() {
            let declared = self.field_types.get(name).copied();
            values.insert(name.to_string(), self.clean_cell(raw, declared));
        }
        CleanedRow::new(index, values, row.display_values())
    }

    /// Cleans a batch of rows, assigning source indices by position.
    pub fn clean_all(&self, rows: &[RawRow]) -> Vec<CleanedRow> {
        debug!(rows = rows.len(), "Cleaning raw rows");
        rows.iter()
            .enumerate()
            .map(|(index, row)| self.clean(index, row))
            .collect()
    }

    fn clean_cell(&self, raw: &RawValue, declared: Option<FieldType>) -> CellValue {
        match raw {
            RawValue::Empty => CellValue::Missing,
            RawValue::Number(n) => match declared {
                Some(FieldType::Number) | None => {
                    if n.is_finite() {
                        CellValue::Number(*n)
                    } else {
                        CellValue::Invalid { raw: n.to_string() }
                    }
                }
                Some(FieldType::Text) => CellValue::Text(n.to_string()),
                Some(FieldType::Timestamp) => CellValue::Invalid { raw: n.to_string() },
            },
            RawValue::Timestamp(ts) => match declared {
                Some(FieldType::Timestamp) | None => CellValue::Timestamp(*ts),
                Some(FieldType::Text) => CellValue::Text(ts.to_string()),
                Some(FieldType::Number) => CellValue::Invalid { raw: ts.to_string() },
            },
            RawValue::Text(text) => self.clean_text(text, declared),
        }
    }

    fn clean_text(&self, text: &str, declared: Option<FieldType>) -> CellValue {
        let trimmed = text.trim();
        if self.is_missing_token(trimmed) {
            return CellValue::Missing;
        }
        match declared {
            Some(FieldType::Timestamp) => match self.parse_timestamp(trimmed) {
                Some(ts) => CellValue::Timestamp(ts),
                None => CellValue::Invalid {
                    raw: trimmed.to_string(),
                },
            },
            // Only finite numbers count as valid: "nan"/"inf" parse via
            // f64::from_str but would escape range checks and poison sums.
            Some(FieldType::Number) => match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => CellValue::Number(n),
                _ => CellValue::Invalid {
                    raw: trimmed.to_string(),
                },
            },
            Some(FieldType::Text) | None => CellValue::Text(trimmed.to_string()),
        }
    }

    fn is_missing_token(&self, trimmed: &str) -> bool {
        trimmed.is_empty()
            || self
                .missing_tokens
                .iter()
                .any(|token| token.eq_ignore_ascii_case(trimmed))
    }

    fn parse_timestamp(&self, text: &str) -> Option<NaiveDateTime> {
        for format in &self.timestamp_formats {
            // Try a full datetime first; a date-only format fails that parse
            // and falls back to a date at midnight. This works for any way a
            // format spells its time fields (%H:%M, %T, %R, ...).
            if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
                return Some(ts);
            }
            if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                return date.and_hms_opt(0, 0, 0);
            }
        }
        None
    }
}
