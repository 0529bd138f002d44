//! Accepted and rejected record types produced by partitioning.

use super::value::FieldValue;
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The class of rule a violation belongs to.
///
/// A closed set, dispatched exhaustively by the schema check. Each variant
/// corresponds to one declarative rule class, so a rejection can always be
/// attributed to a specific configured rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// A required field was missing
    MissingRequired,
    /// The row carried a column the schema does not declare
    UnknownField,
    /// The value could not be read as the field's declared type
    TypeMismatch,
    /// A numeric value fell outside the configured range
    OutOfRange,
    /// A value was not a member of the configured allowed set
    NotInSet,
    /// A text value was empty where non-empty text is required
    EmptyText,
    /// A text value did not match the configured pattern
    PatternMismatch,
    /// A timestamp fell outside the configured date bounds
    OutsideDateRange,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::MissingRequired => "missing_required",
            RuleKind::UnknownField => "unknown_field",
            RuleKind::TypeMismatch => "type_mismatch",
            RuleKind::OutOfRange => "out_of_range",
            RuleKind::NotInSet => "not_in_set",
            RuleKind::EmptyText => "empty_text",
            RuleKind::PatternMismatch => "pattern_mismatch",
            RuleKind::OutsideDateRange => "outside_date_range",
        };
        write!(f, "{name}")
    }
}

/// A single rule violation found while checking one row.
///
/// Carries enough detail — field, rule class, human-readable message — for a
/// person to correct the source data without consulting code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The field the violation applies to
    pub field: String,
    /// Which rule class was violated
    pub rule: RuleKind,
    /// A self-contained description of the problem
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(field: impl Into<String>, rule: RuleKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A fully typed, schema-conformant record.
///
/// Immutable once created. Every field satisfies all schema constraints
/// simultaneously; optional fields that were absent are `None`. The source
/// row index is retained for traceability back to the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedRecord {
    index: usize,
    fields: IndexMap<String, Option<FieldValue>>,
}

impl ValidatedRecord {
    /// Creates a validated record from its typed fields.
    pub fn new(index: usize, fields: IndexMap<String, Option<FieldValue>>) -> Self {
        Self { index, fields }
    }

    /// The source row index this record was validated from.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the value of a field, or `None` if the field is an absent
    /// optional (or not part of the schema).
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field).and_then(|v| v.as_ref())
    }

    /// Returns a field's numeric value, if present and numeric.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }

    /// Returns a field's text value, if present and textual.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Returns a field's timestamp value, if present and temporal.
    pub fn timestamp(&self, field: &str) -> Option<NaiveDateTime> {
        self.get(field).and_then(FieldValue::as_timestamp)
    }

    /// Iterates over fields in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&FieldValue>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}

/// A rejected row with every violation that was found for it.
///
/// Schema checks are exhaustive per row, so one rejection lists all of the
/// row's problems at once rather than only the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionRecord {
    index: usize,
    original: IndexMap<String, String>,
    violations: Vec<Violation>,
}

impl RejectionRecord {
    /// Creates a rejection record.
    pub fn new(
        index: usize,
        original: IndexMap<String, String>,
        violations: Vec<Violation>,
    ) -> Self {
        Self {
            index,
            original,
            violations,
        }
    }

    /// The source row index of the rejected row.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The original field values of the row, as display text in source order.
    pub fn original_values(&self) -> &IndexMap<String, String> {
        &self.original
    }

    /// All violations found for the row, in schema order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Human-readable messages, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.violations.iter().map(Violation::to_string).collect()
    }

    /// Violations joined into one numbered block, suitable for a single
    /// spreadsheet cell in an error report.
    pub fn error_details(&self) -> String {
        self.violations
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{}) {v}", i + 1))
            .collect::<Vec<_>>()
            .join(".\n")
    }
}
