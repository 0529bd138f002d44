//! Field specifications and the closed set of declarative rule variants.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The semantic type a field is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text
    Text,
    /// A floating-point number
    Number,
    /// A calendar timestamp
    Timestamp,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Timestamp => "timestamp",
        };
        write!(f, "{name}")
    }
}

/// A declarative constraint on a single field.
///
/// This is a closed enum rather than an open trait: every rule the schema
/// can express is one of these variants, dispatched by a single exhaustive
/// check. That keeps the validator auditable and makes a silent no-op rule
/// impossible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum FieldConstraint {
    /// Numeric bounds; either side may be open.
    Range {
        /// Inclusive lower bound
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        /// Inclusive upper bound
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Membership in an enumerated set of allowed values.
    OneOf {
        /// The allowed values, in canonical spelling
        values: Vec<String>,
        /// Match ignoring case; accepted values are canonicalized to the
        /// spelling listed here
        #[serde(default)]
        case_insensitive: bool,
    },
    /// Text must be non-empty after trimming.
    NonEmpty,
    /// Text must match a regular expression.
    Pattern {
        /// The pattern, compiled once at schema construction
        pattern: String,
    },
    /// Timestamp bounds; either side may be open.
    DateRange {
        /// Inclusive earliest allowed timestamp
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<NaiveDateTime>,
        /// Inclusive latest allowed timestamp
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<NaiveDateTime>,
    },
}

fn default_required() -> bool {
    true
}

/// The specification for one schema field.
///
/// # Examples
///
/// ```rust
/// use rowsift::schema::{FieldConstraint, FieldSpec, FieldType};
///
/// let volume = FieldSpec::required("volume_ml", FieldType::Number)
///     .with_constraint(FieldConstraint::Range {
///         min: Some(0.0),
///         max: Some(500.0),
///     });
/// assert!(volume.required);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// The column name this field binds to
    pub name: String,
    /// The expected semantic type
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field must be present
    #[serde(default = "default_required")]
    pub required: bool,
    /// Constraints applied when a value of the right type is present
    #[serde(default)]
    pub constraints: Vec<FieldConstraint>,
}

impl FieldSpec {
    /// Creates a required field of the given type with no constraints.
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            constraints: Vec::new(),
        }
    }

    /// Creates an optional field of the given type with no constraints.
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            constraints: Vec::new(),
        }
    }

    /// Adds a constraint to the field.
    pub fn with_constraint(mut self, constraint: FieldConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Returns the canonical spelling for `text` if this field carries a
    /// case-insensitive `OneOf` constraint that matches it.
    ///
    /// Cleaning never alters case; canonicalization happens only here, at
    /// coercion time, and only when the schema opted into case-insensitive
    /// matching.
    pub fn canonicalize(&self, text: &str) -> Option<&str> {
        for constraint in &self.constraints {
            if let FieldConstraint::OneOf {
                values,
                case_insensitive: true,
            } = constraint
            {
                return values
                    .iter()
                    .find(|v| v.eq_ignore_ascii_case(text))
                    .map(String::as_str);
            }
        }
        None
    }
}
