//! The table schema and its exhaustive row check.

use super::field::{FieldConstraint, FieldSpec, FieldType};
use crate::core::{CellValue, CleanedRow, RuleKind, Violation};
use crate::error::{Result, SiftError};
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashMap;

/// A declarative per-field schema for one kind of tabular record.
///
/// Validated once at construction; after that, [`check`](Self::check) is a
/// pure, total function over cleaned rows. It never fails with an error —
/// unknown columns, missing required fields, and wrong-typed values are all
/// reported as [`Violation`]s.
///
/// # Examples
///
/// ```rust
/// use rowsift::schema::{FieldConstraint, FieldSpec, FieldType, TableSchema};
///
/// let schema = TableSchema::new(vec![
///     FieldSpec::required("logged_at", FieldType::Timestamp),
///     FieldSpec::required("volume_ml", FieldType::Number).with_constraint(
///         FieldConstraint::Range { min: Some(0.0), max: Some(500.0) },
///     ),
///     FieldSpec::optional("note", FieldType::Text),
/// ])
/// .unwrap();
///
/// assert_eq!(schema.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct TableSchema {
    fields: IndexMap<String, FieldSpec>,
    patterns: HashMap<String, Regex>,
}

impl TableSchema {
    /// Builds a schema from field specifications.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the field list is empty, a field
    /// name repeats, a constraint is incompatible with its field's declared
    /// type, a range is inverted, an allowed-value set is empty, or a
    /// pattern does not compile.
    pub fn new(specs: Vec<FieldSpec>) -> Result<Self> {
        if specs.is_empty() {
            return Err(SiftError::configuration("schema must declare at least one field"));
        }

        let mut fields = IndexMap::with_capacity(specs.len());
        let mut patterns = HashMap::new();

        for spec in specs {
            let name = spec.name.clone();
            for constraint in &spec.constraints {
                Self::validate_constraint(&name, spec.field_type, constraint)?;
                if let FieldConstraint::Pattern { pattern } = constraint {
                    if patterns.contains_key(&name) {
                        return Err(SiftError::configuration(format!(
                            "field '{name}' declares more than one pattern constraint"
                        )));
                    }
                    let regex = Regex::new(pattern).map_err(|e| {
                        SiftError::configuration(format!(
                            "field '{name}' has an invalid pattern '{pattern}': {e}"
                        ))
                    })?;
                    patterns.insert(name.clone(), regex);
                }
            }
            if fields.insert(name.clone(), spec).is_some() {
                return Err(SiftError::configuration(format!(
                    "field '{name}' is declared more than once"
                )));
            }
        }

        Ok(Self { fields, patterns })
    }

    fn validate_constraint(
        name: &str,
        field_type: FieldType,
        constraint: &FieldConstraint,
    ) -> Result<()> {
        let compatible = match constraint {
            FieldConstraint::Range { min, max } => {
                if let (Some(lo), Some(hi)) = (min, max) {
                    if lo > hi {
                        return Err(SiftError::configuration(format!(
                            "field '{name}' has an inverted range ({lo} > {hi})"
                        )));
                    }
                }
                field_type == FieldType::Number
            }
            FieldConstraint::OneOf { values, .. } => {
                if values.is_empty() {
                    return Err(SiftError::configuration(format!(
                        "field '{name}' has an empty allowed-value set"
                    )));
                }
                field_type == FieldType::Text
            }
            FieldConstraint::NonEmpty | FieldConstraint::Pattern { .. } => {
                field_type == FieldType::Text
            }
            FieldConstraint::DateRange { min, max } => {
                if let (Some(lo), Some(hi)) = (min, max) {
                    if lo > hi {
                        return Err(SiftError::configuration(format!(
                            "field '{name}' has an inverted date range ({lo} > {hi})"
                        )));
                    }
                }
                field_type == FieldType::Timestamp
            }
        };

        if compatible {
            Ok(())
        } else {
            Err(SiftError::configuration(format!(
                "field '{name}' ({field_type}) has an incompatible constraint"
            )))
        }
    }

    /// Checks one cleaned row against every field rule.
    ///
    /// Returns an empty list iff the row is fully conformant. Checks are
    /// exhaustive: every violated rule is reported, not just the first, so
    /// one export shows all of a row's problems at once.
    pub fn check(&self, row: &CleanedRow) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (name, spec) in &self.fields {
            match row.get(name) {
                None | Some(CellValue::Missing) => {
                    if spec.required {
                        violations.push(Violation::new(
                            name,
                            RuleKind::MissingRequired,
                            "required field is missing",
                        ));
                    }
                }
                Some(CellValue::Invalid { raw }) => {
                    violations.push(Violation::new(
                        name,
                        RuleKind::TypeMismatch,
                        format!("value '{raw}' is not a valid {}", spec.field_type),
                    ));
                }
                Some(value) => self.check_value(spec, value, &mut violations),
            }
        }

        for (name, _) in row.iter() {
            if !self.fields.contains_key(name) {
                violations.push(Violation::new(
                    name,
                    RuleKind::UnknownField,
                    "column is not declared in the schema",
                ));
            }
        }

        violations
    }

    fn check_value(&self, spec: &FieldSpec, value: &CellValue, violations: &mut Vec<Violation>) {
        let name = &spec.name;
        match (spec.field_type, value) {
            (FieldType::Number, CellValue::Number(n)) => {
                // NaN compares false against both bounds, so a non-finite
                // value would slip through every range check.
                if !n.is_finite() {
                    violations.push(Violation::new(
                        name,
                        RuleKind::TypeMismatch,
                        format!("value {n} is not a finite number"),
                    ));
                    return;
                }
                for constraint in &spec.constraints {
                    if let FieldConstraint::Range { min, max } = constraint {
                        if let Some(lo) = min {
                            if n < lo {
                                violations.push(Violation::new(
                                    name,
                                    RuleKind::OutOfRange,
                                    format!("value {n} is below minimum {lo}"),
                                ));
                            }
                        }
                        if let Some(hi) = max {
                            if n > hi {
                                violations.push(Violation::new(
                                    name,
                                    RuleKind::OutOfRange,
                                    format!("value {n} is above maximum {hi}"),
                                ));
                            }
                        }
                    }
                }
            }
            (FieldType::Text, CellValue::Text(s)) => {
                for constraint in &spec.constraints {
                    match constraint {
                        FieldConstraint::OneOf {
                            values,
                            case_insensitive,
                        } => {
                            let member = if *case_insensitive {
                                values.iter().any(|v| v.eq_ignore_ascii_case(s))
                            } else {
                                values.iter().any(|v| v == s)
                            };
                            if !member {
                                violations.push(Violation::new(
                                    name,
                                    RuleKind::NotInSet,
                                    format!(
                                        "value '{s}' is not one of [{}]",
                                        values.join(", ")
                                    ),
                                ));
                            }
                        }
                        FieldConstraint::NonEmpty => {
                            if s.is_empty() {
                                violations.push(Violation::new(
                                    name,
                                    RuleKind::EmptyText,
                                    "text must not be empty",
                                ));
                            }
                        }
                        FieldConstraint::Pattern { pattern } => {
                            if let Some(regex) = self.patterns.get(name) {
                                if !regex.is_match(s) {
                                    violations.push(Violation::new(
                                        name,
                                        RuleKind::PatternMismatch,
                                        format!("value '{s}' does not match pattern '{pattern}'"),
                                    ));
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
            (FieldType::Timestamp, CellValue::Timestamp(ts)) => {
                for constraint in &spec.constraints {
                    if let FieldConstraint::DateRange { min, max } = constraint {
                        if let Some(lo) = min {
                            if ts < lo {
                                violations.push(Violation::new(
                                    name,
                                    RuleKind::OutsideDateRange,
                                    format!("timestamp {ts} is before earliest allowed {lo}"),
                                ));
                            }
                        }
                        if let Some(hi) = max {
                            if ts > hi {
                                violations.push(Violation::new(
                                    name,
                                    RuleKind::OutsideDateRange,
                                    format!("timestamp {ts} is after latest allowed {hi}"),
                                ));
                            }
                        }
                    }
                }
            }
            (expected, found) => {
                violations.push(Violation::new(
                    name,
                    RuleKind::TypeMismatch,
                    format!("expected {expected}, found {}", found.type_name()),
                ));
            }
        }
    }

    /// Returns the specification for a field, if declared.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Iterates over field specifications in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.values()
    }

    /// The number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema declares no fields (never the case for a
    /// constructed schema).
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
