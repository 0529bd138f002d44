//! Row validation and partitioning into accepted and rejected streams.
//!
//! Every cleaned row is checked against the schema independently — there is
//! no cross-row state — so the hot loop runs as a data-parallel indexed map.
//! Collection of an indexed parallel iterator preserves input order, which
//! keeps the output-order invariant without a separate sort; the two output
//! sequences are then split off in one ordered pass.

use crate::core::{
    CellValue, CleanedRow, FieldValue, RejectionRecord, RuleKind, ValidatedRecord, Violation,
};
use crate::schema::{FieldType, TableSchema};
use indexmap::IndexMap;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, instrument};

/// The two output streams of one partitioning pass.
///
/// Every input row lands in exactly one of the two sequences, and both
/// sequences preserve source row order.
#[derive(Debug, Clone, Default)]
pub struct Partition {
    /// Schema-conformant records, coerced to their final typed shape
    pub accepted: Vec<ValidatedRecord>,
    /// Rejected rows, each carrying all of its violations
    pub rejected: Vec<RejectionRecord>,
}

enum RowOutcome {
    Accepted(ValidatedRecord),
    Rejected(RejectionRecord),
}

/// Applies the schema to cleaned rows and partitions them.
#[derive(Debug, Clone)]
pub struct Validator {
    schema: Arc<TableSchema>,
}

impl Validator {
    /// Creates a validator over a constructed schema.
    pub fn new(schema: Arc<TableSchema>) -> Self {
        Self { schema }
    }

    /// The schema this validator checks against.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Partitions cleaned rows into accepted and rejected sequences.
    ///
    /// A row with an empty check result is coerced field-by-field into a
    /// [`ValidatedRecord`]; any other row becomes a [`RejectionRecord`]
    /// listing every violation. Rows are never dropped: an entirely empty
    /// row is rejected with one violation per missing required field.
    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    pub fn partition(&self, rows: &[CleanedRow]) -> Partition {
        let outcomes: Vec<RowOutcome> = rows
            .par_iter()
            .map(|row| self.validate_row(row))
            .collect();

        let mut partition = Partition::default();
        for outcome in outcomes {
            match outcome {
                RowOutcome::Accepted(record) => partition.accepted.push(record),
                RowOutcome::Rejected(record) => partition.rejected.push(record),
            }
        }
        debug!(
            accepted = partition.accepted.len(),
            rejected = partition.rejected.len(),
            "Partitioned rows"
        );
        partition
    }

    fn validate_row(&self, row: &CleanedRow) -> RowOutcome {
        let violations = self.schema.check(row);
        if violations.is_empty() {
            match self.coerce(row) {
                Ok(record) => RowOutcome::Accepted(record),
                Err(coercion_violations) => RowOutcome::Rejected(RejectionRecord::new(
                    row.index(),
                    row.original_values().clone(),
                    coercion_violations,
                )),
            }
        } else {
            RowOutcome::Rejected(RejectionRecord::new(
                row.index(),
                row.original_values().clone(),
                violations,
            ))
        }
    }

    /// Coerces a row that passed the schema check into its typed shape.
    ///
    /// After an empty check result every cell is either missing-optional or
    /// matches its declared type. A non-conformant cell reaching this point
    /// is reported as a type-mismatch rejection rather than a panic.
    fn coerce(&self, row: &CleanedRow) -> Result<ValidatedRecord, Vec<Violation>> {
        let mut fields = IndexMap::with_capacity(self.schema.len());
        let mut violations = Vec::new();

        for spec in self.schema.fields() {
            let value = match row.get(&spec.name) {
                None | Some(CellValue::Missing) => None,
                Some(CellValue::Text(s)) if spec.field_type == FieldType::Text => {
                    let canonical = spec
                        .canonicalize(s)
                        .map(str::to_string)
                        .unwrap_or_else(|| s.clone());
                    Some(FieldValue::Text(canonical))
                }
                Some(CellValue::Number(n)) if spec.field_type == FieldType::Number => {
                    Some(FieldValue::Number(*n))
                }
                Some(CellValue::Timestamp(ts)) if spec.field_type == FieldType::Timestamp => {
                    Some(FieldValue::Timestamp(*ts))
                }
                Some(other) => {
                    violations.push(Violation::new(
                        &spec.name,
                        RuleKind::TypeMismatch,
                        format!("expected {}, found {}", spec.field_type, other.type_name()),
                    ));
                    None
                }
            };
            fields.insert(spec.name.clone(), value);
        }

        if violations.is_empty() {
            Ok(ValidatedRecord::new(row.index(), fields))
        } else {
            Err(violations)
        }
    }
}
