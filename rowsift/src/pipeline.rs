//! The pipeline orchestrator.
//!
//! Sequences Clean → Validate/Partition → Transform → Aggregate over one
//! batch of raw rows and assembles the immutable [`PipelineResult`]. Stage
//! transitions are strictly sequential and one-shot per run; a fatal error
//! at any stage ends the run in [`Stage::Failed`] with the originating
//! stage recorded on the error, and no partial result is exposed.
//!
//! Per-row validation failures are not failures of the run: a completed run
//! always yields all three datasets, even when every row was rejected, so
//! "no valid rows" stays visible and explicable rather than becoming an
//! empty unexplained output.

use crate::aggregate::Aggregator;
use crate::clean::Cleaner;
use crate::config::PipelineConfig;
use crate::core::{PipelineResult, RawRow, RunMetrics};
use crate::error::{Result, SiftError};
use crate::schema::TableSchema;
use crate::transform::Transformer;
use crate::validate::Validator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument};

/// The stages a pipeline run moves through.
///
/// Transitions are linear: `Idle → Loaded → Cleaned → Validated →
/// Transformed → Aggregated → Complete`, with `Failed` reachable from any
/// stage on an unrecoverable error. A per-row validation failure never
/// reaches `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// No run in progress
    Idle,
    /// Raw rows received from the load adapter
    Loaded,
    /// Rows normalized by the cleaner
    Cleaned,
    /// Rows partitioned into accepted and rejected
    Validated,
    /// Accepted records reshaped for analysis
    Transformed,
    /// Summary tables computed
    Aggregated,
    /// Result assembled and handed to the caller
    Complete,
    /// The run was aborted by an unrecoverable error
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Loaded => "loaded",
            Stage::Cleaned => "cleaned",
            Stage::Validated => "validated",
            Stage::Transformed => "transformed",
            Stage::Aggregated => "aggregated",
            Stage::Complete => "complete",
            Stage::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// The validation-and-partition pipeline.
///
/// Construction validates the whole configuration once; after that a
/// pipeline is immutable and can run any number of batches. Each run is
/// independent and produces a fresh [`PipelineResult`] — results are never
/// mutated across runs.
///
/// # Examples
///
/// ```rust
/// use rowsift::config::PipelineConfig;
/// use rowsift::core::{RawRow, RawValue};
/// use rowsift::pipeline::Pipeline;
/// use rowsift::schema::{FieldSpec, FieldType};
/// use rowsift::transform::TransformConfig;
///
/// let config = PipelineConfig::new(
///     vec![
///         FieldSpec::required("logged_at", FieldType::Timestamp),
///         FieldSpec::required("volume_ml", FieldType::Number),
///     ],
///     TransformConfig::new("logged_at").with_metric("volume_ml"),
/// );
/// let pipeline = Pipeline::new(config).unwrap();
///
/// let rows = vec![
///     RawRow::new()
///         .with("logged_at", RawValue::text("2024-03-05 09:00:00"))
///         .with("volume_ml", RawValue::number(120.0)),
/// ];
/// let result = pipeline.run(rows).unwrap();
/// assert_eq!(result.accepted().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    schema: Arc<TableSchema>,
    cleaner: Cleaner,
    validator: Validator,
    transformer: Transformer,
}

impl Pipeline {
    /// Builds a pipeline from configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the schema is empty or inconsistent,
    /// or if the transform configuration references fields the schema does
    /// not declare with the right type.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let schema = Arc::new(TableSchema::new(config.schema)?);
        let cleaner = Cleaner::new(config.cleaning, &schema);
        let transformer = Transformer::new(config.transform, &schema)?;
        let validator = Validator::new(Arc::clone(&schema));
        Ok(Self {
            schema,
            cleaner,
            validator,
            transformer,
        })
    }

    /// The validated schema this pipeline checks rows against.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Runs the pipeline over one batch of raw rows.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Stage`] wrapping the underlying error when a
    /// stage fails structurally. Rejected rows are data, not errors.
    #[instrument(skip(self, rows), fields(input.rows = rows.len()))]
    pub fn run(&self, rows: Vec<RawRow>) -> Result<PipelineResult> {
        let start_time = Instant::now();
        let mut stage = Stage::Idle;
        let input_rows = rows.len();

        advance(&mut stage, Stage::Loaded);
        info!(input.rows = input_rows, "Starting pipeline run");

        let cleaned = self.cleaner.clean_all(&rows);
        advance(&mut stage, Stage::Cleaned);

        let partition = self.validator.partition(&cleaned);
        advance(&mut stage, Stage::Validated);

        let transformed = match self.transformer.transform_all(&partition.accepted) {
            Ok(transformed) => transformed,
            Err(e) => return Err(fail(&mut stage, Stage::Transformed, e)),
        };
        advance(&mut stage, Stage::Transformed);

        let summary = Aggregator::summarize(&transformed);
        advance(&mut stage, Stage::Aggregated);

        let metrics = RunMetrics {
            input_rows,
            accepted_rows: partition.accepted.len(),
            rejected_rows: partition.rejected.len(),
            violations: partition
                .rejected
                .iter()
                .map(|r| r.violations().len())
                .sum(),
            execution_time_ms: start_time.elapsed().as_millis() as u64,
        };
        let result = PipelineResult::new(partition.accepted, partition.rejected, summary, metrics);
        advance(&mut stage, Stage::Complete);

        let metrics = result.metrics();
        if metrics.rejected_rows > 0 {
            info!(
                rows.input = metrics.input_rows,
                rows.accepted = metrics.accepted_rows,
                rows.rejected = metrics.rejected_rows,
                violations = metrics.violations,
                duration_ms = metrics.execution_time_ms,
                acceptance_rate = %format!("{:.2}%", metrics.acceptance_rate()),
                "Pipeline run completed with rejections"
            );
        } else {
            info!(
                rows.input = metrics.input_rows,
                rows.accepted = metrics.accepted_rows,
                duration_ms = metrics.execution_time_ms,
                "Pipeline run completed, all rows passed validation"
            );
        }

        Ok(result)
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!(from = %stage, to = %next, "Stage transition");
    *stage = next;
}

fn fail(stage: &mut Stage, at: Stage, err: SiftError) -> SiftError {
    error!(stage = %at, error = %err, "Pipeline run failed");
    *stage = Stage::Failed;
    err.at_stage(at.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RawValue;
    use crate::schema::{FieldConstraint, FieldSpec, FieldType};
    use crate::transform::TransformConfig;

    fn config() -> PipelineConfig {
        PipelineConfig::new(
            vec![
                FieldSpec::required("logged_at", FieldType::Timestamp),
                FieldSpec::required("volume_ml", FieldType::Number).with_constraint(
                    FieldConstraint::Range {
                        min: Some(0.0),
                        max: Some(500.0),
                    },
                ),
            ],
            TransformConfig::new("logged_at").with_metric("volume_ml"),
        )
    }

    fn row(timestamp: &str, volume: f64) -> RawRow {
        RawRow::new()
            .with("logged_at", RawValue::text(timestamp))
            .with("volume_ml", RawValue::number(volume))
    }

    #[test]
    fn test_bad_configuration_fails_construction_not_runs() {
        let bad = PipelineConfig::new(Vec::new(), TransformConfig::new("logged_at"));
        let err = Pipeline::new(bad).unwrap_err();
        assert!(matches!(err, SiftError::Configuration(_)));
    }

    #[test]
    fn test_run_partitions_and_summarizes() {
        let pipeline = Pipeline::new(config()).unwrap();
        let result = pipeline
            .run(vec![
                row("2024-03-05 09:00:00", 100.0),
                row("2024-03-05 12:00:00", 900.0),
                row("2024-03-06 09:00:00", 50.0),
            ])
            .unwrap();

        assert_eq!(result.accepted().len(), 2);
        assert_eq!(result.rejected().len(), 1);
        assert_eq!(result.metrics().input_rows, 3);
        assert_eq!(result.summary().daily.len(), 2);
    }

    #[test]
    fn test_all_rows_rejected_still_yields_a_complete_result() {
        let pipeline = Pipeline::new(config()).unwrap();
        let result = pipeline
            .run(vec![row("nope", 100.0), row("also nope", 50.0)])
            .unwrap();

        assert_eq!(result.accepted().len(), 0);
        assert_eq!(result.rejected().len(), 2);
        assert!(result.summary().daily.is_empty());
        assert_eq!(result.metrics().acceptance_rate(), 0.0);
    }

    #[test]
    fn test_empty_input_completes() {
        let pipeline = Pipeline::new(config()).unwrap();
        let result = pipeline.run(Vec::new()).unwrap();
        assert!(result.is_fully_accepted());
        assert_eq!(result.metrics().input_rows, 0);
    }

    #[test]
    fn test_textual_nan_is_rejected_and_kept_out_of_summaries() {
        let pipeline = Pipeline::new(config()).unwrap();
        let result = pipeline
            .run(vec![RawRow::new()
                .with("logged_at", RawValue::text("2024-03-05 09:00:00"))
                .with("volume_ml", RawValue::text("nan"))])
            .unwrap();

        assert!(result.accepted().is_empty());
        assert_eq!(result.rejected().len(), 1);
        assert_eq!(result.rejected()[0].violations()[0].field, "volume_ml");
        assert!(result.summary().daily.is_empty());
    }

    #[test]
    fn test_runs_are_independent() {
        let pipeline = Pipeline::new(config()).unwrap();
        let first = pipeline.run(vec![row("2024-03-05 09:00:00", 100.0)]).unwrap();
        let second = pipeline.run(vec![row("2024-03-06 09:00:00", 60.0)]).unwrap();

        assert_eq!(first.accepted().len(), 1);
        assert_eq!(second.accepted().len(), 1);
        assert_ne!(first, second);
    }
}
