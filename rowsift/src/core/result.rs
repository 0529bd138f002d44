//! Pipeline run result types.

use super::record::{RejectionRecord, ValidatedRecord};
use crate::aggregate::Summary;
use serde::{Deserialize, Serialize};

/// Counters collected over one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Total number of input rows
    pub input_rows: usize,
    /// Number of rows accepted by validation
    pub accepted_rows: usize,
    /// Number of rows rejected by validation
    pub rejected_rows: usize,
    /// Total number of individual violations across all rejected rows
    pub violations: usize,
    /// Total execution time in milliseconds
    pub execution_time_ms: u64,
}

impl RunMetrics {
    /// Creates new run metrics with all counts set to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the acceptance rate as a percentage (0.0 to 100.0).
    ///
    /// An empty input counts as fully accepted.
    pub fn acceptance_rate(&self) -> f64 {
        if self.input_rows == 0 {
            100.0
        } else {
            (self.accepted_rows as f64 / self.input_rows as f64) * 100.0
        }
    }
}

/// The immutable outcome of one pipeline run.
///
/// Owns the three datasets the export and dashboard adapters consume:
/// accepted records, rejection records, and the aggregated summary. Created
/// once per run and never mutated afterwards; adapters get read-only access
/// through the accessors, so repeated reads always observe identical content
/// in identical order.
///
/// The three datasets are mutually consistent: every input row appears in
/// exactly one of accepted/rejected, and the summary is derived only from
/// the accepted records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    accepted: Vec<ValidatedRecord>,
    rejected: Vec<RejectionRecord>,
    summary: Summary,
    metrics: RunMetrics,
}

impl PipelineResult {
    /// Assembles a result from the datasets of a completed run.
    pub(crate) fn new(
        accepted: Vec<ValidatedRecord>,
        rejected: Vec<RejectionRecord>,
        summary: Summary,
        metrics: RunMetrics,
    ) -> Self {
        Self {
            accepted,
            rejected,
            summary,
            metrics,
        }
    }

    /// The accepted records, in source row order.
    pub fn accepted(&self) -> &[ValidatedRecord] {
        &self.accepted
    }

    /// The rejection records, in source row order.
    pub fn rejected(&self) -> &[RejectionRecord] {
        &self.rejected
    }

    /// The daily and weekly summary tables.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// The run counters.
    pub fn metrics(&self) -> &RunMetrics {
        &self.metrics
    }

    /// Returns true if no row was rejected.
    pub fn is_fully_accepted(&self) -> bool {
        self.rejected.is_empty()
    }

    /// Formats the result as compact JSON.
    pub fn to_json(&self) -> crate::error::Result<String> {
        use crate::report::{JsonFormatter, ResultFormatter as _};
        JsonFormatter::new().format(self)
    }

    /// Formats the result as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        use crate::report::{JsonFormatter, ResultFormatter as _};
        JsonFormatter::new().with_pretty(true).format(self)
    }

    /// Formats the result in a human-readable layout.
    pub fn to_human(&self) -> crate::error::Result<String> {
        use crate::report::{HumanFormatter, ResultFormatter as _};
        HumanFormatter::new().format(self)
    }
}
