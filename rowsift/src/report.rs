//! Result formatting and export-contract shaping.
//!
//! This module turns a [`PipelineResult`] into the flat shapes the export
//! and dashboard adapters consume: JSON for programmatic use, a
//! human-readable layout for console review, and flattened row types that
//! map one-to-one onto spreadsheet sheets ("Validated Data", "Input Data
//! Errors", summary tables). Actual serialization to a spreadsheet stays
//! with the export adapter.

use crate::aggregate::PeriodSummary;
use crate::core::PipelineResult;
use crate::error::Result;
use crate::logging::truncate_field;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Configuration options for formatting pipeline results.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Include run counters in the output
    pub include_metrics: bool,
    /// Include individual rejection details
    pub include_rejections: bool,
    /// Include the daily/weekly summary tables
    pub include_summary: bool,
    /// Maximum number of rejections to display (`None` for all)
    pub max_rejections: Option<usize>,
    /// Maximum length for displayed field values
    pub max_field_length: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            include_metrics: true,
            include_rejections: true,
            include_summary: true,
            max_rejections: None,
            max_field_length: 256,
        }
    }
}

impl FormatterConfig {
    /// Creates a minimal configuration showing only the run counters.
    pub fn minimal() -> Self {
        Self {
            include_metrics: true,
            include_rejections: false,
            include_summary: false,
            max_rejections: Some(0),
            max_field_length: 128,
        }
    }

    /// Sets the maximum number of rejections to display.
    pub fn with_max_rejections(mut self, max: usize) -> Self {
        self.max_rejections = Some(max);
        self
    }

    /// Sets whether to include the summary tables.
    pub fn with_summary(mut self, include: bool) -> Self {
        self.include_summary = include;
        self
    }
}

/// Trait for formatting pipeline results into different output formats.
pub trait ResultFormatter {
    /// Formats a pipeline result into a string representation.
    fn format(&self, result: &PipelineResult) -> Result<String>;
}

/// Formats pipeline results as structured JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter producing compact output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to pretty-print the output.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl ResultFormatter for JsonFormatter {
    fn format(&self, result: &PipelineResult) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(result)?
        } else {
            serde_json::to_string(result)?
        };
        Ok(json)
    }
}

/// Formats pipeline results in a human-readable console layout.
#[derive(Debug, Clone, Default)]
pub struct HumanFormatter {
    config: FormatterConfig,
}

impl HumanFormatter {
    /// Creates a human formatter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a human formatter with the given configuration.
    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }
}

impl ResultFormatter for HumanFormatter {
    fn format(&self, result: &PipelineResult) -> Result<String> {
        let mut out = String::new();
        let metrics = result.metrics();

        if result.is_fully_accepted() {
            writeln!(out, "Pipeline run: all {} rows passed validation", metrics.input_rows).ok();
        } else {
            writeln!(
                out,
                "Pipeline run: {} rows -> {} accepted, {} rejected",
                metrics.input_rows, metrics.accepted_rows, metrics.rejected_rows
            )
            .ok();
        }

        if self.config.include_metrics {
            writeln!(
                out,
                "  acceptance rate: {:.2}%  violations: {}  duration: {}ms",
                metrics.acceptance_rate(),
                metrics.violations,
                metrics.execution_time_ms
            )
            .ok();
        }

        if self.config.include_rejections && !result.rejected().is_empty() {
            writeln!(out, "\nRejections:").ok();
            let shown = self
                .config
                .max_rejections
                .unwrap_or(result.rejected().len());
            for rejection in result.rejected().iter().take(shown) {
                writeln!(
                    out,
                    "  row {}: {} violation(s)",
                    rejection.index(),
                    rejection.violations().len()
                )
                .ok();
                for message in rejection.messages() {
                    writeln!(
                        out,
                        "    - {}",
                        truncate_field(&message, self.config.max_field_length)
                    )
                    .ok();
                }
            }
            let hidden = result.rejected().len().saturating_sub(shown);
            if hidden > 0 {
                writeln!(out, "  ... and {hidden} more").ok();
            }
        }

        if self.config.include_summary {
            writeln!(
                out,
                "\nSummary: {} daily group(s), {} weekly group(s)",
                result.summary().daily.len(),
                result.summary().weekly.len()
            )
            .ok();
        }

        Ok(out)
    }
}

/// One row of the error-report sheet: the original values plus every
/// violation found for the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectionReportRow {
    /// Source row index
    pub row_index: usize,
    /// The row's original field values, in source column order
    pub values: IndexMap<String, String>,
    /// Number of violations on the row
    pub total_errors: usize,
    /// All violations joined into one numbered block
    pub error_details: String,
}

/// Flattens the rejection records into error-report rows, in source order.
pub fn rejection_rows(result: &PipelineResult) -> Vec<RejectionReportRow> {
    result
        .rejected()
        .iter()
        .map(|rejection| RejectionReportRow {
            row_index: rejection.index(),
            values: rejection.original_values().clone(),
            total_errors: rejection.violations().len(),
            error_details: rejection.error_details(),
        })
        .collect()
}

/// Flattens the accepted records into uniformly-shaped rows of display
/// values keyed by field name, in source order. Absent optional fields
/// render as empty cells.
pub fn accepted_rows(result: &PipelineResult) -> Vec<IndexMap<String, String>> {
    result
        .accepted()
        .iter()
        .map(|record| {
            record
                .iter()
                .map(|(name, value)| {
                    let cell = value.map(|v| v.to_string()).unwrap_or_default();
                    (name.to_string(), cell)
                })
                .collect()
        })
        .collect()
}

/// One flattened summary cell: a period, a metric, a statistic, a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Period label (ISO date or `YYYY-Www`)
    pub period: String,
    /// Metric field name, or `records` for the group count
    pub metric: String,
    /// Statistic name: `count`, `sum`, `mean`, `min`, or `max`
    pub statistic: String,
    /// The aggregated value
    pub value: f64,
}

/// Flattens one summary table into `(period, metric, statistic, value)`
/// rows, preserving chronological order.
pub fn summary_rows(table: &[PeriodSummary]) -> Vec<SummaryRow> {
    let mut rows = Vec::new();
    for group in table {
        rows.push(SummaryRow {
            period: group.period.clone(),
            metric: "records".to_string(),
            statistic: "count".to_string(),
            value: group.count as f64,
        });
        for (metric, stats) in &group.metrics {
            for (statistic, value) in [
                ("count", stats.count as f64),
                ("sum", stats.sum),
                ("mean", stats.mean),
                ("min", stats.min),
                ("max", stats.max),
            ] {
                rows.push(SummaryRow {
                    period: group.period.clone(),
                    metric: metric.clone(),
                    statistic: statistic.to_string(),
                    value,
                });
            }
        }
    }
    rows
}
