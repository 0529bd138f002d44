//! Daily and weekly summaries over accepted, transformed records.
//!
//! Groups are sparse: a day or week with no records simply does not appear.
//! Zero-filling calendar gaps is a presentation concern and belongs to the
//! dashboard adapter. Output order is chronological and deterministic —
//! identical input always yields identical tables.

use crate::transform::AnalyticalRecord;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Summary statistics for one metric within one period group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    /// Number of records contributing a value for this metric
    pub count: usize,
    /// Sum of the contributing values
    pub sum: f64,
    /// Arithmetic mean of the contributing values
    pub mean: f64,
    /// Smallest contributing value
    pub min: f64,
    /// Largest contributing value
    pub max: f64,
}

impl MetricStats {
    fn from_values(values: &[f64]) -> Self {
        let count = values.len();
        let sum: f64 = values.iter().sum();
        let mean = sum / count as f64;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Self {
            count,
            sum,
            mean,
            min,
            max,
        }
    }
}

/// One row of a summary table: a period and its aggregated metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Display label: the ISO date for daily rows, `YYYY-Www` for weekly rows
    pub period: String,
    /// First calendar day of the period, used for chronological ordering
    pub start: NaiveDate,
    /// Number of records in the group
    pub count: usize,
    /// Per-metric statistics, in the order metrics appear on the records
    pub metrics: IndexMap<String, MetricStats>,
}

/// The daily and weekly summary tables of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Per-day groups, chronological
    pub daily: Vec<PeriodSummary>,
    /// Per-ISO-week groups, chronological
    pub weekly: Vec<PeriodSummary>,
}

/// Computes summary tables over transformed records.
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator;

impl Aggregator {
    /// Groups records by calendar day and ISO week and computes count plus
    /// sum/mean/min/max for every metric present in each group.
    pub fn summarize(records: &[AnalyticalRecord]) -> Summary {
        let mut by_day: BTreeMap<NaiveDate, Vec<&AnalyticalRecord>> = BTreeMap::new();
        let mut by_week: BTreeMap<NaiveDate, Vec<&AnalyticalRecord>> = BTreeMap::new();

        for record in records {
            by_day.entry(record.date).or_default().push(record);
            by_week.entry(record.week_start).or_default().push(record);
        }

        let daily = by_day
            .into_iter()
            .map(|(date, group)| Self::summarize_group(date.to_string(), date, &group))
            .collect();
        let weekly = by_week
            .into_iter()
            .map(|(start, group)| {
                let label = group[0].week_label.clone();
                Self::summarize_group(label, start, &group)
            })
            .collect();

        let summary = Summary { daily, weekly };
        debug!(
            daily_groups = summary.daily.len(),
            weekly_groups = summary.weekly.len(),
            "Computed summary tables"
        );
        summary
    }

    fn summarize_group(
        period: String,
        start: NaiveDate,
        group: &[&AnalyticalRecord],
    ) -> PeriodSummary {
        let mut values: IndexMap<String, Vec<f64>> = IndexMap::new();
        for record in group {
            for (metric, value) in &record.metrics {
                values.entry(metric.clone()).or_default().push(*value);
            }
        }

        let metrics = values
            .into_iter()
            .map(|(metric, values)| (metric, MetricStats::from_values(&values)))
            .collect();

        PeriodSummary {
            period,
            start,
            count: group.len(),
            metrics,
        }
    }
}
