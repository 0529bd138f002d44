//! Mapping of accepted records into the analytical shape.
//!
//! The transformer derives calendar fields (day, ISO week) from the
//! configured timestamp field, copies the configured numeric metrics, and
//! optionally classifies one metric into a labelled band. It is a pure
//! function per record. A failure here is a schema/transform mismatch bug,
//! not bad input — the record already passed validation — so it is fatal
//! and aborts the run with full context.

use crate::core::ValidatedRecord;
use crate::error::{Result, SiftError};
use crate::schema::{FieldType, TableSchema};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Optional classification of a numeric field into labelled bands.
///
/// `edges` are strictly increasing split points; `labels` has exactly one
/// more entry than `edges`. A value `v` gets the label of the band it falls
/// into: `labels[0]` for `v < edges[0]`, `labels[i]` for
/// `edges[i-1] <= v < edges[i]`, and the last label above the final edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandingConfig {
    /// The numeric field to classify
    pub field: String,
    /// Strictly increasing split points
    pub edges: Vec<f64>,
    /// One label per band (`edges.len() + 1` entries)
    pub labels: Vec<String>,
}

/// Configuration of the transform stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// The timestamp field calendar columns are derived from
    pub timestamp_field: String,
    /// Numeric fields carried into the analytical records and summaries
    #[serde(default)]
    pub metric_fields: Vec<String>,
    /// Optional band classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banding: Option<BandingConfig>,
}

impl TransformConfig {
    /// Creates a transform config deriving calendar fields from the given
    /// timestamp field.
    pub fn new(timestamp_field: impl Into<String>) -> Self {
        Self {
            timestamp_field: timestamp_field.into(),
            metric_fields: Vec::new(),
            banding: None,
        }
    }

    /// Adds a numeric metric field.
    pub fn with_metric(mut self, field: impl Into<String>) -> Self {
        self.metric_fields.push(field.into());
        self
    }

    /// Sets the band classification.
    pub fn with_banding(mut self, banding: BandingConfig) -> Self {
        self.banding = Some(banding);
        self
    }
}

/// An accepted record reshaped for aggregation and visualization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticalRecord {
    /// Source row index, carried through for traceability
    pub index: usize,
    /// The record's timestamp
    pub timestamp: NaiveDateTime,
    /// Calendar day derived from the timestamp
    pub date: NaiveDate,
    /// Monday of the record's ISO week, used for chronological grouping
    pub week_start: NaiveDate,
    /// ISO week label, e.g. `2024-W10`
    pub week_label: String,
    /// Metric values present on the record, in configured order
    pub metrics: IndexMap<String, f64>,
    /// Band label, when banding is configured and the banded field is present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<String>,
}

/// Maps validated records into [`AnalyticalRecord`]s.
#[derive(Debug, Clone)]
pub struct Transformer {
    config: TransformConfig,
}

impl Transformer {
    /// Creates a transformer, cross-checking the configuration against the
    /// schema.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the timestamp field is not a
    /// required timestamp field of the schema, a metric field is not a
    /// numeric field, or the banding edges/labels are malformed.
    pub fn new(config: TransformConfig, schema: &TableSchema) -> Result<Self> {
        match schema.field(&config.timestamp_field) {
            Some(spec) if spec.field_type == FieldType::Timestamp && spec.required => {}
            Some(spec) if spec.field_type == FieldType::Timestamp => {
                return Err(SiftError::configuration(format!(
                    "timestamp field '{}' must be required for calendar derivation",
                    spec.name
                )));
            }
            Some(spec) => {
                return Err(SiftError::configuration(format!(
                    "timestamp field '{}' is declared as {}",
                    spec.name, spec.field_type
                )));
            }
            None => {
                return Err(SiftError::configuration(format!(
                    "timestamp field '{}' is not declared in the schema",
                    config.timestamp_field
                )));
            }
        }

        for metric in &config.metric_fields {
            match schema.field(metric) {
                Some(spec) if spec.field_type == FieldType::Number => {}
                Some(spec) => {
                    return Err(SiftError::configuration(format!(
                        "metric field '{}' is declared as {}",
                        spec.name, spec.field_type
                    )));
                }
                None => {
                    return Err(SiftError::configuration(format!(
                        "metric field '{metric}' is not declared in the schema"
                    )));
                }
            }
        }

        if let Some(banding) = &config.banding {
            match schema.field(&banding.field) {
                Some(spec) if spec.field_type == FieldType::Number => {}
                _ => {
                    return Err(SiftError::configuration(format!(
                        "banding field '{}' is not a numeric schema field",
                        banding.field
                    )));
                }
            }
            if banding.edges.is_empty() {
                return Err(SiftError::configuration("banding requires at least one edge"));
            }
            if banding.edges.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(SiftError::configuration(
                    "banding edges must be strictly increasing",
                ));
            }
            if banding.labels.len() != banding.edges.len() + 1 {
                return Err(SiftError::configuration(format!(
                    "banding needs {} labels for {} edges, got {}",
                    banding.edges.len() + 1,
                    banding.edges.len(),
                    banding.labels.len()
                )));
            }
        }

        Ok(Self { config })
    }

    /// Transforms one validated record.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Transform`] if the configured timestamp field is
    /// absent or non-temporal on the record — a contract bug, since the
    /// record passed validation against the same schema.
    pub fn transform(&self, record: &ValidatedRecord) -> Result<AnalyticalRecord> {
        let timestamp = record
            .timestamp(&self.config.timestamp_field)
            .ok_or_else(|| {
                SiftError::transform(
                    record.index(),
                    format!(
                        "timestamp field '{}' is absent on a validated record",
                        self.config.timestamp_field
                    ),
                )
            })?;

        let date = timestamp.date();
        let iso_week = date.iso_week();
        let week_start = NaiveDate::from_isoywd_opt(iso_week.year(), iso_week.week(), Weekday::Mon)
            .ok_or_else(|| {
                SiftError::transform(
                    record.index(),
                    format!("cannot derive ISO week start for {date}"),
                )
            })?;
        let week_label = format!("{:04}-W{:02}", iso_week.year(), iso_week.week());

        let mut metrics = IndexMap::with_capacity(self.config.metric_fields.len());
        for field in &self.config.metric_fields {
            if let Some(value) = record.number(field) {
                metrics.insert(field.clone(), value);
            }
        }

        let band = match &self.config.banding {
            Some(banding) => record.number(&banding.field).map(|value| {
                let bucket = banding.edges.partition_point(|edge| *edge <= value);
                banding.labels[bucket].clone()
            }),
            None => None,
        };

        Ok(AnalyticalRecord {
            index: record.index(),
            timestamp,
            date,
            week_start,
            week_label,
            metrics,
            band,
        })
    }

    /// Transforms a batch of validated records, preserving order.
    pub fn transform_all(&self, records: &[ValidatedRecord]) -> Result<Vec<AnalyticalRecord>> {
        records.iter().map(|record| self.transform(record)).collect()
    }
}
