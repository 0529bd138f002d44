//! Pipeline configuration.
//!
//! One structured document configures a whole pipeline: schema field
//! definitions, cleaning rules, and the transform stage. It is validated
//! exactly once, when the pipeline is constructed — never per row.

use crate::clean::CleaningConfig;
use crate::error::Result;
use crate::schema::FieldSpec;
use crate::transform::TransformConfig;
use serde::{Deserialize, Serialize};

/// The externally supplied configuration for a pipeline.
///
/// # Examples
///
/// Loading from JSON:
///
/// ```rust
/// use rowsift::config::PipelineConfig;
///
/// let config = PipelineConfig::from_json(r#"{
///     "schema": [
///         {"name": "logged_at", "type": "timestamp"},
///         {"name": "volume_ml", "type": "number",
///          "constraints": [{"rule": "range", "min": 0.0, "max": 500.0}]}
///     ],
///     "transform": {
///         "timestamp_field": "logged_at",
///         "metric_fields": ["volume_ml"]
///     }
/// }"#).unwrap();
///
/// assert_eq!(config.schema.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Field definitions, in output column order
    pub schema: Vec<FieldSpec>,
    /// Cleaning rules; defaults cover common missing tokens and formats
    #[serde(default)]
    pub cleaning: CleaningConfig,
    /// Transform stage configuration
    pub transform: TransformConfig,
}

impl PipelineConfig {
    /// Creates a configuration from schema fields and a transform config,
    /// with default cleaning rules.
    pub fn new(schema: Vec<FieldSpec>, transform: TransformConfig) -> Self {
        Self {
            schema,
            cleaning: CleaningConfig::default(),
            transform,
        }
    }

    /// Replaces the cleaning rules.
    pub fn with_cleaning(mut self, cleaning: CleaningConfig) -> Self {
        self.cleaning = cleaning;
        self
    }

    /// Parses a configuration from a JSON document.
    ///
    /// Structural validation (schema construction, cross-checks) happens
    /// later, in [`Pipeline::new`](crate::pipeline::Pipeline::new).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
