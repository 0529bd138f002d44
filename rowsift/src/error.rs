//! Error types for the rowsift pipeline.
//!
//! This module provides the error handling strategy for the crate using
//! `thiserror`. Only structural problems are represented here: bad
//! configuration, transform contract bugs, adapter I/O failures, and stage
//! failures. Per-row validation problems are never errors — they are captured
//! as [`RejectionRecord`](crate::core::RejectionRecord) data and flow through
//! the pipeline like any other output.

use thiserror::Error;

/// The main error type for the rowsift library.
///
/// Every variant is fatal to a pipeline run. Expected data problems
/// (missing fields, out-of-range values, unparsable timestamps) do not
/// appear here by design.
#[derive(Error, Debug)]
pub enum SiftError {
    /// Error related to pipeline configuration (empty schema, duplicate
    /// field names, invalid banding edges, unknown field references).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error raised when a transform fails on an already-validated record.
    ///
    /// The record passed schema validation, so a failure here indicates a
    /// schema/transform mismatch bug rather than bad input.
    #[error("Transform failed for validated row {row}: {detail}")]
    Transform {
        /// Source row index of the record that could not be transformed
        row: usize,
        /// Which derivation failed and why
        detail: String,
    },

    /// Error that occurred during a specific pipeline stage.
    #[error("Pipeline failed during {stage}: {source}")]
    Stage {
        /// Name of the stage that was executing when the failure occurred
        stage: String,
        /// The underlying error
        #[source]
        source: Box<SiftError>,
    },

    /// Error from I/O operations reported by a load or export adapter.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic internal error for unexpected conditions.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A type alias for `Result<T, SiftError>`.
///
/// This is the standard `Result` type used throughout the rowsift library.
pub type Result<T> = std::result::Result<T, SiftError>;

impl SiftError {
    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates a new transform contract error for the given source row.
    pub fn transform(row: usize, detail: impl Into<String>) -> Self {
        Self::Transform {
            row,
            detail: detail.into(),
        }
    }

    /// Wraps this error with the pipeline stage it occurred in.
    ///
    /// Errors already tagged with a stage are returned unchanged so the
    /// originating stage is preserved through nested calls.
    pub fn at_stage(self, stage: impl Into<String>) -> Self {
        match self {
            already_tagged @ Self::Stage { .. } => already_tagged,
            other => Self::Stage {
                stage: stage.into(),
                source: Box::new(other),
            },
        }
    }
}

impl From<serde_json::Error> for SiftError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Adds context to an error.
    fn context(self, msg: &str) -> Result<T>;

    /// Adds context with a lazy message.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<SiftError>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.map_err(|e| {
            let base_error = e.into();
            SiftError::Internal(format!("{msg}: {base_error}"))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let msg = f();
            let base_error = e.into();
            SiftError::Internal(format!("{msg}: {base_error}"))
        })
    }
}
