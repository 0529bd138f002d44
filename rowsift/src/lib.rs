//! # rowsift - Validation and Partitioning for Tabular Logs
//!
//! rowsift turns messy hand-entered tabular log data into trustworthy,
//! analyzable datasets. A batch of raw rows is cleaned, checked against a
//! declarative schema, and partitioned into accepted records and rejection
//! records — every input row ends up in exactly one of the two, and every
//! rejection explains all of the row's problems in plain language.
//!
//! ## Overview
//!
//! The pipeline runs five stages over each batch:
//!
//! 1. **Clean** ([`clean`]): trim text, map missing-value tokens, parse
//!    timestamps from a list of accepted formats.
//! 2. **Validate** ([`validate`]): check every row against the schema and
//!    partition the batch. Checks are exhaustive per row.
//! 3. **Transform** ([`transform`]): reshape accepted records for analysis —
//!    calendar day, ISO week, configured metrics, optional banding.
//! 4. **Aggregate** ([`aggregate`]): daily and weekly summary tables with
//!    count/sum/mean/min/max per metric.
//! 5. **Report** ([`report`]): format the result for JSON, console, or
//!    spreadsheet-shaped export rows.
//!
//! Rejected rows are data, not errors: a run with nothing but bad input
//! still completes and tells you exactly why each row was turned away.
//!
//! ## Quick Start
//!
//! ```rust
//! use rowsift::prelude::*;
//! use rowsift::core::{RawRow, RawValue};
//! use rowsift::schema::{FieldConstraint, FieldSpec, FieldType};
//! use rowsift::transform::TransformConfig;
//!
//! # fn example() -> rowsift::error::Result<()> {
//! let config = PipelineConfig::new(
//!     vec![
//!         FieldSpec::required("logged_at", FieldType::Timestamp),
//!         FieldSpec::required("volume_ml", FieldType::Number)
//!             .with_constraint(FieldConstraint::Range { min: Some(0.0), max: Some(500.0) }),
//!         FieldSpec::optional("note", FieldType::Text),
//!     ],
//!     TransformConfig::new("logged_at").with_metric("volume_ml"),
//! );
//! let pipeline = Pipeline::new(config)?;
//!
//! let rows = vec![
//!     RawRow::new()
//!         .with("logged_at", RawValue::text("2024-03-05 09:00:00"))
//!         .with("volume_ml", RawValue::number(120.0)),
//!     RawRow::new()
//!         .with("logged_at", RawValue::text("not a date"))
//!         .with("volume_ml", RawValue::number(900.0)),
//! ];
//!
//! let result = pipeline.run(rows)?;
//! assert_eq!(result.accepted().len(), 1);
//! assert_eq!(result.rejected().len(), 1);
//!
//! for rejection in result.rejected() {
//!     println!("row {}:\n{}", rejection.index(), rejection.error_details());
//! }
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Architecture
//!
//! - **`core`**: value, row, record, and result types shared by all stages
//! - **`schema`**: declarative field specs, constraints, and the table schema
//! - **`clean`**: normalization of raw cells
//! - **`validate`**: exhaustive checking and partitioning
//! - **`transform`**: analytical reshaping of accepted records
//! - **`aggregate`**: daily/weekly summary tables
//! - **`pipeline`**: the orchestrator sequencing the stages
//! - **`config`**: the single configuration document
//! - **`report`**: result formatting and export-contract shaping
//! - **`logging`**: structured logging configuration
//!
//! Loading rows from files and writing spreadsheets are adapter concerns
//! kept outside this crate; the pipeline works on in-memory batches.

pub mod aggregate;
pub mod clean;
pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod prelude;
pub mod report;
pub mod schema;
pub mod transform;
pub mod validate;
