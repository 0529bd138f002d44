//! Core data model for the rowsift pipeline.
//!
//! This module holds the types a row moves through on its way from untyped
//! input to a typed, partitioned outcome:
//!
//! ```text
//! RawRow ──clean──▶ CleanedRow ──check──▶ ValidatedRecord   (accepted)
//!                                     └──▶ RejectionRecord  (rejected)
//! ```
//!
//! - **[`RawRow`]** / [`RawValue`]: the input contract — an ordered mapping
//!   of column name to untyped scalar, in stable source order
//! - **[`CleanedRow`]** / [`CellValue`]: normalized but untrusted values,
//!   with "missing" and "present but invalid" kept distinct
//! - **[`ValidatedRecord`]** / [`FieldValue`]: a fully typed record whose
//!   fields satisfy all schema constraints simultaneously
//! - **[`RejectionRecord`]** / [`Violation`]: a rejected row carrying every
//!   violation found for it
//! - **[`PipelineResult`]** / [`RunMetrics`]: the immutable outcome of one
//!   run, owning the accepted, rejected, and summary datasets

mod record;
mod result;
mod row;
mod value;

pub use record::{RejectionRecord, RuleKind, ValidatedRecord, Violation};
pub use result::{PipelineResult, RunMetrics};
pub use row::{CleanedRow, RawRow};
pub use value::{CellValue, FieldValue, RawValue};
