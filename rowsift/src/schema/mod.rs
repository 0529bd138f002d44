//! Declarative record schema: per-field rules checked one row at a time.
//!
//! A [`TableSchema`] is built once from [`FieldSpec`]s and validated at
//! construction. Its single operation, [`TableSchema::check`], is pure and
//! total: for any cleaned row it returns the full list of violations, empty
//! iff the row conforms. Expected data problems never surface as errors
//! here — only schema configuration problems do, and only at construction.

mod field;
mod table;

pub use field::{FieldConstraint, FieldSpec, FieldType};
pub use table::TableSchema;
