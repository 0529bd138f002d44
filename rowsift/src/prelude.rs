//! Prelude for commonly used types and traits in rowsift.

pub use crate::config::PipelineConfig;
pub use crate::core::{PipelineResult, RunMetrics};
pub use crate::error::{ErrorContext, Result, SiftError};
pub use crate::pipeline::Pipeline;
pub use crate::report::{FormatterConfig, ResultFormatter};
