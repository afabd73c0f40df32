//! Pipeline module.
//!
//! This module provides the report pipeline and its progress reporting.

mod builder;
pub mod progress;

pub use builder::{ReviewPipeline, ReviewPipelineBuilder};
pub use progress::{ClosureProgressReporter, ProgressReporter, ProgressUpdate, ReportStage};
