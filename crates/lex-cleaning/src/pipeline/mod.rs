//! Pipeline module.
//!
//! This module provides the cleaning pipeline runner and related components.

mod builder;
mod executor;
pub mod outliers;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use executor::{BINNING_NOT_NUMERIC, StepOutcome, TransformExecutor};
pub use outliers::OutlierHandler;
pub use progress::{ClosureProgressReporter, ProgressPhase, ProgressReporter, ProgressUpdate};
