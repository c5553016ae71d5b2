//! Progress reporting for the cleaning pipeline.
//!
//! The runner reports before and after every enabled operation and once when
//! the run ends.
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_cleaning::Pipeline;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()
//!     .run(&dataset, &config);
//! ```

use serde::{Deserialize, Serialize};

/// Where in a run an update was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressPhase {
    /// An operation is about to run
    StepStarted,
    /// An operation finished, possibly with warnings
    StepFinished,
    /// An operation failed and was skipped
    StepFailed,
    /// The run has ended
    Complete,
}

impl ProgressPhase {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::StepStarted => "Running",
            Self::StepFinished => "Finished",
            Self::StepFailed => "Failed",
            Self::Complete => "Complete",
        }
    }
}

/// A single progress report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub phase: ProgressPhase,

    /// Operation name, absent for the completion update
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,

    /// One-based position of the operation among the enabled ones
    pub step: usize,

    pub total_steps: usize,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Human-readable message describing current activity
    pub message: String,
}

impl ProgressUpdate {
    /// Update emitted before operation `step` of `total_steps` runs.
    pub fn step_started(step: usize, total_steps: usize, operation: impl Into<String>) -> Self {
        let operation = operation.into();
        Self {
            phase: ProgressPhase::StepStarted,
            message: format!("Running {} ({}/{})", operation, step, total_steps),
            operation: Some(operation),
            step,
            total_steps,
            progress: fraction(step.saturating_sub(1), total_steps),
        }
    }

    /// Update emitted after operation `step` succeeded.
    pub fn step_finished(
        step: usize,
        total_steps: usize,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            phase: ProgressPhase::StepFinished,
            operation: Some(operation.into()),
            step,
            total_steps,
            progress: fraction(step, total_steps),
            message: message.into(),
        }
    }

    /// Update emitted after operation `step` failed.
    pub fn step_failed(
        step: usize,
        total_steps: usize,
        operation: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            phase: ProgressPhase::StepFailed,
            ..Self::step_finished(step, total_steps, operation, message)
        }
    }

    /// Creates a completion progress update.
    pub fn complete(total_steps: usize, message: impl Into<String>) -> Self {
        Self {
            phase: ProgressPhase::Complete,
            operation: None,
            step: total_steps,
            total_steps,
            progress: 1.0,
            message: message.into(),
        }
    }
}

fn fraction(done: usize, total: usize) -> f32 {
    if total == 0 {
        1.0
    } else {
        (done as f32 / total as f32).clamp(0.0, 1.0)
    }
}

/// Trait for receiving progress updates during a run.
///
/// Implementations must be `Send + Sync` so a pipeline carrying one can be
/// moved to a worker thread.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::{ProgressReporter, ProgressUpdate};
///
/// struct StderrReporter;
///
/// impl ProgressReporter for StderrReporter {
///     fn report(&self, update: ProgressUpdate) {
///         eprintln!("{}", update.message);
///     }
/// }
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Called before and after each operation. Implementations should return
    /// quickly.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}
