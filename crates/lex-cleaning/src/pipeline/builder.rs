//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for running an
//! ordered list of cleaning operations over a dataset.

use crate::config::TransformConfig;
use crate::dataset::Dataset;
use crate::error::{CleaningError, Result};
use crate::pipeline::executor::TransformExecutor;
use crate::pipeline::progress::{ClosureProgressReporter, ProgressReporter, ProgressUpdate};
use crate::types::{CleaningSummary, Diagnostic, PipelineResult, RunState};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// The cleaning pipeline.
///
/// A run folds every enabled operation over the dataset in order. A failing
/// operation is recorded as an error diagnostic and skipped; the run always
/// finishes and returns the best-effort dataset.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::{ImputationMethod, Pipeline, TransformConfig};
///
/// let config = TransformConfig::builder()
///     .fill_missing(ImputationMethod::Mean)
///     .clean_text()
///     .build()?;
///
/// let result = Pipeline::builder()
///     .on_progress(|update| {
///         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
///     })
///     .build()
///     .run(&dataset, &config);
///
/// for diagnostic in &result.diagnostics {
///     println!("{}", diagnostic);
/// }
/// ```
pub struct Pipeline {
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    executor: TransformExecutor,
}

// Ensure Pipeline is Send (can be moved to a worker thread)
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Run the pipeline, or fail with [`CleaningError::NoDataLoaded`] when
    /// there is no dataset. No operation runs in that case.
    pub fn try_run(
        &self,
        dataset: Option<&Dataset>,
        config: &TransformConfig,
    ) -> Result<PipelineResult> {
        let dataset = dataset.ok_or(CleaningError::NoDataLoaded)?;
        Ok(self.run(dataset, config))
    }

    /// Run every enabled operation of `config` over `dataset`.
    ///
    /// The input dataset is never modified.
    pub fn run(&self, dataset: &Dataset, config: &TransformConfig) -> PipelineResult {
        let start_time = Instant::now();
        let mut state = RunState::Idle;
        transition(&mut state, RunState::Running);

        let total_steps = config.enabled_operations().count();
        info!(
            "Starting cleaning pipeline: {} rows x {} columns, {} operations",
            dataset.row_count(),
            dataset.column_count(),
            total_steps
        );

        let mut working = dataset.clone();
        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        let mut derived_columns: Vec<String> = Vec::new();
        let mut processing_steps: Vec<String> = Vec::new();
        let mut summary = CleaningSummary::new();
        let mut step = 0;

        for entry in &config.operations {
            let operation = &entry.operation;
            if !entry.enabled {
                debug!("Skipping disabled operation {}", operation.name());
                processing_steps.push(format!("Skipped {} (disabled)", operation.name()));
                summary.steps_skipped += 1;
                continue;
            }

            step += 1;
            info!("Step {}/{}: {}", step, total_steps, operation);
            self.report_progress(ProgressUpdate::step_started(step, total_steps, operation.name()));

            match self.executor.apply(operation, &working) {
                Ok(outcome) => {
                    for message in outcome.warnings {
                        warn!("{}: {}", operation.name(), message);
                        diagnostics.push(Diagnostic::warning(operation.name(), message));
                    }
                    if let Some(column) = outcome.derived_column
                        && !derived_columns.contains(&column)
                    {
                        derived_columns.push(column);
                    }
                    summary.actions.extend(outcome.actions);
                    processing_steps.extend(outcome.processing_steps);
                    working = outcome.dataset;
                    summary.steps_applied += 1;

                    self.report_progress(ProgressUpdate::step_finished(
                        step,
                        total_steps,
                        operation.name(),
                        format!("{} complete", operation.name()),
                    ));
                }
                Err(e) => {
                    error!("{} failed: {}", operation.name(), e);
                    processing_steps.push(format!("{} failed: {}", operation.name(), e));
                    diagnostics.push(Diagnostic::error(operation.name(), e.to_string()));
                    summary.steps_failed += 1;

                    self.report_progress(ProgressUpdate::step_failed(
                        step,
                        total_steps,
                        operation.name(),
                        e.to_string(),
                    ));
                }
            }
        }

        let terminal = if diagnostics.iter().any(Diagnostic::is_error) {
            RunState::PartiallyFailed
        } else {
            RunState::Completed
        };
        transition(&mut state, terminal);

        summary.record_shapes(dataset, &working);
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Pipeline {} in {}ms: {} rows x {} columns, {} diagnostics",
            state,
            summary.duration_ms,
            working.row_count(),
            working.column_count(),
            diagnostics.len()
        );
        self.report_progress(ProgressUpdate::complete(
            total_steps,
            format!("Pipeline {}", state),
        ));

        PipelineResult {
            dataset: working,
            state,
            diagnostics,
            derived_columns,
            processing_steps,
            summary,
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }
}

fn transition(state: &mut RunState, next: RunState) {
    debug!("Pipeline state: {} -> {}", state, next);
    *state = next;
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Ensure PipelineBuilder is Send (can be moved to another thread during construction)
static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set a progress reporter for receiving updates during a run.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    ///
    /// This is a convenience method for simple progress handling.
    /// For more complex scenarios, use [`progress_reporter`](Self::progress_reporter).
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> Pipeline {
        Pipeline {
            progress_reporter: self.progress_reporter,
            executor: TransformExecutor,
        }
    }
}
