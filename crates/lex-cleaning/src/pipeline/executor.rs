//! Transform executor module.
//!
//! Dispatches a single [`Operation`] to the transform that implements it and
//! collects what the transform did.

use crate::binning::{BinningOutcome, apply_binning};
use crate::cleaner::{DataCleaner, changed_cells};
use crate::config::Operation;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::pipeline::outliers::OutlierHandler;
use crate::types::{ActionType, CleaningAction};
use tracing::debug;

/// Warning raised when binning targets a non-numeric column.
pub const BINNING_NOT_NUMERIC: &str = "binning requires a numeric column";

/// What one successful step produced.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub dataset: Dataset,
    /// Recoverable problems. The dataset is unchanged when one is raised.
    pub warnings: Vec<String>,
    pub actions: Vec<CleaningAction>,
    /// Column added by the step, if any.
    pub derived_column: Option<String>,
    pub processing_steps: Vec<String>,
}

impl StepOutcome {
    fn new(dataset: Dataset, processing_steps: Vec<String>) -> Self {
        Self {
            dataset,
            warnings: Vec::new(),
            actions: Vec::new(),
            derived_column: None,
            processing_steps,
        }
    }

    fn with_action(mut self, action: Option<CleaningAction>) -> Self {
        if let Some(action) = action {
            let action = if self.processing_steps.is_empty() {
                action
            } else {
                action.with_details(self.processing_steps.join("; "))
            };
            self.actions.push(action);
        }
        self
    }
}

/// Executes cleaning operations on a dataset.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransformExecutor;

impl TransformExecutor {
    /// Apply one operation to `dataset`, returning a new dataset.
    ///
    /// An `Err` means the step failed and the caller should keep `dataset`.
    pub fn apply(&self, operation: &Operation, dataset: &Dataset) -> Result<StepOutcome> {
        let mut steps = Vec::new();

        let outcome = match operation {
            Operation::FillMissing { method } => {
                let filled = StatisticalImputer::fill_missing(dataset, *method, &mut steps)?;
                let count = dataset.missing_count() - filled.missing_count();
                let action = (count > 0).then(|| {
                    CleaningAction::new(
                        ActionType::ValueImputed,
                        "dataset",
                        format!("Filled {} missing values ({})", count, method),
                    )
                });
                StepOutcome::new(filled, steps).with_action(action)
            }
            Operation::RemoveDuplicates => {
                let deduped = DataCleaner::remove_duplicates(dataset, &mut steps)?;
                let removed = dataset.row_count() - deduped.row_count();
                let action = (removed > 0).then(|| {
                    CleaningAction::new(
                        ActionType::DuplicatesRemoved,
                        "dataset",
                        format!("Removed {} duplicate rows", removed),
                    )
                });
                StepOutcome::new(deduped, steps).with_action(action)
            }
            Operation::RemoveOutliers => {
                let filtered = OutlierHandler::remove_outliers(dataset, &mut steps)?;
                let removed = dataset.row_count() - filtered.row_count();
                let action = (removed > 0).then(|| {
                    CleaningAction::new(
                        ActionType::OutliersRemoved,
                        "dataset",
                        format!("Removed {} rows containing outliers", removed),
                    )
                });
                StepOutcome::new(filtered, steps).with_action(action)
            }
            Operation::CleanText => {
                let cleaned = DataCleaner::normalize_text(dataset, &mut steps)?;
                let changed = total_changed_cells(dataset, &cleaned);
                let action = (changed > 0).then(|| {
                    CleaningAction::new(
                        ActionType::TextNormalized,
                        "dataset",
                        format!("Trimmed and lower-cased {} text values", changed),
                    )
                });
                StepOutcome::new(cleaned, steps).with_action(action)
            }
            Operation::CorrectSpelling => {
                let fixed = DataCleaner::correct_spelling(dataset, &mut steps)?;
                let changed = total_changed_cells(dataset, &fixed);
                let action = (changed > 0).then(|| {
                    CleaningAction::new(
                        ActionType::SpellingCorrected,
                        "dataset",
                        format!("Corrected spelling in {} values", changed),
                    )
                });
                StepOutcome::new(fixed, steps).with_action(action)
            }
            Operation::StandardizeFormats => {
                let standardized = DataCleaner::standardize_formats(dataset, &mut steps)?;
                let actions: Vec<CleaningAction> = dataset
                    .columns()
                    .iter()
                    .zip(standardized.columns())
                    .filter(|(before, after)| changed_cells(before, after) > 0)
                    .map(|(_, after)| {
                        CleaningAction::new(
                            ActionType::FormatStandardized,
                            after.name(),
                            format!("Converted '{}' to {}", after.name(), after.kind()),
                        )
                    })
                    .collect();
                let mut outcome = StepOutcome::new(standardized, steps);
                outcome.actions = actions;
                outcome
            }
            Operation::Binning { column, bins } => {
                match apply_binning(dataset, column, *bins, &mut steps)? {
                    BinningOutcome::Binned {
                        dataset: binned,
                        column: derived,
                        ..
                    } => {
                        let action = CleaningAction::new(
                            ActionType::ColumnBinned,
                            derived.as_str(),
                            format!("Binned '{}' into {} bins", column, bins),
                        );
                        let mut outcome = StepOutcome::new(binned, steps).with_action(Some(action));
                        outcome.derived_column = Some(derived);
                        outcome
                    }
                    BinningOutcome::NotNumeric => {
                        let mut outcome = StepOutcome::new(dataset.clone(), steps);
                        outcome.warnings.push(BINNING_NOT_NUMERIC.to_string());
                        outcome
                    }
                }
            }
        };

        debug!(
            "{}: {} rows x {} columns after step",
            operation.name(),
            outcome.dataset.row_count(),
            outcome.dataset.column_count()
        );
        Ok(outcome)
    }
}

/// Changed cells across all columns of two same-shaped datasets.
fn total_changed_cells(before: &Dataset, after: &Dataset) -> usize {
    before
        .columns()
        .iter()
        .zip(after.columns())
        .map(|(b, a)| changed_cells(b, a))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImputationMethod;
    use crate::dataset::{Cell, Column};
    use crate::error::CleaningError;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::from_values("age", vec![Some(30.0), None, Some(40.0), Some(40.0)]),
            Column::from_values("city", vec![" Teh City ", "oslo", "rome", "rome"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_fill_missing_action() {
        let outcome = TransformExecutor
            .apply(
                &Operation::FillMissing {
                    method: ImputationMethod::Median,
                },
                &sample(),
            )
            .unwrap();

        assert_eq!(outcome.dataset.missing_count(), 0);
        assert_eq!(outcome.actions.len(), 1);
        assert_eq!(outcome.actions[0].action_type, ActionType::ValueImputed);
        assert!(outcome.actions[0].details.as_deref().unwrap().contains("median"));
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_clean_text_then_spelling() {
        let cleaned = TransformExecutor.apply(&Operation::CleanText, &sample()).unwrap();
        assert_eq!(
            cleaned.dataset.column("city").unwrap().cells()[0],
            Cell::text("teh city")
        );

        let fixed = TransformExecutor
            .apply(&Operation::CorrectSpelling, &cleaned.dataset)
            .unwrap();
        assert_eq!(
            fixed.dataset.column("city").unwrap().cells()[0],
            Cell::text("the city")
        );
        assert_eq!(fixed.actions[0].action_type, ActionType::SpellingCorrected);
    }

    #[test]
    fn test_no_change_means_no_action() {
        let outcome = TransformExecutor
            .apply(&Operation::RemoveOutliers, &sample())
            .unwrap();
        assert!(outcome.actions.is_empty());
        assert_eq!(outcome.dataset, sample());
    }

    #[test]
    fn test_standardize_formats_action_per_column() {
        let ds = Dataset::new(vec![
            Column::from_values("when", vec!["2021-01-01", "2021-02-01"]),
            Column::from_values("n", vec!["1", "2"]),
            Column::from_values("word", vec!["a", "b"]),
        ])
        .unwrap();

        let outcome = TransformExecutor
            .apply(&Operation::StandardizeFormats, &ds)
            .unwrap();
        let targets: Vec<_> = outcome.actions.iter().map(|a| a.target.as_str()).collect();
        assert_eq!(targets, vec!["when", "n"]);
    }

    #[test]
    fn test_binning_reports_derived_column() {
        let ds = Dataset::new(vec![Column::from_values("x", vec![1.0, 2.0, 3.0])]).unwrap();
        let outcome = TransformExecutor
            .apply(
                &Operation::Binning {
                    column: "x".to_string(),
                    bins: 3,
                },
                &ds,
            )
            .unwrap();
        assert_eq!(outcome.derived_column.as_deref(), Some("x_binned"));
        assert_eq!(outcome.dataset.column_count(), 2);
    }

    #[test]
    fn test_binning_text_column_warns() {
        let outcome = TransformExecutor
            .apply(
                &Operation::Binning {
                    column: "city".to_string(),
                    bins: 3,
                },
                &sample(),
            )
            .unwrap();
        assert_eq!(outcome.warnings, vec![BINNING_NOT_NUMERIC.to_string()]);
        assert_eq!(outcome.dataset, sample());
        assert!(outcome.derived_column.is_none());
    }

    #[test]
    fn test_binning_unknown_column_errors() {
        let result = TransformExecutor.apply(
            &Operation::Binning {
                column: "zip".to_string(),
                bins: 3,
            },
            &sample(),
        );
        assert!(matches!(result, Err(CleaningError::ColumnNotFound(_))));
    }
}
