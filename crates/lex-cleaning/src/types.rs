use crate::dataset::Dataset;
use crate::profiler::ColumnKind;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing_count: usize,
    pub missing_percentage: f64,
    pub unique_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub shape: (usize, usize),
    pub column_profiles: Vec<ColumnProfile>,
    pub duplicate_count: usize,
    pub duplicate_percentage: f64,
}

// ============================================================================
// Diagnostics
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The step was a no-op but the run is still considered clean.
    Warning,
    /// The step failed and was skipped.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// A message produced by a pipeline step, tagged with the operation that
/// raised it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub operation: String,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn error(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.operation, self.message)
    }
}

/// Lifecycle of a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    /// Every enabled step ran without an error diagnostic.
    Completed,
    /// At least one step failed; the dataset reflects the remaining steps.
    PartiallyFailed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::PartiallyFailed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::PartiallyFailed => "partially_failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a pipeline run hands back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    /// Best-effort dataset after all successful steps.
    pub dataset: Dataset,
    pub state: RunState,
    pub diagnostics: Vec<Diagnostic>,
    /// Columns added by the run (e.g. `price_binned`).
    pub derived_columns: Vec<String>,
    pub processing_steps: Vec<String>,
    pub summary: CleaningSummary,
}

impl PipelineResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }
}

// ============================================================================
// Cleaning Summary
// ============================================================================

/// Human-readable summary of what the pipeline did.
///
/// # Example
///
/// ```rust,ignore
/// let summary = &result.summary;
/// println!("Kept {} of {} rows in {}ms", summary.rows_after, summary.rows_before, summary.duration_ms);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_removed: usize,

    pub columns_before: usize,
    pub columns_after: usize,
    /// Columns created by binning.
    pub columns_added: usize,

    /// Missing cells before and after the run.
    pub missing_before: usize,
    pub missing_after: usize,

    pub steps_applied: usize,
    pub steps_skipped: usize,
    pub steps_failed: usize,

    /// Audit trail of the changes each step made.
    pub actions: Vec<CleaningAction>,
}

impl CleaningSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage of input rows dropped by the run.
    pub fn rows_removed_percentage(&self) -> f32 {
        if self.rows_before == 0 {
            0.0
        } else {
            (self.rows_removed as f32 / self.rows_before as f32) * 100.0
        }
    }

    /// Record the shape of the input and output datasets.
    pub(crate) fn record_shapes(&mut self, before: &Dataset, after: &Dataset) {
        self.rows_before = before.row_count();
        self.rows_after = after.row_count();
        self.rows_removed = self.rows_before.saturating_sub(self.rows_after);
        self.columns_before = before.column_count();
        self.columns_after = after.column_count();
        self.columns_added = self.columns_after.saturating_sub(self.columns_before);
        self.missing_before = before.missing_count();
        self.missing_after = after.missing_count();
    }
}

/// A single change made by a pipeline step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningAction {
    pub action_type: ActionType,
    /// Column name, or "dataset" for row-level changes.
    pub target: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CleaningAction {
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    ValueImputed,
    OutliersRemoved,
    DuplicatesRemoved,
    TextNormalized,
    SpellingCorrected,
    FormatStandardized,
    ColumnBinned,
}

impl ActionType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ValueImputed => "Value Imputed",
            Self::OutliersRemoved => "Outliers Removed",
            Self::DuplicatesRemoved => "Duplicates Removed",
            Self::TextNormalized => "Text Normalized",
            Self::SpellingCorrected => "Spelling Corrected",
            Self::FormatStandardized => "Format Standardized",
            Self::ColumnBinned => "Column Binned",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
