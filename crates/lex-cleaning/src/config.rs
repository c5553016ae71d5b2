//! Configuration types for the cleaning pipeline.
//!
//! A [`TransformConfig`] is an ordered list of operations, each with an
//! enabled flag. List order is execution order. Use
//! [`TransformConfig::builder()`] for a validated configuration, or
//! deserialize one from JSON.

use crate::error::{CleaningError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Smallest bin count accepted by the builder.
pub const BINS_MIN: i64 = 2;
/// Largest bin count accepted by the builder.
pub const BINS_MAX: i64 = 20;
/// Bin count used when none is given.
pub const DEFAULT_BINS: i64 = 5;

/// Statistic used to fill missing numeric values.
///
/// Non-numeric columns always use the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImputationMethod {
    #[default]
    Mean,
    Median,
    Mode,
}

impl ImputationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
        }
    }
}

impl fmt::Display for ImputationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImputationMethod {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "mode" => Ok(Self::Mode),
            other => Err(ConfigValidationError::UnknownImputationMethod(
                other.to_string(),
            )),
        }
    }
}

/// A single cleaning transformation and its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    FillMissing {
        #[serde(default)]
        method: ImputationMethod,
    },
    RemoveDuplicates,
    RemoveOutliers,
    CleanText,
    CorrectSpelling,
    StandardizeFormats,
    Binning {
        column: String,
        #[serde(default = "default_bins")]
        bins: i64,
    },
}

fn default_bins() -> i64 {
    DEFAULT_BINS
}

impl Operation {
    /// Stable name used to tag diagnostics and log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FillMissing { .. } => "fill_missing",
            Self::RemoveDuplicates => "remove_duplicates",
            Self::RemoveOutliers => "remove_outliers",
            Self::CleanText => "clean_text",
            Self::CorrectSpelling => "correct_spelling",
            Self::StandardizeFormats => "standardize_formats",
            Self::Binning { .. } => "binning",
        }
    }

    /// Check the parameters a caller is expected to supply.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if let Self::Binning { column, bins } = self {
            if column.trim().is_empty() {
                return Err(ConfigValidationError::EmptyColumnName);
            }
            if !(BINS_MIN..=BINS_MAX).contains(bins) {
                return Err(ConfigValidationError::InvalidBinCount(*bins));
            }
        }
        Ok(())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FillMissing { method } => write!(f, "fill_missing({})", method),
            Self::Binning { column, bins } => write!(f, "binning({}, {})", column, bins),
            other => f.write_str(other.name()),
        }
    }
}

/// An operation together with its enabled flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(flatten)]
    pub operation: Operation,
}

fn default_enabled() -> bool {
    true
}

impl OperationConfig {
    pub fn enabled(operation: Operation) -> Self {
        Self {
            enabled: true,
            operation,
        }
    }

    pub fn disabled(operation: Operation) -> Self {
        Self {
            enabled: false,
            operation,
        }
    }
}

/// Ordered list of cleaning operations.
///
/// # Example
///
/// ```rust,ignore
/// use lex_cleaning::config::{ImputationMethod, TransformConfig};
///
/// let config = TransformConfig::builder()
///     .fill_missing(ImputationMethod::Median)
///     .remove_duplicates()
///     .binning("price", 5)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransformConfig {
    #[serde(default)]
    pub operations: Vec<OperationConfig>,
}

impl TransformConfig {
    pub fn new(operations: Vec<OperationConfig>) -> Self {
        Self { operations }
    }

    pub fn builder() -> TransformConfigBuilder {
        TransformConfigBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operations that will actually run, in order.
    pub fn enabled_operations(&self) -> impl Iterator<Item = &Operation> {
        self.operations
            .iter()
            .filter(|c| c.enabled)
            .map(|c| &c.operation)
    }

    /// Validate every enabled operation.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        self.enabled_operations().try_for_each(Operation::validate)
    }

    /// Parse a configuration from JSON without validating it.
    ///
    /// Invalid parameters surface as pipeline diagnostics when the
    /// configuration runs.
    /// Parse a config from JSON. Malformed documents and unknown operations
    /// are reported as [`CleaningError::InvalidConfig`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CleaningError::InvalidConfig(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid bin count: {0} (must be between {BINS_MIN} and {BINS_MAX})")]
    InvalidBinCount(i64),

    #[error("Binning column name must not be empty")]
    EmptyColumnName,

    #[error("Unknown imputation method '{0}' (expected mean, median or mode)")]
    UnknownImputationMethod(String),
}

impl From<ConfigValidationError> for CleaningError {
    fn from(err: ConfigValidationError) -> Self {
        CleaningError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`TransformConfig`] with fluent API.
///
/// Operations run in the order they are added.
#[derive(Debug, Default)]
pub struct TransformConfigBuilder {
    operations: Vec<OperationConfig>,
}

impl TransformConfigBuilder {
    /// Fill missing cells using `method` for numeric columns.
    pub fn fill_missing(self, method: ImputationMethod) -> Self {
        self.push(Operation::FillMissing { method })
    }

    pub fn remove_duplicates(self) -> Self {
        self.push(Operation::RemoveDuplicates)
    }

    /// Drop rows outside the 1.5 IQR fences of any numeric column.
    pub fn remove_outliers(self) -> Self {
        self.push(Operation::RemoveOutliers)
    }

    /// Trim and lower-case text columns.
    pub fn clean_text(self) -> Self {
        self.push(Operation::CleanText)
    }

    pub fn correct_spelling(self) -> Self {
        self.push(Operation::CorrectSpelling)
    }

    pub fn standardize_formats(self) -> Self {
        self.push(Operation::StandardizeFormats)
    }

    /// Add an equal-width binning of `column` into `bins` bins.
    pub fn binning(self, column: impl Into<String>, bins: i64) -> Self {
        self.push(Operation::Binning {
            column: column.into(),
            bins,
        })
    }

    /// Add an operation that is kept in the list but not run.
    pub fn disabled(mut self, operation: Operation) -> Self {
        self.operations.push(OperationConfig::disabled(operation));
        self
    }

    fn push(mut self, operation: Operation) -> Self {
        self.operations.push(OperationConfig::enabled(operation));
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `TransformConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<TransformConfig, ConfigValidationError> {
        let config = TransformConfig::new(self.operations);
        config.validate()?;
        Ok(config)
    }
}
