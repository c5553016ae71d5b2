//! Data Cleaning Pipeline Library
//!
//! A configurable cleaning pipeline for small tabular datasets, built with
//! Rust and Polars.
//!
//! # Overview
//!
//! This library provides:
//!
//! - **Dataset Model**: Named columns of typed cells with explicit missing values
//! - **Type Classification**: Numeric, temporal, textual or unknown per column
//! - **Imputation**: Mean, median or mode fill for missing values
//! - **Outlier Removal**: Sequential IQR filtering over numeric columns
//! - **Text Cleaning**: Normalization, spelling fixes and format standardization
//! - **Binning**: Equal-width binning into a derived column
//! - **Fail-Soft Runs**: A failing step is recorded and the run carries on
//! - **Progress Reporting**: Per-step progress updates
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lex_cleaning::{ImputationMethod, Pipeline, TransformConfig, load_dataset};
//!
//! let dataset = load_dataset("people.csv")?;
//!
//! let config = TransformConfig::builder()
//!     .fill_missing(ImputationMethod::Median)
//!     .remove_duplicates()
//!     .clean_text()
//!     .binning("age", 4)
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()
//!     .run(&dataset, &config);
//!
//! println!("{} ({} diagnostics)", result.state, result.diagnostics.len());
//! ```
//!
//! # Configuration
//!
//! A [`TransformConfig`] is an ordered list of operations, each of which can
//! be disabled without being removed. Configs can also be read from JSON:
//!
//! ```json
//! {
//!   "operations": [
//!     { "op": "fill_missing", "method": "mean" },
//!     { "op": "remove_outliers", "enabled": false },
//!     { "op": "binning", "column": "price", "bins": 5 }
//!   ]
//! }
//! ```

pub mod binning;
pub mod cleaner;
pub mod config;
pub mod dataset;
pub mod error;
pub mod imputers;
pub mod pipeline;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use binning::{BinningOutcome, apply_binning};
pub use cleaner::DataCleaner;
pub use config::{
    ConfigValidationError, ImputationMethod, Operation, OperationConfig, TransformConfig,
    TransformConfigBuilder,
};
pub use dataset::{Cell, Column, Dataset, load_dataset, read_csv, write_csv};
pub use error::{CleaningError, Result as CleaningResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use pipeline::{
    ClosureProgressReporter, OutlierHandler, Pipeline, PipelineBuilder, ProgressPhase,
    ProgressReporter, ProgressUpdate, TransformExecutor,
};
pub use profiler::{ColumnKind, DataProfiler, classify_column};
pub use reporting::{CleaningReport, ReportGenerator};
pub use types::{
    ActionType, CleaningAction, CleaningSummary, ColumnProfile, DatasetProfile, Diagnostic,
    PipelineResult, RunState, Severity,
};
