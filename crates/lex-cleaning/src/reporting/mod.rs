//! Report generation module.
//!
//! This module writes cleaned datasets and run reports, and computes the
//! data behind summary charts.
//!
//! # Reports
//!
//! Use [`CleaningReport`] for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use lex_cleaning::reporting::{ReportGenerator, DEFAULT_HEAD_ROWS};
//!
//! let report = ReportGenerator::build_report(
//!     "data/people.csv",
//!     Some("output/cleaned_data.csv"),
//!     &original,
//!     &result,
//!     DEFAULT_HEAD_ROWS,
//! );
//!
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```

mod generator;
pub mod visuals;

pub use generator::{
    CleaningReport, DEFAULT_HEAD_ROWS, DEFAULT_OUTPUT_NAME, DatasetPreview, ReportGenerator,
};
