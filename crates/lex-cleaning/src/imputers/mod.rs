//! Imputation module for handling missing values.
//!
//! Numeric columns are filled with their mean, median or mode. Every other
//! column is filled with its most frequent value.

mod statistical;

pub use statistical::StatisticalImputer;
