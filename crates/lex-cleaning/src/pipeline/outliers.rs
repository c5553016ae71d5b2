//! Outlier handling module.
//!
//! Rows are removed with the 1.5 IQR rule, one numeric column at a time.

use crate::dataset::{Cell, Dataset};
use crate::error::Result;
use crate::profiler::ColumnKind;
use crate::profiler::statistics::quantile;
use tracing::debug;

/// Multiplier applied to the interquartile range to get the fences.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Handles outlier detection and removal.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Remove rows containing outliers using the IQR method.
    ///
    /// The numeric columns are picked once up front. Each column's bounds are
    /// then computed on the rows that survived the previous columns, so the
    /// result depends on column order. Missing and NaN cells are never
    /// outliers.
    pub fn remove_outliers(
        dataset: &Dataset,
        processing_steps: &mut Vec<String>,
    ) -> Result<Dataset> {
        let original_rows = dataset.row_count();
        let numeric_columns: Vec<String> = dataset
            .columns()
            .iter()
            .filter(|c| c.kind() == ColumnKind::Numeric)
            .map(|c| c.name().to_string())
            .collect();

        let mut working = dataset.clone();
        for name in &numeric_columns {
            let Some(column) = working.column(name) else {
                continue;
            };
            let Some((lower_bound, upper_bound)) = Self::iqr_bounds(&column.numeric_values())
            else {
                debug!("No values left in '{}', skipping outlier check", name);
                continue;
            };

            let mask: Vec<bool> = column
                .cells()
                .iter()
                .map(|cell| Self::within_bounds(cell, lower_bound, upper_bound))
                .collect();
            let outliers = mask.iter().filter(|keep| !**keep).count();
            if outliers == 0 {
                continue;
            }

            working = working.filter_rows(&mask)?;
            processing_steps.push(format!(
                "Removed {} outlier rows from '{}' (bounds [{}, {}])",
                outliers, name, lower_bound, upper_bound
            ));
            debug!(
                "'{}': bounds [{}, {}], removed {} rows",
                name, lower_bound, upper_bound, outliers
            );
        }

        let rows_removed = original_rows - working.row_count();
        if rows_removed > 0 {
            debug!("Removed {} outlier rows in total", rows_removed);
        }

        Ok(working)
    }

    /// Lower and upper fences `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]`.
    pub fn iqr_bounds(values: &[f64]) -> Option<(f64, f64)> {
        let q1 = quantile(values, 0.25)?;
        let q3 = quantile(values, 0.75)?;
        let iqr = q3 - q1;
        Some((q1 - IQR_MULTIPLIER * iqr, q3 + IQR_MULTIPLIER * iqr))
    }

    fn within_bounds(cell: &Cell, lower: f64, upper: f64) -> bool {
        match cell.as_number() {
            Some(v) if !v.is_nan() => v >= lower && v <= upper,
            _ => true,
        }
    }
}
