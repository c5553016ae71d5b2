//! Equal-width binning of a numeric column.
//!
//! Intervals are closed on the right. The lowest edge sits slightly below
//! the column minimum so the minimum lands in bin 0.

use crate::config::BINS_MAX;
use crate::dataset::{Cell, Column, Dataset};
use crate::error::{CleaningError, Result};
use crate::profiler::ColumnKind;
use crate::profiler::statistics::min_max;
use tracing::debug;

/// Suffix of the derived column.
pub const BINNED_SUFFIX: &str = "_binned";

/// Fraction of the value range used to widen the outer edges.
const EDGE_ADJUSTMENT: f64 = 0.001;

/// Result of a binning request that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum BinningOutcome {
    /// The derived column was added (or replaced).
    Binned {
        dataset: Dataset,
        column: String,
        edges: Vec<f64>,
    },
    /// The target is not numeric, nothing was changed.
    NotNumeric,
}

/// Name of the column holding bin indices for `column`.
pub fn binned_column_name(column: &str) -> String {
    format!("{}{}", column, BINNED_SUFFIX)
}

/// `bins + 1` edges spanning `[min, max]`.
///
/// With `min == max` the range is widened by 0.1% of `|min|` on each side
/// (0.001 when `min` is zero). Otherwise the lowest edge is lowered by 0.1%
/// of the range.
pub fn bin_edges(min: f64, max: f64, bins: usize) -> Vec<f64> {
    let bins = bins.max(1);

    if min == max {
        let adjustment = if min == 0.0 {
            EDGE_ADJUSTMENT
        } else {
            min.abs() * EDGE_ADJUSTMENT
        };
        return linspace(min - adjustment, max + adjustment, bins);
    }

    let mut edges = linspace(min, max, bins);
    edges[0] -= (max - min) * EDGE_ADJUSTMENT;
    edges
}

fn linspace(low: f64, high: f64, bins: usize) -> Vec<f64> {
    let step = (high - low) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|i| low + step * i as f64).collect();
    // Pin the last edge so rounding never leaves the maximum outside.
    edges[bins] = high;
    edges
}

/// Zero-based index of the right-closed interval containing `value`.
pub fn assign_bin(value: f64, edges: &[f64]) -> Option<usize> {
    if value.is_nan() || edges.len() < 2 || value <= edges[0] {
        return None;
    }
    edges.windows(2).position(|w| value <= w[1])
}

/// Add `<column>_binned` holding the bin index of every row.
///
/// Missing and non-numeric cells stay Missing in the derived column. The
/// bin count must lie in `1..=BINS_MAX` and the column range must be finite.
pub fn apply_binning(
    dataset: &Dataset,
    column: &str,
    bins: i64,
    processing_steps: &mut Vec<String>,
) -> Result<BinningOutcome> {
    if !(1..=BINS_MAX).contains(&bins) {
        return Err(CleaningError::invalid_parameter(
            "binning",
            format!("bin count must be between 1 and {}, got {}", BINS_MAX, bins),
        ));
    }

    let source = dataset
        .column(column)
        .ok_or_else(|| CleaningError::ColumnNotFound(column.to_string()))?;

    let kind = source.kind();
    if kind != ColumnKind::Numeric {
        debug!("'{}' is {}, not binning", column, kind);
        return Ok(BinningOutcome::NotNumeric);
    }

    let (min, max) = min_max(&source.numeric_values()).ok_or_else(|| {
        CleaningError::invalid_parameter(
            "binning",
            format!("column '{}' has no finite values", column),
        )
    })?;
    if !(max - min).is_finite() {
        return Err(CleaningError::invalid_parameter(
            "binning",
            format!("column '{}' contains infinite values", column),
        ));
    }

    let bins = bins as usize;
    let edges = bin_edges(min, max, bins);
    let cells: Vec<Cell> = source
        .cells()
        .iter()
        .map(|cell| {
            cell.as_number()
                .and_then(|v| assign_bin(v, &edges))
                .map_or(Cell::Missing, |idx| Cell::Number(idx as f64))
        })
        .collect();

    let name = binned_column_name(column);
    let binned = dataset.with_column(Column::new(name.clone(), cells))?;

    processing_steps.push(format!(
        "Binned '{}' into {} equal-width bins as '{}'",
        column, bins, name
    ));
    debug!("Bin edges for '{}': {:?}", column, edges);

    Ok(BinningOutcome::Binned {
        dataset: binned,
        column: name,
        edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binned_values(outcome: &BinningOutcome, name: &str) -> Vec<Cell> {
        match outcome {
            BinningOutcome::Binned { dataset, .. } => dataset.column(name).unwrap().cells().to_vec(),
            BinningOutcome::NotNumeric => panic!("expected a binned dataset"),
        }
    }

    #[test]
    fn test_bin_edges_lowers_first_edge() {
        let edges = bin_edges(0.0, 10.0, 2);
        assert_eq!(edges.len(), 3);
        assert!((edges[0] + 0.01).abs() < 1e-12);
        assert_eq!(&edges[1..], &[5.0, 10.0]);
    }

    #[test]
    fn test_bin_edges_constant_column() {
        let edges = bin_edges(5.0, 5.0, 2);
        assert_eq!(edges.len(), 3);
        assert!((edges[0] - 4.995).abs() < 1e-12);
        assert!((edges[2] - 5.005).abs() < 1e-12);

        let zero = bin_edges(0.0, 0.0, 1);
        assert_eq!(zero, vec![-0.001, 0.001]);
    }

    #[test]
    fn test_assign_bin_right_closed() {
        let edges = vec![-0.01, 5.0, 10.0];
        assert_eq!(assign_bin(0.0, &edges), Some(0));
        assert_eq!(assign_bin(5.0, &edges), Some(0));
        assert_eq!(assign_bin(5.5, &edges), Some(1));
        assert_eq!(assign_bin(10.0, &edges), Some(1));
        assert_eq!(assign_bin(11.0, &edges), None);
        assert_eq!(assign_bin(f64::NAN, &edges), None);
    }

    #[test]
    fn test_apply_binning_with_outlier() {
        let ds = Dataset::new(vec![Column::from_values(
            "price",
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0],
        )])
        .unwrap();
        let mut steps = Vec::new();

        let outcome = apply_binning(&ds, "price", 5, &mut steps).unwrap();
        let bins = binned_values(&outcome, "price_binned");
        assert_eq!(bins[0], Cell::Number(0.0));
        assert_eq!(bins[4], Cell::Number(0.0));
        assert_eq!(bins[5], Cell::Number(4.0));
        assert!(steps[0].contains("price_binned"));
    }

    #[test]
    fn test_apply_binning_keeps_missing() {
        let ds = Dataset::new(vec![Column::from_values(
            "x",
            vec![Some(1.0), None, Some(3.0)],
        )])
        .unwrap();
        let mut steps = Vec::new();

        let outcome = apply_binning(&ds, "x", 2, &mut steps).unwrap();
        assert_eq!(
            binned_values(&outcome, "x_binned"),
            vec![Cell::Number(0.0), Cell::Missing, Cell::Number(1.0)]
        );
    }

    #[test]
    fn test_apply_binning_replaces_existing_derived_column() {
        let ds = Dataset::new(vec![
            Column::from_values("x", vec![1.0, 2.0]),
            Column::from_values("x_binned", vec!["old", "old"]),
            Column::from_values("y", vec![0.0, 0.0]),
        ])
        .unwrap();
        let mut steps = Vec::new();

        let outcome = apply_binning(&ds, "x", 2, &mut steps).unwrap();
        let BinningOutcome::Binned { dataset, column, .. } = outcome else {
            panic!("expected a binned dataset");
        };
        assert_eq!(column, "x_binned");
        assert_eq!(dataset.column_names(), vec!["x", "x_binned", "y"]);
    }

    #[test]
    fn test_apply_binning_text_column_is_not_numeric() {
        let ds = Dataset::new(vec![Column::from_values("city", vec!["a", "b"])]).unwrap();
        let mut steps = Vec::new();

        let outcome = apply_binning(&ds, "city", 3, &mut steps).unwrap();
        assert_eq!(outcome, BinningOutcome::NotNumeric);
        assert!(steps.is_empty());
    }

    #[test]
    fn test_apply_binning_errors() {
        let ds = Dataset::new(vec![Column::from_values("x", vec![1.0, 2.0])]).unwrap();
        let mut steps = Vec::new();

        assert!(matches!(
            apply_binning(&ds, "x", 0, &mut steps),
            Err(CleaningError::InvalidParameter { .. })
        ));
        assert!(matches!(
            apply_binning(&ds, "x", BINS_MAX + 1, &mut steps),
            Err(CleaningError::InvalidParameter { .. })
        ));
        assert!(matches!(
            apply_binning(&ds, "x", i64::MAX, &mut steps),
            Err(CleaningError::InvalidParameter { .. })
        ));
        assert!(matches!(
            apply_binning(&ds, "nope", 3, &mut steps),
            Err(CleaningError::ColumnNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_apply_binning_rejects_infinite_values() {
        let ds = Dataset::new(vec![Column::from_values(
            "x",
            vec![1.0, 2.0, 3.0, f64::INFINITY],
        )])
        .unwrap();
        let mut steps = Vec::new();

        let result = apply_binning(&ds, "x", 3, &mut steps);
        assert!(matches!(
            result,
            Err(CleaningError::InvalidParameter { reason, .. }) if reason.contains("infinite")
        ));
        assert!(steps.is_empty());
    }
}
