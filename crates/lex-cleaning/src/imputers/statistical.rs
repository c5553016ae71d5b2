//! Statistical imputation methods.
//!
//! Provides mean, median and mode imputation. The fill value is computed once
//! per column from its non-missing cells and broadcast to every Missing cell.

use crate::config::ImputationMethod;
use crate::dataset::{Cell, Column, Dataset};
use crate::error::Result;
use crate::profiler::ColumnKind;
use crate::profiler::statistics::{mean, median, mode, numeric_mode};
use tracing::debug;

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill Missing cells in every column.
    ///
    /// Numeric columns use `method`. Temporal and textual columns always use
    /// the mode. Columns with nothing to compute a value from are left as-is.
    pub fn fill_missing(
        dataset: &Dataset,
        method: ImputationMethod,
        processing_steps: &mut Vec<String>,
    ) -> Result<Dataset> {
        dataset.map_columns(|column| {
            let missing = column.missing_count();
            if missing == 0 {
                return column.clone();
            }

            let kind = column.kind();
            let fill = match kind {
                ColumnKind::Numeric => Self::numeric_fill_value(column, method).map(Cell::Number),
                ColumnKind::Temporal | ColumnKind::Textual => mode(column.cells()),
                ColumnKind::Unknown => None,
            };

            let Some(fill) = fill else {
                debug!("No fill value for '{}' ({}), skipping", column.name(), kind);
                return column.clone();
            };

            let used = if kind == ColumnKind::Numeric {
                method
            } else {
                ImputationMethod::Mode
            };
            processing_steps.push(format!(
                "Filled {} missing values in '{}' with {}: {}",
                missing,
                column.name(),
                used,
                fill
            ));
            debug!("Filled '{}' with {} ({})", column.name(), fill, used);

            Self::fill_with_value(column, &fill)
        })
    }

    /// Compute the fill value for a numeric column.
    pub fn numeric_fill_value(column: &Column, method: ImputationMethod) -> Option<f64> {
        let values = column.numeric_values();
        match method {
            ImputationMethod::Mean => mean(&values),
            ImputationMethod::Median => median(&values),
            ImputationMethod::Mode => numeric_mode(&values),
        }
    }

    /// Replace every Missing cell with `value`.
    fn fill_with_value(column: &Column, value: &Cell) -> Column {
        column.map_cells(|cell| {
            if cell.is_missing() {
                value.clone()
            } else {
                cell.clone()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::parse_temporal_string;
    use pretty_assertions::assert_eq;

    fn cells(ds: &Dataset, name: &str) -> Vec<Cell> {
        ds.column(name).unwrap().cells().to_vec()
    }

    // ========================================================================
    // numeric imputation tests
    // ========================================================================

    #[test]
    fn test_fill_numeric_mean() {
        let ds = Dataset::new(vec![Column::from_values(
            "values",
            vec![Some(1.0), None, Some(2.0), Some(6.0)],
        )])
        .unwrap();
        let mut steps = Vec::new();

        let filled = StatisticalImputer::fill_missing(&ds, ImputationMethod::Mean, &mut steps).unwrap();

        assert_eq!(cells(&filled, "values")[1], Cell::Number(3.0));
        assert_eq!(filled.missing_count(), 0);
        assert!(steps[0].contains("mean"));
        // Input is untouched
        assert_eq!(ds.missing_count(), 1);
    }

    #[test]
    fn test_fill_numeric_median() {
        let ds = Dataset::new(vec![Column::from_values(
            "values",
            vec![Some(1.0), None, Some(3.0), None, Some(5.0)],
        )])
        .unwrap();
        let mut steps = Vec::new();

        let filled =
            StatisticalImputer::fill_missing(&ds, ImputationMethod::Median, &mut steps).unwrap();

        assert_eq!(
            cells(&filled, "values"),
            vec![
                Cell::Number(1.0),
                Cell::Number(3.0),
                Cell::Number(3.0),
                Cell::Number(3.0),
                Cell::Number(5.0)
            ]
        );
    }

    #[test]
    fn test_fill_numeric_mode_first_wins() {
        let ds = Dataset::new(vec![Column::from_values(
            "values",
            vec![Some(7.0), Some(2.0), None, Some(2.0), Some(7.0)],
        )])
        .unwrap();
        let mut steps = Vec::new();

        let filled = StatisticalImputer::fill_missing(&ds, ImputationMethod::Mode, &mut steps).unwrap();
        assert_eq!(cells(&filled, "values")[2], Cell::Number(7.0));
    }

    #[test]
    fn test_fill_text_uses_mode_regardless_of_method() {
        let ds = Dataset::new(vec![Column::from_values(
            "city",
            vec![Some("oslo"), Some("rome"), None, Some("rome")],
        )])
        .unwrap();
        let mut steps = Vec::new();

        let filled = StatisticalImputer::fill_missing(&ds, ImputationMethod::Mean, &mut steps).unwrap();
        assert_eq!(cells(&filled, "city")[2], Cell::text("rome"));
        assert!(steps[0].contains("mode"));
    }

    #[test]
    fn test_fill_temporal_uses_mode() {
        let jan = parse_temporal_string("2021-01-01").unwrap();
        let feb = parse_temporal_string("2021-02-01").unwrap();
        let ds = Dataset::new(vec![Column::new(
            "joined",
            vec![
                Cell::Temporal(jan),
                Cell::Missing,
                Cell::Temporal(feb),
                Cell::Temporal(feb),
            ],
        )])
        .unwrap();
        let mut steps = Vec::new();

        let filled = StatisticalImputer::fill_missing(&ds, ImputationMethod::Mean, &mut steps).unwrap();

        assert_eq!(cells(&filled, "joined")[1], Cell::Temporal(feb));
        assert_eq!(filled.column("joined").unwrap().kind(), ColumnKind::Temporal);
        assert!(steps[0].contains("mode"));
    }

    #[test]
    fn test_fill_all_missing_column_unchanged() {
        let ds = Dataset::new(vec![
            Column::new("empty", vec![Cell::Missing, Cell::Missing]),
            Column::from_values("x", vec![1.0, 2.0]),
        ])
        .unwrap();
        let mut steps = Vec::new();

        let filled = StatisticalImputer::fill_missing(&ds, ImputationMethod::Median, &mut steps).unwrap();
        assert_eq!(filled, ds);
        assert!(steps.is_empty());
    }

    #[test]
    fn test_fill_preserves_row_count_and_nan() {
        let ds = Dataset::new(vec![Column::new(
            "x",
            vec![Cell::Number(f64::NAN), Cell::Missing, Cell::Number(4.0)],
        )])
        .unwrap();
        let mut steps = Vec::new();

        let filled = StatisticalImputer::fill_missing(&ds, ImputationMethod::Mean, &mut steps).unwrap();
        assert_eq!(filled.row_count(), 3);
        assert_eq!(cells(&filled, "x")[1], Cell::Number(4.0));
        assert!(matches!(cells(&filled, "x")[0], Cell::Number(v) if v.is_nan()));
    }

    #[test]
    fn test_fill_is_idempotent() {
        let ds = Dataset::new(vec![
            Column::from_values("a", vec![Some(1.0), None, Some(10.0)]),
            Column::from_values("b", vec![None, Some("x"), Some("y")]),
        ])
        .unwrap();
        let mut steps = Vec::new();

        let once = StatisticalImputer::fill_missing(&ds, ImputationMethod::Median, &mut steps).unwrap();
        let twice =
            StatisticalImputer::fill_missing(&once, ImputationMethod::Median, &mut steps).unwrap();
        assert_eq!(once, twice);
    }
}
