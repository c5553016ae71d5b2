//! All-or-nothing column conversions used by format standardization.

use crate::dataset::{Cell, Column};
use crate::profiler::ColumnKind;

/// Convert every non-missing cell to `Temporal`, or return `None` if any
/// cell does not parse as a date/time.
pub(crate) fn parse_temporal_column(cells: &[Cell]) -> Option<Vec<Cell>> {
    cells
        .iter()
        .map(|cell| match cell {
            Cell::Missing => Some(Cell::Missing),
            other => other.as_temporal().map(Cell::Temporal),
        })
        .collect()
}

/// Convert every non-missing cell to `Number`, or return `None` if any cell
/// does not parse as a number.
pub(crate) fn parse_numeric_column(cells: &[Cell]) -> Option<Vec<Cell>> {
    cells
        .iter()
        .map(|cell| match cell {
            Cell::Missing => Some(Cell::Missing),
            other => other.as_number().map(Cell::Number),
        })
        .collect()
}

/// Try temporal first, then numeric. Returns the converted column and the
/// kind it was converted to, or `None` to leave the column as-is.
pub(crate) fn standardize_column(column: &Column) -> Option<(Column, ColumnKind)> {
    if column.cells().iter().all(Cell::is_missing) {
        return None;
    }

    if let Some(cells) = parse_temporal_column(column.cells()) {
        return Some((Column::new(column.name(), cells), ColumnKind::Temporal));
    }

    parse_numeric_column(column.cells())
        .map(|cells| (Column::new(column.name(), cells), ColumnKind::Numeric))
}
