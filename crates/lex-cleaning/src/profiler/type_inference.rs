//! Column type classification.
//!
//! Classification is a pure function of the column's current cells. It is
//! never cached, because earlier pipeline steps may have changed the contents.

use crate::dataset::{Cell, Column};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Every non-missing cell is a number.
    Numeric,
    /// Every non-missing cell is a date/time and none is a plain number.
    Temporal,
    /// Anything else, including mixed columns.
    Textual,
    /// No non-missing cells at all.
    Unknown,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Temporal => "temporal",
            Self::Textual => "textual",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a column from its cells.
pub fn classify_column(column: &Column) -> ColumnKind {
    classify_cells(column.cells())
}

pub(crate) fn classify_cells(cells: &[Cell]) -> ColumnKind {
    let mut present = cells.iter().filter(|c| !c.is_missing()).peekable();
    if present.peek().is_none() {
        return ColumnKind::Unknown;
    }

    let mut all_numeric = true;
    let mut any_numeric = false;
    let mut all_temporal = true;

    for cell in present {
        let numeric = parses_as_number(cell);
        any_numeric |= numeric;
        all_numeric &= numeric;
        all_temporal &= cell.as_temporal().is_some();

        if !all_numeric && !all_temporal {
            return ColumnKind::Textual;
        }
    }

    if all_numeric {
        ColumnKind::Numeric
    } else if all_temporal && !any_numeric {
        ColumnKind::Temporal
    } else {
        ColumnKind::Textual
    }
}

/// A `Number` cell (NaN included) or text holding a plain number.
fn parses_as_number(cell: &Cell) -> bool {
    matches!(cell, Cell::Number(_)) || cell.as_number().is_some()
}
