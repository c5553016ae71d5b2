//! In-memory tabular dataset.
//!
//! A [`Dataset`] is an ordered list of uniquely named [`Column`]s of equal
//! length. Rows are identified by position only. Every cleaning transform
//! takes a `&Dataset` and returns a new one, so the caller's value is never
//! modified.

mod cell;
pub mod io;

pub use cell::{Cell, CellKey};
pub use io::{load_dataset, read_csv, read_csv_bytes, to_csv_string, write_csv};

use crate::error::{CleaningError, Result};
use crate::profiler::{ColumnKind, classify_column};
use serde::Serialize;
use std::collections::HashSet;

/// A named sequence of cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    name: String,
    cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Build a column from anything convertible into cells.
    ///
    /// ```rust,ignore
    /// let age = Column::from_values("age", vec![Some(30.0), None, Some(41.0)]);
    /// ```
    pub fn from_values<T: Into<Cell>>(name: impl Into<String>, values: Vec<T>) -> Self {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_missing()).count()
    }

    /// Classify the column from its current contents.
    pub fn kind(&self) -> ColumnKind {
        classify_column(self)
    }

    /// Numeric values of the column, skipping Missing, unparseable and NaN
    /// cells.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.cells
            .iter()
            .filter_map(Cell::as_number)
            .filter(|v| !v.is_nan())
            .collect()
    }

    /// Same column with every cell passed through `f`.
    pub fn map_cells<F>(&self, f: F) -> Column
    where
        F: FnMut(&Cell) -> Cell,
    {
        Column::new(self.name.clone(), self.cells.iter().map(f).collect())
    }

    fn filtered(&self, mask: &[bool]) -> Column {
        let cells = self
            .cells
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(cell, _)| cell.clone())
            .collect();
        Column::new(self.name.clone(), cells)
    }
}

/// Ordered collection of equal-length, uniquely named columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Build a dataset, checking the unique-name and equal-length invariants.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let row_count = columns.first().map_or(0, Column::len);
        let mut seen = HashSet::with_capacity(columns.len());

        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(CleaningError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != row_count {
                return Err(CleaningError::LengthMismatch {
                    column: column.name().to_string(),
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns, row_count })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == name)
    }

    /// Cells of one row in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&Cell>> {
        if index >= self.row_count {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.cells[index]).collect())
    }

    /// Total number of Missing cells.
    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(Column::missing_count).sum()
    }

    /// First `n` rows (all rows if fewer).
    pub fn head(&self, n: usize) -> Dataset {
        let take = n.min(self.row_count);
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.cells[..take].to_vec()))
            .collect();
        Dataset {
            columns,
            row_count: take,
        }
    }

    /// Keep the rows whose mask entry is `true`.
    pub fn filter_rows(&self, mask: &[bool]) -> Result<Dataset> {
        if mask.len() != self.row_count {
            return Err(CleaningError::LengthMismatch {
                column: "row mask".to_string(),
                expected: self.row_count,
                actual: mask.len(),
            });
        }
        let columns = self.columns.iter().map(|c| c.filtered(mask)).collect();
        Ok(Dataset {
            columns,
            row_count: mask.iter().filter(|keep| **keep).count(),
        })
    }

    /// Add a column, or replace the column of the same name in place.
    pub fn with_column(&self, column: Column) -> Result<Dataset> {
        match self.column_index(column.name()) {
            Some(_) => self.replace_column(column),
            None => {
                let mut columns = self.columns.clone();
                columns.push(column);
                if self.columns.is_empty() {
                    return Dataset::new(columns);
                }
                Self::checked(columns, self.row_count)
            }
        }
    }

    /// Replace an existing column, keeping its position.
    pub fn replace_column(&self, column: Column) -> Result<Dataset> {
        let idx = self
            .column_index(column.name())
            .ok_or_else(|| CleaningError::ColumnNotFound(column.name().to_string()))?;
        let mut columns = self.columns.clone();
        columns[idx] = column;
        Self::checked(columns, self.row_count)
    }

    /// Rebuild the dataset from transformed columns, keeping the row count.
    pub fn map_columns<F>(&self, f: F) -> Result<Dataset>
    where
        F: FnMut(&Column) -> Column,
    {
        let columns = self.columns.iter().map(f).collect();
        Self::checked(columns, self.row_count)
    }

    fn checked(columns: Vec<Column>, row_count: usize) -> Result<Dataset> {
        if let Some(bad) = columns.iter().find(|c| c.len() != row_count) {
            return Err(CleaningError::LengthMismatch {
                column: bad.name().to_string(),
                expected: row_count,
                actual: bad.len(),
            });
        }
        Ok(Dataset { columns, row_count })
    }
}
