//! Dataset profiling.
//!
//! This module provides:
//! - Column type classification (numeric, temporal, textual, unknown)
//! - Summary statistics (mean, quantiles, mode, min/max)
//! - A per-column overview used by reports

pub mod statistics;
mod type_inference;

pub use type_inference::{ColumnKind, classify_column};

use crate::dataset::{CellKey, Dataset};
use crate::types::{ColumnProfile, DatasetProfile};
use std::collections::HashSet;
use tracing::debug;

/// Builds lightweight profiles of a dataset.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile every column and count duplicate rows.
    pub fn profile_dataset(dataset: &Dataset) -> DatasetProfile {
        let rows = dataset.row_count();

        let column_profiles: Vec<ColumnProfile> = dataset
            .columns()
            .iter()
            .map(|col| {
                let missing_count = col.missing_count();
                let unique_count = col
                    .cells()
                    .iter()
                    .filter(|c| !c.is_missing())
                    .map(|c| c.key())
                    .collect::<HashSet<_>>()
                    .len();
                let kind = col.kind();
                debug!("  {}: {} ({} missing)", col.name(), kind, missing_count);

                ColumnProfile {
                    name: col.name().to_string(),
                    kind,
                    missing_count,
                    missing_percentage: percentage(missing_count, rows),
                    unique_count,
                }
            })
            .collect();

        let duplicate_count = Self::count_duplicate_rows(dataset);

        DatasetProfile {
            shape: (rows, dataset.column_count()),
            column_profiles,
            duplicate_count,
            duplicate_percentage: percentage(duplicate_count, rows),
        }
    }

    /// Rows that repeat an earlier row exactly.
    pub fn count_duplicate_rows(dataset: &Dataset) -> usize {
        let mut seen: HashSet<Vec<CellKey>> = HashSet::with_capacity(dataset.row_count());
        (0..dataset.row_count())
            .filter(|&i| !seen.insert(row_key(dataset, i)))
            .count()
    }
}

pub(crate) fn row_key(dataset: &Dataset, index: usize) -> Vec<CellKey> {
    dataset
        .columns()
        .iter()
        .map(|c| c.cells()[index].key())
        .collect()
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Cell, Column};

    #[test]
    fn test_profile_dataset() {
        let ds = Dataset::new(vec![
            Column::from_values("age", vec![Some(30.0), None, Some(30.0), Some(30.0)]),
            Column::from_values("city", vec!["a", "b", "a", "a"]),
        ])
        .unwrap();

        let profile = DataProfiler::profile_dataset(&ds);
        assert_eq!(profile.shape, (4, 2));
        assert_eq!(profile.duplicate_count, 2);
        assert_eq!(profile.duplicate_percentage, 50.0);

        let age = &profile.column_profiles[0];
        assert_eq!(age.kind, ColumnKind::Numeric);
        assert_eq!(age.missing_count, 1);
        assert_eq!(age.missing_percentage, 25.0);
        assert_eq!(age.unique_count, 1);

        assert_eq!(profile.column_profiles[1].kind, ColumnKind::Textual);
    }

    #[test]
    fn test_empty_dataset_profile() {
        let profile = DataProfiler::profile_dataset(&Dataset::empty());
        assert_eq!(profile.shape, (0, 0));
        assert_eq!(profile.duplicate_count, 0);
        assert_eq!(profile.duplicate_percentage, 0.0);
    }

    #[test]
    fn test_missing_rows_are_duplicates_of_each_other() {
        let ds = Dataset::new(vec![Column::new("x", vec![Cell::Missing, Cell::Missing])]).unwrap();
        assert_eq!(DataProfiler::count_duplicate_rows(&ds), 1);
    }
}
