//! Summary statistics used by imputation, outlier bounds and binning.
//!
//! All functions ignore Missing cells. NaN values are skipped too, so a
//! single NaN never poisons a column mean.

use crate::dataset::{Cell, CellKey};
use std::collections::HashMap;

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().sum::<f64>() / finite.len() as f64)
}

/// Quantile `q` (0.0 - 1.0) with linear interpolation between the two
/// closest ranks.
///
/// With sorted values `x` and `pos = (n - 1) * q`, the result is
/// `x[floor(pos)] + (x[ceil(pos)] - x[floor(pos)]) * frac(pos)`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let pos = (sorted.len() - 1) as f64 * q;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// The 50th percentile.
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Smallest and largest value.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Most frequent non-missing cell. Ties go to the value seen first.
pub fn mode(cells: &[Cell]) -> Option<Cell> {
    let mut counts: HashMap<CellKey, usize> = HashMap::new();
    let mut first_seen: Vec<(CellKey, &Cell)> = Vec::new();

    for cell in cells {
        if cell.is_missing() || matches!(cell, Cell::Number(v) if v.is_nan()) {
            continue;
        }
        let key = cell.key();
        let count = counts.entry(key.clone()).or_insert(0);
        if *count == 0 {
            first_seen.push((key, cell));
        }
        *count += 1;
    }

    let mut best: Option<(usize, &Cell)> = None;
    for (key, cell) in &first_seen {
        let count = counts[key];
        if best.is_none_or(|(best_count, _)| count > best_count) {
            best = Some((count, *cell));
        }
    }
    best.map(|(_, cell)| cell.clone())
}

/// Most frequent number. Ties go to the value seen first.
pub fn numeric_mode(values: &[f64]) -> Option<f64> {
    let cells: Vec<Cell> = values.iter().map(|v| Cell::Number(*v)).collect();
    mode(&cells).and_then(|c| c.as_number())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[f64::NAN, 4.0]), Some(4.0));
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&values, 0.25), Some(1.75));
        assert_eq!(quantile(&values, 0.75), Some(3.25));
        assert_eq!(quantile(&values, 0.0), Some(1.0));
        assert_eq!(quantile(&values, 1.0), Some(4.0));
        assert_eq!(quantile(&values, 1.5), None);
    }

    #[test]
    fn test_quantile_unsorted_input() {
        assert_eq!(quantile(&[5.0, 1.0, 3.0], 0.5), Some(3.0));
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[1.0, 2.0, 3.0, 10.0]), Some(2.5));
        assert_eq!(median(&[7.0]), Some(7.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(min_max(&[3.0, -1.0, 8.0]), Some((-1.0, 8.0)));
        assert_eq!(min_max(&[]), None);
        assert_eq!(min_max(&[f64::NAN]), None);
    }

    #[test]
    fn test_mode_first_occurrence_wins_ties() {
        let cells = vec![
            Cell::text("b"),
            Cell::text("a"),
            Cell::Missing,
            Cell::text("a"),
            Cell::text("b"),
        ];
        assert_eq!(mode(&cells), Some(Cell::text("b")));
    }

    #[test]
    fn test_mode_ignores_missing() {
        let cells = vec![Cell::Missing, Cell::Missing, Cell::text("x")];
        assert_eq!(mode(&cells), Some(Cell::text("x")));
        assert_eq!(mode(&[Cell::Missing]), None);
    }

    #[test]
    fn test_numeric_mode() {
        assert_eq!(numeric_mode(&[1.0, 2.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(numeric_mode(&[4.0, 1.0]), Some(4.0));
        assert_eq!(numeric_mode(&[]), None);
    }
}
