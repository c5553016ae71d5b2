//! Text sanitization functions for cleaning values.

use crate::dataset::{Cell, Column};

/// Literal substring replacements applied by spelling correction.
pub(crate) const SPELLING_FIXES: &[(&str, &str)] = &[("teh", "the")];

/// Trim and lower-case every text cell. Other cells pass through.
pub(crate) fn normalize_text_column(column: &Column) -> Column {
    column.map_cells(|cell| match cell {
        Cell::Text(s) => Cell::Text(normalize_text(s)),
        other => other.clone(),
    })
}

pub(crate) fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Apply [`SPELLING_FIXES`] to every text cell.
pub(crate) fn fix_spelling_column(column: &Column) -> Column {
    column.map_cells(|cell| match cell {
        Cell::Text(s) => Cell::Text(fix_spelling(s)),
        other => other.clone(),
    })
}

/// Plain substring replacement, so "steht" becomes "sthet".
pub(crate) fn fix_spelling(value: &str) -> String {
    SPELLING_FIXES
        .iter()
        .fold(value.to_string(), |acc, (wrong, right)| acc.replace(wrong, right))
}

/// Number of cells that differ between two versions of a column.
pub(crate) fn changed_cells(before: &Column, after: &Column) -> usize {
    before
        .cells()
        .iter()
        .zip(after.cells())
        .filter(|(a, b)| a.key() != b.key())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  New York "), "new york");
        assert_eq!(normalize_text("ÉCOLE"), "école");
        assert_eq!(normalize_text(""), "");
    }

    #[test]
    fn test_normalize_text_column_skips_non_text() {
        let col = Column::new(
            "c",
            vec![Cell::text(" A "), Cell::Missing, Cell::Number(3.0)],
        );
        let out = normalize_text_column(&col);
        assert_eq!(
            out.cells(),
            &[Cell::text("a"), Cell::Missing, Cell::Number(3.0)]
        );
    }

    #[test]
    fn test_fix_spelling_is_plain_substring() {
        assert_eq!(fix_spelling("teh cat"), "the cat");
        assert_eq!(fix_spelling("teh teh"), "the the");
        assert_eq!(fix_spelling("steht"), "sthet");
        assert_eq!(fix_spelling("Teh"), "Teh");
    }

    #[test]
    fn test_changed_cells() {
        let before = Column::from_values("c", vec!["teh", "ok", "teh end"]);
        let after = fix_spelling_column(&before);
        assert_eq!(changed_cells(&before, &after), 2);
    }
}
