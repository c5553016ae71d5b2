//! Data cleaning module for preprocessing datasets.
//!
//! This module provides functionality for:
//! - Removing duplicate rows
//! - Normalizing text columns
//! - Correcting a fixed list of misspellings
//! - Standardizing column formats to dates or numbers

mod converters;
mod sanitizers;

pub(crate) use sanitizers::changed_cells;

use crate::dataset::{CellKey, Dataset};
use crate::error::Result;
use crate::profiler::{ColumnKind, row_key};
use std::collections::HashSet;
use tracing::debug;

/// Data cleaner for row- and cell-level cleaning operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Remove rows identical to an earlier row across all columns, keeping
    /// the first occurrence.
    pub fn remove_duplicates(
        dataset: &Dataset,
        processing_steps: &mut Vec<String>,
    ) -> Result<Dataset> {
        let before = dataset.row_count();
        let mut seen: HashSet<Vec<CellKey>> = HashSet::with_capacity(before);
        let mask: Vec<bool> = (0..before)
            .map(|i| seen.insert(row_key(dataset, i)))
            .collect();

        let deduped = dataset.filter_rows(&mask)?;
        let removed = before - deduped.row_count();

        if removed > 0 {
            let pct = (removed as f64 / before as f64) * 100.0;
            processing_steps.push(format!(
                "Removed {} duplicate rows ({:.1}%)",
                removed, pct
            ));
            debug!("Removed {} duplicate rows", removed);
        } else {
            processing_steps.push("No duplicate rows found".to_string());
            debug!("No duplicate rows found");
        }

        Ok(deduped)
    }

    /// Trim and lower-case the text cells of every textual column.
    pub fn normalize_text(
        dataset: &Dataset,
        processing_steps: &mut Vec<String>,
    ) -> Result<Dataset> {
        dataset.map_columns(|column| {
            if column.kind() != ColumnKind::Textual {
                return column.clone();
            }
            let cleaned = sanitizers::normalize_text_column(column);
            let changed = changed_cells(column, &cleaned);
            if changed > 0 {
                processing_steps.push(format!(
                    "Normalized {} text values in '{}'",
                    changed,
                    column.name()
                ));
            }
            cleaned
        })
    }

    /// Replace known misspellings in every text cell of the dataset.
    pub fn correct_spelling(
        dataset: &Dataset,
        processing_steps: &mut Vec<String>,
    ) -> Result<Dataset> {
        dataset.map_columns(|column| {
            let fixed = sanitizers::fix_spelling_column(column);
            let changed = changed_cells(column, &fixed);
            if changed > 0 {
                processing_steps.push(format!(
                    "Corrected spelling in {} values of '{}'",
                    changed,
                    column.name()
                ));
            }
            fixed
        })
    }

    /// Convert columns whose values all parse as dates (or, failing that, as
    /// numbers). Columns that do not fully parse are left untouched.
    pub fn standardize_formats(
        dataset: &Dataset,
        processing_steps: &mut Vec<String>,
    ) -> Result<Dataset> {
        dataset.map_columns(|column| match converters::standardize_column(column) {
            Some((converted, kind)) => {
                if changed_cells(column, &converted) > 0 {
                    processing_steps.push(format!(
                        "Standardized '{}' to {}",
                        column.name(),
                        kind
                    ));
                    debug!("Standardized '{}' to {}", column.name(), kind);
                }
                converted
            }
            None => column.clone(),
        })
    }
}
