//! Data behind the summary charts: histograms, box plots and the
//! correlation matrix. Rendering is left to the caller.

use crate::dataset::{Column, Dataset};
use crate::pipeline::OutlierHandler;
use crate::profiler::ColumnKind;
use crate::profiler::statistics::{mean, median, min_max, quantile};
use serde::{Deserialize, Serialize};

/// Bin count used for histograms when the caller has no preference.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Equal-width histogram of a numeric column.
///
/// Bins are half-open except the last, which also holds the maximum. A
/// constant column gets a range of one unit centered on its value. Returns
/// `None` for non-numeric columns, columns without values, or zero bins.
pub fn histogram(column: &Column, bins: usize) -> Option<Histogram> {
    if bins == 0 || column.kind() != ColumnKind::Numeric {
        return None;
    }
    let values = column.numeric_values();
    let (mut low, mut high) = min_max(&values)?;
    if low == high {
        low -= 0.5;
        high += 0.5;
    }

    let width = (high - low) / bins as f64;
    let mut counts = vec![0usize; bins];
    for v in &values {
        let idx = (((v - low) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: low + width * i as f64,
            upper: if i + 1 == bins { high } else { low + width * (i + 1) as f64 },
            count,
        })
        .collect();

    Some(Histogram {
        column: column.name().to_string(),
        bins,
    })
}

/// Five-number summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlot {
    pub column: String,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// Most extreme values inside the 1.5 IQR fences
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    /// Values outside the fences, in column order
    pub outliers: Vec<f64>,
}

pub fn box_plot(column: &Column) -> Option<BoxPlot> {
    if column.kind() != ColumnKind::Numeric {
        return None;
    }
    let values = column.numeric_values();
    let (min, max) = min_max(&values)?;
    let (lower_fence, upper_fence) = OutlierHandler::iqr_bounds(&values)?;

    let inside = |v: &&f64| **v >= lower_fence && **v <= upper_fence;
    let (lower_whisker, upper_whisker) =
        min_max(&values.iter().filter(inside).copied().collect::<Vec<_>>())?;

    Some(BoxPlot {
        column: column.name().to_string(),
        min,
        q1: quantile(&values, 0.25)?,
        median: median(&values)?,
        q3: quantile(&values, 0.75)?,
        max,
        mean: mean(&values)?,
        lower_whisker,
        upper_whisker,
        outliers: values.iter().filter(|v| !inside(v)).copied().collect(),
    })
}

/// Histogram and box plot of one column, as shown by `--summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub histogram: Histogram,
    pub box_plot: BoxPlot,
}

/// Summarize a column, or `None` when it holds no numbers.
pub fn column_summary(column: &Column, bins: usize) -> Option<ColumnSummary> {
    Some(ColumnSummary {
        column: column.name().to_string(),
        histogram: histogram(column, bins)?,
        box_plot: box_plot(column)?,
    })
}

/// Pairwise Pearson correlations between the numeric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]` is the correlation of `columns[i]` and `columns[j]`,
    /// or `None` when fewer than two complete rows exist or either side
    /// has no variance.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Correlation matrix over every numeric column, using the rows where both
/// columns of a pair hold a number.
pub fn correlation_matrix(dataset: &Dataset) -> CorrelationMatrix {
    let numeric: Vec<&Column> = dataset
        .columns()
        .iter()
        .filter(|c| c.kind() == ColumnKind::Numeric)
        .collect();

    let series: Vec<Vec<Option<f64>>> = numeric
        .iter()
        .map(|c| {
            c.cells()
                .iter()
                .map(|cell| cell.as_number().filter(|v| !v.is_nan()))
                .collect()
        })
        .collect();

    let values = series
        .iter()
        .map(|a| series.iter().map(|b| pearson(a, b)).collect())
        .collect();

    CorrelationMatrix {
        columns: numeric.iter().map(|c| c.name().to_string()).collect(),
        values,
    }
}

fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}
