//! CSV boundary and Polars interop.
//!
//! Loading and exporting go through Polars so the on-disk format matches what
//! the rest of the tooling produces: header row of column names in column
//! order, comma separated, UTF-8, no index column.

use super::{Cell, Column, Dataset};
use crate::error::{CleaningError, Result, ResultExt};
use crate::utils::{format_temporal, parse_temporal_string};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::{debug, info};

/// Number of rows Polars samples to infer column types.
const INFER_SCHEMA_ROWS: usize = 1000;

impl Dataset {
    /// Convert a Polars DataFrame into a dataset.
    ///
    /// Numeric dtypes become `Number` cells, date/datetime dtypes become
    /// `Temporal`, nulls become `Missing`, and everything else is read as
    /// text.
    pub fn from_dataframe(df: &DataFrame) -> Result<Dataset> {
        let columns = df
            .get_columns()
            .iter()
            .map(|col| series_to_column(col.as_materialized_series()))
            .collect::<Result<Vec<_>>>()?;
        Dataset::new(columns)
    }

    /// Convert the dataset into a Polars DataFrame.
    ///
    /// Columns holding only numbers (and Missing) become Float64; all other
    /// columns become strings using the cell display form.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns: Vec<polars::prelude::Column> = self
            .columns()
            .iter()
            .map(|c| column_to_series(c).into_column())
            .collect();
        DataFrame::new(columns).context("Failed to build DataFrame from dataset")
    }
}

fn series_to_column(series: &Series) -> Result<Column> {
    let name = series.name().to_string();
    let dtype = series.dtype();

    let cells: Vec<Cell> = if is_numeric_dtype(dtype) {
        let floats = series.cast(&DataType::Float64)?;
        floats.f64()?.into_iter().map(Cell::from).collect()
    } else if matches!(dtype, DataType::Date | DataType::Datetime(_, _)) {
        let strings = series.cast(&DataType::String)?;
        strings
            .str()?
            .into_iter()
            .map(|v| match v {
                Some(s) => parse_temporal_string(s).map_or_else(|| Cell::text(s), Cell::Temporal),
                None => Cell::Missing,
            })
            .collect()
    } else {
        let strings = series.cast(&DataType::String)?;
        strings.str()?.into_iter().map(Cell::from).collect()
    };

    debug!("Loaded column '{}' ({}) with {} rows", name, dtype, cells.len());
    Ok(Column::new(name, cells))
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

fn column_to_series(column: &Column) -> Series {
    let all_numeric = column
        .cells()
        .iter()
        .all(|c| matches!(c, Cell::Number(_) | Cell::Missing));

    if all_numeric {
        let values: Vec<Option<f64>> = column
            .cells()
            .iter()
            .map(|c| match c {
                Cell::Number(v) => Some(*v),
                _ => None,
            })
            .collect();
        Series::new(column.name().into(), values)
    } else {
        let values: Vec<Option<String>> = column
            .cells()
            .iter()
            .map(|c| match c {
                Cell::Missing => None,
                Cell::Temporal(dt) => Some(format_temporal(dt)),
                other => Some(other.to_string()),
            })
            .collect();
        Series::new(column.name().into(), values)
    }
}

/// Read a CSV file into a dataset.
pub fn read_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    info!("Reading CSV from {}", path.display());

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context("Failed to open CSV file")?
        .finish()
        .context("Failed to parse CSV file")?;

    Dataset::from_dataframe(&df)
}

/// Read CSV text held in memory into a dataset.
pub fn read_csv_bytes(bytes: impl AsRef<[u8]>) -> Result<Dataset> {
    let cursor = Cursor::new(bytes.as_ref().to_vec());
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .into_reader_with_file_handle(cursor)
        .finish()
        .context("Failed to parse CSV data")?;

    Dataset::from_dataframe(&df)
}

/// Load a dataset from disk, dispatching on the file extension.
///
/// Only CSV is handled here; spreadsheet formats belong to the caller's
/// loader.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CleaningError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Input file not found: {}", path.display()),
        )));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => read_csv(path),
        other => Err(CleaningError::UnsupportedFileType(if other.is_empty() {
            path.display().to_string()
        } else {
            other.to_string()
        })),
    }
}

/// Write the dataset as CSV: header row, original column order, no index.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: &mut W) -> Result<()> {
    let mut df = dataset.to_dataframe()?;
    CsvWriter::new(writer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context("Failed to write CSV")?;
    Ok(())
}

/// Render the dataset as a CSV string.
pub fn to_csv_string(dataset: &Dataset) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(dataset, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| {
        CleaningError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::from_values("age", vec![Some(30.0), None, Some(41.5)]),
            Column::from_values("city", vec![Some("paris"), Some("oslo"), None]),
            Column::new(
                "joined",
                vec![
                    Cell::Temporal(parse_temporal_string("2021-01-01").unwrap()),
                    Cell::Missing,
                    Cell::Temporal(parse_temporal_string("2021-03-01").unwrap()),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_dataframe_maps_dtypes() {
        let df = df![
            "n" => [Some(1i64), None, Some(3)],
            "s" => [Some("a"), Some("b"), None],
        ]
        .unwrap();

        let ds = Dataset::from_dataframe(&df).unwrap();
        assert_eq!(ds.row_count(), 3);
        assert_eq!(
            ds.column("n").unwrap().cells(),
            &[Cell::Number(1.0), Cell::Missing, Cell::Number(3.0)]
        );
        assert_eq!(
            ds.column("s").unwrap().cells(),
            &[Cell::text("a"), Cell::text("b"), Cell::Missing]
        );
    }

    #[test]
    fn test_to_dataframe_dtypes() {
        let df = sample().to_dataframe().unwrap();
        assert_eq!(df.shape(), (3, 3));
        assert_eq!(df.column("age").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("city").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("joined").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_csv_header_and_order() {
        let csv = to_csv_string(&sample()).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(header, "age,city,joined");
        assert_eq!(csv.lines().count(), 4);
        assert!(csv.contains("2021-01-01"));
    }

    #[test]
    fn test_csv_round_trip() {
        let original = sample();
        let csv = to_csv_string(&original).unwrap();
        let reloaded = read_csv_bytes(csv.as_bytes()).unwrap();

        assert_eq!(reloaded.column_names(), original.column_names());
        assert_eq!(reloaded.row_count(), original.row_count());
        assert_eq!(reloaded.column("age").unwrap().cells(), original.column("age").unwrap().cells());
        assert_eq!(
            reloaded.column("city").unwrap().cells(),
            original.column("city").unwrap().cells()
        );
        // Dates come back as text and read as the same timestamps.
        let joined: Vec<_> = reloaded
            .column("joined")
            .unwrap()
            .cells()
            .iter()
            .map(Cell::as_temporal)
            .collect();
        let expected: Vec<_> = original
            .column("joined")
            .unwrap()
            .cells()
            .iter()
            .map(Cell::as_temporal)
            .collect();
        assert_eq!(joined, expected);
    }

    #[test]
    fn test_load_dataset_rejects_unsupported_extension() {
        let dir = std::env::temp_dir().join("lex_cleaning_io_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("data.xlsx");
        std::fs::write(&path, b"not a spreadsheet").unwrap();

        let result = load_dataset(&path);
        assert!(matches!(result, Err(CleaningError::UnsupportedFileType(ext)) if ext == "xlsx"));
    }

    #[test]
    fn test_load_dataset_missing_file() {
        let result = load_dataset("/definitely/not/here.csv");
        assert!(matches!(result, Err(CleaningError::Io(_))));
    }
}
