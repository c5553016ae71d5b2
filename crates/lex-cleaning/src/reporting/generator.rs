use crate::dataset::{Dataset, write_csv};
use crate::error::{Result, ResultExt};
use crate::profiler::DataProfiler;
use crate::reporting::visuals::{ColumnSummary, CorrelationMatrix, correlation_matrix};
use crate::types::{CleaningSummary, DatasetProfile, Diagnostic, PipelineResult, RunState};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File name (without extension) used when no output name is configured.
pub const DEFAULT_OUTPUT_NAME: &str = "cleaned_data";

/// Number of rows shown in dataset previews.
pub const DEFAULT_HEAD_ROWS: usize = 5;

// ============================================================================
// Report Types
// ============================================================================

/// Report of a single cleaning run.
///
/// Used both for JSON output to stdout (`--json`) and for the report file
/// (`--emit-report`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the output file (if written)
    pub output_file: Option<String>,

    pub state: RunState,
    pub processing_summary: CleaningSummary,
    pub diagnostics: Vec<Diagnostic>,
    pub derived_columns: Vec<String>,
    pub processing_steps: Vec<String>,

    /// Column overview of the dataset as loaded
    pub original_profile: DatasetProfile,
    /// Column overview of the cleaned dataset
    pub final_profile: DatasetProfile,

    /// First rows of the dataset as loaded
    pub original_head: DatasetPreview,
    /// First rows of the cleaned dataset
    pub final_head: DatasetPreview,

    /// Correlations between the numeric columns of the cleaned dataset
    pub correlation: CorrelationMatrix,
    /// Chart data for the column requested with `--summary`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_summary: Option<ColumnSummary>,
}

/// The first rows of a dataset as plain JSON values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl DatasetPreview {
    pub fn from_dataset(dataset: &Dataset, rows: usize) -> Self {
        let head = dataset.head(rows);
        let rows = (0..head.row_count())
            .filter_map(|i| head.row(i))
            .map(|row| {
                row.into_iter()
                    .map(|cell| serde_json::to_value(cell).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        Self {
            columns: head.column_names().into_iter().map(String::from).collect(),
            rows,
        }
    }
}

// ============================================================================
// Report Generator
// ============================================================================

/// Writes cleaned datasets and run reports to an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: Option<String>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            output_name: None,
        }
    }
}

impl ReportGenerator {
    /// Create a new ReportGenerator with custom output settings.
    pub fn new(output_dir: PathBuf, output_name: Option<String>) -> Self {
        Self {
            output_dir,
            output_name,
        }
    }

    /// Path the cleaned CSV is written to.
    pub fn output_path(&self) -> PathBuf {
        let name = self.output_name.as_deref().unwrap_or(DEFAULT_OUTPUT_NAME);
        self.output_dir.join(format!("{}.csv", name))
    }

    /// Write the cleaned dataset as CSV and return its path.
    pub fn write_dataset(&self, dataset: &Dataset) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let output_path = self.output_path();

        let file = File::create(&output_path)
            .context(format!("Failed to create {}", output_path.display()))?;
        let mut writer = BufWriter::new(file);
        write_csv(dataset, &mut writer)?;
        writer.flush()?;

        info!("Dataset saved: {}", output_path.display());
        Ok(output_path)
    }

    /// Build a report from a finished run.
    pub fn build_report(
        input_file: &str,
        output_file: Option<&str>,
        original: &Dataset,
        result: &PipelineResult,
        head_rows: usize,
    ) -> CleaningReport {
        debug!("Building report for {}", input_file);

        CleaningReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            output_file: output_file.map(String::from),
            state: result.state,
            processing_summary: result.summary.clone(),
            diagnostics: result.diagnostics.clone(),
            derived_columns: result.derived_columns.clone(),
            processing_steps: result.processing_steps.clone(),
            original_profile: DataProfiler::profile_dataset(original),
            final_profile: DataProfiler::profile_dataset(&result.dataset),
            original_head: DatasetPreview::from_dataset(original, head_rows),
            final_head: DatasetPreview::from_dataset(&result.dataset, head_rows),
            correlation: correlation_matrix(&result.dataset),
            column_summary: None,
        }
    }

    /// Write a report to `<output_dir>/<base_name>_report.json`.
    pub fn write_report_to_file(
        &self,
        report: &CleaningReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        Self::write_report(report, &report_path)?;

        Ok(report_path)
    }

    /// Write a report as pretty-printed JSON to an explicit path.
    pub fn write_report(report: &CleaningReport, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file =
            File::create(path).context(format!("Failed to create {}", path.display()))?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", path.display());
        Ok(())
    }

    /// Render the first `rows` rows as a table.
    pub fn render_head(dataset: &Dataset, rows: usize) -> Result<String> {
        let df = dataset
            .head(rows)
            .to_dataframe()
            .context("Failed to render dataset preview")?;
        Ok(df.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransformConfig;
    use crate::dataset::{Cell, Column, read_csv};
    use crate::pipeline::Pipeline;
    use crate::reporting::visuals::column_summary;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::from_values("age", vec![Some(30.0), None, Some(50.0)]),
            Column::from_values("city", vec![" A", "b", "b"]),
        ])
        .unwrap()
    }

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lex_cleaning_{}", name));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_output_path_default_name() {
        let generator = ReportGenerator::new(PathBuf::from("out"), None);
        assert_eq!(generator.output_path(), PathBuf::from("out/cleaned_data.csv"));

        let named = ReportGenerator::new(PathBuf::from("out"), Some("people".to_string()));
        assert_eq!(named.output_path(), PathBuf::from("out/people.csv"));
    }

    #[test]
    fn test_write_dataset_round_trip() {
        let generator = ReportGenerator::new(temp_dir("write_dataset"), None);
        let path = generator.write_dataset(&sample()).unwrap();

        let reloaded = read_csv(&path).unwrap();
        assert_eq!(reloaded.column_names(), vec!["age", "city"]);
        assert_eq!(reloaded.row_count(), 3);
        assert_eq!(reloaded.column("age").unwrap().cells()[1], Cell::Missing);
    }

    #[test]
    fn test_preview_rows() {
        let preview = DatasetPreview::from_dataset(&sample(), 2);
        assert_eq!(preview.columns, vec!["age", "city"]);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[1][0], Value::Null);
        assert_eq!(preview.rows[0][1], Value::String(" A".to_string()));
    }

    #[test]
    fn test_build_and_write_report() {
        let original = sample();
        let config = TransformConfig::builder().clean_text().build().unwrap();
        let result = Pipeline::builder().build().run(&original, &config);

        let report = ReportGenerator::build_report("people.csv", None, &original, &result, 5);
        assert_eq!(report.state, RunState::Completed);
        assert_eq!(report.original_profile.shape, (3, 2));
        assert_eq!(report.final_head.rows[0][1], Value::String("a".to_string()));
        assert_eq!(report.correlation.columns, vec!["age"]);
        assert!(report.column_summary.is_none());

        let generator = ReportGenerator::new(temp_dir("write_report"), None);
        let path = generator.write_report_to_file(&report, "people").unwrap();
        let json = fs::read_to_string(path).unwrap();
        let parsed: CleaningReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.input_file, "people.csv");
        assert_eq!(parsed.processing_summary.steps_applied, 1);
        assert_eq!(parsed.correlation, report.correlation);
        assert!(!json.contains("column_summary"));
    }

    #[test]
    fn test_report_carries_column_summary() {
        let original = sample();
        let config = TransformConfig::builder().build().unwrap();
        let result = Pipeline::builder().build().run(&original, &config);

        let mut report = ReportGenerator::build_report("people.csv", None, &original, &result, 5);
        let age = result.dataset.column("age").unwrap();
        report.column_summary = column_summary(age, 2);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["column_summary"]["column"], "age");
        assert_eq!(json["column_summary"]["box_plot"]["max"], 50.0);
        assert_eq!(json["correlation"]["columns"][0], "age");
    }

    #[test]
    fn test_render_head() {
        let table = ReportGenerator::render_head(&sample(), 2).unwrap();
        assert!(table.contains("age"));
        assert!(table.contains("city"));
    }
}
