//! CLI entry point for the data cleaning pipeline.

use anyhow::{Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_cleaning::reporting::visuals::{
    ColumnSummary, CorrelationMatrix, DEFAULT_HISTOGRAM_BINS, column_summary,
};
use lex_cleaning::reporting::{CleaningReport, DEFAULT_OUTPUT_NAME};
use lex_cleaning::{
    Dataset, ImputationMethod, Pipeline, PipelineResult, ReportGenerator, RunState,
    TransformConfig, load_dataset,
};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// CLI-compatible imputation method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliImputation {
    /// Use the mean of the column's numbers
    Mean,
    /// Use the median of the column's numbers
    Median,
    /// Use the most frequent value
    Mode,
}

impl From<CliImputation> for ImputationMethod {
    fn from(cli: CliImputation) -> Self {
        match cli {
            CliImputation::Mean => ImputationMethod::Mean,
            CliImputation::Median => ImputationMethod::Median,
            CliImputation::Mode => ImputationMethod::Mode,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Configurable Data Cleaning Pipeline",
    long_about = "Runs an ordered list of cleaning operations over a CSV file.\n\n\
                  Operations selected by flags always run in this order: fill missing,\n\
                  remove duplicates, remove outliers, clean text, correct spelling,\n\
                  standardize formats, binning. Use --config for any other order.\n\n\
                  EXAMPLES:\n  \
                  # Fill gaps with the median and trim text\n  \
                  lex-cleaning -i people.csv --fill-missing median --clean-text\n\n  \
                  # Bin a column into 4 groups\n  \
                  lex-cleaning -i prices.csv --bin-column price --bins 4\n\n  \
                  # Run a saved operation list and keep the report\n  \
                  lex-cleaning -i people.csv --config ops.json --emit-report report.json"
)]
struct Args {
    /// Path to the CSV file to clean
    #[arg(short, long)]
    input: String,

    /// Path of the cleaned CSV file
    #[arg(short, long, default_value = "cleaned_data.csv")]
    output: String,

    /// JSON file with the operation list
    ///
    /// When given, the operation flags below are ignored
    #[arg(long)]
    config: Option<String>,

    /// Fill missing values using this statistic
    #[arg(long, value_enum)]
    fill_missing: Option<CliImputation>,

    /// Remove rows identical to an earlier row
    #[arg(long)]
    remove_duplicates: bool,

    /// Remove rows outside the 1.5 IQR fences of any numeric column
    #[arg(long)]
    remove_outliers: bool,

    /// Trim and lower-case text columns
    #[arg(long)]
    clean_text: bool,

    /// Fix known misspellings
    #[arg(long)]
    correct_spelling: bool,

    /// Convert date-like and number-like text columns
    #[arg(long)]
    standardize_formats: bool,

    /// Numeric column to bin into <column>_binned
    #[arg(long)]
    bin_column: Option<String>,

    /// Number of equal-width bins (2-20)
    #[arg(long, default_value = "5")]
    bins: i64,

    /// Rows shown in the before/after preview
    #[arg(long, default_value = "5")]
    head: usize,

    /// Write a JSON report of the run to this path
    #[arg(short = 'r', long)]
    emit_report: Option<String>,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Add histogram and box plot data for a numeric column to the output
    #[arg(long)]
    summary: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    info!("Loading dataset from: {}", args.input);
    let data = load_dataset(&args.input)?;
    info!(
        "Dataset loaded successfully: {} rows x {} columns",
        data.row_count(),
        data.column_count()
    );

    let config = build_config(&args)?;
    if config.enabled_operations().next().is_none() {
        warn!("No operations selected, the output will match the input");
    }

    let pipeline = build_pipeline(&args);
    let result = pipeline.run(&data, &config);

    handle_pipeline_output(&result, &data, &args)
}

/// Build the operation list from `--config` or from the operation flags.
fn build_config(args: &Args) -> Result<TransformConfig> {
    if let Some(ref path) = args.config {
        if has_operation_flags(args) {
            warn!("--config given, ignoring operation flags");
        }
        let config = TransformConfig::from_json_file(path)?;
        info!("Loaded {} operations from {}", config.len(), path);
        return Ok(config);
    }

    let mut builder = TransformConfig::builder();
    if let Some(method) = args.fill_missing {
        builder = builder.fill_missing(method.into());
    }
    if args.remove_duplicates {
        builder = builder.remove_duplicates();
    }
    if args.remove_outliers {
        builder = builder.remove_outliers();
    }
    if args.clean_text {
        builder = builder.clean_text();
    }
    if args.correct_spelling {
        builder = builder.correct_spelling();
    }
    if args.standardize_formats {
        builder = builder.standardize_formats();
    }
    if let Some(ref column) = args.bin_column {
        builder = builder.binning(column, args.bins);
    }

    Ok(builder.build()?)
}

fn has_operation_flags(args: &Args) -> bool {
    args.fill_missing.is_some()
        || args.remove_duplicates
        || args.remove_outliers
        || args.clean_text
        || args.correct_spelling
        || args.standardize_formats
        || args.bin_column.is_some()
}

fn build_pipeline(args: &Args) -> Pipeline {
    let mut builder = Pipeline::builder();

    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.phase.display_name(),
                update.message
            );
        });
    }

    builder.build()
}

/// Handle pipeline output based on CLI flags.
///
/// Output behavior:
/// - Default: Print human-readable summary to stdout
/// - `--json`: Print JSON to stdout only (no logs)
/// - `--emit-report`: Write JSON report to file
fn handle_pipeline_output(result: &PipelineResult, original: &Dataset, args: &Args) -> Result<()> {
    let generator = output_generator(&args.output);
    let output_path = generator.write_dataset(&result.dataset)?;
    let output_file = output_path.display().to_string();

    let mut report =
        ReportGenerator::build_report(&args.input, Some(&output_file), original, result, args.head);
    if let Some(ref column) = args.summary {
        let col = result
            .dataset
            .column(column)
            .ok_or_else(|| anyhow!("Column '{}' not found in cleaned dataset", column))?;
        report.column_summary = column_summary(col, DEFAULT_HISTOGRAM_BINS);
        if report.column_summary.is_none() {
            warn!("'{}' has no numeric values to summarize", column);
        }
    }

    if let Some(ref path) = args.emit_report {
        ReportGenerator::write_report(&report, Path::new(path))?;
        info!("Report written to: {}", path);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_human_readable_summary(&report, original, result, args)?;
    }

    if result.state == RunState::PartiallyFailed {
        for diagnostic in result.errors() {
            error!("{}", diagnostic);
        }
        return Err(anyhow!(
            "{} of {} steps failed",
            result.summary.steps_failed,
            result.summary.steps_applied + result.summary.steps_failed
        ));
    }

    Ok(())
}

/// Split the output path into the directory and file stem the report
/// generator expects.
fn output_generator(output: &str) -> ReportGenerator {
    let path = Path::new(output);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_OUTPUT_NAME)
        .to_string();
    ReportGenerator::new(dir, Some(name))
}

/// Print a human-readable summary of the cleaning run.
///
/// This is the default output when `--json` is not specified.
fn print_human_readable_summary(
    report: &CleaningReport,
    original: &Dataset,
    result: &PipelineResult,
    args: &Args,
) -> Result<()> {
    let summary = &report.processing_summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING {}", report.state.as_str().to_uppercase());
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_file, summary.rows_before, summary.columns_before
    );
    if let Some(ref output_file) = report.output_file {
        println!(
            "Output: {} ({} rows x {} columns)",
            output_file, summary.rows_after, summary.columns_after
        );
    }
    println!();

    println!("Before (first {} rows):", args.head);
    println!("{}", ReportGenerator::render_head(original, args.head)?);
    println!("After (first {} rows):", args.head);
    println!("{}", ReportGenerator::render_head(&result.dataset, args.head)?);
    println!();

    println!("Processing Summary:");
    println!("  Duration: {}ms", summary.duration_ms);
    println!(
        "  Rows: {} -> {} ({} removed, {:.1}%)",
        summary.rows_before,
        summary.rows_after,
        summary.rows_removed,
        summary.rows_removed_percentage()
    );
    println!(
        "  Columns: {} -> {} ({} added)",
        summary.columns_before, summary.columns_after, summary.columns_added
    );
    println!(
        "  Missing cells: {} -> {}",
        summary.missing_before, summary.missing_after
    );
    println!(
        "  Steps: {} applied, {} skipped, {} failed",
        summary.steps_applied, summary.steps_skipped, summary.steps_failed
    );
    println!();

    if !summary.actions.is_empty() {
        println!("Actions Taken:");
        for action in summary.actions.iter().take(10) {
            println!(
                "  - [{}] {}",
                action.action_type.display_name(),
                action.description
            );
        }
        if summary.actions.len() > 10 {
            println!("  ... and {} more actions", summary.actions.len() - 10);
        }
        println!();
    }

    if !report.derived_columns.is_empty() {
        println!("Derived Columns: {}", report.derived_columns.join(", "));
        println!();
    }

    print_correlation_matrix(&report.correlation);

    if let Some(ref chart) = report.column_summary {
        print_column_summary(chart);
    }

    if !report.diagnostics.is_empty() {
        println!("Diagnostics:");
        for diagnostic in &report.diagnostics {
            println!("  ! {}", diagnostic);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report <path> to save detailed JSON report");
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Print pairwise correlations between the numeric columns.
fn print_correlation_matrix(matrix: &CorrelationMatrix) {
    if matrix.columns.len() < 2 {
        return;
    }

    println!("Correlations:");
    let width = matrix.columns.iter().map(|c| c.len()).max().unwrap_or(0).max(6);
    print!("  {:width$}", "", width = width);
    for name in &matrix.columns {
        print!(" {:>width$}", name, width = width);
    }
    println!();
    for (name, row) in matrix.columns.iter().zip(&matrix.values) {
        print!("  {:width$}", name, width = width);
        for value in row {
            match value {
                Some(r) => print!(" {:>width$.3}", r, width = width),
                None => print!(" {:>width$}", "-", width = width),
            }
        }
        println!();
    }
    println!();
}

/// Print histogram and box plot data for one column of the cleaned dataset.
fn print_column_summary(summary: &ColumnSummary) {
    let plot = &summary.box_plot;

    println!("Summary of '{}':", summary.column);
    println!(
        "  min {:.3} | q1 {:.3} | median {:.3} | q3 {:.3} | max {:.3} | mean {:.3}",
        plot.min, plot.q1, plot.median, plot.q3, plot.max, plot.mean
    );
    println!(
        "  whiskers [{:.3}, {:.3}], {} outliers",
        plot.lower_whisker,
        plot.upper_whisker,
        plot.outliers.len()
    );

    let bins = &summary.histogram.bins;
    let widest = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in bins {
        let bar = "#".repeat(bin.count * 40 / widest);
        println!(
            "  [{:>10.3}, {:>10.3}] {:>5} {}",
            bin.lower, bin.upper, bin.count, bar
        );
    }
    println!();
}
