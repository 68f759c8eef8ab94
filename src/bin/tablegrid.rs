use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tablegrid::{
    Cell, CellPosition, GridOptions, ImageSegment, OutputFormat, RegionAnalysis, TableCell,
    analyze_segment, cell_spans, cluster_elements, row_records, rows_to_csv_string,
    spans_to_csv_string,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "tablegrid",
    version,
    about = "Build table rows, borderless candidates and merged-cell spans from detected boxes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Cluster a JSON array of cells into row bands.
    Rows(RowsArgs),
    /// Propose borderless table candidates inside one segment.
    Analyze(AnalyzeArgs),
    /// Decompose grid placements into merged-cell rectangles.
    Spans(SpansArgs),
}

#[derive(Debug, Args)]
struct IoArgs {
    /// Input JSON path.
    #[arg(short, long)]
    input: PathBuf,

    /// Output path; stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct RowsArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Output format: json or csv.
    #[arg(long, default_value = "json")]
    format: OutputFormat,

    /// CSV delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Minimum vertical overlap ratio for two rows to merge.
    #[arg(long, default_value_t = tablegrid::ROW_OVERLAP_THRESHOLD)]
    row_overlap: f64,
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Minimum vertical overlap ratio for two rows to merge.
    #[arg(long, default_value_t = tablegrid::ROW_OVERLAP_THRESHOLD)]
    row_overlap: f64,

    /// Minimum vertical overlap ratio for two delimiters to group.
    #[arg(long, default_value_t = tablegrid::DEFAULT_DELIMITER_OVERLAP)]
    delimiter_overlap: f64,

    /// Minimum delimiters a candidate needs.
    #[arg(long, default_value_t = 2)]
    min_delimiters: usize,

    /// Minimum rows a candidate needs.
    #[arg(long, default_value_t = 1)]
    min_rows: usize,

    /// Segment bounds as x1,y1,x2,y2; overrides the bounds in the input.
    #[arg(long, allow_hyphen_values = true)]
    bounds: Option<Cell>,

    /// Print every warning instead of a summary.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Args)]
struct SpansArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Output format: json or csv.
    #[arg(long, default_value = "json")]
    format: OutputFormat,

    /// CSV delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,
}

#[derive(Debug, Deserialize)]
struct SegmentInput {
    #[serde(default)]
    bounds: Option<Cell>,
    elements: Vec<Cell>,
    #[serde(default)]
    delimiters: Vec<Cell>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse '{}'", path.display()))
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("failed to write '{}'", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

fn csv_delimiter(delimiter: char) -> Result<u8> {
    if !delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }
    Ok(delimiter as u8)
}

fn run_rows(args: &RowsArgs) -> Result<usize> {
    let options = GridOptions {
        row_overlap: args.row_overlap,
        ..GridOptions::default()
    };
    options.validate()?;

    let cells: Vec<Cell> = read_json(&args.io.input)?;
    let rows = cluster_elements(&cells, options.row_overlap);
    let content = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&row_records(&rows))? + "\n",
        OutputFormat::Csv => rows_to_csv_string(&rows, csv_delimiter(args.delimiter)?)?,
    };
    write_output(args.io.output.as_deref(), &content)?;
    Ok(rows.len())
}

fn log_report(analysis: &RegionAnalysis, verbose: bool) {
    if analysis.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", analysis.warnings.len());
    if verbose {
        for warning in &analysis.warnings {
            eprintln!(
                "  - {:?} region={:?} count={:?}: {}",
                warning.code, warning.region, warning.count, warning.message
            );
        }
    }
}

fn run_analyze(args: &AnalyzeArgs) -> Result<usize> {
    let options = GridOptions {
        row_overlap: args.row_overlap,
        delimiter_overlap: args.delimiter_overlap,
        min_delimiters: args.min_delimiters,
        min_rows: args.min_rows,
    };

    let input: SegmentInput = read_json(&args.io.input)?;
    let bounds = args.bounds.or(input.bounds).with_context(|| {
        format!(
            "no segment bounds: pass --bounds or set \"bounds\" in '{}'",
            args.io.input.display()
        )
    })?;
    let segment = ImageSegment::from_bounds(bounds).with_elements(input.elements);
    let analysis = analyze_segment(&segment, &input.delimiters, &options)
        .with_context(|| format!("failed to analyze '{}'", args.io.input.display()))?;

    log_report(&analysis, args.verbose);
    let content = serde_json::to_string_pretty(&analysis)? + "\n";
    write_output(args.io.output.as_deref(), &content)?;
    Ok(analysis.candidates.len())
}

fn run_spans(args: &SpansArgs) -> Result<usize> {
    let positions: Vec<CellPosition<TableCell>> = read_json(&args.io.input)?;
    let spans = cell_spans(&positions);
    let content = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&spans)? + "\n",
        OutputFormat::Csv => spans_to_csv_string(&spans, csv_delimiter(args.delimiter)?)?,
    };
    write_output(args.io.output.as_deref(), &content)?;
    Ok(spans.len())
}

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tablegrid=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    let result = match &cli.command {
        Commands::Rows(args) => run_rows(args),
        Commands::Analyze(args) => run_analyze(args),
        Commands::Spans(args) => run_spans(args),
    };

    match result {
        Ok(0) => ExitCode::from(2),
        Ok(_) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
