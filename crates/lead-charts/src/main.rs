//! CLI entry point for the lead chart pipeline.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use lead_charts::{
    ChartOutcome, ChartReport, Dashboard, FilterDimension, FilterOptions, FilterSelection,
    RankingConfig, ReportGenerator,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Turn a CRM lead export into chart-ready tables",
    long_about = "Reads a 12-column CRM lead export, normalizes it and computes the \
                  four dashboard tables: leads by source, stage distribution by source, \
                  plans by source and plans by commission band.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  RUST_LOG              Overrides --log-level (may be set in .env)\n\n\
                  EXAMPLES:\n  \
                  # All charts, default Top-N\n  \
                  lead-charts -i leads.csv\n\n  \
                  # Show what the filters can select\n  \
                  lead-charts -i leads.csv --list-options\n\n  \
                  # Restrict to two owners and keep 3 plans per chart\n  \
                  lead-charts -i leads.csv --owner Ana --owner Bia --top-plans-by-source 3\n\n  \
                  # Save the report and every chart table\n  \
                  lead-charts -i leads.csv -r --export-csv -o results/"
)]
struct Args {
    /// Path to the CSV lead export
    #[arg(short, long)]
    input: String,

    /// Output directory for reports and chart tables
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Custom base name for written files (without extension)
    ///
    /// If not specified, uses the input file's name
    #[arg(long)]
    output_name: Option<String>,

    /// Allowed stage (repeatable); all stages when omitted
    #[arg(long = "stage", value_name = "STAGE")]
    stages: Vec<String>,

    /// Allowed campaign type (repeatable); all types when omitted
    #[arg(long = "campaign-type", value_name = "TYPE")]
    campaign_types: Vec<String>,

    /// Allowed owner (repeatable); all owners when omitted
    #[arg(long = "owner", value_name = "OWNER")]
    owners: Vec<String>,

    /// Load the filter selection from a JSON file
    ///
    /// Keys: "stages", "campaign_types", "owners". Flags given on the
    /// command line replace the matching key.
    #[arg(long, value_name = "FILE")]
    filters: Option<PathBuf>,

    /// Number of plans kept in the plan x source chart
    #[arg(long, default_value_t = lead_charts::DEFAULT_TOP_N)]
    top_plans_by_source: usize,

    /// Number of plans kept in the plan x commission band chart
    #[arg(long, default_value_t = lead_charts::DEFAULT_TOP_N)]
    top_plans_by_band: usize,

    /// Print the observed filter values and exit
    #[arg(long)]
    list_options: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings, errors and the result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only outputs the chart report.
    /// Useful for piping to other tools: `... --json | jq .charts`
    #[arg(long)]
    json: bool,

    /// Write the chart report to the output directory
    ///
    /// The report will be saved as <input_name>_charts.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Write one CSV per chart table to the output directory
    #[arg(long)]
    export_csv: bool,
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
    // .env first so RUST_LOG set there reaches the subscriber
    dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let dashboard = match Dashboard::from_csv(&args.input) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            error!("Could not build the base table: {}", e);
            return Err(anyhow!("[{}] {}", e.error_code(), e));
        }
    };

    if args.list_options {
        print_options(dashboard.options(), args.json)?;
        return Ok(());
    }

    let filters = build_filters(&args)?;
    let ranking = RankingConfig::new(args.top_plans_by_source, args.top_plans_by_band)?;

    let output = dashboard
        .compute(&filters, &ranking)
        .map_err(|e| anyhow!("[{}] {}", e.error_code(), e))?;

    if output.no_data_for_filters() {
        warn!("No data available for the selected filters");
    }

    let report =
        ReportGenerator::build_report(&args.input, dashboard.base(), &filters, &ranking, &output);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let input_stem = extract_file_stem(&args.input);
    let generator = ReportGenerator::new(PathBuf::from(&args.output), args.output_name.clone());

    if args.emit_report {
        let report_path = generator.write_report_to_file(&report, &input_stem)?;
        info!("Report written to: {}", report_path.display());
    }

    if args.export_csv {
        let written = generator.export_chart_csvs(&output, &input_stem)?;
        info!("Wrote {} chart tables to {}", written.len(), args.output);
    }

    print_human_readable_summary(&report);

    Ok(())
}

/// Merge the JSON filter file (if any) with the repeatable flags.
fn build_filters(args: &Args) -> Result<FilterSelection> {
    let mut filters = match &args.filters {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Reading filter file {}", path.display()))?;
            serde_json::from_str::<FilterSelection>(&content)
                .with_context(|| format!("Parsing filter file {}", path.display()))?
        }
        None => FilterSelection::all(),
    };

    for (dimension, values) in [
        (FilterDimension::Stage, &args.stages),
        (FilterDimension::CampaignType, &args.campaign_types),
        (FilterDimension::Owner, &args.owners),
    ] {
        if !values.is_empty() {
            filters = filters.with(dimension, values.iter().cloned());
        }
    }

    Ok(filters)
}

fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("leads")
        .to_string()
}

fn print_options(options: &FilterOptions, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(options)?);
        return Ok(());
    }

    for dimension in FilterDimension::ALL {
        let values = options.values(dimension);
        println!("{} ({}):", capitalize(dimension.label()), values.len());
        for value in values {
            if value.is_empty() {
                println!("  - (empty)");
            } else {
                println!("  - {}", value);
            }
        }
        println!();
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Print a human-readable summary of every chart.
///
/// This is the default output when `--json` is not specified.
fn print_human_readable_summary(report: &ChartReport) {
    let ingestion = &report.ingestion;

    println!();
    println!("{}", "=".repeat(80));
    println!("LEAD CHARTS");
    println!("{}", "=".repeat(80));
    println!();

    println!("Input: {}", report.input_file);
    println!(
        "  Rows: {} read, {} kept, {} after filters",
        ingestion.rows_read, ingestion.rows_kept, report.filtered_rows
    );
    for (source, count) in &ingestion.blocked_sources {
        println!("  Blocked source '{}': {} rows removed", source, count);
    }
    if ingestion.unbinned_commissions > 0 {
        println!(
            "  ! {} leads have no usable commission and are left out of the band chart",
            ingestion.unbinned_commissions
        );
    }
    println!();

    if report.no_data_for_filters {
        println!("No data available for the selected filters.");
        println!();
    }

    // only the warning is shown when the source chart is empty
    let charts: &[ChartOutcome] = if report.no_data_for_filters {
        &[]
    } else {
        &report.charts
    };

    for chart in charts {
        println!("{}", chart.kind());
        println!("{}", "-".repeat(40));
        match chart {
            ChartOutcome::Table { table } => {
                let width = table
                    .rows
                    .iter()
                    .map(|r| r.primary.chars().count())
                    .max()
                    .unwrap_or(0)
                    .min(30);
                for row in &table.rows {
                    match &row.secondary {
                        Some(secondary) => println!(
                            "  {:<width$}  {:<24} {:>6}",
                            row.primary,
                            secondary,
                            row.count,
                            width = width
                        ),
                        None => println!("  {:<width$}  {:>6}", row.primary, row.count, width = width),
                    }
                }
            }
            ChartOutcome::NoData { message, .. } => println!("  {}", message),
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save the chart report, --export-csv for the tables");
    println!("{}", "=".repeat(80));
}
