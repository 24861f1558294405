use crate::config::RankingConfig;
use crate::filter::FilterSelection;
use crate::pipeline::BaseTable;
use crate::reporting::style::{ChartSpec, ChartTheme};
use crate::types::{ChartOutcome, DashboardOutput, IngestionSummary};
use anyhow::Result;
use chrono::Local;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

// ============================================================================
// Report Types
// ============================================================================

/// Everything a rendering collaborator needs to draw one dashboard state.
///
/// Used for JSON output (`--json`), file output (`--emit-report`) and
/// library callers alike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartReport {
    // Metadata
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the lead export
    pub input_file: String,

    // Ingestion
    /// What happened while the base table was built
    pub ingestion: IngestionSummary,
    /// Rows that passed the filter selection
    pub filtered_rows: usize,
    /// True when the filter selection left no rows at all
    pub no_data_for_filters: bool,

    // Parameters
    pub filters: FilterSelection,
    pub ranking: RankingConfig,

    // Presentation
    pub theme: ChartTheme,
    pub specs: Vec<ChartSpec>,

    // Results
    /// One outcome per chart, table or "no data"
    pub charts: Vec<ChartOutcome>,
}

// ============================================================================
// Report Generator
// ============================================================================

/// Writes chart reports and chart tables to an output directory.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: Option<String>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
            output_name: None,
        }
    }
}

impl ReportGenerator {
    /// Create a new ReportGenerator with custom output settings.
    ///
    /// `output_name` overrides the base name passed to the write methods.
    pub fn new(output_dir: PathBuf, output_name: Option<String>) -> Self {
        Self {
            output_dir,
            output_name,
        }
    }

    fn base_name<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.output_name.as_deref().unwrap_or(fallback)
    }

    /// Bundle one computation with its inputs.
    pub fn build_report(
        input_file: &str,
        base: &BaseTable,
        filters: &FilterSelection,
        ranking: &RankingConfig,
        output: &DashboardOutput,
    ) -> ChartReport {
        ChartReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.to_string(),
            ingestion: base.summary().clone(),
            filtered_rows: output.filtered_rows,
            no_data_for_filters: output.no_data_for_filters(),
            filters: filters.clone(),
            ranking: *ranking,
            theme: ChartTheme::default(),
            specs: ChartSpec::all(),
            charts: output.charts.clone(),
        }
    }

    /// Write a report as pretty JSON to `<base_name>_charts.json`.
    pub fn write_report_to_file(&self, report: &ChartReport, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_charts.json", self.base_name(base_name)));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }

    /// Write each chart that has data to `<base_name>_<chart>.csv`.
    ///
    /// Charts in the "no data" state produce no file.
    pub fn export_chart_csvs(&self, output: &DashboardOutput, base_name: &str) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.output_dir)?;

        let mut written = Vec::new();
        for chart in &output.charts {
            let Some(table) = chart.table() else {
                debug!("Skipping CSV for '{}': no data", chart.kind());
                continue;
            };

            let mut df = table.to_dataframe()?;
            let path = self.output_dir.join(format!(
                "{}_{}.csv",
                self.base_name(base_name),
                table.kind.slug()
            ));
            let mut file = File::create(&path)?;

            CsvWriter::new(&mut file)
                .include_header(true)
                .with_separator(b',')
                .with_quote_char(b'"')
                .finish(&mut df)?;

            info!("Chart table saved: {}", path.display());
            written.push(path);
        }

        Ok(written)
    }
}
