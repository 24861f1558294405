//! Lead chart pipeline library.
//!
//! Turns a raw CRM lead export into the aggregated, suppressed and ranked
//! tables behind a four-chart lead dashboard.
//!
//! # Overview
//!
//! The pipeline runs in a fixed order:
//!
//! - **Schema mapping**: bind the export's 12 positional columns to named fields
//! - **Normalization**: drop blocklisted sources, clean stage labels and tax ids
//! - **Commission binning**: assign each lead a commission band
//! - **Filtering**: restrict stage, campaign type and owner
//! - **Aggregation**: count leads per one or two categorical keys
//! - **Suppression**: drop groups at or below a per-chart threshold
//! - **Ranking**: keep the Top-N plans and order them by total
//!
//! The first three stages run once and produce a [`BaseTable`]. The rest run
//! on every [`Dashboard::compute`] call.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lead_charts::{Dashboard, FilterDimension, FilterSelection, RankingConfig};
//!
//! let dashboard = Dashboard::from_csv("leads.csv")?;
//!
//! // What the filters can select
//! println!("{:?}", dashboard.options().owners);
//!
//! let filters = FilterSelection::all()
//!     .with(FilterDimension::Stage, ["NOVO", "EM NEGOCIACAO"]);
//! let output = dashboard.compute(&filters, &RankingConfig::new(3, 5)?)?;
//!
//! if output.no_data_for_filters() {
//!     println!("No data available for the selected filters");
//! }
//! for chart in &output.charts {
//!     if let Some(table) = chart.table() {
//!         let df = table.to_dataframe()?;
//!         println!("{}\n{}", chart.kind(), df);
//!     }
//! }
//! ```
//!
//! # Configuration
//!
//! Use [`ChartConfig`] to change suppression thresholds:
//!
//! ```rust,ignore
//! use lead_charts::ChartConfig;
//!
//! let config = ChartConfig::builder()
//!     .source_count_threshold(0)          // show every source
//!     .top_plans_by_source(10)
//!     .build()?;
//! let dashboard = Dashboard::from_csv("leads.csv")?.with_config(config)?;
//! ```

pub mod aggregate;
pub mod binning;
pub mod cleaner;
pub mod config;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod reporting;
pub mod schema;
pub mod types;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-exports for convenient access
pub use binning::{BandedLeads, assign_commission_bands, bin_commission};
pub use cleaner::{BLOCKED_SOURCES, LeadNormalizer, NormalizedLeads};
pub use config::{
    ChartConfig, ChartConfigBuilder, ConfigValidationError, DEFAULT_TOP_N, RankingConfig,
};
pub use error::{LeadChartsError, Result as LeadChartsResult, ResultExt};
pub use filter::{FilterDimension, FilterOptions, FilterSelection};
pub use pipeline::{BaseTable, Dashboard, compute, compute_with_config};
pub use reporting::{ChartReport, ChartSpec, ChartTheme, ReportGenerator};
pub use schema::SchemaMapper;
pub use types::{
    AggregateRow, ChartKind, ChartOutcome, ChartTable, CommissionBand, DashboardOutput,
    IngestionSummary, LEAD_COLUMN_COUNT, LEAD_COLUMNS, LeadRecord,
};
