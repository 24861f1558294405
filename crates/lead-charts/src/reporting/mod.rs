//! Report generation module.
//!
//! # Chart Reports
//!
//! Use [`ChartReport`] to bundle one dashboard computation, suitable for:
//! - JSON output to stdout (`--json` CLI flag)
//! - JSON file output (`--emit-report` CLI flag)
//! - Programmatic access in library mode
//!
//! # Example
//!
//! ```rust,ignore
//! use lead_charts::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_report(
//!     "data/leads.csv",
//!     dashboard.base(),
//!     &filters,
//!     &ranking,
//!     &output,
//! );
//!
//! // Print as JSON
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! // Or write to files
//! let generator = ReportGenerator::new(PathBuf::from("output"), None);
//! generator.write_report_to_file(&report, "leads")?;
//! generator.export_chart_csvs(&output, "leads")?;
//! ```

mod generator;
pub mod style;

pub use generator::{ChartReport, ReportGenerator};
pub use style::{ChartSpec, ChartTheme, FontSpec, LegendSpec, Orientation};
