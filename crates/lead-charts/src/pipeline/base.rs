//! The normalized base table shared by every chart.

use crate::binning::assign_commission_bands;
use crate::cleaner::LeadNormalizer;
use crate::error::{Result, ResultExt};
use crate::filter::FilterOptions;
use crate::schema::SchemaMapper;
use crate::types::{IngestionSummary, LeadRecord};
use polars::prelude::DataFrame;
use std::path::Path;
use tracing::info;

/// Leads after schema mapping, normalization and commission banding.
///
/// Immutable once built. Every chart computation reads from it without
/// modifying it, so it can be cached across recomputations and shared
/// between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseTable {
    leads: Vec<LeadRecord>,
    options: FilterOptions,
    summary: IngestionSummary,
}

static_assertions::assert_impl_all!(BaseTable: Send, Sync);

impl BaseTable {
    /// Build from already-mapped lead records.
    pub fn from_leads(leads: Vec<LeadRecord>) -> Self {
        info!("Building base table from {} leads", leads.len());

        let rows_read = leads.len();
        let normalized = LeadNormalizer.normalize(&leads);
        let banded = assign_commission_bands(&normalized.leads);
        let options = FilterOptions::observe(&banded.leads);

        let summary = IngestionSummary {
            rows_read,
            rows_kept: banded.leads.len(),
            blocked_sources: normalized.blocked,
            unbinned_commissions: banded.unbinned,
            normalization_actions: normalized.actions,
        };

        info!(
            "Base table ready: {} of {} leads kept, {} unbinned commissions",
            summary.rows_kept, summary.rows_read, summary.unbinned_commissions
        );

        Self {
            leads: banded.leads,
            options,
            summary,
        }
    }

    /// Build from raw positional records.
    pub fn from_records<R, S>(records: impl IntoIterator<Item = R>) -> Result<Self>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let leads = SchemaMapper::map_records(records)?;
        Ok(Self::from_leads(leads))
    }

    /// Build from a DataFrame holding a lead export.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let leads = SchemaMapper::from_dataframe(df).context("Mapping lead export columns")?;
        Ok(Self::from_leads(leads))
    }

    /// Read a CSV lead export and build the base table.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self> {
        let leads = SchemaMapper::load_leads(path)?;
        Ok(Self::from_leads(leads))
    }

    pub fn leads(&self) -> &[LeadRecord] {
        &self.leads
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    /// Distinct values the filter dimensions can take.
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn summary(&self) -> &IngestionSummary {
        &self.summary
    }
}
