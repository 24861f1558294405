use crate::error::Result;
use polars::prelude::{Column, DataFrame};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name of the count column in chart DataFrames.
pub const COUNT_COLUMN: &str = "quantidade";

/// Number of positional columns in a lead export.
pub const LEAD_COLUMN_COUNT: usize = 12;

/// Field names bound to the export's positional columns, in order.
pub const LEAD_COLUMNS: [&str; LEAD_COLUMN_COUNT] = [
    "id",
    "customer",
    "stage",
    "source",
    "plan",
    "commission_total",
    "paid_value",
    "campaign_type",
    "campaign_tag",
    "phone",
    "tax_id",
    "owner",
];

/// One row of a CRM lead export.
///
/// Empty cells in text columns are kept as empty strings. The commission band
/// is `None` until the binner has run, and stays `None` for rows whose
/// commission is missing or outside every band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: String,
    pub customer: String,
    pub stage: String,
    pub source: String,
    pub plan: String,
    pub commission_total: Option<f64>,
    pub paid_value: Option<f64>,
    pub campaign_type: String,
    pub campaign_tag: String,
    pub phone: String,
    pub tax_id: String,
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission_band: Option<CommissionBand>,
}

/// Commission band derived from a lead's total commission.
///
/// Declaration order is the chart order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CommissionBand {
    #[serde(rename = "0-499")]
    UpTo499,
    #[serde(rename = "500-800")]
    From500To800,
    #[serde(rename = "800-1200")]
    From800To1200,
    #[serde(rename = "1200-1500")]
    From1200To1500,
    #[serde(rename = "1800+")]
    Above1500,
}

impl CommissionBand {
    /// All bands in ascending order.
    pub const ALL: [CommissionBand; 5] = [
        CommissionBand::UpTo499,
        CommissionBand::From500To800,
        CommissionBand::From800To1200,
        CommissionBand::From1200To1500,
        CommissionBand::Above1500,
    ];

    /// Label shown on charts.
    pub fn label(&self) -> &'static str {
        match self {
            CommissionBand::UpTo499 => "0-499",
            CommissionBand::From500To800 => "500-800",
            CommissionBand::From800To1200 => "800-1200",
            CommissionBand::From1200To1500 => "1200-1500",
            // the label is inherited from the CRM's own reports
            CommissionBand::Above1500 => "1800+",
        }
    }
}

impl fmt::Display for CommissionBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One aggregated group of a chart table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub primary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    pub count: usize,
}

impl AggregateRow {
    pub fn single(primary: impl Into<String>, count: usize) -> Self {
        Self {
            primary: primary.into(),
            secondary: None,
            count,
        }
    }

    pub fn pair(primary: impl Into<String>, secondary: impl Into<String>, count: usize) -> Self {
        Self {
            primary: primary.into(),
            secondary: Some(secondary.into()),
            count,
        }
    }
}

/// The charts the pipeline feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Lead count per source, over the filtered dataset.
    LeadsBySource,
    /// Lead count per (source, stage), over the unfiltered dataset.
    StageDistributionBySource,
    /// Lead count per (plan, source), over the unfiltered dataset.
    PlansBySource,
    /// Lead count per (plan, commission band), over the unfiltered dataset.
    PlansByCommissionBand,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::LeadsBySource,
        ChartKind::StageDistributionBySource,
        ChartKind::PlansBySource,
        ChartKind::PlansByCommissionBand,
    ];

    /// Human-readable chart title.
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::LeadsBySource => "Leads generated per source",
            ChartKind::StageDistributionBySource => "Stage distribution by source",
            ChartKind::PlansBySource => "Leads by plan and source",
            ChartKind::PlansByCommissionBand => "Leads by plan, segmented by commission band",
        }
    }

    /// Stable snake_case identifier, used in file names.
    pub fn slug(&self) -> &'static str {
        match self {
            ChartKind::LeadsBySource => "leads_by_source",
            ChartKind::StageDistributionBySource => "stage_distribution_by_source",
            ChartKind::PlansBySource => "plans_by_source",
            ChartKind::PlansByCommissionBand => "plans_by_commission_band",
        }
    }

    /// Whether the chart reads the filtered dataset rather than the normalized base table.
    pub fn reads_filtered(&self) -> bool {
        matches!(self, ChartKind::LeadsBySource)
    }

    /// Column names used when the table is handed over as a DataFrame.
    pub(crate) fn column_names(&self) -> (&'static str, Option<&'static str>) {
        match self {
            ChartKind::LeadsBySource => ("origem", None),
            ChartKind::StageDistributionBySource => ("origem", Some("etapa")),
            ChartKind::PlansBySource => ("convenio", Some("origem")),
            ChartKind::PlansByCommissionBand => ("convenio", Some("faixa_comissao")),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A suppressed and ranked table, ready for a rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartTable {
    pub kind: ChartKind,
    pub rows: Vec<AggregateRow>,
}

impl ChartTable {
    pub fn new(kind: ChartKind, rows: Vec<AggregateRow>) -> Self {
        Self { kind, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Distinct primary categories in table order.
    pub fn primary_categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.primary.as_str()) {
                seen.push(&row.primary);
            }
        }
        seen
    }

    /// Summed count per primary category.
    pub fn totals(&self) -> BTreeMap<&str, usize> {
        let mut totals = BTreeMap::new();
        for row in &self.rows {
            *totals.entry(row.primary.as_str()).or_insert(0) += row.count;
        }
        totals
    }

    /// Hand the table over as a DataFrame, rows in table order.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let (primary_name, secondary_name) = self.kind.column_names();

        let primary: Vec<&str> = self.rows.iter().map(|r| r.primary.as_str()).collect();
        let counts: Vec<u64> = self.rows.iter().map(|r| r.count as u64).collect();

        let mut columns = vec![Column::new(primary_name.into(), primary)];
        if let Some(name) = secondary_name {
            let secondary: Vec<&str> = self
                .rows
                .iter()
                .map(|r| r.secondary.as_deref().unwrap_or_default())
                .collect();
            columns.push(Column::new(name.into(), secondary));
        }
        columns.push(Column::new(COUNT_COLUMN.into(), counts));

        Ok(DataFrame::new(columns)?)
    }
}

/// What a chart hands to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartOutcome {
    /// Aggregated rows, already suppressed and ranked.
    Table { table: ChartTable },
    /// Nothing survived filtering or suppression.
    NoData { kind: ChartKind, message: String },
}

impl ChartOutcome {
    pub(crate) fn from_table(table: ChartTable) -> Self {
        if table.is_empty() {
            ChartOutcome::NoData {
                kind: table.kind,
                message: "No data available for the current filters".to_string(),
            }
        } else {
            ChartOutcome::Table { table }
        }
    }

    /// Page-level outcome for a filter selection that leaves nothing to show.
    pub fn no_data_for_filters(kind: ChartKind) -> Self {
        ChartOutcome::NoData {
            kind,
            message: "No data available for the selected filters".to_string(),
        }
    }

    pub fn kind(&self) -> ChartKind {
        match self {
            ChartOutcome::Table { table } => table.kind,
            ChartOutcome::NoData { kind, .. } => *kind,
        }
    }

    pub fn table(&self) -> Option<&ChartTable> {
        match self {
            ChartOutcome::Table { table } => Some(table),
            ChartOutcome::NoData { .. } => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, ChartOutcome::NoData { .. })
    }
}

/// Result of one `compute` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOutput {
    /// Rows in the normalized base table.
    pub base_rows: usize,
    /// Rows that passed the filter selection.
    pub filtered_rows: usize,
    /// One outcome per chart, in [`ChartKind::ALL`] order.
    pub charts: Vec<ChartOutcome>,
}

impl DashboardOutput {
    /// True when no source survives the leads-by-source suppression for the
    /// current filters. Every chart is then reported as no data.
    pub fn no_data_for_filters(&self) -> bool {
        self.chart(ChartKind::LeadsBySource)
            .is_none_or(ChartOutcome::is_no_data)
    }

    pub fn chart(&self, kind: ChartKind) -> Option<&ChartOutcome> {
        self.charts.iter().find(|c| c.kind() == kind)
    }
}

/// What happened while the base table was built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestionSummary {
    /// Rows read from the export.
    pub rows_read: usize,
    /// Rows left after the source blocklist.
    pub rows_kept: usize,
    /// Rows dropped per blocked source.
    pub blocked_sources: BTreeMap<String, usize>,
    /// Rows whose commission could not be banded.
    pub unbinned_commissions: usize,
    /// Human-readable description of each normalization step.
    pub normalization_actions: Vec<String>,
}

impl IngestionSummary {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read.saturating_sub(self.rows_kept)
    }
}
