//! Per-chart aggregation, suppression and ranking.
//!
//! | Chart                          | Reads      | Suppression                  | Top-N |
//! |--------------------------------|------------|------------------------------|-------|
//! | leads by source                | filtered   | source count `> 2`           | no    |
//! | stage distribution by source   | base table | source total `> 5`           | no    |
//! | plans by source                | base table | (plan, source) count `> 5`   | yes   |
//! | plans by commission band       | base table | (plan, band) count `> 0`     | yes   |
//!
//! The leads-by-source table gates the page: when nothing survives its
//! suppression, every chart is reported as no data.

use crate::aggregate::{
    Counted, count_by, rank_by_count, reorder_by_primary_total, suppress_by_primary_total,
    suppress_groups, text_key, top_n_primaries,
};
use crate::config::{ChartConfig, RankingConfig};
use crate::error::Result;
use crate::filter::FilterSelection;
use crate::pipeline::BaseTable;
use crate::types::{ChartKind, ChartOutcome, ChartTable, DashboardOutput, LeadRecord};
use tracing::{debug, info, warn};

/// Lead count per source over the filtered table, by descending count.
pub fn leads_by_source(filtered: &[LeadRecord], threshold: usize) -> ChartTable {
    let groups = count_by(filtered, |lead| text_key(&lead.source));
    let groups = suppress_groups(groups, threshold);
    let rows = rank_by_count(groups)
        .iter()
        .map(Counted::to_single_row)
        .collect();
    ChartTable::new(ChartKind::LeadsBySource, rows)
}

/// Lead count per (source, stage). Sources whose total is at or below the
/// threshold are dropped with all their stages.
pub fn stage_distribution_by_source(base: &[LeadRecord], threshold: usize) -> ChartTable {
    let groups = count_by(base, |lead| {
        Some((text_key(&lead.source)?, text_key(&lead.stage)?))
    });
    let rows = suppress_by_primary_total(groups, threshold)
        .iter()
        .map(Counted::to_pair_row)
        .collect();
    ChartTable::new(ChartKind::StageDistributionBySource, rows)
}

/// Lead count per (plan, source) for the `top_n` plans with the most leads.
pub fn plans_by_source(base: &[LeadRecord], threshold: usize, top_n: usize) -> ChartTable {
    let groups = count_by(base, |lead| {
        Some((text_key(&lead.plan)?, text_key(&lead.source)?))
    });
    let groups = suppress_groups(groups, threshold);
    let groups = top_n_primaries(groups, top_n);
    let rows = reorder_by_primary_total(groups)
        .iter()
        .map(Counted::to_pair_row)
        .collect();
    ChartTable::new(ChartKind::PlansBySource, rows)
}

/// Lead count per (plan, commission band) for the `top_n` plans with the most
/// banded leads. Unbinned leads do not count.
pub fn plans_by_commission_band(base: &[LeadRecord], threshold: usize, top_n: usize) -> ChartTable {
    let groups = count_by(base, |lead| {
        Some((text_key(&lead.plan)?, lead.commission_band?))
    });
    let groups = suppress_groups(groups, threshold);
    let groups = top_n_primaries(groups, top_n);
    let rows = reorder_by_primary_total(groups)
        .iter()
        .map(Counted::to_pair_row)
        .collect();
    ChartTable::new(ChartKind::PlansByCommissionBand, rows)
}

/// Run the filter and every chart against a base table.
///
/// Uses the default suppression thresholds; see [`compute_with_config`] to
/// override them.
pub fn compute(
    base: &BaseTable,
    filters: &FilterSelection,
    ranking: &RankingConfig,
) -> Result<DashboardOutput> {
    compute_with_config(base, filters, &ChartConfig::default().with_ranking(*ranking))
}

/// Run the filter and every chart with explicit thresholds and ranking.
///
/// This is a full recompute: nothing from a previous call is reused.
pub fn compute_with_config(
    base: &BaseTable,
    filters: &FilterSelection,
    config: &ChartConfig,
) -> Result<DashboardOutput> {
    config.validate()?;

    let filtered = filters.apply(base.leads());
    info!(
        "Computing charts: {} base leads, {} after filters",
        base.len(),
        filtered.len()
    );

    let by_source = leads_by_source(&filtered, config.source_count_threshold);

    let charts = if by_source.is_empty() {
        warn!(
            "No data available for the selected filters ({} leads after filters)",
            filtered.len()
        );
        ChartKind::ALL
            .into_iter()
            .map(ChartOutcome::no_data_for_filters)
            .collect()
    } else {
        vec![
            ChartOutcome::from_table(by_source),
            ChartOutcome::from_table(stage_distribution_by_source(
                base.leads(),
                config.stage_distribution_threshold,
            )),
            ChartOutcome::from_table(plans_by_source(
                base.leads(),
                config.plan_source_threshold,
                config.ranking.top_plans_by_source,
            )),
            ChartOutcome::from_table(plans_by_commission_band(
                base.leads(),
                config.plan_band_threshold,
                config.ranking.top_plans_by_band,
            )),
        ]
    };

    for chart in &charts {
        match chart.table() {
            Some(table) => debug!("{}: {} rows", chart.kind(), table.len()),
            None => debug!("{}: no data", chart.kind()),
        }
    }

    Ok(DashboardOutput {
        base_rows: base.len(),
        filtered_rows: filtered.len(),
        charts,
    })
}
