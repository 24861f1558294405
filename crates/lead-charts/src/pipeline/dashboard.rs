//! Cached base table plus recompute-on-demand.

use crate::config::{ChartConfig, RankingConfig};
use crate::error::{Result, ResultExt};
use crate::filter::{FilterOptions, FilterSelection};
use crate::pipeline::{BaseTable, charts};
use crate::types::DashboardOutput;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Holds the normalized base table for the lifetime of a session.
///
/// Stages 1-3 run once, when the dashboard is built. Every call to
/// [`Dashboard::compute`] re-runs filtering and the per-chart stages against
/// the cached table. Cloning is cheap: the table is shared, not copied.
///
/// # Example
///
/// ```rust,ignore
/// use lead_charts::{Dashboard, FilterDimension, FilterSelection, RankingConfig};
///
/// let dashboard = Dashboard::from_csv("leads.csv")?;
/// let filters = FilterSelection::all().with(FilterDimension::Owner, ["Ana"]);
/// let output = dashboard.compute(&filters, &RankingConfig::new(3, 5)?)?;
///
/// for chart in &output.charts {
///     println!("{}: {:?}", chart.kind(), chart.table().map(|t| t.len()));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Dashboard {
    base: Arc<BaseTable>,
    config: ChartConfig,
}

static_assertions::assert_impl_all!(Dashboard: Send, Sync);

impl Dashboard {
    pub fn new(base: BaseTable) -> Self {
        Self {
            base: Arc::new(base),
            config: ChartConfig::default(),
        }
    }

    /// Read a CSV export and cache its base table.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let start = Instant::now();
        let base = BaseTable::load_csv(path)
            .context(format!("Loading lead export '{}'", path.display()))?;
        info!(
            "Loaded {} leads from '{}' in {:?}",
            base.len(),
            path.display(),
            start.elapsed()
        );
        Ok(Self::new(base))
    }

    /// Replace the suppression thresholds.
    ///
    /// The ranking part of `config` is only a default; [`Dashboard::compute`]
    /// always uses the ranking it is given.
    pub fn with_config(mut self, config: ChartConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn base(&self) -> &BaseTable {
        &self.base
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn options(&self) -> &FilterOptions {
        self.base.options()
    }

    /// Recompute every chart for a filter selection and ranking.
    pub fn compute(
        &self,
        filters: &FilterSelection,
        ranking: &RankingConfig,
    ) -> Result<DashboardOutput> {
        let start = Instant::now();
        let config = self.config.with_ranking(*ranking);
        match charts::compute_with_config(&self.base, filters, &config) {
            Ok(output) => {
                info!("Charts computed in {:?}", start.elapsed());
                Ok(output)
            }
            Err(e) => {
                error!("Chart computation failed: {}", e);
                Err(e)
            }
        }
    }
}

impl From<BaseTable> for Dashboard {
    fn from(base: BaseTable) -> Self {
        Self::new(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterDimension;
    use crate::test_support::lead_for;
    use crate::types::ChartKind;
    use pretty_assertions::assert_eq;
    use std::thread;

    fn dashboard() -> Dashboard {
        let leads = (0..9)
            .map(|i| {
                let owner = if i % 3 == 0 { "Bia" } else { "Ana" };
                lead_for(&i.to_string(), "NOVO", "ATIVA", owner)
            })
            .collect();
        Dashboard::new(BaseTable::from_leads(leads))
    }

    #[test]
    fn test_recompute_reuses_cached_base() {
        let dashboard = dashboard();
        let all = dashboard
            .compute(&FilterSelection::all(), &RankingConfig::default())
            .unwrap();
        let ana = dashboard
            .compute(
                &FilterSelection::all().with(FilterDimension::Owner, ["Ana"]),
                &RankingConfig::default(),
            )
            .unwrap();

        assert_eq!(all.filtered_rows, 9);
        assert_eq!(ana.filtered_rows, 6);
        assert_eq!(all.base_rows, ana.base_rows);
        assert_eq!(
            all.chart(ChartKind::StageDistributionBySource),
            ana.chart(ChartKind::StageDistributionBySource)
        );
    }

    #[test]
    fn test_with_config_overrides_thresholds() {
        let config = ChartConfig::builder().source_count_threshold(10).build().unwrap();
        let dashboard = dashboard().with_config(config).unwrap();
        let output = dashboard
            .compute(&FilterSelection::all(), &RankingConfig::default())
            .unwrap();
        assert!(output.chart(ChartKind::LeadsBySource).unwrap().is_no_data());
    }

    #[test]
    fn test_concurrent_computes_share_the_base() {
        let dashboard = dashboard();
        let handles: Vec<_> = ["Ana", "Bia"]
            .into_iter()
            .map(|owner| {
                let dashboard = dashboard.clone();
                thread::spawn(move || {
                    dashboard
                        .compute(
                            &FilterSelection::all().with(FilterDimension::Owner, [owner]),
                            &RankingConfig::default(),
                        )
                        .map(|output| output.filtered_rows)
                })
            })
            .collect();

        let rows: Vec<usize> = handles
            .into_iter()
            .map(|h| h.join().unwrap().unwrap())
            .collect();
        assert_eq!(rows, vec![6, 3]);
        assert_eq!(dashboard.base().len(), 9);
    }
}
