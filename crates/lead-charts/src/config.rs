//! Configuration types for the chart pipeline.
//!
//! [`ChartConfig`] holds the per-chart suppression thresholds and the two
//! Top-N parameters. Use [`ChartConfig::builder()`] for a validated instance;
//! `Default` gives the values the dashboard has always used.

use serde::{Deserialize, Serialize};

/// Default number of plans kept by the Top-N charts.
pub const DEFAULT_TOP_N: usize = 5;

/// Ranking parameters supplied by the control surface.
///
/// Each plan chart has its own, independent Top-N value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Plans kept in the plan × source chart.
    #[serde(default = "default_top_n")]
    pub top_plans_by_source: usize,
    /// Plans kept in the plan × commission band chart.
    #[serde(default = "default_top_n")]
    pub top_plans_by_band: usize,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_plans_by_source: DEFAULT_TOP_N,
            top_plans_by_band: DEFAULT_TOP_N,
        }
    }
}

impl RankingConfig {
    pub fn new(top_plans_by_source: usize, top_plans_by_band: usize) -> Result<Self, ConfigValidationError> {
        let config = Self {
            top_plans_by_source,
            top_plans_by_band,
        };
        config.validate()?;
        Ok(config)
    }

    /// Both Top-N values must be at least 1. There is no upper bound.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.top_plans_by_source == 0 {
            return Err(ConfigValidationError::InvalidTopN {
                field: "top_plans_by_source".to_string(),
                value: self.top_plans_by_source,
            });
        }
        if self.top_plans_by_band == 0 {
            return Err(ConfigValidationError::InvalidTopN {
                field: "top_plans_by_band".to_string(),
                value: self.top_plans_by_band,
            });
        }
        Ok(())
    }
}

/// Suppression thresholds and ranking for every chart.
///
/// A group survives suppression only when its count is strictly greater than
/// the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Minimum (exclusive) per-source count in the leads-by-source chart.
    /// Default: 2
    pub source_count_threshold: usize,

    /// Minimum (exclusive) per-source total in the stage distribution chart.
    /// Default: 5
    pub stage_distribution_threshold: usize,

    /// Minimum (exclusive) per-(plan, source) count in the plan × source chart.
    /// Default: 5
    pub plan_source_threshold: usize,

    /// Minimum (exclusive) per-(plan, band) count in the plan × band chart.
    /// Default: 0, which keeps every group
    pub plan_band_threshold: usize,

    /// Top-N parameters.
    pub ranking: RankingConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            source_count_threshold: 2,
            stage_distribution_threshold: 5,
            plan_source_threshold: 5,
            plan_band_threshold: 0,
            ranking: RankingConfig::default(),
        }
    }
}

impl ChartConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ChartConfigBuilder {
        ChartConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.ranking.validate()
    }

    /// Same thresholds, different ranking.
    pub fn with_ranking(&self, ranking: RankingConfig) -> Self {
        Self {
            ranking,
            ..self.clone()
        }
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid Top-N for '{field}': {value} (must be at least 1)")]
    InvalidTopN { field: String, value: usize },
}

/// Builder for [`ChartConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ChartConfigBuilder {
    source_count_threshold: Option<usize>,
    stage_distribution_threshold: Option<usize>,
    plan_source_threshold: Option<usize>,
    plan_band_threshold: Option<usize>,
    top_plans_by_source: Option<usize>,
    top_plans_by_band: Option<usize>,
}

impl ChartConfigBuilder {
    /// Set the exclusive minimum count for the leads-by-source chart.
    pub fn source_count_threshold(mut self, threshold: usize) -> Self {
        self.source_count_threshold = Some(threshold);
        self
    }

    /// Set the exclusive minimum per-source total for the stage distribution chart.
    pub fn stage_distribution_threshold(mut self, threshold: usize) -> Self {
        self.stage_distribution_threshold = Some(threshold);
        self
    }

    /// Set the exclusive minimum cell count for the plan × source chart.
    pub fn plan_source_threshold(mut self, threshold: usize) -> Self {
        self.plan_source_threshold = Some(threshold);
        self
    }

    /// Set the exclusive minimum cell count for the plan × band chart.
    pub fn plan_band_threshold(mut self, threshold: usize) -> Self {
        self.plan_band_threshold = Some(threshold);
        self
    }

    /// Set how many plans the plan × source chart keeps.
    pub fn top_plans_by_source(mut self, n: usize) -> Self {
        self.top_plans_by_source = Some(n);
        self
    }

    /// Set how many plans the plan × band chart keeps.
    pub fn top_plans_by_band(mut self, n: usize) -> Self {
        self.top_plans_by_band = Some(n);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ChartConfig` or an error if validation fails.
    pub fn build(self) -> Result<ChartConfig, ConfigValidationError> {
        let defaults = ChartConfig::default();
        let config = ChartConfig {
            source_count_threshold: self
                .source_count_threshold
                .unwrap_or(defaults.source_count_threshold),
            stage_distribution_threshold: self
                .stage_distribution_threshold
                .unwrap_or(defaults.stage_distribution_threshold),
            plan_source_threshold: self
                .plan_source_threshold
                .unwrap_or(defaults.plan_source_threshold),
            plan_band_threshold: self
                .plan_band_threshold
                .unwrap_or(defaults.plan_band_threshold),
            ranking: RankingConfig {
                top_plans_by_source: self.top_plans_by_source.unwrap_or(DEFAULT_TOP_N),
                top_plans_by_band: self.top_plans_by_band.unwrap_or(DEFAULT_TOP_N),
            },
        };

        config.validate()?;
        Ok(config)
    }
}
