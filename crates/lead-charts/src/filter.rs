//! Conjunctive multi-value row filter.
//!
//! Three dimensions can be restricted: stage, campaign type and owner. A
//! dimension left as `None` allows every observed value, which is the same as
//! selecting the full option list. `Some` of an empty set allows nothing.

use crate::types::LeadRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// A filterable dimension of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Stage,
    CampaignType,
    Owner,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 3] = [
        FilterDimension::Stage,
        FilterDimension::CampaignType,
        FilterDimension::Owner,
    ];

    /// The lead's value for this dimension.
    pub fn value_of<'a>(&self, lead: &'a LeadRecord) -> &'a str {
        match self {
            FilterDimension::Stage => &lead.stage,
            FilterDimension::CampaignType => &lead.campaign_type,
            FilterDimension::Owner => &lead.owner,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterDimension::Stage => "stage",
            FilterDimension::CampaignType => "campaign type",
            FilterDimension::Owner => "owner",
        }
    }
}

/// User-selected allowed values per dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stages: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_types: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owners: Option<BTreeSet<String>>,
}

impl FilterSelection {
    /// A selection that lets every row through.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict a dimension to the given values.
    pub fn with<I, S>(mut self, dimension: FilterDimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = values.into_iter().map(Into::into).collect();
        *self.slot_mut(dimension) = Some(set);
        self
    }

    /// Allowed values for a dimension; `None` means unrestricted.
    pub fn allowed(&self, dimension: FilterDimension) -> Option<&BTreeSet<String>> {
        match dimension {
            FilterDimension::Stage => self.stages.as_ref(),
            FilterDimension::CampaignType => self.campaign_types.as_ref(),
            FilterDimension::Owner => self.owners.as_ref(),
        }
    }

    fn slot_mut(&mut self, dimension: FilterDimension) -> &mut Option<BTreeSet<String>> {
        match dimension {
            FilterDimension::Stage => &mut self.stages,
            FilterDimension::CampaignType => &mut self.campaign_types,
            FilterDimension::Owner => &mut self.owners,
        }
    }

    /// True when no dimension is restricted.
    pub fn is_unrestricted(&self) -> bool {
        FilterDimension::ALL
            .iter()
            .all(|d| self.allowed(*d).is_none())
    }

    /// Whether a lead passes on every dimension.
    pub fn matches(&self, lead: &LeadRecord) -> bool {
        FilterDimension::ALL.iter().all(|dimension| {
            self.allowed(*dimension)
                .is_none_or(|allowed| allowed.contains(dimension.value_of(lead)))
        })
    }

    /// Apply the selection, producing a new table.
    pub fn apply(&self, leads: &[LeadRecord]) -> Vec<LeadRecord> {
        let filtered: Vec<LeadRecord> = leads
            .iter()
            .filter(|lead| self.matches(lead))
            .cloned()
            .collect();

        debug!(
            "Filter kept {} of {} leads",
            filtered.len(),
            leads.len()
        );
        filtered
    }
}

/// Distinct observed values per dimension, offered by the control surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub stages: Vec<String>,
    pub campaign_types: Vec<String>,
    pub owners: Vec<String>,
}

impl FilterOptions {
    /// Collect distinct values in first-seen order.
    pub fn observe(leads: &[LeadRecord]) -> Self {
        Self {
            stages: distinct_in_order(leads, FilterDimension::Stage),
            campaign_types: distinct_in_order(leads, FilterDimension::CampaignType),
            owners: distinct_in_order(leads, FilterDimension::Owner),
        }
    }

    pub fn values(&self, dimension: FilterDimension) -> &[String] {
        match dimension {
            FilterDimension::Stage => &self.stages,
            FilterDimension::CampaignType => &self.campaign_types,
            FilterDimension::Owner => &self.owners,
        }
    }

    /// The default selection made explicit: every observed value selected.
    pub fn select_all(&self) -> FilterSelection {
        FilterSelection::all()
            .with(FilterDimension::Stage, self.stages.iter().cloned())
            .with(FilterDimension::CampaignType, self.campaign_types.iter().cloned())
            .with(FilterDimension::Owner, self.owners.iter().cloned())
    }
}

fn distinct_in_order(leads: &[LeadRecord], dimension: FilterDimension) -> Vec<String> {
    let mut seen = BTreeSet::new();
    leads
        .iter()
        .map(|lead| dimension.value_of(lead))
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lead_for;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<LeadRecord> {
        vec![
            lead_for("1", "A", "ATIVA", "X"),
            lead_for("2", "A", "ATIVA", "Y"),
            lead_for("3", "B", "ATIVA", "X"),
            lead_for("4", "A", "RECEPTIVA", "X"),
            lead_for("5", "B", "RECEPTIVA", "Y"),
            lead_for("6", "", "ATIVA", "X"),
        ]
    }

    fn ids(leads: &[LeadRecord]) -> Vec<&str> {
        leads.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_default_selection_keeps_everything() {
        let leads = sample();
        assert_eq!(FilterSelection::all().apply(&leads), leads);
        assert!(FilterSelection::all().is_unrestricted());
    }

    #[test]
    fn test_explicit_full_selection_equals_default() {
        let leads = sample();
        let explicit = FilterOptions::observe(&leads).select_all();
        assert!(!explicit.is_unrestricted());
        assert_eq!(explicit.apply(&leads), FilterSelection::all().apply(&leads));
    }

    #[test]
    fn test_filter_is_conjunctive() {
        let leads = sample();
        let selection = FilterSelection::all()
            .with(FilterDimension::Stage, ["A"])
            .with(FilterDimension::Owner, ["X"]);
        let filtered = selection.apply(&leads);
        assert_eq!(ids(&filtered), vec!["1", "4"]);
        assert!(filtered.iter().all(|l| l.stage == "A" && l.owner == "X"));
    }

    #[test]
    fn test_multi_value_selection() {
        let leads = sample();
        let selection = FilterSelection::all()
            .with(FilterDimension::Stage, ["A", "B"])
            .with(FilterDimension::CampaignType, ["RECEPTIVA"]);
        assert_eq!(ids(&selection.apply(&leads)), vec!["4", "5"]);
    }

    #[test]
    fn test_empty_set_lets_nothing_through() {
        let leads = sample();
        for dimension in FilterDimension::ALL {
            let selection = FilterSelection::all().with(dimension, Vec::<String>::new());
            assert!(
                selection.apply(&leads).is_empty(),
                "empty {} selection should yield no rows",
                dimension.label()
            );
        }
    }

    #[test]
    fn test_empty_value_is_selectable() {
        let leads = sample();
        let selection = FilterSelection::all().with(FilterDimension::Stage, [""]);
        assert_eq!(ids(&selection.apply(&leads)), vec!["6"]);
    }

    #[test]
    fn test_options_are_distinct_in_first_seen_order() {
        let options = FilterOptions::observe(&sample());
        assert_eq!(options.stages, vec!["A", "B", ""]);
        assert_eq!(options.campaign_types, vec!["ATIVA", "RECEPTIVA"]);
        assert_eq!(options.values(FilterDimension::Owner), ["X", "Y"]);
    }

    #[test]
    fn test_selection_from_json() {
        let selection: FilterSelection =
            serde_json::from_str(r#"{"owners": ["Y"], "stages": []}"#).unwrap();
        assert_eq!(selection.campaign_types, None);
        assert!(selection.apply(&sample()).is_empty());

        let selection: FilterSelection = serde_json::from_str(r#"{"owners": ["Y"]}"#).unwrap();
        assert_eq!(ids(&selection.apply(&sample())), vec!["2", "5"]);
    }
}
