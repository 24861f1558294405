//! Field normalization for mapped lead records.
//!
//! This module provides:
//! - Stage cleaning (pipeline suffix removal, upper-casing)
//! - Tax id cleaning (trailing ".0" artifact removal)
//! - Source blocklist filtering
//!
//! Normalization is idempotent: running it over its own output changes nothing.

mod sanitizers;

pub use sanitizers::BLOCKED_SOURCES;

use crate::types::LeadRecord;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Output of [`LeadNormalizer::normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedLeads {
    pub leads: Vec<LeadRecord>,
    /// Rows dropped per blocked source.
    pub blocked: BTreeMap<String, usize>,
    /// Human-readable description of what changed.
    pub actions: Vec<String>,
}

/// Cleans text artifacts and drops blocklisted sources.
pub struct LeadNormalizer;

impl LeadNormalizer {
    /// Normalize a mapped table into a new one.
    pub fn normalize(&self, leads: &[LeadRecord]) -> NormalizedLeads {
        let mut actions = Vec::new();
        let mut blocked: BTreeMap<String, usize> = BTreeMap::new();
        let mut stages_rewritten = 0;
        let mut tax_ids_cleaned = 0;

        info!("Normalizing {} lead records...", leads.len());

        let normalized: Vec<LeadRecord> = leads
            .iter()
            .filter(|lead| {
                if sanitizers::is_blocked_source(&lead.source) {
                    *blocked.entry(lead.source.clone()).or_insert(0) += 1;
                    false
                } else {
                    true
                }
            })
            .map(|lead| {
                let stage = sanitizers::clean_stage(&lead.stage);
                let tax_id = sanitizers::clean_tax_id(&lead.tax_id);
                if stage != lead.stage {
                    stages_rewritten += 1;
                }
                if tax_id != lead.tax_id {
                    tax_ids_cleaned += 1;
                }
                LeadRecord {
                    stage,
                    tax_id,
                    ..lead.clone()
                }
            })
            .collect();

        if blocked.is_empty() {
            actions.push("No leads from blocked sources found".to_string());
        } else {
            for (source, count) in &blocked {
                actions.push(format!("Removed {} leads from blocked source '{}'", count, source));
                debug!("Removed {} leads from blocked source '{}'", count, source);
            }
        }

        if stages_rewritten > 0 {
            actions.push(format!("Normalized {} stage labels", stages_rewritten));
        }
        if tax_ids_cleaned > 0 {
            actions.push(format!(
                "Removed trailing '.0' from {} tax ids",
                tax_ids_cleaned
            ));
        }

        debug!(
            "Normalization kept {} of {} leads",
            normalized.len(),
            leads.len()
        );

        NormalizedLeads {
            leads: normalized,
            blocked,
            actions,
        }
    }
}
