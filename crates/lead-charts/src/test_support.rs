//! Lead builders shared by unit tests.

use crate::types::LeadRecord;

/// A mapped lead with the fields most tests care about.
pub(crate) fn lead(id: &str, stage: &str, source: &str, commission: Option<f64>) -> LeadRecord {
    LeadRecord {
        id: id.to_string(),
        customer: format!("Cliente {}", id),
        stage: stage.to_string(),
        source: source.to_string(),
        plan: "UNIMED".to_string(),
        commission_total: commission,
        paid_value: None,
        campaign_type: "ATIVA".to_string(),
        campaign_tag: String::new(),
        phone: "11999990000".to_string(),
        tax_id: "12345678900".to_string(),
        owner: "Ana".to_string(),
        commission_band: None,
    }
}

/// A lead varying only on the filterable dimensions.
pub(crate) fn lead_for(id: &str, stage: &str, campaign_type: &str, owner: &str) -> LeadRecord {
    LeadRecord {
        campaign_type: campaign_type.to_string(),
        owner: owner.to_string(),
        ..lead(id, stage, "GOOGLE", None)
    }
}

pub(crate) fn with_plan(lead: LeadRecord, plan: &str) -> LeadRecord {
    LeadRecord {
        plan: plan.to_string(),
        ..lead
    }
}
