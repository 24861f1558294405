//! Commission banding.
//!
//! Bands are right-closed intervals with the lowest bound included:
//!
//! | Commission      | Band        |
//! |-----------------|-------------|
//! | `[0, 499]`      | `0-499`     |
//! | `(499, 800]`    | `500-800`   |
//! | `(800, 1200]`   | `800-1200`  |
//! | `(1200, 1500]`  | `1200-1500` |
//! | `(1500, ∞)`     | `1800+`     |
//!
//! Missing, negative and non-finite commissions are left unbinned.

use crate::types::{CommissionBand, LeadRecord};
use tracing::{debug, warn};

/// Upper (inclusive) edge of each band except the last.
const BAND_EDGES: [(f64, CommissionBand); 4] = [
    (499.0, CommissionBand::UpTo499),
    (800.0, CommissionBand::From500To800),
    (1200.0, CommissionBand::From800To1200),
    (1500.0, CommissionBand::From1200To1500),
];

/// Map a commission value to its band.
pub fn bin_commission(commission: Option<f64>) -> Option<CommissionBand> {
    let value = commission.filter(|v| v.is_finite())?;
    if value < 0.0 {
        return None;
    }

    let band = BAND_EDGES
        .iter()
        .find(|(upper, _)| value <= *upper)
        .map(|(_, band)| *band)
        .unwrap_or(CommissionBand::Above1500);
    Some(band)
}

/// Output of [`assign_commission_bands`].
#[derive(Debug, Clone, PartialEq)]
pub struct BandedLeads {
    pub leads: Vec<LeadRecord>,
    /// Rows left without a band.
    pub unbinned: usize,
}

/// Derive the commission band of every lead.
pub fn assign_commission_bands(leads: &[LeadRecord]) -> BandedLeads {
    let banded: Vec<LeadRecord> = leads
        .iter()
        .map(|lead| LeadRecord {
            commission_band: bin_commission(lead.commission_total),
            ..lead.clone()
        })
        .collect();

    let unbinned = banded
        .iter()
        .filter(|lead| lead.commission_band.is_none())
        .count();

    if unbinned > 0 {
        warn!(
            "{} of {} leads have no usable commission and are left out of banded charts",
            unbinned,
            banded.len()
        );
    } else {
        debug!("All {} leads have a commission band", banded.len());
    }

    BandedLeads {
        leads: banded,
        unbinned,
    }
}
