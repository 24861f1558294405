//! Threshold suppression on aggregated counts.
//!
//! A group survives only when its count is strictly greater than the
//! threshold. Suppression never looks at raw rows.

use super::Counted;
use std::collections::BTreeMap;
use tracing::debug;

/// Drop every group whose own count is at or below `threshold`.
pub fn suppress_groups<K>(groups: Vec<Counted<K>>, threshold: usize) -> Vec<Counted<K>> {
    let before = groups.len();
    let kept: Vec<Counted<K>> = groups
        .into_iter()
        .filter(|group| group.count > threshold)
        .collect();

    debug!(
        "Suppressed {} of {} groups at count <= {}",
        before - kept.len(),
        before,
        threshold
    );
    kept
}

/// Drop every primary category whose total, summed over its secondary
/// groups, is at or below `threshold`. All rows of a dropped category go.
pub fn suppress_by_primary_total<P, S>(
    groups: Vec<Counted<(P, S)>>,
    threshold: usize,
) -> Vec<Counted<(P, S)>>
where
    P: Ord + Clone,
{
    let mut totals: BTreeMap<P, usize> = BTreeMap::new();
    for group in &groups {
        *totals.entry(group.key.0.clone()).or_insert(0) += group.count;
    }

    let dropped = totals.values().filter(|total| **total <= threshold).count();
    debug!(
        "Suppressed {} of {} categories at total <= {}",
        dropped,
        totals.len(),
        threshold
    );

    groups
        .into_iter()
        .filter(|group| totals.get(&group.key.0).is_some_and(|total| *total > threshold))
        .collect()
}
