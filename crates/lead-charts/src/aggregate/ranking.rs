//! Top-N selection and ranking reorder.
//!
//! Ties between equal totals are broken by first appearance in the input.
//! Aggregated groups arrive in ascending key order, so in practice the
//! category with the smaller key wins a tie. The rule is deterministic across
//! runs.

use super::Counted;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Total per primary category, sorted by descending total.
pub fn primary_totals<P, S>(groups: &[Counted<(P, S)>]) -> Vec<(P, usize)>
where
    P: Ord + Clone,
{
    let mut position: BTreeMap<P, usize> = BTreeMap::new();
    let mut totals: Vec<(P, usize)> = Vec::new();

    for group in groups {
        match position.get(&group.key.0).copied() {
            Some(idx) => totals[idx].1 += group.count,
            None => {
                position.insert(group.key.0.clone(), totals.len());
                totals.push((group.key.0.clone(), group.count));
            }
        }
    }

    // stable: equal totals keep first-seen order
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}

/// Keep only the rows of the `n` primary categories with the largest totals.
///
/// Rows of every other category are dropped, not merged. Row order is left
/// untouched; see [`reorder_by_primary_total`].
pub fn top_n_primaries<P, S>(groups: Vec<Counted<(P, S)>>, n: usize) -> Vec<Counted<(P, S)>>
where
    P: Ord + Clone,
{
    let keep: BTreeSet<P> = primary_totals(&groups)
        .into_iter()
        .take(n)
        .map(|(primary, _)| primary)
        .collect();

    debug!("Keeping top {} categories ({} present)", n, keep.len());

    groups
        .into_iter()
        .filter(|group| keep.contains(&group.key.0))
        .collect()
}

/// Re-sequence rows so higher-total categories come first.
///
/// Rows within a category keep their relative order.
pub fn reorder_by_primary_total<P, S>(groups: Vec<Counted<(P, S)>>) -> Vec<Counted<(P, S)>>
where
    P: Ord + Clone,
{
    let rank: BTreeMap<P, usize> = primary_totals(&groups)
        .into_iter()
        .enumerate()
        .map(|(rank, (primary, _))| (primary, rank))
        .collect();

    let mut groups = groups;
    groups.sort_by_key(|group| rank.get(&group.key.0).copied().unwrap_or(usize::MAX));
    groups
}

/// Order single-dimension groups by descending count, ties in input order.
pub fn rank_by_count<K>(groups: Vec<Counted<K>>) -> Vec<Counted<K>> {
    let mut groups = groups;
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}
