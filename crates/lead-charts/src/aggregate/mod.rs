//! Grouping, suppression and ranking of lead counts.
//!
//! Groups are emitted in ascending key order. Two-dimensional groups use a
//! `(primary, secondary)` tuple key, so they are ordered by primary first.

mod ranking;
mod suppress;

pub use ranking::{primary_totals, rank_by_count, reorder_by_primary_total, top_n_primaries};
pub use suppress::{suppress_by_primary_total, suppress_groups};

use crate::types::{AggregateRow, LeadRecord};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Row count of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counted<K> {
    pub key: K,
    pub count: usize,
}

impl<K> Counted<K> {
    pub fn new(key: K, count: usize) -> Self {
        Self { key, count }
    }
}

impl<P: Display> Counted<P> {
    pub fn to_single_row(&self) -> AggregateRow {
        AggregateRow::single(self.key.to_string(), self.count)
    }
}

impl<P: Display, S: Display> Counted<(P, S)> {
    pub fn to_pair_row(&self) -> AggregateRow {
        AggregateRow::pair(self.key.0.to_string(), self.key.1.to_string(), self.count)
    }
}

/// Count leads per key.
///
/// Leads for which `key` returns `None` are not counted anywhere.
pub fn count_by<'a, K, F>(leads: &'a [LeadRecord], key: F) -> Vec<Counted<K>>
where
    K: Ord,
    F: Fn(&'a LeadRecord) -> Option<K>,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for lead in leads {
        if let Some(k) = key(lead) {
            *counts.entry(k).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .map(|(key, count)| Counted::new(key, count))
        .collect()
}

/// Key extractor for a text field that skips empty values.
pub fn text_key(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}
