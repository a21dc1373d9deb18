//! Per-predicate relationship counts.

use super::types::ImageRelationships;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Key under which the serialized form carries the total.
pub const TOTAL_KEY: &str = "_TOTAL";

/// Predicate → number of relationships.
///
/// Serializes as a flat map with an extra [`TOTAL_KEY`] entry; the entry is
/// recomputed rather than trusted when deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, usize>", into = "BTreeMap<String, usize>")]
pub struct PredicateCounts {
    counts: BTreeMap<String, usize>,
}

impl PredicateCounts {
    /// Empty counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` to a predicate's count.
    pub fn add(&mut self, predicate: impl Into<String>, n: usize) {
        *self.counts.entry(predicate.into()).or_insert(0) += n;
    }

    /// Count for one predicate.
    #[must_use]
    pub fn get(&self, predicate: &str) -> Option<usize> {
        self.counts.get(predicate).copied()
    }

    /// Sum over all predicates.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when nothing was counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(predicate, count)` in predicate order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// `(predicate, count)` from rarest to most frequent; ties by name.
    #[must_use]
    pub fn ascending(&self) -> Vec<(&str, usize)> {
        let mut v: Vec<_> = self.iter().collect();
        v.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        v
    }
}

impl From<BTreeMap<String, usize>> for PredicateCounts {
    fn from(mut counts: BTreeMap<String, usize>) -> Self {
        counts.remove(TOTAL_KEY);
        Self { counts }
    }
}

impl From<PredicateCounts> for BTreeMap<String, usize> {
    fn from(pc: PredicateCounts) -> Self {
        let total = pc.total();
        let mut map = pc.counts;
        map.insert(TOTAL_KEY.to_string(), total);
        map
    }
}

/// Count relationships per predicate.
///
/// With `syns_to_preds`, a predicate present in the map is counted under its
/// canonical name.
#[must_use]
pub fn count_relationships(
    annotations: &[ImageRelationships],
    syns_to_preds: Option<&HashMap<String, String>>,
) -> PredicateCounts {
    let mut counts = PredicateCounts::new();
    for r in annotations.iter().flat_map(|a| a.relationships.iter()) {
        let pred = syns_to_preds
            .and_then(|m| m.get(&r.predicate))
            .unwrap_or(&r.predicate);
        counts.add(pred.as_str(), 1);
    }
    counts
}
