//! Weak-supervision sampling: keep at most `n` labels per predicate.
//!
//! # Per-predicate budgets
//!
//! Predicate frequencies in Visual Genome are heavily skewed (`on` and `has`
//! dwarf `riding`). Sampling a flat fraction would leave rare predicates with
//! no labels at all, so every predicate gets its own budget:
//!
//! ```text
//! counts:   on 9000   has 4000   riding 12        n_per_pred = 50
//! labeled:  on 50     has 50     riding 12 (all)
//! ```
//!
//! Everything not drawn keeps its geometry but has its predicate replaced by
//! `UNLABELED`, so feature rows and label rows stay aligned.
//!
//! # Example
//!
//! ```rust
//! use rand::{rngs::StdRng, SeedableRng};
//! use vgrel::dataset::{count_relationships, sample_relationships};
//! use vgrel::dataset::{ImageRelationships, Relationship, VgObject};
//!
//! let rel = |p: &str| Relationship::new(
//!     VgObject::new("man", 0.0, 0.0, 4.0, 8.0), p, VgObject::new("hat", 0.0, 0.0, 2.0, 2.0));
//! let data = vec![ImageRelationships::new(1, vec![rel("wearing"), rel("wearing"), rel("on")])];
//! let counts = count_relationships(&data, None);
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let sampled = sample_relationships(&data, &counts, 1, &mut rng).unwrap();
//! let labeled = sampled[0].relationships.iter().filter(|r| !r.is_unlabeled()).count();
//! assert_eq!(labeled, 2); // one "wearing", one "on"
//! ```

use super::counts::PredicateCounts;
use super::types::{ImageRelationships, UNLABELED};
use crate::{Error, Result};
use rand::seq::index;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Draw up to `n_per_pred` occurrence indices per predicate.
///
/// Predicates are visited from rarest to most frequent so that a fixed seed
/// gives the same draw regardless of map ordering. Keys are lower-cased.
pub fn sample_indices<R: Rng + ?Sized>(
    counts: &PredicateCounts,
    n_per_pred: usize,
    rng: &mut R,
) -> HashMap<String, HashSet<usize>> {
    let mut keep = HashMap::with_capacity(counts.len());
    for (pred, count) in counts.ascending() {
        let chosen: HashSet<usize> = if count < n_per_pred {
            (0..count).collect()
        } else {
            index::sample(rng, count, n_per_pred).into_iter().collect()
        };
        keep.insert(pred.to_lowercase(), chosen);
    }
    keep
}

/// Copy of `relationships` with all but the sampled labels masked.
///
/// The k-th occurrence (in corpus order) of a predicate keeps its label iff
/// `k` was drawn for that predicate; every other relationship becomes
/// [`UNLABELED`]. Relationship order and count are unchanged.
///
/// Fails with [`Error::UnknownPredicate`] if the corpus holds a predicate
/// that `counts` does not.
pub fn sample_relationships<R: Rng + ?Sized>(
    relationships: &[ImageRelationships],
    counts: &PredicateCounts,
    n_per_pred: usize,
    rng: &mut R,
) -> Result<Vec<ImageRelationships>> {
    let keep = sample_indices(counts, n_per_pred, rng);
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut sampled = relationships.to_vec();
    let mut labeled = 0usize;

    for r in sampled.iter_mut().flat_map(|a| a.relationships.iter_mut()) {
        let pred = r.predicate.to_lowercase();
        let chosen = keep
            .get(&pred)
            .ok_or_else(|| Error::UnknownPredicate(pred.clone()))?;

        let idx = seen.entry(pred).or_insert(0);
        if chosen.contains(&*idx) {
            labeled += 1;
        } else {
            r.predicate = UNLABELED.to_string();
        }
        *idx += 1;
    }

    log::info!(
        "Sampled {} labeled relationships ({} per predicate max, {} predicates)",
        labeled,
        n_per_pred,
        keep.len()
    );
    Ok(sampled)
}
