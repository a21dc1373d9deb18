//! Relationship filtering and predicate normalization.

use super::types::{ImageRelationships, Relationship};
use std::collections::HashMap;

/// Filter relationships in place.
///
/// Relationships whose subject or object box has zero width or height are
/// dropped with a warning. Surviving predicates are lower-cased before
/// `condition` sees them; the relationship is kept iff `condition` holds.
/// Image records are kept even when they end up with no relationships.
///
/// Returns the number of relationships removed.
pub fn filter_relationships_in_place<F>(annotations: &mut [ImageRelationships], mut condition: F) -> usize
where
    F: FnMut(&Relationship) -> bool,
{
    let mut removed = 0;
    for a in annotations.iter_mut() {
        let before = a.relationships.len();
        let rels = std::mem::take(&mut a.relationships);
        a.relationships = rels
            .into_iter()
            .filter_map(|mut r| {
                if !r.subject.has_valid_bbox() {
                    log::warn!("Invalid bbox: {:?}. Skipping rel.", r.subject);
                    return None;
                }
                if !r.object.has_valid_bbox() {
                    log::warn!("Invalid bbox: {:?}. Skipping rel.", r.object);
                    return None;
                }
                r.predicate = r.predicate.to_lowercase();
                condition(&r).then_some(r)
            })
            .collect();
        removed += before - a.relationships.len();
    }
    log::debug!("Filtered out {} relationships", removed);
    removed
}

/// Copying form of [`filter_relationships_in_place`]; the input is untouched.
#[must_use]
pub fn filter_relationships<F>(annotations: &[ImageRelationships], condition: F) -> Vec<ImageRelationships>
where
    F: FnMut(&Relationship) -> bool,
{
    let mut filtered = annotations.to_vec();
    filter_relationships_in_place(&mut filtered, condition);
    filtered
}

/// Rewrite predicates found in `syns_to_preds` to their canonical names.
///
/// Predicates not in the map (including `UNLABELED`) are left alone.
/// Returns the number of predicates rewritten.
pub fn canonicalize_predicates(
    annotations: &mut [ImageRelationships],
    syns_to_preds: &HashMap<String, String>,
) -> usize {
    let mut changed = 0;
    for r in annotations.iter_mut().flat_map(|a| a.relationships.iter_mut()) {
        if let Some(canonical) = syns_to_preds.get(&r.predicate) {
            if *canonical != r.predicate {
                r.predicate = canonical.clone();
                changed += 1;
            }
        }
    }
    changed
}
