//! Object categories present in a corpus.

use super::types::ImageRelationships;
use crate::synonyms::SynonymTable;
use crate::Result;
use std::collections::{BTreeSet, HashSet};

/// Canonical object categories that occur in relationships of `predicates`.
///
/// Collects the subject and object names of every relationship whose
/// predicate is one of `predicates` (exact match), then returns, sorted, each
/// canonical in `object_synonyms` whose synonym list contains any of them.
/// The result is the entity list used for categorical primitives.
pub fn extract_obj_categories<S: AsRef<str>>(
    annotations: &[ImageRelationships],
    predicates: &[S],
    object_synonyms: &SynonymTable,
) -> Result<Vec<String>> {
    let wanted: HashSet<&str> = predicates.iter().map(|p| p.as_ref()).collect();

    let mut entities: HashSet<&str> = HashSet::new();
    for r in annotations.iter().flat_map(|a| a.relationships.iter()) {
        if wanted.contains(r.predicate.as_str()) {
            entities.insert(r.object.name()?);
            entities.insert(r.subject.name()?);
        }
    }

    let categories: BTreeSet<String> = object_synonyms
        .iter()
        .filter(|(_, syns)| syns.iter().any(|s| entities.contains(s.as_str())))
        .map(|(canonical, _)| canonical.to_string())
        .collect();

    log::debug!(
        "{} distinct entity names map to {} categories",
        entities.len(),
        categories.len()
    );
    Ok(categories.into_iter().collect())
}
